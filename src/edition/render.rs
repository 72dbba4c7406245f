//! Writing an edition tree back to formula text.

use std::fmt::{self, Write};

use super::tree::{EditionTree, EditionType};
use crate::spec::ExpType;

/// Text written for a slot that holds nothing.
const PLACEHOLDER: &str = "_";

/// Render a tree as formula text.
///
/// Optional arguments are written only when they were read from text;
/// defaults are left implicit, so parsing the output rebuilds the same tree.
pub fn render(tree: &EditionTree) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_tree(&mut out, tree);
    out
}

impl fmt::Display for EditionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(f, self)
    }
}

fn write_tree<W: Write>(out: &mut W, tree: &EditionTree) -> fmt::Result {
    match tree.edition_type() {
        EditionType::Operator(op) => {
            write!(out, "({}", op.name)?;
            for child in &tree.children {
                if let EditionType::OptArgs(_) = child.edition_type() {
                    write_opt_args(out, child)?;
                } else {
                    out.write_char(' ')?;
                    write_tree(out, child)?;
                }
            }
            out.write_char(')')
        }
        EditionType::OptArgs(_) => write_opt_args(out, tree),
        EditionType::OptArg(opt) => {
            write!(out, "{} ", opt.keyword())?;
            write_single(out, tree)
        }
        EditionType::ExpType(ExpType::List(_)) => {
            out.write_char('(')?;
            for (i, child) in tree.children.iter().enumerate() {
                if i > 0 {
                    out.write_char(' ')?;
                }
                write_tree(out, child)?;
            }
            out.write_char(')')
        }
        EditionType::ExpType(ExpType::Input(_)) | EditionType::ExpType(ExpType::Series) => {
            write_content(out, tree)
        }
        EditionType::ReturnType(_)
        | EditionType::BaseType(_)
        | EditionType::InputSelector(_)
        | EditionType::ExpType(ExpType::Union(_)) => write_single(out, tree),
    }
}

/// Leading space included, absent arguments skipped.
fn write_opt_args<W: Write>(out: &mut W, group: &EditionTree) -> fmt::Result {
    for arg in &group.children {
        if arg.children.first().is_some_and(EditionTree::is_resolved) {
            out.write_char(' ')?;
            write_tree(out, arg)?;
        }
    }
    Ok(())
}

fn write_single<W: Write>(out: &mut W, tree: &EditionTree) -> fmt::Result {
    match tree.children.first() {
        Some(child) => write_tree(out, child),
        None => write_content(out, tree),
    }
}

fn write_content<W: Write>(out: &mut W, tree: &EditionTree) -> fmt::Result {
    match tree.value() {
        Some(value) => write!(out, "{}", value),
        None => out.write_str(PLACEHOLDER),
    }
}
