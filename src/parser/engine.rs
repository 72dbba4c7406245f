//! Recursive-descent engine.
//!
//! Each step takes a skeleton, reads text for it and returns the concrete
//! subtree. Choice points (operators of a base type, union alternatives,
//! literal versus operator application, list elements, optional arguments)
//! run every alternative through [`Engine::attempt`], which puts the cursor
//! back where it was when the alternative fails.

use std::collections::HashSet;
use std::sync::Arc;

use super::cursor::Cursor;
use super::problem::{Failures, ParseFailure, Problem};
use super::trace::ParseTrace;
use super::ParseOptions;
use crate::edition::{argument_type, build_skeleton, EditionNode, EditionTree, EditionType};
use crate::spec::{BaseType, ExpType, InputType, OptArg, Spec, Value};

/// A failed step. The problem itself is kept in [`Failures`].
#[derive(Debug)]
pub(crate) struct Backtrack;

type Step<T> = std::result::Result<T, Backtrack>;

pub(crate) struct Engine<'a> {
    spec: &'a Spec,
    cursor: Cursor<'a>,
    failures: Failures,
    trace: &'a mut dyn ParseTrace,
    max_depth: Option<usize>,
    depth: usize,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(
        spec: &'a Spec,
        input: &'a str,
        options: &ParseOptions,
        trace: &'a mut dyn ParseTrace,
    ) -> Self {
        Self {
            spec,
            cursor: Cursor::new(input),
            failures: Failures::default(),
            trace,
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    /// Parse the whole input as a top-level series formula.
    pub(crate) fn run(mut self) -> Result<EditionTree, ParseFailure> {
        self.cursor.skip_whitespace();
        let root = build_skeleton(EditionType::ReturnType(BaseType::Series));
        match self.resolve(root) {
            Ok(tree) => Ok(tree),
            Err(Backtrack) => {
                let input = self.cursor.input();
                Err(self.failures.into_failure(input))
            }
        }
    }

    /// Fill in one skeleton.
    fn resolve(&mut self, skeleton: EditionTree) -> Step<EditionTree> {
        self.trace.enter(skeleton.edition_type(), self.cursor.offset());

        if let Some(limit) = self.max_depth {
            if self.depth >= limit {
                return self.fail(Problem::TooDeep(limit));
            }
        }

        self.depth += 1;
        let result = self.dispatch(skeleton);
        self.depth -= 1;

        if let Ok(tree) = &result {
            self.trace.resolved(tree, self.cursor.offset());
        }
        result
    }

    fn dispatch(&mut self, skeleton: EditionTree) -> Step<EditionTree> {
        let EditionTree { node, children } = skeleton;
        match node.edition_type.clone() {
            EditionType::ReturnType(_) => {
                let children = self.resolve_all(children)?;
                if !self.cursor.is_at_end() {
                    return self.fail(Problem::ExpectingEnd);
                }
                Ok(EditionTree::new(node, children))
            }
            EditionType::BaseType(base) => {
                let operator = self.operator_application(&base)?;
                Ok(EditionTree::new(node, vec![operator]))
            }
            EditionType::InputSelector(input) => {
                let chosen = self.input_or_expression(input)?;
                Ok(EditionTree::new(node, vec![chosen]))
            }
            EditionType::ExpType(exp_type) => self.expression(node, &exp_type),
            EditionType::OptArgs(opts) => {
                let children = self.opt_args(&opts)?;
                Ok(EditionTree::new(node, children))
            }
            EditionType::OptArg(opt) => {
                self.keyword(&opt.keyword())?;
                let value = self.resolve(build_skeleton(argument_type(&opt.exp_type)))?;
                Ok(EditionTree::new(node, vec![value]))
            }
            EditionType::Operator(_) => {
                let children = self.resolve_all(children)?;
                Ok(EditionTree::new(node, children))
            }
        }
    }

    fn resolve_all(&mut self, skeletons: Vec<EditionTree>) -> Step<Vec<EditionTree>> {
        skeletons
            .into_iter()
            .map(|skeleton| self.resolve(skeleton))
            .collect()
    }

    /// `(` operator-keyword arguments `)` for one of the operators of `base`.
    fn operator_application(&mut self, base: &BaseType) -> Step<EditionTree> {
        self.symbol("(")?;

        let spec = self.spec;
        let operators = spec.operators(base);
        if operators.is_empty() {
            return self.fail(Problem::NoOperator(*base));
        }

        // Only the keyword is tried per operator: the first declared operator
        // with a matching name owns the arguments, even if they fail.
        let operator = operators
            .iter()
            .find(|operator| self.attempt(|engine| engine.keyword(&operator.name)).is_ok())
            .ok_or(Backtrack)?;
        let tree = self.resolve(build_skeleton(EditionType::Operator(operator.clone())))?;

        self.symbol(")")?;
        Ok(tree)
    }

    /// A literal of `input`, or else an operator producing it.
    fn input_or_expression(&mut self, input: InputType) -> Step<EditionTree> {
        let literal = build_skeleton(EditionType::ExpType(ExpType::Input(input)));
        if let Ok(tree) = self.attempt(|engine| engine.resolve(literal)) {
            return Ok(tree);
        }
        let expression = build_skeleton(EditionType::BaseType(BaseType::Input(input)));
        self.attempt(|engine| engine.resolve(expression))
    }

    fn expression(&mut self, node: EditionNode, exp_type: &ExpType) -> Step<EditionTree> {
        match exp_type {
            ExpType::Input(input) => {
                let value = self.literal(*input)?;
                Ok(EditionTree::leaf(EditionNode::with_value(node.edition_type, value)))
            }
            ExpType::Series => self.fail(Problem::SeriesLiteral),
            ExpType::Union(alternatives) => {
                if alternatives.is_empty() {
                    return self.fail(Problem::Expecting("a union alternative".to_string()));
                }
                for alternative in alternatives.iter() {
                    let skeleton = build_skeleton(argument_type(alternative));
                    if let Ok(tree) = self.attempt(|engine| engine.resolve(skeleton)) {
                        return Ok(EditionTree::new(node, vec![tree]));
                    }
                }
                Err(Backtrack)
            }
            ExpType::List(element) => {
                self.symbol("(")?;
                let mut items = Vec::new();
                loop {
                    let start = self.cursor.offset();
                    let skeleton = build_skeleton(argument_type(element));
                    match self.attempt(|engine| engine.resolve(skeleton)) {
                        // An element that consumes nothing would repeat forever.
                        Ok(item) if self.cursor.offset() > start => items.push(item),
                        _ => break,
                    }
                }
                self.symbol(")")?;
                Ok(EditionTree::new(node, items))
            }
        }
    }

    /// Keyword arguments in any order, then defaults for the missing ones.
    fn opt_args(&mut self, opts: &Arc<[OptArg]>) -> Step<Vec<EditionTree>> {
        let mut supplied: Vec<(String, EditionTree)> = Vec::new();

        loop {
            if let Some(name) = duplicate_name(&supplied) {
                return self.fail(Problem::DuplicateKeyword(format!("#:{}", name)));
            }

            let mut matched = None;
            for opt in opts.iter() {
                let skeleton = EditionTree::leaf(EditionNode::new(EditionType::OptArg(opt.clone())));
                if let Ok(tree) = self.attempt(|engine| engine.resolve(skeleton)) {
                    matched = Some((opt.name.clone(), tree));
                    break;
                }
            }

            match matched {
                Some(pair) => supplied.push(pair),
                None => break,
            }
        }

        Ok(opts
            .iter()
            .map(|opt| match supplied.iter().position(|(name, _)| *name == opt.name) {
                Some(i) => supplied.swap_remove(i).1,
                None => build_skeleton(EditionType::OptArg(opt.clone())),
            })
            .collect())
    }

    fn literal(&mut self, input: InputType) -> Step<Value> {
        let read = match input {
            InputType::Int => self.cursor.read_int().map(Value::Int),
            InputType::Number => self.cursor.read_number().map(Value::Number),
            InputType::String => self.cursor.read_string().map(Value::String),
            InputType::Bool => self.cursor.read_bool().map(Value::Bool),
            InputType::Timestamp => self.cursor.read_timestamp(),
        };
        match read {
            Ok(value) => {
                self.cursor.skip_whitespace();
                Ok(value)
            }
            Err(problem) => self.fail(problem),
        }
    }

    fn symbol(&mut self, symbol: &str) -> Step<()> {
        if self.cursor.eat_symbol(symbol) {
            self.cursor.skip_whitespace();
            Ok(())
        } else {
            self.fail(Problem::ExpectingSymbol(symbol.to_string()))
        }
    }

    fn keyword(&mut self, keyword: &str) -> Step<()> {
        if self.cursor.eat_keyword(keyword) {
            self.cursor.skip_whitespace();
            Ok(())
        } else {
            self.fail(Problem::ExpectingKeyword(keyword.to_string()))
        }
    }

    /// Run one alternative; on failure restore the cursor.
    fn attempt<T>(&mut self, alternative: impl FnOnce(&mut Self) -> Step<T>) -> Step<T> {
        let snapshot = self.cursor.offset();
        let result = alternative(self);
        if result.is_err() {
            self.cursor.reset(snapshot);
            self.trace.backtrack(snapshot);
        }
        result
    }

    fn fail<T>(&mut self, problem: Problem) -> Step<T> {
        self.failures.record(self.cursor.offset(), problem);
        Err(Backtrack)
    }
}

fn duplicate_name(supplied: &[(String, EditionTree)]) -> Option<&str> {
    let mut seen = HashSet::new();
    supplied
        .iter()
        .map(|(name, _)| name.as_str())
        .find(|name| !seen.insert(*name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormulaError;
    use crate::parser::{parse, parse_with, LogTrace, NoTrace};
    use crate::testing::{literal, sample_spec, top_operator};

    fn parse_ok(source: &str) -> EditionTree {
        match parse(&sample_spec(), source) {
            Ok(tree) => tree,
            Err(e) => panic!("failed to parse {:?}:\n{}", source, e),
        }
    }

    fn parse_err(source: &str) -> String {
        parse(&sample_spec(), source).unwrap_err().to_string()
    }

    fn op_name(tree: &EditionTree) -> &str {
        &tree.operator().unwrap().name
    }

    #[test]
    fn test_nested_operator() {
        let tree = parse_ok("(add (mul 2 3) 4)");
        let add = top_operator(&tree);
        assert_eq!(op_name(add), "add");
        assert_eq!(add.children.len(), 2);

        let mul = add.children[0].unwrap_slots();
        assert_eq!(op_name(mul), "mul");
        assert_eq!(literal(&mul.children[0]), Some(&Value::Number(2.0)));
        assert_eq!(literal(&mul.children[1]), Some(&Value::Number(3.0)));
        assert_eq!(literal(&add.children[1]), Some(&Value::Number(4.0)));
    }

    #[test]
    fn test_literal_sits_under_input_selector() {
        let tree = parse_ok("(add 1 2)");
        let arg = &top_operator(&tree).children[0];
        assert_eq!(arg.edition_type(), &EditionType::InputSelector(InputType::Number));
        assert_eq!(arg.children.len(), 1);
        assert_eq!(
            arg.children[0].edition_type(),
            &EditionType::ExpType(ExpType::Input(InputType::Number))
        );
    }

    #[test]
    fn test_missing_close_paren() {
        assert_eq!(parse_err("(add 2 3"), "Expecting symbol ')' at row:1 col:9");
    }

    #[test]
    fn test_trailing_text() {
        assert_eq!(parse_err("(add 1 2) extra"), "Expecting end at row:1 col:11");
    }

    #[test]
    fn test_opt_args_defaults_and_order() {
        let tree = parse_ok("(op #:a 1)");
        let group = &top_operator(&tree).children[0];
        assert_eq!(group.children.len(), 2);
        assert_eq!(literal(&group.children[0]), Some(&Value::Int(1)));
        assert_eq!(literal(&group.children[1]), Some(&Value::Int(20)));

        let tree = parse_ok("(op #:b 2 #:a 1)");
        let group = &top_operator(&tree).children[0];
        let names: Vec<_> = group
            .children
            .iter()
            .map(|arg| match arg.edition_type() {
                EditionType::OptArg(opt) => opt.name.clone(),
                other => panic!("unexpected node {}", other),
            })
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(literal(&group.children[0]), Some(&Value::Int(1)));
        assert_eq!(literal(&group.children[1]), Some(&Value::Int(2)));

        let tree = parse_ok("(op)");
        let group = &top_operator(&tree).children[0];
        assert_eq!(literal(&group.children[0]), Some(&Value::Int(10)));
        assert!(!group.children[0].children[0].is_resolved());
    }

    #[test]
    fn test_duplicate_keyword() {
        let message = parse_err("(op #:a 1 #:a 2)");
        assert_eq!(message, "Problem: duplicate keyword '#:a' at row:1 col:16");
    }

    #[test]
    fn test_union_first_alternative_wins() {
        let tree = parse_ok("(pick 3)");
        let union = &top_operator(&tree).children[0];
        assert_eq!(union.children.len(), 1);
        assert_eq!(
            union.children[0].edition_type(),
            &EditionType::InputSelector(InputType::Int)
        );
        assert_eq!(literal(union), Some(&Value::Int(3)));

        let tree = parse_ok("(pick 3.5)");
        let union = &top_operator(&tree).children[0];
        assert_eq!(
            union.children[0].edition_type(),
            &EditionType::InputSelector(InputType::Number)
        );
        assert_eq!(literal(union), Some(&Value::Number(3.5)));
    }

    #[test]
    fn test_lists() {
        let tree = parse_ok("(ints ())");
        assert!(top_operator(&tree).children[0].children.is_empty());

        let tree = parse_ok("(ints (1 2 3))");
        let list = &top_operator(&tree).children[0];
        let values: Vec<_> = list.children.iter().map(literal).collect();
        assert_eq!(
            values,
            vec![Some(&Value::Int(1)), Some(&Value::Int(2)), Some(&Value::Int(3))]
        );

        let message = parse_err("(ints (1 2.5 3))");
        assert!(message.contains("row:1 col:10"), "{}", message);
    }

    #[test]
    fn test_recursive_base_type() {
        let tree = parse_ok("(sum ((sum ()) (add 1 2) (sum ((op)))))");
        let outer = top_operator(&tree);
        let items = &outer.children[0].children;
        assert_eq!(items.len(), 3);
        let names: Vec<_> = items.iter().map(|item| op_name(item.unwrap_slots())).collect();
        assert_eq!(names, vec!["sum", "add", "sum"]);
    }

    #[test]
    fn test_literal_or_operator_for_input_slot() {
        let tree = parse_ok("(shift (series \"gas.fr\") (today) #:strict #t)");
        let shift = top_operator(&tree);
        let at = &shift.children[1];
        assert_eq!(op_name(at.unwrap_slots()), "today");

        let tree = parse_ok("(shift (series \"gas.fr\") \"2024-05-01\")");
        let at = &top_operator(&tree).children[1];
        assert!(matches!(literal(at), Some(Value::Timestamp(_))));
    }

    #[test]
    fn test_no_operator_for_base_type() {
        assert_eq!(
            parse_err("(ints ((foo)))"),
            "Problem: no operator for base type Int at row:1 col:9"
        );
    }

    #[test]
    fn test_same_name_operators_earlier_declaration_wins() {
        let tree = parse_ok("(dup 1)");
        let dup = top_operator(&tree);
        assert_eq!(dup.operator().unwrap().args[0], ExpType::Input(InputType::Int));

        // The String overload is never reached once the Int one matched by name.
        assert_eq!(
            parse_err("(dup \"x\")"),
            "Expecting int at row:1 col:6\nExpecting symbol '(' at row:1 col:6"
        );
    }

    #[test]
    fn test_unknown_operator_reports_every_keyword() {
        let message = parse_err("(nope 1)");
        let lines: Vec<_> = message.lines().collect();
        assert_eq!(lines.len(), sample_spec().operators(&BaseType::Series).len());
        assert_eq!(lines[0], "Expecting keyword 'series' at row:1 col:2");
        assert!(lines.iter().all(|line| line.ends_with("at row:1 col:2")));
    }

    #[test]
    fn test_whitespace_and_comments() {
        let tree = parse_ok("  ; leading comment\n(add\n   1 ; first\n   2)\n");
        assert_eq!(op_name(top_operator(&tree)), "add");
    }

    #[test]
    fn test_error_position_on_later_line() {
        assert_eq!(
            parse_err("(add 1\n  #t)"),
            "Expecting number at row:2 col:3\nExpecting symbol '(' at row:2 col:3"
        );
    }

    #[test]
    fn test_series_literal_is_a_problem() {
        let spec = sample_spec();
        let mut trace = NoTrace;
        let options = ParseOptions::default();
        let mut engine = Engine::new(&spec, "(series \"x\")", &options, &mut trace);
        let skeleton = build_skeleton(EditionType::ExpType(ExpType::Series));
        assert!(engine.resolve(skeleton).is_err());

        let failure = engine.failures.into_failure("(series \"x\")");
        assert_eq!(failure.dead_ends[0].problem, Problem::SeriesLiteral);
    }

    #[test]
    fn test_max_depth() {
        let source = "(sum ((sum ((sum ((sum ())))))))";
        let spec = sample_spec();
        let options = ParseOptions::new().with_max_depth(6);
        let err = parse_with(&spec, source, &options, &mut NoTrace).unwrap_err();
        assert!(matches!(err, FormulaError::Syntax(_)));
        assert!(err.to_string().contains("nested deeper than 6"), "{}", err);

        let options = ParseOptions::new().with_max_depth(64);
        assert!(parse_with(&spec, source, &options, &mut NoTrace).is_ok());
    }

    #[derive(Default)]
    struct CountingTrace {
        entered: usize,
        resolved: usize,
        backtracked: usize,
    }

    impl ParseTrace for CountingTrace {
        fn enter(&mut self, _edition_type: &EditionType, _offset: usize) {
            self.entered += 1;
        }

        fn resolved(&mut self, _tree: &EditionTree, _offset: usize) {
            self.resolved += 1;
        }

        fn backtrack(&mut self, _offset: usize) {
            self.backtracked += 1;
        }
    }

    #[test]
    fn test_trace_hook_observes_without_changing_result() {
        let spec = sample_spec();
        let source = "(shift (add (mul 1 2) 3) (today))";
        let options = ParseOptions::default();

        let mut counting = CountingTrace::default();
        let traced = parse_with(&spec, source, &options, &mut counting).unwrap();
        let logged = parse_with(&spec, source, &options, &mut LogTrace).unwrap();
        let plain = parse(&spec, source).unwrap();

        assert_eq!(traced, plain);
        assert_eq!(logged, plain);
        assert!(counting.entered > counting.resolved);
        assert!(counting.backtracked > 0);
    }

    #[test]
    fn test_deterministic() {
        let spec = sample_spec();
        let source = "(series \"gas.fr\" #:fill \"ffill\" #:from \"2020-01-01\")";
        assert_eq!(parse(&spec, source).unwrap(), parse(&spec, source).unwrap());
        let bad = "(series \"gas.fr\" #:fill)";
        assert_eq!(
            parse(&spec, bad).unwrap_err().to_string(),
            parse(&spec, bad).unwrap_err().to_string()
        );
    }
}
