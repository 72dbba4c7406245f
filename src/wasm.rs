//! WASM bindings for the formula editor core.
//!
//! This module exposes the parser to the browser-side formula editor. Trees
//! cross the boundary as JSON.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmFormulaParser } from 'formula_editor_core';
//!
//! await init();
//!
//! const parser = new WasmFormulaParser(await (await fetch('/spec')).text());
//!
//! try {
//!   const tree = JSON.parse(parser.parse('(series "gas.fr" #:fill 0)'));
//!   // ... edit the tree ...
//!   const text = parser.render(JSON.stringify(tree));
//! } catch (report) {
//!   showError(report);
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::edition::{render, EditionTree};
use crate::parser::{self, ParseOptions};
use crate::spec::Spec;

/// Nesting limit applied to formulas typed in the browser.
const MAX_DEPTH: usize = 512;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible formula parser bound to one spec catalog.
#[wasm_bindgen]
pub struct WasmFormulaParser {
    spec: Spec,
    options: ParseOptions,
}

#[wasm_bindgen]
impl WasmFormulaParser {
    /// Create a parser from a JSON spec catalog.
    ///
    /// # Arguments
    /// * `spec_json` - The operator catalog document
    ///
    /// # Returns
    /// A new `WasmFormulaParser` or an error if the catalog is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(spec_json: &str) -> Result<WasmFormulaParser, JsValue> {
        let spec = Spec::from_json(spec_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmFormulaParser {
            spec,
            options: ParseOptions::new().with_max_depth(MAX_DEPTH),
        })
    }

    /// Parse a formula, returning its edition tree as JSON.
    ///
    /// Throws the formatted error report when the formula does not parse.
    #[wasm_bindgen]
    pub fn parse(&self, formula: &str) -> Result<String, JsValue> {
        let tree = parser::parse_with(&self.spec, formula, &self.options, &mut parser::NoTrace)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_json::to_string(&tree).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Write an edition tree (as JSON) back to formula text.
    #[wasm_bindgen]
    pub fn render(&self, tree_json: &str) -> Result<String, JsValue> {
        let tree: EditionTree =
            serde_json::from_str(tree_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(render(&tree))
    }

    /// Number of operators in the loaded catalog.
    #[wasm_bindgen(getter)]
    pub fn operator_count(&self) -> usize {
        self.spec.len()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
