//! WASM bindings for the Raku parser.
//!
//! Exposes `parse()`, `check()` and `format()` to JavaScript via wasm-bindgen.

use raku_printer::PrintOptions;
use wasm_bindgen::prelude::*;

/// Parse Raku source into a nested JS object tree.
///
/// Each node is `{ kind, value?, delimiter?, line, column, children? }`.
/// Throws a JS error if the source does not parse.
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<JsValue, JsError> {
    let tree = raku_parser::Parser::parse(source).map_err(|e| JsError::new(&e.to_string()))?;
    let view = raku_printer::to_json(&tree);
    serde_wasm_bindgen::to_value(&view).map_err(|e| JsError::new(&e.to_string()))
}

/// Check Raku source without building a JS tree.
///
/// Returns `{ ok: true }` or `{ ok: false, message, line, column }`.
#[wasm_bindgen]
pub fn check(source: &str) -> Result<JsValue, JsError> {
    let report = js_sys::Object::new();
    let set = |key: &str, value: JsValue| {
        js_sys::Reflect::set(&report, &key.into(), &value)
            .map(|_| ())
            .map_err(|_| JsError::new(&format!("Failed to set {key} property")))
    };

    match raku_parser::Parser::parse(source) {
        Ok(_) => set("ok", true.into())?,
        Err(e) => {
            set("ok", false.into())?;
            set("message", e.to_string().into())?;
            set("line", (e.line() as u32).into())?;
            set("column", (e.column() as u32).into())?;
        }
    }

    Ok(report.into())
}

/// Reformat Raku source into canonical layout.
#[wasm_bindgen]
pub fn format(source: &str, indent: Option<usize>) -> Result<String, JsError> {
    native_format(source, indent).map_err(|e| JsError::new(&e))
}

/// Get the parser version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn native_format(source: &str, indent: Option<usize>) -> Result<String, String> {
    let tree = raku_parser::Parser::parse(source).map_err(|e| e.to_string())?;
    let options = PrintOptions {
        indent: indent.unwrap_or(PrintOptions::default().indent),
    };
    raku_printer::source::render(&tree, &options).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Native tests (non-WASM) — the pipeline behind the bindings
    // =========================================================================

    #[test]
    fn test_format_default_indent() {
        let out = native_format("map test {\nname \"world\"\n}\n", None).unwrap();
        assert_eq!(out, "map test {\n  name \"world\"\n}\n");
    }

    #[test]
    fn test_format_custom_indent() {
        let out = native_format("a (\nb\n)\n", Some(3)).unwrap();
        assert_eq!(out, "a (\n   b\n)\n");
    }

    #[test]
    fn test_format_reports_parse_error() {
        let err = native_format("a {\n", None).unwrap_err();
        assert!(err.starts_with("Parse error in eof"));
    }

    #[test]
    fn test_multiple_formats() {
        // No state carried between calls
        let out1 = native_format("x 1\n", None).unwrap();
        let out2 = native_format("y 2\n", None).unwrap();
        assert_eq!(out1, "x 1\n");
        assert_eq!(out2, "y 2\n");
    }

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }
}
