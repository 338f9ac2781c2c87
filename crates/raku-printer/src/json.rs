//! Nested, serializable view of a parse tree.
//!
//! The arena tree is index-based; this view owns its children directly so
//! it serializes as plain nested objects (`serde_json`, `serde-wasm-bindgen`).

use raku_lexer::Value;
use raku_parser::{Delimiter, NodeId, NodeKind, Tree};
use serde::Serialize;

/// One node of the serializable view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonNode {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<JsonValue>,
    /// Opening delimiter of a block (`"{"`, `"("`, `"["`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonNode>,
}

/// A token payload, serialized as a bare number or string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Integer(n) => JsonValue::Integer(*n),
            Value::Float(n) => JsonValue::Float(*n),
            Value::Text(text) => JsonValue::Text(text.clone()),
        }
    }
}

/// Build the view for the whole tree.
pub fn to_json(tree: &Tree) -> JsonNode {
    node_to_json(tree, tree.root())
}

/// Build the view for the subtree rooted at `id`.
pub fn node_to_json(tree: &Tree, id: NodeId) -> JsonNode {
    let node = tree.get(id);
    let delimiter = match node.kind {
        NodeKind::Block(delim) => Some(open_text(delim)),
        _ => None,
    };
    JsonNode {
        kind: node.kind.name(),
        value: node.value.as_ref().map(JsonValue::from),
        delimiter,
        line: node.span.line,
        column: node.span.column,
        children: tree
            .children(id)
            .iter()
            .map(|child| node_to_json(tree, *child))
            .collect(),
    }
}

fn open_text(delim: Delimiter) -> String {
    delim.open_char().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use raku_parser::Parser;
    use serde_json::json;

    fn to_value(source: &str) -> serde_json::Value {
        let tree = Parser::parse(source).unwrap();
        serde_json::to_value(to_json(&tree)).unwrap()
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(
            to_value(""),
            json!({
                "kind": "root",
                "line": 1,
                "column": 1,
                "children": [{ "kind": "program", "line": 1, "column": 1 }]
            })
        );
    }

    #[test]
    fn test_expression_with_block() {
        let value = to_value("layer {\n  z 1.5\n}\n");
        let expression = &value["children"][0]["children"][0];
        assert_eq!(expression["kind"], "expression");
        assert_eq!(expression["children"][0]["value"], "layer");

        let block = &expression["children"][1]["children"][0];
        assert_eq!(block["kind"], "block");
        assert_eq!(block["delimiter"], "{");

        let z = &block["children"][0];
        assert_eq!(z["line"], 2);
        assert_eq!(z["column"], 3);
        assert_eq!(z["children"][1]["children"][0]["value"], 1.5);
    }

    #[test]
    fn test_numbers_stay_numbers() {
        let value = to_value("n 42\n");
        let param = &value["children"][0]["children"][0]["children"][1]["children"][0];
        assert_eq!(param, &json!({ "kind": "integer", "value": 42, "line": 1, "column": 3 }));
    }

    #[test]
    fn test_empty_paramlist_has_no_children_key() {
        let value = to_value("quit\n");
        let params = &value["children"][0]["children"][0]["children"][1];
        assert_eq!(params["kind"], "paramlist");
        assert!(params.get("children").is_none());
    }
}
