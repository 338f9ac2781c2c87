//! S-expression dump of a parse tree.
//!
//! One node per line, children indented two spaces under their parent,
//! closing parens collected at the end of the last child.

use raku_lexer::{TokenKind, Value};
use raku_parser::{Delimiter, NodeId, NodeKind, Tree};

/// Dump the whole tree, starting at its root.
pub fn render(tree: &Tree) -> String {
    render_from(tree, tree.root())
}

/// Dump the subtree rooted at `id`.
pub fn render_from(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, 0, &mut out);
    out.push('\n');
    out
}

fn write_node(tree: &Tree, id: NodeId, depth: usize, out: &mut String) {
    let node = tree.get(id);
    out.push_str(&"  ".repeat(depth));
    out.push('(');
    out.push_str(node.kind.name());

    match (node.kind, &node.value) {
        (NodeKind::Block(delim), _) => {
            out.push(' ');
            out.push_str(delimiter_name(delim));
        }
        (NodeKind::Token(TokenKind::String), Some(Value::Text(text))) => {
            out.push(' ');
            out.push_str(&crate::quote(text));
        }
        (_, Some(value)) => {
            out.push(' ');
            out.push_str(&value.to_string());
        }
        (_, None) => {}
    }

    for &child in tree.children(id) {
        out.push('\n');
        write_node(tree, child, depth + 1, out);
    }
    out.push(')');
}

fn delimiter_name(delim: Delimiter) -> &'static str {
    match delim {
        Delimiter::Curly => "curly",
        Delimiter::Paren => "paren",
        Delimiter::Bracket => "bracket",
    }
}
