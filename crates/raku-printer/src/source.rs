//! Canonical Raku source.
//!
//! One statement per line. A block opens on the line that uses it, its
//! statements are indented one level, and it closes on a line of its own.
//! Empty blocks print as `{}`. Parsing the output gives back a tree with
//! the same shape as the input tree.

use raku_parser::{NodeId, NodeKind, Tree};

use crate::{leaf_text, PrintError, PrintOptions};

/// Render the tree's program as canonical source.
pub fn render(tree: &Tree, options: &PrintOptions) -> Result<String, PrintError> {
    let program = tree
        .program()
        .ok_or_else(|| PrintError::new("tree has no program"))?;
    let mut printer = SourcePrinter {
        tree,
        options,
        out: String::new(),
    };
    printer.statements(program, 0)?;
    Ok(printer.out)
}

struct SourcePrinter<'a> {
    tree: &'a Tree,
    options: &'a PrintOptions,
    out: String,
}

impl SourcePrinter<'_> {
    fn indent(&mut self, depth: usize) {
        self.out.push_str(&" ".repeat(depth * self.options.indent));
    }

    fn statements(&mut self, parent: NodeId, depth: usize) -> Result<(), PrintError> {
        for &id in self.tree.children(parent) {
            self.indent(depth);
            self.statement(id, depth)?;
            self.out.push('\n');
        }
        Ok(())
    }

    fn statement(&mut self, id: NodeId, depth: usize) -> Result<(), PrintError> {
        let node = self.tree.get(id);
        match node.kind {
            NodeKind::Expression => self.expression(id, depth),
            NodeKind::Block(_) => self.block(id, depth),
            NodeKind::Token(raku_lexer::TokenKind::Comment) => {
                self.out.push_str(&leaf_text(node)?);
                Ok(())
            }
            kind => Err(PrintError::new(format!("{kind} is not a statement"))),
        }
    }

    fn expression(&mut self, id: NodeId, depth: usize) -> Result<(), PrintError> {
        let [head, params] = self.tree.children(id) else {
            return Err(PrintError::new("expression needs a value and a paramlist"));
        };
        let (head, params) = (*head, *params);
        if self.tree.get(params).kind != NodeKind::Paramlist {
            return Err(PrintError::new("expression needs a value and a paramlist"));
        }

        self.value(head)?;
        for &param in self.tree.children(params) {
            self.out.push(' ');
            if self.tree.get(param).kind.is_block() {
                self.block(param, depth)?;
            } else {
                self.value(param)?;
            }
        }
        Ok(())
    }

    fn value(&mut self, id: NodeId) -> Result<(), PrintError> {
        let node = self.tree.get(id);
        if node.kind == NodeKind::Token(raku_lexer::TokenKind::Comment) {
            return Err(PrintError::new("a comment cannot be a value"));
        }
        self.out.push_str(&leaf_text(node)?);
        Ok(())
    }

    fn block(&mut self, id: NodeId, depth: usize) -> Result<(), PrintError> {
        let NodeKind::Block(delim) = self.tree.get(id).kind else {
            return Err(PrintError::new("expected a block"));
        };
        self.out.push(delim.open_char());
        if !self.tree.children(id).is_empty() {
            self.out.push('\n');
            self.statements(id, depth + 1)?;
            self.indent(depth);
        }
        self.out.push(delim.close_char());
        Ok(())
    }
}
