//! Parse tree for Raku.
//!
//! Nodes live in an arena owned by [`Tree`] and refer to each other through
//! [`NodeId`] indices. Children are owned by the tree in order; the parent
//! link is a plain back-reference for consumers walking upwards.
//!
//! The parser assembles subtrees as [`Draft`] values first, so that
//! statements it throws away (blank lines, the terminator after an
//! expression, the wrapper program of a block) never reach the arena.

use std::fmt;

use raku_lexer::{Span, Token, TokenKind, Value};

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The opening delimiter a block was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `{ ... }`
    Curly,
    /// `( ... )`
    Paren,
    /// `[ ... ]`
    Bracket,
}

impl Delimiter {
    /// Tried in this order when looking for a block.
    pub const ALL: [Delimiter; 3] = [Delimiter::Curly, Delimiter::Paren, Delimiter::Bracket];

    pub fn open_kind(self) -> TokenKind {
        match self {
            Delimiter::Curly => TokenKind::LCurly,
            Delimiter::Paren => TokenKind::LParen,
            Delimiter::Bracket => TokenKind::LBracket,
        }
    }

    pub fn close_kind(self) -> TokenKind {
        match self {
            Delimiter::Curly => TokenKind::RCurly,
            Delimiter::Paren => TokenKind::RParen,
            Delimiter::Bracket => TokenKind::RBracket,
        }
    }

    pub fn open_char(self) -> char {
        match self {
            Delimiter::Curly => '{',
            Delimiter::Paren => '(',
            Delimiter::Bracket => '[',
        }
    }

    pub fn close_char(self) -> char {
        match self {
            Delimiter::Curly => '}',
            Delimiter::Paren => ')',
            Delimiter::Bracket => ']',
        }
    }
}

/// What produced a node: a grammar rule, or a token for leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Program,
    Expression,
    Paramlist,
    Blank,
    Block(Delimiter),
    Token(TokenKind),
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Program => "program",
            NodeKind::Expression => "expression",
            NodeKind::Paramlist => "paramlist",
            NodeKind::Blank => "blank",
            NodeKind::Block(_) => "block",
            NodeKind::Token(kind) => kind.name(),
        }
    }

    pub fn is_block(self) -> bool {
        matches!(self, NodeKind::Block(_))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Payload copied from the originating token; `None` for rule nodes.
    pub value: Option<Value>,
    pub span: Span,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// A subtree under construction. Owns its children directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub kind: NodeKind,
    pub value: Option<Value>,
    pub span: Span,
    pub children: Vec<Draft>,
}

impl Draft {
    pub fn new(kind: NodeKind, value: Option<Value>, span: Span) -> Self {
        Self {
            kind,
            value,
            span,
            children: Vec::new(),
        }
    }

    /// A leaf copying kind, value and position from a token.
    pub fn leaf(token: &Token) -> Self {
        Self::new(NodeKind::Token(token.kind), token.value.clone(), token.span)
    }

    pub fn push(&mut self, child: Draft) {
        self.children.push(child);
    }
}

/// An immutable parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Move a draft into a fresh arena. Ids are handed out in pre-order,
    /// so the draft's root becomes [`Tree::root`].
    pub fn from_draft(draft: Draft) -> Self {
        let mut tree = Tree { nodes: Vec::new() };
        tree.insert(draft);
        tree
    }

    fn insert(&mut self, draft: Draft) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind: draft.kind,
            value: draft.value,
            span: draft.span,
            children: Vec::new(),
            parent: None,
        });
        for child in draft.children {
            let child_id = self.insert(child);
            self.attach(id, child_id);
        }
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The top-level program, when the root is a `root` node wrapping one.
    pub fn program(&self) -> Option<NodeId> {
        let root = self.get(self.root());
        match root.kind {
            NodeKind::Program => Some(self.root()),
            NodeKind::Root => root
                .children
                .first()
                .copied()
                .filter(|id| self.get(*id).kind == NodeKind::Program),
            _ => None,
        }
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first pre-order walk starting at `from`.
    pub fn walk(&self, from: NodeId) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![from],
        }
    }

    /// Same kinds, values and child order; positions are ignored.
    pub fn shape_eq(&self, other: &Tree) -> bool {
        let mut ours = self.walk(self.root());
        let mut theirs = other.walk(other.root());
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) => {
                    let (a, b) = (self.get(a), other.get(b));
                    if a.kind != b.kind
                        || a.value != b.value
                        || a.children.len() != b.children.len()
                    {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

/// Pre-order iterator over a subtree. See [`Tree::walk`].
pub struct Walk<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Walk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
