// Syntax tree definitions for the validator

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Every kind of node the parser can produce.
///
/// The set is closed: the semantic pass matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    Block,
    VariableDeclaration,
    Identifier,
    Literal,
    Assignment,
    BinaryOp,
    UnaryOp,
    PostfixOp,
    ForLoop,
    WhileLoop,
    DoWhileLoop,
    IfStatement,
    SwitchStatement,
    CaseStatement,
    DefaultStatement,
    BreakStatement,
    ReturnStatement,
    Error,
    Empty,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A node of the syntax tree.
///
/// `value` holds the payload that depends on the kind:
/// - `VariableDeclaration`: the declared type keyword
/// - `Identifier`: the variable name
/// - `Literal`: the raw literal text, quotes included
/// - `Assignment`, `BinaryOp`, `UnaryOp`, `PostfixOp`: the operator
///
/// Child layout per kind:
/// - `VariableDeclaration`: `[Identifier, initializer?]`
/// - `Assignment`, `BinaryOp`: `[left, right]`
/// - `UnaryOp`, `PostfixOp`: `[operand]`
/// - `ForLoop`: `[init, condition, increment, body]` (missing clauses are `Empty`)
/// - `WhileLoop`: `[condition, body]`
/// - `DoWhileLoop`: `[body, condition]`
/// - `IfStatement`: `[condition, then, else?]`
/// - `SwitchStatement`: `[subject, CaseStatement | DefaultStatement ...]`
/// - `CaseStatement`: `[value, statements...]`
/// - `DefaultStatement`, `Block`, `Program`: `[statements...]`
/// - `ReturnStatement`: `[value?]`
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub value: Option<String>,
    pub children: Vec<SyntaxNode>,
    pub location: SourceLocation,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, location: SourceLocation) -> Self {
        SyntaxNode {
            kind,
            value: None,
            children: Vec::new(),
            location,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn push(&mut self, child: SyntaxNode) {
        self.children.push(child);
    }

    /// Root of every tree
    pub fn program() -> Self {
        SyntaxNode::new(NodeKind::Program, SourceLocation::new(1, 1))
    }

    pub fn identifier(name: impl Into<String>, location: SourceLocation) -> Self {
        SyntaxNode::new(NodeKind::Identifier, location).with_value(name)
    }

    pub fn empty(location: SourceLocation) -> Self {
        SyntaxNode::new(NodeKind::Empty, location)
    }

    pub fn error(location: SourceLocation) -> Self {
        SyntaxNode::new(NodeKind::Error, location)
    }

    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// Name carried by a bare identifier node
    pub fn identifier_name(&self) -> Option<&str> {
        if self.kind == NodeKind::Identifier {
            self.value.as_deref()
        } else {
            None
        }
    }
}
