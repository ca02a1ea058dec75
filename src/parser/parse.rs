//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, cursor helpers, error recovery and the main parse
//! entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: variable declarations and type-specific initializers
//! - `statements`: statements (if, while, for, switch, blocks, ...)
//! - `expressions`: the expression precedence ladder
//!
//! # Error recovery
//!
//! Grammar rules return `Result<_, ParseError>` and bail out with `?` on the
//! first local problem. Rules that own a statement list (the program, blocks
//! and switch labels) catch the error, record it as a syntax [`Diagnostic`]
//! and synchronize: tokens are discarded until a `;` or `}` has been consumed.
//! Parsing then resumes with the next statement, so one mistake costs at most
//! one statement.

use crate::diagnostics::Diagnostic;
use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use std::fmt;

/// Parser error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Result of a full parse.
///
/// The tree is returned even when errors were found; it then contains
/// whatever statements parsed cleanly.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub is_valid: bool,
    pub errors: Vec<Diagnostic>,
    pub tree: SyntaxNode,
}

/// Parse a token stream into a `Program` tree.
pub fn parse(tokens: Vec<Token>) -> ParseOutcome {
    Parser::new(tokens).parse()
}

/// Recursive descent parser with a single shared cursor
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) errors: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut parser = Self {
            tokens,
            position: 0,
            errors: Vec::new(),
        };
        parser.skip_trivia();
        parser
    }

    /// Parse the entire program (a flat list of top-level statements)
    pub fn parse(mut self) -> ParseOutcome {
        let mut program = SyntaxNode::program();

        while !self.is_at_end() {
            self.parse_statement_recovering(&mut program.children);
        }

        ParseOutcome {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
            tree: program,
        }
    }

    // ===== Helper methods =====

    /// Move the cursor past comments and preprocessor lines
    pub(crate) fn skip_trivia(&mut self) {
        while self
            .tokens
            .get(self.position)
            .is_some_and(|t| t.kind.is_trivia())
        {
            self.position += 1;
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Current significant token; the cursor never rests on trivia
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Consume the current token and return it
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
            self.skip_trivia();
        }
        token
    }

    pub(crate) fn check(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is(text))
    }

    pub(crate) fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    pub(crate) fn match_token(&mut self, text: &str) -> bool {
        if self.check(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it is an operator listed in `ops`
    pub(crate) fn match_operator(&mut self, ops: &[&str]) -> Option<Token> {
        let matched = self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Operator && ops.contains(&t.text.as_str()));
        if matched {
            self.advance()
        } else {
            None
        }
    }

    /// Location of the current token, or of the last token once input is exhausted
    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.location)
            .unwrap_or(SourceLocation::new(1, 1))
    }

    /// Human-readable description of the current token for messages
    pub(crate) fn describe_current(&self) -> String {
        match self.peek() {
            Some(token) => format!("'{}'", token.text),
            None => "end of input".to_string(),
        }
    }

    pub(crate) fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            location: self.current_location(),
        }
    }

    pub(crate) fn expect_token(&mut self, text: &str, message: &str) -> Result<Token, ParseError> {
        if self.check(text) {
            self.advance()
                .ok_or_else(|| self.error_here(message.to_string()))
        } else {
            Err(self.error_here(format!("{}, found {}", message, self.describe_current())))
        }
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<Token, ParseError> {
        if self.check_kind(TokenKind::Identifier) {
            self.advance()
                .ok_or_else(|| self.error_here("Expected identifier"))
        } else {
            Err(self.error_here(format!(
                "Expected identifier {}, found {}",
                ctx,
                self.describe_current()
            )))
        }
    }

    /// Record a syntax diagnostic without unwinding
    pub(crate) fn report(&mut self, err: ParseError) {
        self.errors.push(err.into());
    }

    /// Discard tokens until a `;` or `}` has been consumed or input runs out
    pub(crate) fn synchronize(&mut self) {
        while let Some(token) = self.advance() {
            if token.is(";") || token.is("}") {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn parse_source(source: &str) -> ParseOutcome {
        parse(tokenize(source).unwrap())
    }

    #[test]
    fn test_parse_simple_program() {
        let outcome = parse_source("int x = 5; x = x + 1;");

        assert!(outcome.is_valid);
        assert_eq!(outcome.tree.kind, NodeKind::Program);
        assert_eq!(outcome.tree.children.len(), 2);
        assert_eq!(outcome.tree.children[0].kind, NodeKind::VariableDeclaration);
        assert_eq!(outcome.tree.children[1].kind, NodeKind::Assignment);
    }

    #[test]
    fn test_empty_token_stream() {
        let outcome = parse(Vec::new());

        assert!(outcome.is_valid);
        assert!(outcome.tree.children.is_empty());
    }

    #[test]
    fn test_comments_are_skipped() {
        let outcome = parse_source("#include <iostream>\n// lead\nint /* mid */ x; /* tail */");

        assert!(outcome.is_valid, "{:?}", outcome.errors);
        assert_eq!(outcome.tree.children.len(), 1);
        assert_eq!(outcome.tree.children[0].children[0].value_str(), "x");
    }

    #[test]
    fn test_missing_semicolon_recovers_at_next_statement() {
        let outcome = parse_source("int a = 1\nint b = 2;\nint c = 3;");

        assert!(!outcome.is_valid);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].location, SourceLocation::new(2, 1));
        // `int a = 1` is kept, `int b = 2;` is swallowed by synchronization
        let names: Vec<&str> = outcome
            .tree
            .children
            .iter()
            .map(|n| n.children[0].value_str())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_error_display() {
        let err = ParseError {
            message: "Expected ';'".to_string(),
            location: SourceLocation::new(3, 7),
        };

        assert_eq!(
            err.to_string(),
            "Parse error at line 3, column 7: Expected ';'"
        );
    }
}
