//! Expression parsing implementation
//!
//! One method per precedence level, lowest first:
//!
//! ```text
//! assignment     ::= logical_or ("=" assignment)?          right-assoc
//! logical_or     ::= logical_and ("||" logical_and)*
//! logical_and    ::= equality ("&&" equality)*
//! equality       ::= relational (("==" | "!=") relational)*
//! relational     ::= additive (("<" | ">" | "<=" | ">=") additive)*
//! additive       ::= multiplicative (("+" | "-") multiplicative)*
//! multiplicative ::= unary (("*" | "/" | "%") unary)*
//! unary          ::= ("+" | "-" | "!" | "++" | "--") unary | primary
//! primary        ::= literal | identifier ("++" | "--")? | "(" expression ")"
//! ```
//!
//! A token that cannot start a primary expression is reported and replaced
//! by an `Error` node so the enclosing statement can still be checked.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

/// Tokens a failed primary leaves in place for the enclosing rule
const TERMINATORS: &[&str] = &[";", "}", ")", ","];

type Rule = fn(&mut Parser) -> Result<SyntaxNode, ParseError>;

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_assignment()
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> Result<SyntaxNode, ParseError> {
        let target = self.parse_logical_or()?;

        if let Some(op) = self.match_operator(&["="]) {
            let value = self.parse_assignment()?;
            return Ok(SyntaxNode::new(NodeKind::Assignment, op.location)
                .with_value(op.text)
                .with_children(vec![target, value]));
        }

        Ok(target)
    }

    /// Left-associative binary level: `next (op next)*`
    fn parse_binary_level(&mut self, ops: &[&str], next: Rule) -> Result<SyntaxNode, ParseError> {
        let mut left = next(self)?;

        while let Some(op) = self.match_operator(ops) {
            let right = next(self)?;
            left = SyntaxNode::new(NodeKind::BinaryOp, op.location)
                .with_value(op.text)
                .with_children(vec![left, right]);
        }

        Ok(left)
    }

    fn parse_logical_or(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_binary_level(&["||"], Parser::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_binary_level(&["&&"], Parser::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_binary_level(&["==", "!="], Parser::parse_relational)
    }

    fn parse_relational(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_binary_level(&["<", ">", "<=", ">="], Parser::parse_additive)
    }

    fn parse_additive(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_binary_level(&["+", "-"], Parser::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_binary_level(&["*", "/", "%"], Parser::parse_unary)
    }

    /// Parse prefix unary operators (right-recursive)
    fn parse_unary(&mut self) -> Result<SyntaxNode, ParseError> {
        if let Some(op) = self.match_operator(&["+", "-", "!", "++", "--"]) {
            let operand = self.parse_unary()?;
            return Ok(SyntaxNode::new(NodeKind::UnaryOp, op.location)
                .with_value(op.text)
                .with_children(vec![operand]));
        }

        self.parse_primary()
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> Result<SyntaxNode, ParseError> {
        let Some(token) = self.peek().cloned() else {
            let location = self.current_location();
            self.report(ParseError {
                message: "Unexpected end of input while parsing expression".to_string(),
                location,
            });
            return Ok(SyntaxNode::error(location));
        };

        match token.kind {
            TokenKind::Literal(_) => {
                self.advance();
                Ok(SyntaxNode::new(NodeKind::Literal, token.location).with_value(token.text))
            }
            TokenKind::Identifier => {
                self.advance();
                let ident = SyntaxNode::identifier(token.text, token.location);

                if let Some(op) = self.match_operator(&["++", "--"]) {
                    return Ok(SyntaxNode::new(NodeKind::PostfixOp, op.location)
                        .with_value(op.text)
                        .with_children(vec![ident]));
                }

                Ok(ident)
            }
            TokenKind::Separator if token.text == "(" => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_token(")", "Expected ')' after expression")?;
                Ok(expr)
            }
            _ => {
                if !TERMINATORS.contains(&token.text.as_str()) {
                    self.advance();
                }
                self.report(ParseError {
                    message: format!("Unexpected token in expression: '{}'", token.text),
                    location: token.location,
                });
                Ok(SyntaxNode::error(token.location))
            }
        }
    }
}
