//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Variable declarations: `int x = 42, y;`
//! - Control flow: `if`, `while`, `for`, `do-while`, `switch`
//! - Jump statements: `return`, `break`
//! - Compound statements: `{ ... }`
//! - Expression statements and the empty statement `;`
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | if_stmt | while_stmt | for_stmt
//!             | do_while_stmt | switch_stmt | return_stmt
//!             | break_stmt | block | expr_stmt | ";"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ParseError, Parser};

const PREFIX_OPERATORS: &[&str] = &["+", "-", "!", "++", "--"];

impl Parser {
    /// Parse one statement, turning a failure into a diagnostic and resynchronizing
    pub(crate) fn parse_statement_recovering(&mut self, out: &mut Vec<SyntaxNode>) {
        if let Err(err) = self.parse_statement(out) {
            self.report(err);
            self.synchronize();
        }
    }

    /// Parse a statement, appending its node(s) to `out`
    pub(crate) fn parse_statement(&mut self, out: &mut Vec<SyntaxNode>) -> Result<(), ParseError> {
        let Some(token) = self.peek().cloned() else {
            return Ok(());
        };

        match token.kind {
            TokenKind::Keyword => {
                if self.is_type_keyword() {
                    return self.parse_variable_declaration(out);
                }
                let node = match token.text.as_str() {
                    "for" => self.parse_for_statement()?,
                    "while" => self.parse_while_statement()?,
                    "do" => self.parse_do_while_statement()?,
                    "if" => self.parse_if_statement()?,
                    "switch" => self.parse_switch_statement()?,
                    "break" => self.parse_break_statement()?,
                    "return" => self.parse_return_statement()?,
                    _ => {
                        // `else`, `case` or `default` out of place
                        self.advance();
                        self.report(ParseError {
                            message: format!("Unsupported keyword '{}'", token.text),
                            location: token.location,
                        });
                        return Ok(());
                    }
                };
                out.push(node);
            }
            TokenKind::Separator if token.text == "{" => {
                out.push(self.parse_block()?);
            }
            TokenKind::Separator if token.text == ";" => {
                self.advance();
                out.push(SyntaxNode::empty(token.location));
            }
            _ if starts_expression(&token) => {
                out.push(self.parse_expression_statement()?);
            }
            _ => {
                self.advance();
                self.report(ParseError {
                    message: format!("Unexpected token '{}'", token.text),
                    location: token.location,
                });
            }
        }

        Ok(())
    }

    /// Parse `{ statements }`
    pub(crate) fn parse_block(&mut self) -> Result<SyntaxNode, ParseError> {
        let open = self.expect_token("{", "Expected '{' to start block")?;
        let mut block = SyntaxNode::new(NodeKind::Block, open.location);

        loop {
            if self.match_token("}") {
                break;
            }
            if self.is_at_end() {
                self.report(self.error_here("Expected '}' to end block"));
                break;
            }
            self.parse_statement_recovering(&mut block.children);
        }

        Ok(block)
    }

    /// Parse the body of a loop or branch: a block or a single statement
    pub(crate) fn parse_body(&mut self) -> Result<SyntaxNode, ParseError> {
        if self.check("{") {
            return self.parse_block();
        }
        if self.is_at_end() {
            return Err(self.error_here("Expected statement, found end of input"));
        }

        let location = self.current_location();
        let mut statements = Vec::new();
        self.parse_statement(&mut statements)?;

        Ok(match statements.len() {
            0 => SyntaxNode::empty(location),
            1 => statements.remove(0),
            // `int a, b;` as a body
            _ => SyntaxNode::new(NodeKind::Block, location).with_children(statements),
        })
    }

    /// Parse expression statement: `expr ;`
    fn parse_expression_statement(&mut self) -> Result<SyntaxNode, ParseError> {
        let expr = self.parse_expression()?;
        self.expect_token(";", "Expected ';' after expression")?;
        Ok(expr)
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> Result<SyntaxNode, ParseError> {
        let keyword = self.expect_token("return", "Expected 'return'")?;
        let mut node = SyntaxNode::new(NodeKind::ReturnStatement, keyword.location);

        if !self.check(";") && !self.is_at_end() {
            node.push(self.parse_expression()?);
        }

        self.expect_token(";", "Expected ';' after return statement")?;
        Ok(node)
    }

    fn parse_break_statement(&mut self) -> Result<SyntaxNode, ParseError> {
        let keyword = self.expect_token("break", "Expected 'break'")?;
        self.expect_token(";", "Expected ';' after 'break'")?;
        Ok(SyntaxNode::new(NodeKind::BreakStatement, keyword.location))
    }

    /// Parse if statement
    fn parse_if_statement(&mut self) -> Result<SyntaxNode, ParseError> {
        let keyword = self.expect_token("if", "Expected 'if'")?;

        self.expect_token("(", "Expected '(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_token(")", "Expected ')' after if condition")?;

        let mut node = SyntaxNode::new(NodeKind::IfStatement, keyword.location);
        node.push(condition);
        node.push(self.parse_body()?);

        if self.match_token("else") {
            node.push(self.parse_body()?);
        }

        Ok(node)
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<SyntaxNode, ParseError> {
        let keyword = self.expect_token("while", "Expected 'while'")?;

        self.expect_token("(", "Expected '(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_token(")", "Expected ')' after while condition")?;

        let body = self.parse_body()?;

        Ok(SyntaxNode::new(NodeKind::WhileLoop, keyword.location).with_children(vec![condition, body]))
    }

    /// Parse do-while statement
    fn parse_do_while_statement(&mut self) -> Result<SyntaxNode, ParseError> {
        let keyword = self.expect_token("do", "Expected 'do'")?;

        let body = self.parse_body()?;

        self.expect_token("while", "Expected 'while' after do-while loop body")?;
        self.expect_token("(", "Expected '(' after 'while' in do-while loop")?;
        let condition = self.parse_expression()?;
        self.expect_token(")", "Expected ')' after do-while loop condition")?;
        self.expect_token(";", "Expected ';' after do-while loop")?;

        Ok(SyntaxNode::new(NodeKind::DoWhileLoop, keyword.location).with_children(vec![body, condition]))
    }

    /// Parse for statement; every clause is optional and becomes `Empty` when absent
    fn parse_for_statement(&mut self) -> Result<SyntaxNode, ParseError> {
        let keyword = self.expect_token("for", "Expected 'for'")?;
        self.expect_token("(", "Expected '(' after 'for'")?;

        // Init: a single declarator or an expression
        let init = if self.check(";") {
            SyntaxNode::empty(self.current_location())
        } else if self.is_type_keyword() {
            let type_name = self.parse_type()?;
            self.parse_declarator(&type_name)?
        } else {
            self.parse_expression()?
        };
        self.expect_token(";", "Expected ';' after for loop initialization")?;

        let condition = if self.check(";") {
            SyntaxNode::empty(self.current_location())
        } else {
            self.parse_expression()?
        };
        self.expect_token(";", "Expected ';' after for loop condition")?;

        let increment = if self.check(")") {
            SyntaxNode::empty(self.current_location())
        } else {
            self.parse_expression()?
        };
        self.expect_token(")", "Expected ')' after for loop increment")?;

        let body = self.parse_body()?;

        Ok(SyntaxNode::new(NodeKind::ForLoop, keyword.location)
            .with_children(vec![init, condition, increment, body]))
    }

    /// Parse switch statement.
    ///
    /// Case and default bodies run until the next label or the closing brace;
    /// fallthrough is implicit.
    fn parse_switch_statement(&mut self) -> Result<SyntaxNode, ParseError> {
        let keyword = self.expect_token("switch", "Expected 'switch'")?;

        self.expect_token("(", "Expected '(' after 'switch'")?;
        let subject = self.parse_expression()?;
        self.expect_token(")", "Expected ')' after switch expression")?;
        self.expect_token("{", "Expected '{' before switch body")?;

        let mut node = SyntaxNode::new(NodeKind::SwitchStatement, keyword.location);
        node.push(subject);

        loop {
            if self.match_token("}") {
                break;
            }
            if self.is_at_end() {
                self.report(self.error_here("Expected '}' after switch body"));
                break;
            }
            match self.parse_switch_label() {
                Ok(label) => node.push(label),
                Err(err) => {
                    self.report(err);
                    self.synchronize();
                }
            }
        }

        Ok(node)
    }

    /// Parse `case expr:` or `default:` followed by its statement run
    fn parse_switch_label(&mut self) -> Result<SyntaxNode, ParseError> {
        let location = self.current_location();

        let mut label = if self.match_token("case") {
            let value = self.parse_expression()?;
            self.expect_token(":", "Expected ':' after case value")?;
            SyntaxNode::new(NodeKind::CaseStatement, location).with_children(vec![value])
        } else if self.match_token("default") {
            self.expect_token(":", "Expected ':' after 'default'")?;
            SyntaxNode::new(NodeKind::DefaultStatement, location)
        } else {
            return Err(self.error_here(format!(
                "Expected 'case' or 'default' in switch body, found {}",
                self.describe_current()
            )));
        };

        while !self.check("case") && !self.check("default") && !self.check("}") && !self.is_at_end() {
            self.parse_statement_recovering(&mut label.children);
        }

        Ok(label)
    }
}

/// Whether `token` can begin an expression statement
fn starts_expression(token: &Token) -> bool {
    match token.kind {
        TokenKind::Identifier | TokenKind::Literal(_) => true,
        TokenKind::Separator => token.text == "(",
        TokenKind::Operator => PREFIX_OPERATORS.contains(&token.text.as_str()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::{parse, ParseOutcome};

    fn parse_source(source: &str) -> ParseOutcome {
        parse(tokenize(source).unwrap())
    }

    fn kinds(nodes: &[SyntaxNode]) -> Vec<NodeKind> {
        nodes.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_block_nesting() {
        let outcome = parse_source("{ int x; { x = 1; } }");

        assert!(outcome.is_valid);
        let outer = &outcome.tree.children[0];
        assert_eq!(outer.kind, NodeKind::Block);
        assert_eq!(kinds(&outer.children), vec![NodeKind::VariableDeclaration, NodeKind::Block]);
        assert_eq!(outer.children[1].children[0].kind, NodeKind::Assignment);
    }

    #[test]
    fn test_for_loop_clauses() {
        let outcome = parse_source("for (int i = 0; i < 10; i++) { }");

        assert!(outcome.is_valid, "{:?}", outcome.errors);
        let for_loop = &outcome.tree.children[0];
        assert_eq!(
            kinds(&for_loop.children),
            vec![
                NodeKind::VariableDeclaration,
                NodeKind::BinaryOp,
                NodeKind::PostfixOp,
                NodeKind::Block
            ]
        );
    }

    #[test]
    fn test_for_loop_empty_clauses() {
        let outcome = parse_source("for (;;) ;");

        assert!(outcome.is_valid);
        assert_eq!(
            kinds(&outcome.tree.children[0].children),
            vec![NodeKind::Empty, NodeKind::Empty, NodeKind::Empty, NodeKind::Empty]
        );
    }

    #[test]
    fn test_while_and_do_while() {
        let outcome = parse_source("while (x) x--; do { x++; } while (x < 3);");

        assert!(outcome.is_valid, "{:?}", outcome.errors);
        let while_loop = &outcome.tree.children[0];
        assert_eq!(while_loop.kind, NodeKind::WhileLoop);
        assert_eq!(kinds(&while_loop.children), vec![NodeKind::Identifier, NodeKind::PostfixOp]);

        let do_while = &outcome.tree.children[1];
        assert_eq!(do_while.kind, NodeKind::DoWhileLoop);
        assert_eq!(kinds(&do_while.children), vec![NodeKind::Block, NodeKind::BinaryOp]);
    }

    #[test]
    fn test_if_else() {
        let outcome = parse_source("if (a == 1) { b = 2; } else b = 3;");

        assert!(outcome.is_valid);
        let node = &outcome.tree.children[0];
        assert_eq!(
            kinds(&node.children),
            vec![NodeKind::BinaryOp, NodeKind::Block, NodeKind::Assignment]
        );
    }

    #[test]
    fn test_switch_with_fallthrough() {
        let source = "switch (x) { case 1: case 2: y = 1; break; default: y = 0; }";
        let outcome = parse_source(source);

        assert!(outcome.is_valid, "{:?}", outcome.errors);
        let switch = &outcome.tree.children[0];
        assert_eq!(
            kinds(&switch.children),
            vec![
                NodeKind::Identifier,
                NodeKind::CaseStatement,
                NodeKind::CaseStatement,
                NodeKind::DefaultStatement
            ]
        );
        // empty case 1 falls through
        assert_eq!(switch.children[1].children.len(), 1);
        assert_eq!(
            kinds(&switch.children[2].children),
            vec![NodeKind::Literal, NodeKind::Assignment, NodeKind::BreakStatement]
        );
    }

    #[test]
    fn test_switch_rejects_statement_before_label() {
        let outcome = parse_source("switch (x) { y = 1; case 1: break; }");

        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].message.contains("'case' or 'default'"));
    }

    #[test]
    fn test_return_forms() {
        let outcome = parse_source("return; return x + 1;");

        assert!(outcome.is_valid);
        assert!(outcome.tree.children[0].children.is_empty());
        assert_eq!(outcome.tree.children[1].children[0].kind, NodeKind::BinaryOp);
    }

    #[test]
    fn test_missing_semicolon_inside_block() {
        let outcome = parse_source("{\n  int a = 1;\n  a = 2\n  int b = 3;\n  b = a;\n}");

        assert_eq!(outcome.errors.len(), 1, "{:?}", outcome.errors);
        assert_eq!(outcome.errors[0].location.line, 4);
        let block = &outcome.tree.children[0];
        assert_eq!(outcome.tree.children.len(), 1);
        assert_eq!(
            kinds(&block.children),
            vec![NodeKind::VariableDeclaration, NodeKind::Assignment]
        );
    }

    #[test]
    fn test_stray_tokens() {
        let outcome = parse_source("else; ) int x;");

        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].message.contains("Unsupported keyword 'else'"));
        assert!(outcome.errors[1].message.contains("Unexpected token ')'"));
        assert_eq!(
            kinds(&outcome.tree.children),
            vec![NodeKind::Empty, NodeKind::VariableDeclaration]
        );
    }

    #[test]
    fn test_unclosed_block() {
        let outcome = parse_source("{ int x;");

        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].message.contains("Expected '}'"));
        assert_eq!(outcome.tree.children[0].children.len(), 1);
    }

    #[test]
    fn test_empty_statement() {
        let outcome = parse_source(";;");

        assert!(outcome.is_valid);
        assert_eq!(kinds(&outcome.tree.children), vec![NodeKind::Empty, NodeKind::Empty]);
    }
}
