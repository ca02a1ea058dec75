//! Variable declaration parsing
//!
//! ```text
//! var_decl    ::= type declarator ("," declarator)* ";"
//! declarator  ::= identifier ("=" initializer)?
//! initializer ::= bool_literal      (when type is bool)
//!               | char_literal      (when type is char)
//!               | string_literal    (when type is string)
//!               | expression        (otherwise)
//! ```
//!
//! Each declarator becomes its own `VariableDeclaration` node carrying the
//! shared type keyword, so `int a, b = 2;` yields two sibling nodes.

use crate::parser::ast::*;
use crate::parser::lexer::{LiteralKind, TokenKind};
use crate::parser::parse::{ParseError, Parser};

/// Keywords that start a variable declaration
pub const TYPE_KEYWORDS: &[&str] = &[
    "int", "float", "double", "char", "bool", "long", "short", "string",
];

/// Literal token a type insists on for its initializer, if any
fn required_literal(type_name: &str) -> Option<LiteralKind> {
    match type_name {
        "bool" => Some(LiteralKind::Bool),
        "char" => Some(LiteralKind::Char),
        "string" => Some(LiteralKind::String),
        _ => None,
    }
}

impl Parser {
    pub(crate) fn is_type_keyword(&self) -> bool {
        self.peek().is_some_and(|t| {
            t.kind == TokenKind::Keyword && TYPE_KEYWORDS.contains(&t.text.as_str())
        })
    }

    /// Parse `type a [= init], b [= init];` appending one node per name to `out`.
    ///
    /// Declarators parsed before an error stay in `out`.
    pub(crate) fn parse_variable_declaration(
        &mut self,
        out: &mut Vec<SyntaxNode>,
    ) -> Result<(), ParseError> {
        let type_name = self.parse_type()?;

        loop {
            out.push(self.parse_declarator(&type_name)?);

            if self.match_token(",") {
                continue;
            }
            if self.match_token(";") {
                return Ok(());
            }
            return Err(self.error_here(format!(
                "Expected ',' or ';' after variable declaration, found {}",
                self.describe_current()
            )));
        }
    }

    /// Consume a type keyword and return its spelling
    pub(crate) fn parse_type(&mut self) -> Result<String, ParseError> {
        if !self.is_type_keyword() {
            return Err(self.error_here(format!(
                "Expected type, found {}",
                self.describe_current()
            )));
        }
        self.advance()
            .map(|token| token.text)
            .ok_or_else(|| self.error_here("Expected type"))
    }

    /// Parse `name [= initializer]` for an already consumed type
    pub(crate) fn parse_declarator(&mut self, type_name: &str) -> Result<SyntaxNode, ParseError> {
        let name = self.expect_identifier(&format!("after '{}'", type_name))?;

        let mut decl = SyntaxNode::new(NodeKind::VariableDeclaration, name.location)
            .with_value(type_name);
        decl.push(SyntaxNode::identifier(name.text, name.location));

        if self.match_operator(&["="]).is_some() {
            decl.push(self.parse_initializer(type_name)?);
        }

        Ok(decl)
    }

    fn parse_initializer(&mut self, type_name: &str) -> Result<SyntaxNode, ParseError> {
        let Some(required) = required_literal(type_name) else {
            return self.parse_expression();
        };

        if self.check_kind(TokenKind::Literal(required)) {
            if let Some(token) = self.advance() {
                return Ok(SyntaxNode::new(NodeKind::Literal, token.location).with_value(token.text));
            }
        }

        Err(self.error_here(format!(
            "Unexpected token in {} initializer: {}",
            type_name,
            self.describe_current()
        )))
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

    #[test]
    fn test_multi_name_declaration() {
        let outcome = parse_source("long a, b = 2, c;");

        assert!(outcome.is_valid);
        assert_eq!(outcome.tree.children.len(), 3);
        for decl in &outcome.tree.children {
            assert_eq!(decl.kind, NodeKind::VariableDeclaration);
            assert_eq!(decl.value_str(), "long");
        }
        assert_eq!(outcome.tree.children[1].children.len(), 2);
        assert_eq!(outcome.tree.children[1].children[1].value_str(), "2");
    }

    #[test]
    fn test_typed_literal_initializers() {
        let outcome = parse_source("bool b = true; char c = 'x'; string s = \"hi\";");

        assert!(outcome.is_valid, "{:?}", outcome.errors);
        let inits: Vec<&str> = outcome
            .tree
            .children
            .iter()
            .map(|d| d.children[1].value_str())
            .collect();
        assert_eq!(inits, vec!["true", "'x'", "\"hi\""]);
    }

    #[test]
    fn test_bool_rejects_non_literal() {
        let outcome = parse_source("bool b = 1; int y;");

        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].message.contains("bool initializer"));
        // recovery resumes at `int y;`
        assert_eq!(outcome.tree.children.last().map(|n| n.children[0].value_str()), Some("y"));
    }

    #[test]
    fn test_char_and_string_shapes() {
        assert!(!parse_source("char c = \"x\";").is_valid);
        assert!(!parse_source("string s = 'x';").is_valid);
        assert!(parse_source("double d = 1.5 * 2;").is_valid);
    }

    #[test]
    fn test_missing_identifier() {
        let outcome = parse_source("int = 4;");

        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].message.starts_with("Expected identifier after 'int'"));
    }
}
