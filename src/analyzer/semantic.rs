//! Scope-aware semantic checks
//!
//! [`SemanticAnalyzer`] walks a parsed tree once, threading the active
//! [`ScopeTable`] through every call, and records a [`Diagnostic`] for each
//! violation it finds. The walk never stops early: a program with ten
//! problems reports all ten.
//!
//! # Checks
//!
//! - redeclaration of a name in the same scope (shadowing an outer one is fine)
//! - use of an undeclared variable
//! - read of a variable before any value was given to it
//! - assignment to something that is not a variable
//! - literal shape vs. declared type on initialization and assignment
//!   (`int`/`float`/`double` reject quoted literals, `char` needs exactly one
//!   quoted character)
//! - `%` between identifiers when either is a `char`
//! - prefix `++`/`--` on an identifier whose type is not `int`/`float`/`double`
//!
//! # Scopes
//!
//! Blocks, loop bodies and each `if` branch get one child scope. A `for`
//! loop's init, condition, increment and body share a single scope; `while`
//! and `if` conditions are checked in the enclosing scope.

use crate::analyzer::scope::{DeclaredType, ScopeTable, Symbol};
use crate::diagnostics::Diagnostic;
use crate::parser::ast::{NodeKind, SyntaxNode};

const ARITHMETIC_OPERATORS: &[&str] = &["+", "-", "*", "/", "%"];

/// Result of the semantic pass
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub is_valid: bool,
    pub errors: Vec<Diagnostic>,
    /// Symbols left in the global scope, sorted by name
    pub globals: Vec<Symbol>,
}

/// Where a literal meets a typed variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiteralUse {
    Initialize,
    Assign,
}

/// Run the semantic pass over `tree`.
pub fn analyze(tree: &SyntaxNode) -> AnalysisOutcome {
    SemanticAnalyzer::new().analyze(tree)
}

/// Tree-walking semantic checker
#[derive(Debug, Default)]
pub struct SemanticAnalyzer {
    diagnostics: Vec<Diagnostic>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        SemanticAnalyzer::default()
    }

    pub fn analyze(mut self, tree: &SyntaxNode) -> AnalysisOutcome {
        let mut scopes = ScopeTable::new();
        self.analyze_node(tree, &mut scopes);

        AnalysisOutcome {
            is_valid: self.diagnostics.is_empty(),
            errors: self.diagnostics,
            globals: scopes.global().symbols().into_iter().cloned().collect(),
        }
    }

    fn analyze_node(&mut self, node: &SyntaxNode, scopes: &mut ScopeTable) {
        match node.kind {
            NodeKind::Program => self.analyze_children(node, scopes),
            NodeKind::Block => {
                scopes.with_child_scope(|inner| self.analyze_children(node, inner));
            }
            NodeKind::VariableDeclaration => self.analyze_declaration(node, scopes),
            NodeKind::Identifier => self.analyze_identifier(node, scopes),
            NodeKind::Assignment => self.analyze_assignment(node, scopes),
            NodeKind::BinaryOp => self.analyze_binary(node, scopes),
            NodeKind::UnaryOp => self.analyze_unary(node, scopes),
            NodeKind::ForLoop => {
                scopes.with_child_scope(|inner| {
                    if let Some((body, clauses)) = node.children.split_last() {
                        for clause in clauses {
                            self.analyze_node(clause, inner);
                        }
                        self.analyze_body(body, inner);
                    }
                });
            }
            NodeKind::WhileLoop => {
                if let [condition, body] = node.children.as_slice() {
                    self.analyze_node(condition, scopes);
                    scopes.with_child_scope(|inner| self.analyze_body(body, inner));
                }
            }
            NodeKind::DoWhileLoop => {
                if let [body, condition] = node.children.as_slice() {
                    scopes.with_child_scope(|inner| self.analyze_body(body, inner));
                    self.analyze_node(condition, scopes);
                }
            }
            NodeKind::IfStatement => {
                let mut children = node.children.iter();
                if let Some(condition) = children.next() {
                    self.analyze_node(condition, scopes);
                }
                // then and else each get their own scope
                for branch in children {
                    scopes.with_child_scope(|inner| self.analyze_body(branch, inner));
                }
            }
            NodeKind::ReturnStatement => {
                if let Some(value) = node.children.first() {
                    self.analyze_node(value, scopes);
                }
            }
            NodeKind::Literal | NodeKind::Error => {}
            NodeKind::PostfixOp
            | NodeKind::SwitchStatement
            | NodeKind::CaseStatement
            | NodeKind::DefaultStatement
            | NodeKind::BreakStatement
            | NodeKind::Empty => self.analyze_children(node, scopes),
        }
    }

    fn analyze_children(&mut self, node: &SyntaxNode, scopes: &mut ScopeTable) {
        for child in &node.children {
            self.analyze_node(child, scopes);
        }
    }

    /// Body of a loop or branch, already inside its scope: a block's
    /// statements share that scope instead of opening another one
    fn analyze_body(&mut self, body: &SyntaxNode, scopes: &mut ScopeTable) {
        if body.is(NodeKind::Block) {
            self.analyze_children(body, scopes);
        } else {
            self.analyze_node(body, scopes);
        }
    }

    fn analyze_declaration(&mut self, node: &SyntaxNode, scopes: &mut ScopeTable) {
        let Some(name) = node.children.first().and_then(SyntaxNode::identifier_name) else {
            return;
        };
        let declared_type = match node.value_str().parse::<DeclaredType>() {
            Ok(declared_type) => declared_type,
            Err(message) => {
                self.error(message, node);
                return;
            }
        };

        if scopes.is_defined_in_current_scope(name) {
            self.error(
                format!("Variable '{}' is already defined in this scope", name),
                node,
            );
            return;
        }

        scopes.define_in_current_scope(name, declared_type);

        if let Some(init) = node.children.get(1) {
            self.analyze_node(init, scopes);
            if let Some(symbol) = scopes.resolve_mut(name) {
                symbol.initialized = true;
            }
            self.check_literal_shape(init, declared_type, name, LiteralUse::Initialize);
        }
    }

    fn analyze_identifier(&mut self, node: &SyntaxNode, scopes: &mut ScopeTable) {
        let name = node.value_str();

        match scopes.resolve_mut(name) {
            None => self.error(format!("Undefined variable '{}'", name), node),
            Some(symbol) => {
                symbol.used = true;
                if !symbol.initialized {
                    self.error(
                        format!("Variable '{}' is used before initialization", name),
                        node,
                    );
                }
            }
        }
    }

    fn analyze_assignment(&mut self, node: &SyntaxNode, scopes: &mut ScopeTable) {
        let [target, value] = node.children.as_slice() else {
            return;
        };

        let Some(name) = target.identifier_name() else {
            self.error("Left side of assignment must be a variable", target);
            return;
        };

        // The target counts as initialized before the right side is read,
        // so `x = x + 1` does not report `x`.
        let declared_type = match scopes.resolve_mut(name) {
            Some(symbol) => {
                symbol.initialized = true;
                symbol.declared_type
            }
            None => {
                self.error(format!("Undefined variable '{}'", name), target);
                return;
            }
        };

        self.analyze_node(value, scopes);
        self.check_literal_shape(value, declared_type, name, LiteralUse::Assign);
    }

    fn analyze_binary(&mut self, node: &SyntaxNode, scopes: &mut ScopeTable) {
        self.analyze_children(node, scopes);

        let op = node.value_str();
        if !ARITHMETIC_OPERATORS.contains(&op) {
            return;
        }
        let [left, right] = node.children.as_slice() else {
            return;
        };
        let (Some(left_name), Some(right_name)) = (left.identifier_name(), right.identifier_name())
        else {
            return;
        };
        let (Some(left_symbol), Some(right_symbol)) =
            (scopes.resolve(left_name), scopes.resolve(right_name))
        else {
            return;
        };

        let has_char = left_symbol.declared_type == DeclaredType::Char
            || right_symbol.declared_type == DeclaredType::Char;
        if op == "%" && has_char {
            self.error("Cannot use modulo operator '%' with char operands", node);
        }
    }

    fn analyze_unary(&mut self, node: &SyntaxNode, scopes: &mut ScopeTable) {
        self.analyze_children(node, scopes);

        if !matches!(node.value_str(), "++" | "--") {
            return;
        }
        let Some(name) = node.children.first().and_then(SyntaxNode::identifier_name) else {
            return;
        };
        if let Some(symbol) = scopes.resolve(name) {
            if !symbol.declared_type.supports_increment() {
                let message = format!(
                    "Cannot use increment/decrement operator with non-numeric type '{}'",
                    symbol.declared_type
                );
                self.error(message, node);
            }
        }
    }

    /// Compare a literal's quoting against the variable's declared type
    fn check_literal_shape(
        &mut self,
        value: &SyntaxNode,
        declared_type: DeclaredType,
        name: &str,
        usage: LiteralUse,
    ) {
        if !value.is(NodeKind::Literal) {
            return;
        }
        let text = value.value_str();
        let quoted = text.starts_with('"') || text.starts_with('\'');

        match declared_type {
            DeclaredType::Int | DeclaredType::Float | DeclaredType::Double if quoted => {
                let message = match usage {
                    LiteralUse::Initialize => format!(
                        "Cannot initialize {} variable '{}' with string literal",
                        declared_type, name
                    ),
                    LiteralUse::Assign => format!(
                        "Cannot assign string literal to {} variable '{}'",
                        declared_type, name
                    ),
                };
                self.error(message, value);
            }
            // quotes plus exactly one character; escapes are rejected too
            DeclaredType::Char if !(text.starts_with('\'') && text.chars().count() == 3) => {
                self.error(
                    format!("Invalid character literal for variable '{}'", name),
                    value,
                );
            }
            _ => {}
        }
    }

    fn error(&mut self, message: impl Into<String>, node: &SyntaxNode) {
        self.diagnostics
            .push(Diagnostic::semantic(message, node.location));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::parse;

    fn analyze_source(source: &str) -> AnalysisOutcome {
        let outcome = parse(tokenize(source).unwrap());
        assert!(outcome.is_valid, "syntax errors: {:?}", outcome.errors);
        analyze(&outcome.tree)
    }

    fn messages(source: &str) -> Vec<String> {
        analyze_source(source)
            .errors
            .into_iter()
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn test_clean_program() {
        let outcome = analyze_source("int x = 1; int y = x * 2; y = y + x;");

        assert!(outcome.is_valid, "{:?}", outcome.errors);
        assert!(outcome.globals.iter().all(|s| s.initialized && s.used));
    }

    #[test]
    fn test_redeclaration_same_scope() {
        let errors = messages("int x; int x;");

        assert_eq!(errors, vec!["Variable 'x' is already defined in this scope"]);
    }

    #[test]
    fn test_shadowing_is_allowed() {
        assert!(messages("int x; { int x; }").is_empty());
    }

    #[test]
    fn test_redeclaration_reports_position_of_second_name() {
        let outcome = analyze_source("int a;\nint a;");

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].location.line, 2);
        assert_eq!(outcome.errors[0].location.column, 5);
    }

    #[test]
    fn test_undefined_variable() {
        assert_eq!(messages("y = 3;"), vec!["Undefined variable 'y'"]);
        assert_eq!(messages("int a = b;"), vec!["Undefined variable 'b'"]);
    }

    #[test]
    fn test_use_before_initialization() {
        assert_eq!(
            messages("int y; int z = y;"),
            vec!["Variable 'y' is used before initialization"]
        );
    }

    #[test]
    fn test_self_referencing_assignment_is_initialized() {
        assert!(messages("int x; x = x + 1;").is_empty());
    }

    #[test]
    fn test_self_referencing_initializer_is_not() {
        assert_eq!(
            messages("int x = x;"),
            vec!["Variable 'x' is used before initialization"]
        );
    }

    #[test]
    fn test_assignment_target_must_be_variable() {
        assert_eq!(
            messages("int a = 1; 3 = a;"),
            vec!["Left side of assignment must be a variable"]
        );
    }

    #[test]
    fn test_literal_shape_on_initialization() {
        assert_eq!(
            messages("int i = \"no\"; double d = 'c';"),
            vec![
                "Cannot initialize int variable 'i' with string literal",
                "Cannot initialize double variable 'd' with string literal",
            ]
        );
        assert_eq!(
            messages("char c = 'ab';"),
            vec!["Invalid character literal for variable 'c'"]
        );
        assert_eq!(
            messages("char c = '\\n';"),
            vec!["Invalid character literal for variable 'c'"]
        );
        assert!(messages("char c = 'a'; float f = 2.5; long l = 3;").is_empty());
    }

    #[test]
    fn test_literal_shape_on_assignment() {
        assert_eq!(
            messages("float f; f = \"x\"; char c; c = 5;"),
            vec![
                "Cannot assign string literal to float variable 'f'",
                "Invalid character literal for variable 'c'",
            ]
        );
    }

    #[test]
    fn test_modulo_with_char_operand() {
        assert_eq!(
            messages("char c = 'a'; int n = 3; int r = c % n;"),
            vec!["Cannot use modulo operator '%' with char operands"]
        );
        assert!(messages("char c = 'a'; int n = 3; int r = c + n;").is_empty());
        // only bare identifier pairs are inspected
        assert!(messages("char c = 'a'; int r = c % 2;").is_empty());
    }

    #[test]
    fn test_increment_requires_numeric_type() {
        assert_eq!(
            messages("bool b = true; ++b;"),
            vec!["Cannot use increment/decrement operator with non-numeric type 'bool'"]
        );
        assert!(messages("double d = 1.0; --d;").is_empty());
        // postfix forms have no type rule
        assert!(messages("bool b = true; b++;").is_empty());
    }

    #[test]
    fn test_if_branches_have_independent_scopes() {
        let errors = messages("bool f = true; if (f) { int t = 1; } else { t = 2; }");

        assert_eq!(errors, vec!["Undefined variable 't'"]);
    }

    #[test]
    fn test_block_scope_is_discarded() {
        assert_eq!(
            messages("{ int inner = 1; } inner = 2;"),
            vec!["Undefined variable 'inner'"]
        );
    }

    #[test]
    fn test_for_loop_shares_one_scope() {
        assert!(messages("for (int i = 0; i < 3; i++) { int j = i; }").is_empty());
        assert_eq!(
            messages("for (int i = 0; i < 3; i++) { int i = 1; }"),
            vec!["Variable 'i' is already defined in this scope"]
        );
        assert_eq!(
            messages("for (int i = 0; i < 3; i++) ; i = 4;"),
            vec!["Undefined variable 'i'"]
        );
    }

    #[test]
    fn test_while_and_do_while_scopes() {
        assert!(messages("int n = 3; while (n > 0) { int k = n; n = k - 1; }").is_empty());
        assert!(messages("int n; do { n = 1; } while (n < 3);").is_empty());
        assert_eq!(
            messages("int n = 1; while (n) { int k = 0; } k = 1;"),
            vec!["Undefined variable 'k'"]
        );
    }

    #[test]
    fn test_switch_and_return_are_walked() {
        assert_eq!(
            messages("int x = 1; switch (x) { case 1: y = 2; break; default: return z; }"),
            vec!["Undefined variable 'y'", "Undefined variable 'z'"]
        );
    }

    #[test]
    fn test_walk_continues_after_errors() {
        let errors = messages("a = 1; int b; int b; c++; int d = b;");

        assert_eq!(
            errors,
            vec![
                "Undefined variable 'a'",
                "Variable 'b' is already defined in this scope",
                "Undefined variable 'c'",
                "Variable 'b' is used before initialization",
            ]
        );
    }

    #[test]
    fn test_used_flag_tracking() {
        let outcome = analyze_source("int a = 1; int b = 2; int c = a;");

        let used: Vec<(&str, bool)> = outcome
            .globals
            .iter()
            .map(|s| (s.name.as_str(), s.used))
            .collect();
        assert_eq!(used, vec![("a", true), ("b", false), ("c", false)]);
    }
}
