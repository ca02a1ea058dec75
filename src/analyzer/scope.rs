//! Lexical scopes and symbols
//!
//! This module provides the symbol table used by the semantic pass:
//! - [`DeclaredType`]: the primitive types a variable can be declared with
//! - [`Symbol`]: a declared variable with initialization/use tracking
//! - [`Scope`]: the bindings introduced by one lexical region
//! - [`ScopeTable`]: the chain of scopes along the current walk path
//!
//! # Scope chain
//!
//! Only the path from the global scope to the innermost active scope exists
//! at any time. Entering a block pushes a child one level deeper; leaving it
//! discards it with everything it declared. Sibling regions (the `then` and
//! `else` branches of an `if`) therefore never see each other's names.
//!
//! Resolution walks innermost → outermost and the first match wins, so an
//! inner declaration shadows an outer one.

use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;

/// Primitive types supported by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    Int,
    Float,
    Double,
    Char,
    Bool,
    Long,
    Short,
    String,
}

impl DeclaredType {
    pub fn name(self) -> &'static str {
        match self {
            DeclaredType::Int => "int",
            DeclaredType::Float => "float",
            DeclaredType::Double => "double",
            DeclaredType::Char => "char",
            DeclaredType::Bool => "bool",
            DeclaredType::Long => "long",
            DeclaredType::Short => "short",
            DeclaredType::String => "string",
        }
    }

    /// Types `++`/`--` may be applied to
    pub fn supports_increment(self) -> bool {
        matches!(self, DeclaredType::Int | DeclaredType::Float | DeclaredType::Double)
    }
}

impl FromStr for DeclaredType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(DeclaredType::Int),
            "float" => Ok(DeclaredType::Float),
            "double" => Ok(DeclaredType::Double),
            "char" => Ok(DeclaredType::Char),
            "bool" => Ok(DeclaredType::Bool),
            "long" => Ok(DeclaredType::Long),
            "short" => Ok(DeclaredType::Short),
            "string" => Ok(DeclaredType::String),
            _ => Err(format!("Unknown type: {}", s)),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A declared variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub declared_type: DeclaredType,
    pub scope_level: usize,
    pub initialized: bool,
    pub used: bool,
}

impl Symbol {
    pub fn new(name: impl Into<String>, declared_type: DeclaredType, scope_level: usize) -> Self {
        Symbol {
            name: name.into(),
            declared_type,
            scope_level,
            initialized: false,
            used: false,
        }
    }
}

/// Bindings of one lexical region
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: FxHashMap<String, Symbol>,
    level: usize,
}

impl Scope {
    pub fn new(level: usize) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            level,
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Symbols in this scope, sorted by name
    pub fn symbols(&self) -> Vec<&Symbol> {
        let mut symbols: Vec<&Symbol> = self.bindings.values().collect();
        symbols.sort_by(|a, b| a.name.cmp(&b.name));
        symbols
    }
}

/// The chain of active scopes, global scope first
#[derive(Debug, Clone)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    /// A table holding only the global scope (level 0)
    pub fn new() -> Self {
        ScopeTable {
            scopes: vec![Scope::new(0)],
        }
    }

    /// Level of the innermost scope
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn current(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    pub fn global(&self) -> &Scope {
        &self.scopes[0]
    }

    /// Whether `name` is bound in the innermost scope (outer scopes are ignored)
    pub fn is_defined_in_current_scope(&self, name: &str) -> bool {
        self.current().contains(name)
    }

    /// Bind `name` in the innermost scope.
    ///
    /// Always succeeds; an existing binding of the same name in this scope is
    /// replaced. Callers check [`ScopeTable::is_defined_in_current_scope`]
    /// first to detect redeclaration.
    pub fn define_in_current_scope(&mut self, name: &str, declared_type: DeclaredType) -> &mut Symbol {
        let level = self.depth();
        let symbol = Symbol::new(name, declared_type, level);
        let slot = self
            .innermost_mut()
            .bindings
            .entry(name.to_string())
            .or_insert_with(|| symbol.clone());
        *slot = symbol;
        slot
    }

    /// Find `name`, innermost scope first
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.bindings.get(name))
    }

    pub fn resolve_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.bindings.get_mut(name))
    }

    /// Run `f` inside a fresh child scope, popping it afterwards.
    ///
    /// The pop happens on every return path of `f`.
    pub fn with_child_scope<R>(&mut self, f: impl FnOnce(&mut ScopeTable) -> R) -> R {
        self.push();
        let result = f(self);
        self.pop();
        result
    }

    fn push(&mut self) {
        let level = self.scopes.len();
        self.scopes.push(Scope::new(level));
    }

    fn pop(&mut self) {
        // the global scope is never popped
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    fn innermost_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_resolve() {
        let mut table = ScopeTable::new();
        table.define_in_current_scope("x", DeclaredType::Int);

        let symbol = table.resolve("x").unwrap();
        assert_eq!(symbol.declared_type, DeclaredType::Int);
        assert_eq!(symbol.scope_level, 0);
        assert!(!symbol.initialized);
        assert!(!symbol.used);
        assert!(table.resolve("y").is_none());
    }

    #[test]
    fn test_shadowing_and_pop() {
        let mut table = ScopeTable::new();
        table.define_in_current_scope("x", DeclaredType::Int);

        table.with_child_scope(|inner| {
            assert!(!inner.is_defined_in_current_scope("x"));
            inner.define_in_current_scope("x", DeclaredType::Char);
            assert_eq!(inner.depth(), 1);
            let symbol = inner.resolve("x").unwrap();
            assert_eq!(symbol.declared_type, DeclaredType::Char);
            assert_eq!(symbol.scope_level, 1);
        });

        assert_eq!(table.depth(), 0);
        assert_eq!(table.resolve("x").unwrap().declared_type, DeclaredType::Int);
    }

    #[test]
    fn test_sibling_scopes_are_independent() {
        let mut table = ScopeTable::new();

        table.with_child_scope(|t| {
            t.define_in_current_scope("a", DeclaredType::Bool);
        });
        let seen = table.with_child_scope(|t| t.resolve("a").is_some());

        assert!(!seen);
    }

    #[test]
    fn test_resolve_mut_updates_outer_symbol() {
        let mut table = ScopeTable::new();
        table.define_in_current_scope("n", DeclaredType::Long);

        table.with_child_scope(|t| {
            if let Some(symbol) = t.resolve_mut("n") {
                symbol.initialized = true;
            }
        });

        assert!(table.global().get("n").unwrap().initialized);
    }

    #[test]
    fn test_define_returns_fresh_symbol() {
        let mut table = ScopeTable::new();
        table.define_in_current_scope("s", DeclaredType::String).initialized = true;
        let replaced = table.define_in_current_scope("s", DeclaredType::Short);

        assert_eq!(replaced.declared_type, DeclaredType::Short);
        assert!(!replaced.initialized);
        assert_eq!(table.current().len(), 1);
    }

    #[test]
    fn test_declared_type_parsing() {
        assert_eq!("double".parse::<DeclaredType>(), Ok(DeclaredType::Double));
        assert!("void".parse::<DeclaredType>().is_err());
        assert!(DeclaredType::Float.supports_increment());
        assert!(!DeclaredType::Char.supports_increment());
    }
}
