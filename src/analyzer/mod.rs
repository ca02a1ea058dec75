//! Semantic analysis
//!
//! - [`scope`]: scope chain and symbol records
//! - [`semantic`]: the checking tree-walk over a parsed program
//!
//! The analyzer runs only on trees that parsed without errors and never
//! fails itself; every problem it finds becomes a diagnostic.

pub mod scope;
pub mod semantic;

pub use semantic::{analyze, AnalysisOutcome, SemanticAnalyzer};
