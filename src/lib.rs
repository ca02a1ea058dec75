//! # Introduction
//!
//! cxxcheck statically validates programs written in a small C++-like
//! language: variable declarations, expressions and structured control flow
//! without functions, classes or pointers. Nothing is compiled or executed;
//! the result is a report of what is wrong and where.
//!
//! ## Validation pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Tree → Semantic analysis → Report
//! ```
//!
//! 1. [`parser`]: tokenizes the source and builds a syntax tree, recovering
//!    from syntax errors so several can be reported in one run.
//! 2. [`analyzer`]: walks the tree with a chain of lexical scopes and checks
//!    declarations, uses, initialization and literal/type agreement.
//! 3. [`diagnostics`]: the stage-tagged diagnostics every stage produces.
//! 4. [`validate`]: runs the stages in order and stops at the first failure.
//! 5. [`ui`]: ratatui-based viewer; not part of the stable library API.
//!
//! ```
//! let report = cxxcheck::validate("int x; x = x + 1;");
//! assert!(report.succeeded);
//! ```

pub mod analyzer;
pub mod diagnostics;
pub mod parser;
pub mod ui;
pub mod validate;

pub use validate::{validate, ValidationReport};
