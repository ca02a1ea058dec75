//! Source parser
//!
//! This module transforms source text into a syntax tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser struct, error recovery and entry point (tokens → tree)
//! - [`ast`]: Syntax tree node definitions
//!
//! # Supported Subset
//!
//! - Types: `int`, `float`, `double`, `char`, `bool`, `long`, `short`, `string`
//! - Statements: declarations (with comma lists), `if/else`, `while`, `do-while`,
//!   `for`, `switch/case/default`, `break`, `return`, blocks, expression
//!   statements, `;`
//! - Expressions: assignment, logical, equality, relational, arithmetic,
//!   prefix `+ - ! ++ --`, postfix `++ --`, parentheses
//! - No functions, classes, pointers or arrays
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one method per grammar rule.
//! Parser methods are split across `declarations`, `statements` and
//! `expressions` using `impl Parser` blocks that share one cursor.

pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod statements;
