//! Diagnostics shared by every validation stage
//!
//! A [`Diagnostic`] records which [`Stage`] produced it, a human-readable
//! message and the source position it refers to. Lists of diagnostics are
//! append-only for the duration of one validation run.

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::LexError;
use crate::parser::parse::ParseError;
use std::fmt;

/// Pipeline stage that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexical,
    Syntax,
    Semantic,
}

impl Stage {
    /// Heading used in the rendered report
    pub fn title(self) -> &'static str {
        match self {
            Stage::Lexical => "Lexical Analysis",
            Stage::Syntax => "Syntax Analysis",
            Stage::Semantic => "Semantic Analysis",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Lexical => "Lexical",
            Stage::Syntax => "Syntax",
            Stage::Semantic => "Semantic",
        };
        f.write_str(name)
    }
}

/// A reported problem with its stage and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub message: String,
    pub location: SourceLocation,
}

impl Diagnostic {
    pub fn new(stage: Stage, message: impl Into<String>, location: SourceLocation) -> Self {
        Diagnostic {
            stage,
            message: message.into(),
            location,
        }
    }

    pub fn semantic(message: impl Into<String>, location: SourceLocation) -> Self {
        Diagnostic::new(Stage::Semantic, message, location)
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error at line {}, column {}: {}",
            self.stage, self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for Diagnostic {}

impl From<LexError> for Diagnostic {
    fn from(err: LexError) -> Self {
        Diagnostic::new(Stage::Lexical, err.message, err.location)
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        Diagnostic::new(Stage::Syntax, err.message, err.location)
    }
}
