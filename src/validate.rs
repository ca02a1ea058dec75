//! Validation pipeline
//!
//! [`validate`] runs the three stages in order and stops at the first one
//! that fails:
//!
//! ```text
//! source ──tokenize──▶ tokens ──parse──▶ tree ──analyze──▶ report
//! ```
//!
//! Every call builds fresh tokens, tree and scopes, so validating the same
//! text twice yields the same report.

use crate::analyzer::semantic::analyze;
use crate::diagnostics::{Diagnostic, Stage};
use crate::parser::ast::SourceLocation;
use crate::parser::lexer::tokenize;
use crate::parser::parse::parse;
use std::fmt;

/// Outcome of one validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Last stage that ran
    pub stage: Stage,
    pub succeeded: bool,
    /// Diagnostics of `stage`; empty on success
    pub diagnostics: Vec<Diagnostic>,
    /// Number of tokens, comments included, once tokenizing succeeded
    pub token_count: Option<usize>,
}

impl ValidationReport {
    fn failed(stage: Stage, diagnostics: Vec<Diagnostic>, token_count: Option<usize>) -> Self {
        ValidationReport {
            stage,
            succeeded: false,
            diagnostics,
            token_count,
        }
    }

    /// The report as it appears in the output pane, one entry per line
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        let Some(count) = self.token_count else {
            for diagnostic in &self.diagnostics {
                lines.push(format!("{} Error: {}", Stage::Lexical.title(), diagnostic));
            }
            return lines;
        };

        lines.push(format!("{}: Completed", Stage::Lexical.title()));
        lines.push(format!("Tokens identified: {}", count));

        for stage in [Stage::Syntax, Stage::Semantic] {
            if stage == self.stage && !self.succeeded {
                lines.push(format!("{}: Failed", stage.title()));
                lines.extend(self.diagnostics.iter().map(|d| format!("  - {}", d)));
                return lines;
            }
            lines.push(format!("{}: Completed", stage.title()));
        }

        lines.push(String::new());
        lines.push("Code is valid for execution!".to_string());
        lines
    }

    /// One-line summary for a status bar
    pub fn summary(&self) -> String {
        if self.succeeded {
            "Validation completed successfully".to_string()
        } else {
            format!(
                "Validation failed at {} analysis",
                self.stage.to_string().to_lowercase()
            )
        }
    }

    /// Source lines (1-based) that carry at least one diagnostic
    pub fn flagged_lines(&self) -> Vec<usize> {
        let mut lines: Vec<usize> = self.diagnostics.iter().map(Diagnostic::line).collect();
        lines.sort_unstable();
        lines.dedup();
        lines
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// Validate `source` and report the outcome of the last stage that ran.
pub fn validate(source: &str) -> ValidationReport {
    if source.trim().is_empty() {
        let diagnostic = Diagnostic::new(
            Stage::Lexical,
            "No code to validate",
            SourceLocation::new(1, 1),
        );
        return ValidationReport::failed(Stage::Lexical, vec![diagnostic], None);
    }

    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(err) => return ValidationReport::failed(Stage::Lexical, vec![err.into()], None),
    };
    let token_count = Some(tokens.len());

    let parsed = parse(tokens);
    if !parsed.is_valid {
        return ValidationReport::failed(Stage::Syntax, parsed.errors, token_count);
    }

    let analysis = analyze(&parsed.tree);
    ValidationReport {
        stage: Stage::Semantic,
        succeeded: analysis.is_valid,
        diagnostics: analysis.errors,
        token_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_program() {
        let report = validate("int x = 5;\nx = x * 2;");

        assert!(report.succeeded);
        assert_eq!(report.stage, Stage::Semantic);
        assert_eq!(report.token_count, Some(11));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_lexical_failure_has_no_token_count() {
        let report = validate("int x = 5 @ 2;");

        assert!(!report.succeeded);
        assert_eq!(report.stage, Stage::Lexical);
        assert_eq!(report.token_count, None);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].column(), 11);
    }

    #[test]
    fn test_blank_source() {
        let report = validate("  \n\t\n");

        assert_eq!(report.stage, Stage::Lexical);
        assert_eq!(report.diagnostics[0].message, "No code to validate");
        assert_eq!(report.diagnostics[0].location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_syntax_failure_skips_semantics() {
        // `y` is undefined, but the missing semicolon stops the pipeline first
        let report = validate("int x = 1\ny = 2;");

        assert_eq!(report.stage, Stage::Syntax);
        assert!(report.diagnostics.iter().all(|d| d.stage == Stage::Syntax));
    }

    #[test]
    fn test_lines_for_success() {
        let report = validate("int a = 1;");

        assert_eq!(
            report.lines(),
            vec![
                "Lexical Analysis: Completed",
                "Tokens identified: 5",
                "Syntax Analysis: Completed",
                "Semantic Analysis: Completed",
                "",
                "Code is valid for execution!",
            ]
        );
        assert_eq!(report.summary(), "Validation completed successfully");
    }

    #[test]
    fn test_lines_for_semantic_failure() {
        let report = validate("int a;\nint a;");

        assert_eq!(
            report.lines(),
            vec![
                "Lexical Analysis: Completed",
                "Tokens identified: 6",
                "Syntax Analysis: Completed",
                "Semantic Analysis: Failed",
                "  - Semantic error at line 2, column 5: Variable 'a' is already defined in this scope",
            ]
        );
        assert_eq!(report.summary(), "Validation failed at semantic analysis");
        assert_eq!(report.flagged_lines(), vec![2]);
    }

    #[test]
    fn test_lines_for_lexical_failure() {
        let report = validate("$");

        assert_eq!(
            report.to_string(),
            "Lexical Analysis Error: Lexical error at line 1, column 1: Unknown token '$'"
        );
    }
}
