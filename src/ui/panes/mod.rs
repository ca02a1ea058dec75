//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with syntax highlighting, a line-number
//!   gutter and diagnostic line markers
//! - [`report`]: The validation report, one entry per line
//! - [`status`]: Status bar with keybindings and the validation verdict
//!
//! Each pane module exports a primary `render_*()` function that takes the
//! frame, its area and whatever state it displays.

pub mod report;
pub mod source;
pub mod status;

// Re-export render functions for convenience
pub use report::render_report_pane;
pub use source::render_source_pane;
pub use status::render_status_bar;
