//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, reload
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   report, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with the file path,
//! its contents and a first [`ValidationReport`], then call [`App::run`] to
//! start the event loop.
//!
//! [`ValidationReport`]: crate::validate::ValidationReport
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
