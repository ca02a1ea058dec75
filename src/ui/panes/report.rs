//! Validation report pane

use crate::ui::theme::DEFAULT_THEME;
use crate::validate::ValidationReport;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding},
    Frame,
};

/// Color for one rendered report line
fn line_style(line: &str) -> Style {
    if line.starts_with("  - ") || line.ends_with(": Failed") || line.contains("Error:") {
        Style::default().fg(DEFAULT_THEME.error)
    } else if line.ends_with(": Completed") {
        Style::default().fg(DEFAULT_THEME.success)
    } else if line.starts_with("Code is valid") {
        Style::default()
            .fg(DEFAULT_THEME.success)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

/// Render the report as sequential lines
pub fn render_report_pane(
    frame: &mut Frame,
    area: Rect,
    report: &ValidationReport,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Validation Report ")
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::new(1, 0, 0, 0));

    let lines = report.lines();
    let total_items = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| {
            let style = line_style(&line);
            ListItem::new(line).style(style)
        })
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_styles() {
        assert_eq!(line_style("Syntax Analysis: Completed").fg, Some(DEFAULT_THEME.success));
        assert_eq!(line_style("Semantic Analysis: Failed").fg, Some(DEFAULT_THEME.error));
        assert_eq!(line_style("  - Semantic error at line 1").fg, Some(DEFAULT_THEME.error));
        assert_eq!(line_style("Tokens identified: 4").fg, Some(DEFAULT_THEME.fg));
        assert!(line_style("Code is valid for execution!")
            .add_modifier
            .contains(Modifier::BOLD));
    }
}
