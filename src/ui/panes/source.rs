//! Source code pane rendering with syntax highlighting
//!
//! This module renders the read-only source pane: the file under validation
//! with a line-number gutter and the lines that carry a diagnostic marked in
//! the error color.
//!
//! # Highlighting
//!
//! Colors come from a simple character-by-character scan that is separate
//! from the real tokenizer and never feeds validation. Unlike the tokenizer
//! it remembers an open `/* ...` across lines, so a multi-line block comment
//! is shown as a comment even though validation rejects it.

use crate::parser::declarations::TYPE_KEYWORDS;
use crate::parser::lexer::KEYWORDS;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Width of the line-number column: the decimal digit count of the line total
pub fn gutter_width(total_lines: usize) -> usize {
    total_lines.max(1).to_string().len()
}

/// Highlight every line of `source`, carrying block-comment state forward
pub fn highlight_source(source: &str) -> Vec<Line<'static>> {
    let mut in_block_comment = false;
    source
        .lines()
        .map(|line| highlight_line(line, &mut in_block_comment))
        .collect()
}

/// Highlight one line.
///
/// `in_block_comment` says whether the line starts inside a `/* */` comment
/// and is updated to whether the next one does.
pub fn highlight_line(line: &str, in_block_comment: &mut bool) -> Line<'static> {
    let comment_style = Style::default().fg(DEFAULT_THEME.comment);

    if !*in_block_comment && line.trim_start().starts_with('#') {
        return Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(DEFAULT_THEME.preprocessor),
        ));
    }

    let chars: Vec<char> = line.chars().collect();
    let mut spans = Vec::new();
    let mut current_word = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        // Block comments, possibly continued from an earlier line
        if *in_block_comment || (c == '/' && next == Some('*')) {
            flush_word(&mut current_word, &mut spans);
            let search_from = if *in_block_comment { i } else { i + 2 };
            let end = match block_comment_end(&chars, search_from) {
                Some(end) => {
                    *in_block_comment = false;
                    end
                }
                None => {
                    *in_block_comment = true;
                    chars.len()
                }
            };
            spans.push(Span::styled(collect(&chars[i..end]), comment_style));
            i = end;
            continue;
        }

        // Handle line comments
        if c == '/' && next == Some('/') {
            flush_word(&mut current_word, &mut spans);
            spans.push(Span::styled(collect(&chars[i..]), comment_style));
            break;
        }

        // Handle string and char literals
        if c == '"' || c == '\'' {
            flush_word(&mut current_word, &mut spans);
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                if chars[end] == '\\' {
                    end += 2;
                } else {
                    end += 1;
                }
            }
            let end = (end + 1).min(chars.len());
            spans.push(Span::styled(
                collect(&chars[i..end]),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        // Decimal point inside a number
        if c == '.' && current_word.starts_with(|d: char| d.is_ascii_digit()) {
            current_word.push(c);
            i += 1;
            continue;
        }

        // Handle non-alphanumeric (delimiters)
        if !c.is_alphanumeric() && c != '_' {
            flush_word(&mut current_word, &mut spans);

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut current_word, &mut spans);
    Line::from(spans)
}

fn flush_word(word: &mut String, spans: &mut Vec<Span<'static>>) {
    if !word.is_empty() {
        let style = get_keyword_style(word);
        spans.push(Span::styled(std::mem::take(word), style));
    }
}

/// Index just past the next `*/` at or after `from`
fn block_comment_end(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len().saturating_sub(1))
        .find(|&i| chars[i] == '*' && chars[i + 1] == '/')
        .map(|i| i + 2)
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

fn get_keyword_style(word: &str) -> Style {
    if TYPE_KEYWORDS.contains(&word) {
        Style::default().fg(DEFAULT_THEME.type_name)
    } else if KEYWORDS.contains(&word) {
        Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD)
    } else if word == "true" || word == "false" || word.starts_with(|c: char| c.is_ascii_digit()) {
        Style::default().fg(DEFAULT_THEME.number)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    source_code: &str,
    flagged_lines: &[usize],
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
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style);

    let highlighted = highlight_source(source_code);
    let total_lines = highlighted.len();
    let width = gutter_width(total_lines);

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    // Clamp scroll offset only if content exceeds visible area
    if total_lines > visible_height {
        *scroll_offset = (*scroll_offset).min(total_lines - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_lines: Vec<Line> = highlighted
        .into_iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, mut content_line)| {
            let line_num = idx + 1;
            let is_flagged = flagged_lines.contains(&line_num);

            let (marker, num_style) = if is_flagged {
                (
                    "▶",
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (" ", Style::default().fg(DEFAULT_THEME.comment))
            };

            if is_flagged {
                for span in &mut content_line.spans {
                    span.style = span.style.bg(DEFAULT_THEME.error_line_bg);
                }
            }

            let gutter = format!("{}{:>width$} │ ", marker, line_num, width = width);
            let mut final_spans = vec![Span::styled(gutter, num_style)];
            final_spans.extend(content_line.spans);

            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
