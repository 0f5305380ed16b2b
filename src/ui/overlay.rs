use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::PageMode;
use crate::palette::{EngineState, OpenState, PaletteItemView, PaletteView};

use super::layout::{centered_rect, palette_rect};

const PREFIX_WIDTH: usize = 3;
const BORDER_AND_INPUT_ROWS: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    pub width: u16,
    pub max_height: u16,
    /// Caret position in chars.
    pub cursor: usize,
    pub spinner: char,
}

pub fn draw_idle_hint(frame: &mut Frame<'_>, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let popup = centered_rect(area, area.width.min(44), area.height.min(3));
    let block = Block::default()
        .title(" palnav ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let message = Paragraph::new("press : to open the palette, q to quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(message, inner);
}

pub fn draw_palette_overlay(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &PaletteView,
    options: &OverlayOptions,
) {
    if area.width == 0 || area.height == 0 || !view.is_open() {
        return;
    }

    let height = palette_height(view).min(options.max_height).max(BORDER_AND_INPUT_ROWS + 1);
    let popup = palette_rect(area, options.width, height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {} ", palette_title(view)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.width == 0 || inner.height < 3 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // query
            Constraint::Length(1), // separator
            Constraint::Min(1),    // body
        ])
        .split(inner);

    // Software caret avoids terminal cursor ghosting.
    let prompt = match view.mode {
        PageMode::List => "> ",
        PageMode::Input => "» ",
    };
    let input_line = build_palette_input_line(
        &view.query,
        options.cursor,
        chunks[0].width as usize,
        prompt,
        view.placeholder.as_deref(),
    );
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    frame.render_widget(
        Paragraph::new("─".repeat(inner.width as usize)).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );

    let body = chunks[2];
    let width = body.width as usize;
    let mut lines = Vec::new();
    if let Some(subtitle) = &view.subtitle {
        lines.push(Line::from(Span::styled(
            format!("   {subtitle}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.extend(notice_lines(view, options.spinner));

    let max_items = (body.height as usize).saturating_sub(lines.len());
    match view.mode {
        PageMode::List if view.items.is_empty() => {
            let empty = view
                .empty_state_text
                .as_deref()
                .unwrap_or("No matching commands");
            lines.push(Line::from(Span::styled(
                format!("   {empty}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
        PageMode::List if max_items > 0 => {
            let active_idx = view.active_idx.unwrap_or(0);
            let start = scroll_start(view.items.len(), active_idx, max_items);
            for item in view.items.iter().skip(start).take(max_items) {
                lines.push(item_line(item, width));
            }
        }
        PageMode::List => {}
        PageMode::Input => {
            let label = view.submit_label.as_deref().unwrap_or("Submit");
            lines.push(Line::from(vec![
                Span::raw("   "),
                Span::styled("enter ", Style::default().fg(Color::White)),
                Span::styled(label.to_string(), Style::default().fg(Color::DarkGray)),
            ]));
        }
    }

    frame.render_widget(Paragraph::new(lines), body);
}

fn palette_title(view: &PaletteView) -> String {
    if view.breadcrumbs.is_empty() {
        view.title.clone()
    } else {
        view.breadcrumbs.join(" › ")
    }
}

/// Rows the palette wants before clamping to the configured cap.
fn palette_height(view: &PaletteView) -> u16 {
    let subtitle = u16::from(view.subtitle.is_some());
    let notice = notice_rows(view.state);
    let body = match view.mode {
        PageMode::List => u16::try_from(view.items.len().max(1)).unwrap_or(u16::MAX),
        PageMode::Input => 1,
    };
    BORDER_AND_INPUT_ROWS
        .saturating_add(subtitle)
        .saturating_add(notice)
        .saturating_add(body)
}

fn notice_rows(state: EngineState) -> u16 {
    match state {
        EngineState::Open(OpenState::Error) => 2,
        state if state.is_awaiting() => 1,
        _ => 0,
    }
}

fn notice_lines(view: &PaletteView, spinner: char) -> Vec<Line<'static>> {
    let busy_label = match view.state {
        EngineState::Open(OpenState::LoadingPage) => "Loading…",
        EngineState::Open(OpenState::Executing) => "Running…",
        EngineState::Open(OpenState::SubmittingInput) => "Saving…",
        EngineState::Open(OpenState::Error) => {
            let message = view.last_error.as_deref().unwrap_or("Something went wrong");
            return vec![
                Line::from(Span::styled(
                    format!(" ✗ {message}"),
                    Style::default().fg(Color::Red),
                )),
                Line::from(Span::styled(
                    "   enter retry, esc back",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
        }
        EngineState::Open(OpenState::Browsing) | EngineState::Closed => return Vec::new(),
    };
    vec![Line::from(Span::styled(
        format!(" {spinner} {busy_label}"),
        Style::default().fg(Color::Yellow),
    ))]
}

/// Keeps the active item inside `[start, start + max_items)`.
fn scroll_start(len: usize, active_idx: usize, max_items: usize) -> usize {
    let active_idx = active_idx.min(len.saturating_sub(1));
    if len <= max_items || active_idx < max_items / 2 {
        0
    } else if active_idx >= len - max_items / 2 {
        len.saturating_sub(max_items)
    } else {
        active_idx.saturating_sub(max_items / 2)
    }
}

fn item_line(item: &PaletteItemView, width: usize) -> Line<'static> {
    let mut spans = Vec::new();
    if item.active {
        spans.push(Span::styled(" ┃ ", Style::default().fg(Color::White)));
    } else {
        spans.push(Span::raw("   "));
    }

    let label_style = if item.disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    spans.push(Span::styled(item.label.clone(), label_style));
    let mut used = PREFIX_WIDTH + item.label.width();

    if let Some(subtitle) = &item.subtitle {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            subtitle.clone(),
            Style::default().fg(Color::DarkGray),
        ));
        used += 2 + subtitle.width();
    }

    let mut trailing = String::new();
    if let Some(key) = &item.shortcut {
        trailing.push_str(key);
    }
    if item.opens_page {
        if !trailing.is_empty() {
            trailing.push(' ');
        }
        trailing.push('›');
    }
    let trailing_width = trailing.width() + 1;
    if !trailing.is_empty() && used + trailing_width < width {
        spans.push(Span::raw(" ".repeat(width - used - trailing_width)));
        spans.push(Span::styled(trailing, Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(" "));
    } else {
        // Pad so the selection background covers the full row.
        spans.push(Span::raw(" ".repeat(width.saturating_sub(used))));
    }

    let line_style = if item.active {
        Style::default().bg(Color::Rgb(45, 45, 50))
    } else {
        Style::default()
    };
    Line::from(spans).style(line_style)
}

fn build_palette_input_line(
    input: &str,
    cursor: usize,
    width: usize,
    prompt: &'static str,
    placeholder: Option<&str>,
) -> Line<'static> {
    let mut spans = vec![
        Span::raw(" ".to_string()),
        Span::styled(prompt.to_string(), Style::default().fg(Color::White)),
    ];
    let max_text_width = width.saturating_sub(PREFIX_WIDTH).max(1);

    if input.is_empty()
        && let Some(placeholder) = placeholder
    {
        spans.push(Span::styled(" ".to_string(), Style::default().reversed()));
        spans.push(Span::styled(
            truncate_to_width(placeholder, max_text_width.saturating_sub(1)),
            Style::default().fg(Color::DarkGray),
        ));
        return Line::from(spans);
    }

    let chars: Vec<char> = input.chars().collect();
    let cursor = cursor.min(chars.len());

    // Slide the window right until the caret cell fits.
    let mut start = 0usize;
    while start < cursor && chars_width(&chars[start..cursor]) + 1 > max_text_width {
        start += 1;
    }

    let mut used = 0usize;
    for (idx, ch) in chars.iter().enumerate().skip(start) {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > max_text_width {
            break;
        }
        used += ch_width;
        if idx == cursor {
            spans.push(Span::styled(ch.to_string(), Style::default().reversed()));
        } else {
            spans.push(Span::raw(ch.to_string()));
        }
    }
    if cursor == chars.len() && used < max_text_width {
        spans.push(Span::styled(" ".to_string(), Style::default().reversed()));
    }
    Line::from(spans)
}

fn chars_width(chars: &[char]) -> usize {
    chars.iter().map(|ch| ch.width().unwrap_or(0)).sum()
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut used = 0usize;
    text.chars()
        .take_while(|ch| {
            used += ch.width().unwrap_or(0);
            used <= max_width
        })
        .collect()
}
