use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Bottom bar contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub state: &'static str,
    pub settings: Vec<(String, String)>,
    pub message: String,
}

pub fn draw_chrome(frame: &mut Frame<'_>, area: Rect, status: &StatusLine) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    frame.render_widget(Paragraph::new(status_line(status)), area);
}

fn status_line(status: &StatusLine) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![Span::styled(
        format!(" {} ", status.state),
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )];

    for (name, value) in &status.settings {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("{name}="), dim));
        spans.push(Span::raw(value.clone()));
    }

    if !status.message.is_empty() {
        spans.push(Span::styled(" | ", dim));
        spans.push(Span::styled(
            status.message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}
