use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub body: Rect,
    pub status: Rect,
}

pub fn split_layout(area: Rect) -> UiLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    UiLayout {
        body: chunks[0],
        status: chunks[1],
    }
}

pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.max(1).min(area.width);
    let height = height.max(1).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Palette box anchored near the top of `area`, the way launchers sit.
pub(crate) fn palette_rect(area: Rect, width: u16, height: u16) -> Rect {
    let centered = centered_rect(area, width, height);
    let top_gap = area.height.saturating_sub(centered.height) / 4;
    Rect::new(centered.x, area.y + top_gap, centered.width, centered.height)
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{centered_rect, palette_rect, split_layout};

    #[test]
    fn split_layout_reserves_status_bar() {
        let layout = split_layout(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.status.y, 39);
        assert_eq!(layout.body.height, 39);
    }

    #[test]
    fn centered_rect_stays_within_area() {
        let area = Rect::new(10, 5, 20, 8);
        let centered = centered_rect(area, 99, 99);
        assert_eq!(centered, area);
    }

    #[test]
    fn palette_rect_sits_in_upper_part() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = palette_rect(area, 60, 12);
        assert_eq!(rect.x, 20);
        assert_eq!(rect.y, 7);
        assert_eq!(rect.height, 12);
    }
}
