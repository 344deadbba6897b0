use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the keyboard hint panel, borders included.
pub const KEYBOARD_HEIGHT: u16 = 7;

pub struct AppLayout {
    pub header: Rect,
    pub stats: Rect,
    pub main: Rect,
    pub keyboard: Option<Rect>,
    pub footer: Rect,
}

impl AppLayout {
    /// The keyboard panel is dropped when the terminal is too short or
    /// the hint is switched off.
    pub fn new(area: Rect, want_keyboard: bool) -> Self {
        let show_keyboard = want_keyboard && area.height >= 22 && area.width >= 60;

        let mut constraints = vec![
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(5),
        ];
        if show_keyboard {
            constraints.push(Constraint::Length(KEYBOARD_HEIGHT));
        }
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        Self {
            header: chunks[0],
            stats: chunks[1],
            main: chunks[2],
            keyboard: show_keyboard.then(|| chunks[3]),
            footer: chunks[chunks.len() - 1],
        }
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 60;
    const MIN_POPUP_HEIGHT: u16 = 12;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_shown_when_room() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30), true);
        let keyboard = layout.keyboard.unwrap();
        assert_eq!(keyboard.height, KEYBOARD_HEIGHT);
        assert_eq!(layout.footer.y, 29);
    }

    #[test]
    fn test_keyboard_hidden_when_short_or_off() {
        assert!(AppLayout::new(Rect::new(0, 0, 100, 15), true).keyboard.is_none());
        assert!(AppLayout::new(Rect::new(0, 0, 100, 30), false).keyboard.is_none());
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, area);

        let area = Rect::new(0, 0, 200, 50);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, Rect::new(50, 12, 100, 25));
    }
}
