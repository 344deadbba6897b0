use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::keyboard::display::code_short_label;
use crate::keyboard::hint::KeyHint;
use crate::keyboard::model::{ENTER_CODE, KeyboardModel, SHIFT_LEFT_CODE, SHIFT_RIGHT_CODE, SPACE_CODE};
use crate::ui::theme::Theme;

/// On-screen keyboard for the current layout with the next key and the
/// rest of the current word highlighted.
pub struct KeyboardHint<'a> {
    model: &'a KeyboardModel,
    hint: &'a KeyHint,
    theme: &'a Theme,
}

impl<'a> KeyboardHint<'a> {
    pub fn new(model: &'a KeyboardModel, hint: &'a KeyHint, theme: &'a Theme) -> Self {
        Self { model, hint, theme }
    }

    fn key_style(&self, code: &str) -> Style {
        let colors = &self.theme.colors;
        if self.hint.is_expected(code) {
            Style::default()
                .fg(colors.bg())
                .bg(colors.key_expected())
                .add_modifier(Modifier::BOLD)
        } else if self.hint.is_highlighted(code) {
            Style::default().fg(colors.fg()).bg(colors.key_word())
        } else {
            Style::default().fg(colors.text_pending())
        }
    }
}

const KEY_WIDTH: u16 = 4;
const ROW_OFFSETS: [u16; 4] = [0, 2, 3, 5];

impl Widget for KeyboardHint<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let title = match self.hint.finger {
            Some(finger) => format!(" {} ({}) ", self.model.name, finger.label()),
            None => format!(" {} ", self.model.name),
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 5 || inner.width < 40 {
            return;
        }
        let right = inner.x + inner.width;

        for (row_idx, row) in self.model.rows.iter().enumerate() {
            let y = inner.y + row_idx as u16;
            let offset = ROW_OFFSETS.get(row_idx).copied().unwrap_or(0);
            for (col_idx, key) in row.iter().enumerate() {
                let x = inner.x + offset + col_idx as u16 * KEY_WIDTH;
                if x + KEY_WIDTH > right {
                    break;
                }
                let label = match self.hint.orders_for(key.code).first() {
                    Some(order) if !self.hint.is_expected(key.code) && *order < 10 => {
                        format!("{}{order}", key.base)
                    }
                    _ => format!(" {} ", key.base),
                };
                buf.set_string(x, y, &label, self.key_style(key.code));
            }
        }

        let y = inner.y + 4;
        let mut x = inner.x;
        for (code, width) in [
            (SHIFT_LEFT_CODE, 6u16),
            (SPACE_CODE, 20),
            (SHIFT_RIGHT_CODE, 6),
            (ENTER_CODE, 5),
        ] {
            if x + width > right {
                break;
            }
            let label = format!("{:^width$}", code_short_label(code), width = width as usize);
            buf.set_string(x, y, &label, self.key_style(code));
            x += width + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::typing::TypingSession;

    #[test]
    fn test_expected_key_is_highlighted() {
        let model = KeyboardModel::qwerty();
        let session = TypingSession::from_text("q");
        let hint = KeyHint::derive(&session, &model);
        let theme = Theme::default();
        let area = Rect::new(0, 0, 70, 7);
        let mut buf = Buffer::empty(area);
        KeyboardHint::new(&model, &hint, &theme).render(area, &mut buf);

        // "KeyQ" sits on the second row, first column, inside the border.
        let cell = &buf[(1 + ROW_OFFSETS[1] + 1, 2)];
        assert_eq!(cell.symbol(), "q");
        assert_eq!(cell.bg, theme.colors.key_expected());
    }
}
