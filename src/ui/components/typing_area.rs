use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::metrics::SpeedTier;
use crate::keyboard::display::target_glyph;
use crate::session::passage::Passage;
use crate::session::typing::{CharacterState, TypingSession};
use crate::ui::theme::{Theme, ThemeColors};

pub struct TypingArea<'a> {
    session: &'a TypingSession,
    theme: &'a Theme,
    title: String,
}

impl<'a> TypingArea<'a> {
    pub fn new(session: &'a TypingSession, theme: &'a Theme, title: String) -> Self {
        Self {
            session,
            theme,
            title,
        }
    }
}

fn char_style(state: CharacterState, colors: &ThemeColors) -> Style {
    if state.is_current {
        Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg())
    } else if !state.typed {
        Style::default().fg(colors.text_pending())
    } else if state.correct {
        Style::default().fg(colors.text_correct())
    } else {
        Style::default()
            .fg(colors.text_incorrect())
            .bg(colors.text_incorrect_bg())
            .add_modifier(Modifier::UNDERLINED)
    }
}

fn tier_style(tier: SpeedTier, colors: &ThemeColors) -> Style {
    match tier {
        SpeedTier::Slow => Style::default().fg(colors.text_pending()),
        SpeedTier::Steady => Style::default().fg(colors.fg()),
        SpeedTier::Good => Style::default().fg(colors.accent()),
        SpeedTier::Fast => Style::default().fg(colors.success()),
        SpeedTier::Blazing => Style::default()
            .fg(colors.key_expected())
            .add_modifier(Modifier::BOLD),
    }
}

/// One display row of the passage.
#[derive(Debug, Default, PartialEq)]
struct Row {
    /// (target index, glyph) pairs.
    glyphs: Vec<(usize, String)>,
    /// (column, word index) of each word that starts on this row.
    word_starts: Vec<(usize, usize)>,
}

/// Lay the passage out in rows at most `width` glyphs wide, breaking between
/// words. A line-break target ends its row and is drawn as a glyph at the end
/// of it. Words wider than a row are split.
fn layout_rows(passage: &Passage, width: usize) -> Vec<Row> {
    let width = width.max(1);
    let mut rows = vec![Row::default()];
    for (word_idx, word) in passage.words().iter().enumerate() {
        let first = passage.word_range(word_idx).start;
        let fits = rows
            .last()
            .is_some_and(|row| row.glyphs.is_empty() || row.glyphs.len() + word.len() <= width);
        if !fits && !word.is_line_break() {
            rows.push(Row::default());
        }
        for (offset, target) in word.targets().iter().enumerate() {
            if rows.last().is_some_and(|row| row.glyphs.len() >= width) && !target.is_line_break {
                rows.push(Row::default());
            }
            let Some(row) = rows.last_mut() else {
                continue;
            };
            if offset == 0 {
                row.word_starts.push((row.glyphs.len(), word_idx));
            }
            row.glyphs
                .push((first + offset, target_glyph(target.character).to_string()));
            if target.is_line_break {
                rows.push(Row::default());
            }
        }
    }
    rows
}

/// Speed of each finished word on the row, placed above the word's first glyph.
fn label_spans(row: &Row, session: &TypingSession, colors: &ThemeColors) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut column = 0;
    for &(start, word) in &row.word_starts {
        let Some(wpm) = session.word_wpm(word) else {
            continue;
        };
        if start < column {
            continue;
        }
        let label = wpm.to_string();
        spans.push(Span::raw(" ".repeat(start - column)));
        column = start + label.len() + 1;
        spans.push(Span::styled(label, tier_style(SpeedTier::from_wpm(wpm), colors)));
        spans.push(Span::raw(" "));
    }
    spans
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let states: Vec<CharacterState> = self.session.character_states().collect();

        let block = Block::bordered()
            .title(self.title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);

        let rows = layout_rows(self.session.passage(), inner.width as usize);
        let cursor_row = rows
            .iter()
            .position(|row| {
                row.glyphs
                    .iter()
                    .any(|&(idx, _)| states.get(idx).is_some_and(|s| s.is_current))
            })
            .unwrap_or(0);

        let mut lines: Vec<Line> = Vec::with_capacity(rows.len() * 2);
        for row in &rows {
            lines.push(Line::from(label_spans(row, self.session, colors)));
            let spans: Vec<Span> = row
                .glyphs
                .iter()
                .map(|(idx, glyph)| match states.get(*idx) {
                    Some(&state) => Span::styled(glyph.clone(), char_style(state, colors)),
                    None => Span::raw(glyph.clone()),
                })
                .collect();
            lines.push(Line::from(spans));
        }

        // Keep the cursor row and its label in view.
        let scroll = (cursor_row * 2 + 2).saturating_sub(inner.height as usize);
        Paragraph::new(lines)
            .block(block)
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::keyboard::display::LINE_BREAK;
    use crate::keyboard::model::KeyboardModel;
    use crate::session::input::Key;

    fn glyphs(row: &Row) -> Vec<&str> {
        row.glyphs.iter().map(|(_, g)| g.as_str()).collect()
    }

    fn type_timed(session: &mut TypingSession, text: &str) {
        let model = KeyboardModel::qwerty();
        let start = Instant::now();
        for (i, ch) in text.chars().enumerate() {
            let at = start + Duration::from_millis(200 * (i as u64 + 1));
            session.handle_keystroke_at(&model, model.input_code_for(ch), Key::Char(ch), at);
        }
    }

    #[test]
    fn test_lines_basic() {
        let passage = Passage::build("abc");
        let rows = layout_rows(&passage, 80);
        assert_eq!(rows.len(), 1);
        assert_eq!(glyphs(&rows[0]), vec!["a", "b", "c"]);
        assert_eq!(rows[0].word_starts, vec![(0, 0)]);
    }

    #[test]
    fn test_line_break_ends_line() {
        let passage = Passage::build("a\nb");
        let rows = layout_rows(&passage, 80);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].glyphs.len(), 2);
        assert_eq!(rows[0].glyphs[1], (1, LINE_BREAK.to_string()));
        assert_eq!(rows[1].glyphs, vec![(2, "b".to_string())]);
    }

    #[test]
    fn test_rows_wrap_between_words() {
        let passage = Passage::build("ab cd ef");
        let rows = layout_rows(&passage, 6);
        assert_eq!(rows.len(), 2);
        assert_eq!(glyphs(&rows[0]), vec!["a", "b", " ", "c", "d", " "]);
        assert_eq!(glyphs(&rows[1]), vec!["e", "f"]);
        assert_eq!(rows[1].word_starts, vec![(0, 2)]);
    }

    #[test]
    fn test_long_word_is_split() {
        let passage = Passage::build("abcdef");
        let rows = layout_rows(&passage, 4);
        assert_eq!(rows.len(), 2);
        assert_eq!(glyphs(&rows[1]), vec!["e", "f"]);
    }

    #[test]
    fn test_finished_word_gets_wpm_label() {
        let mut session = TypingSession::from_text("cat dog");
        // 4 keys 200ms apart -> 80 wpm
        type_timed(&mut session, "cat ");
        let theme = Theme::default();
        let rows = layout_rows(session.passage(), 80);
        let spans = label_spans(&rows[0], &session, &theme.colors);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text.trim_end(), "80");
        let label = spans.iter().find(|s| s.content == "80").unwrap();
        assert_eq!(label.style, tier_style(SpeedTier::Fast, &theme.colors));
    }

    #[test]
    fn test_unfinished_words_have_no_label() {
        let session = TypingSession::from_text("cat dog");
        let theme = Theme::default();
        let rows = layout_rows(session.passage(), 80);
        assert!(label_spans(&rows[0], &session, &theme.colors).is_empty());
    }

    #[test]
    fn test_render_shows_word_wpm() {
        let mut session = TypingSession::from_text("cat dog");
        type_timed(&mut session, "cat ");
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        TypingArea::new(&session, &theme, String::new()).render(area, &mut buf);
        let label_row: String = (1..19).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        let text_row: String = (1..19).map(|x| buf[(x, 2)].symbol().to_string()).collect();
        assert!(label_row.starts_with("80"), "{label_row:?}");
        assert!(text_row.starts_with("cat dog"), "{text_row:?}");
    }

    #[test]
    fn test_render_does_not_panic_when_tiny() {
        let session = TypingSession::from_text("hello world");
        let theme = Theme::default();
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        TypingArea::new(&session, &theme, String::new()).render(area, &mut buf);
    }
}
