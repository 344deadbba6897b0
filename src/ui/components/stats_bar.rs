use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::typing::Snapshot;
use crate::ui::theme::Theme;

/// Live numbers shown above the passage while typing.
pub struct StatsBar<'a> {
    pub wpm: Option<u32>,
    pub word_wpm: Option<u32>,
    pub accuracy: f64,
    pub snapshot: Snapshot,
    pub theme: &'a Theme,
}

fn dash_or(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl Widget for StatsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.text_pending());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let errors = if self.snapshot.error_count > 0 {
            Style::default().fg(colors.error())
        } else {
            Style::default().fg(colors.success())
        };

        let line = Line::from(vec![
            Span::styled(" WPM ", label),
            Span::styled(dash_or(self.wpm), value),
            Span::styled("  word ", label),
            Span::styled(dash_or(self.word_wpm), value),
            Span::styled("  Accuracy ", label),
            Span::styled(format!("{:.1}%", self.accuracy), value),
            Span::styled("  Errors ", label),
            Span::styled(self.snapshot.error_count.to_string(), errors),
            Span::styled("  Progress ", label),
            Span::styled(
                format!("{}/{}", self.snapshot.typed_count, self.snapshot.total_count),
                value,
            ),
        ]);

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(line).block(block).render(area, buf);
    }
}
