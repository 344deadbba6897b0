use chrono::{DateTime, Local, Utc};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Row, Table, Widget};

use crate::engine::metrics::SpeedTier;
use crate::session::result::SessionResult;
use crate::share::SharedResult;
use crate::store::schema::{OverallStats, PassageStats};
use crate::ui::theme::Theme;

fn stat_line<'a>(theme: &Theme, label: &'a str, value: String) -> Line<'a> {
    let colors = &theme.colors;
    Line::from(vec![
        Span::styled(format!("  {label:<12}"), Style::default().fg(colors.text_pending())),
        Span::styled(
            value,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Summary of the session that just finished.
pub struct ResultPanel<'a> {
    pub result: &'a SessionResult,
    pub share_link: Option<&'a str>,
    pub passage_best: Option<&'a PassageStats>,
    pub theme: &'a Theme,
}

impl Widget for ResultPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let result = self.result;
        let mut lines = vec![
            Line::from(""),
            stat_line(self.theme, "Speed", format!("{} WPM ({})", result.wpm, result.speed_tier().label())),
            stat_line(self.theme, "Accuracy", format!("{:.2}%", result.accuracy)),
            stat_line(self.theme, "Score", result.score.to_string()),
            Line::from(""),
        ];
        if let Some(best) = self.passage_best {
            lines.push(stat_line(
                self.theme,
                "Best here",
                format!(
                    "{} WPM, {:.2}%, score {} over {} attempts",
                    best.best_wpm, best.best_accuracy, best.best_score, best.attempts
                ),
            ));
            lines.push(Line::from(""));
        }
        if let Some(link) = self.share_link {
            lines.push(Line::from(Span::styled(
                "  Share:",
                Style::default().fg(colors.text_pending()),
            )));
            lines.push(Line::from(Span::styled(
                format!("  {link}"),
                Style::default().fg(colors.fg()),
            )));
        }

        let block = Block::bordered()
            .title(" Session complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// Recent sessions, newest first, with the overall totals on top.
pub struct HistoryPanel<'a> {
    pub history: &'a [SessionResult],
    pub overall: &'a OverallStats,
    pub theme: &'a Theme,
}

impl Widget for HistoryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" History ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 4 {
            return;
        }

        let overall = self.overall;
        let summary = Line::from(vec![Span::styled(
            format!(
                " {} attempts   best {} WPM   avg {:.2} WPM   best acc {:.2}%   avg acc {:.2}%   best score {}",
                overall.total_attempts,
                overall.best_wpm,
                overall.average_wpm,
                overall.best_accuracy,
                overall.average_accuracy,
                overall.best_score,
            ),
            Style::default().fg(colors.fg()),
        )]);
        Paragraph::new(summary).render(Rect::new(inner.x, inner.y, inner.width, 1), buf);

        let table_area = Rect::new(inner.x, inner.y + 2, inner.width, inner.height - 2);
        if self.history.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                " No sessions yet.",
                Style::default().fg(colors.text_pending()),
            )))
            .render(table_area, buf);
            return;
        }

        let header = Row::new(vec!["When", "WPM", "Accuracy", "Score", "Passage"]).style(
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        );
        let rows = self.history.iter().map(|result| {
            Row::new(vec![
                format_timestamp(result.timestamp),
                result.wpm.to_string(),
                format!("{:.2}%", result.accuracy),
                result.score.to_string(),
                format!("{:016x}", result.passage_id),
            ])
            .style(Style::default().fg(colors.fg()))
        });
        let widths = [
            Constraint::Length(17),
            Constraint::Length(5),
            Constraint::Length(9),
            Constraint::Length(6),
            Constraint::Min(16),
        ];
        Widget::render(Table::new(rows, widths).header(header), table_area, buf);
    }
}

/// A result someone shared through a link.
pub struct SharedPanel<'a> {
    pub shared: &'a SharedResult,
    pub theme: &'a Theme,
}

impl Widget for SharedPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let shared = self.shared;
        let mut lines = vec![
            Line::from(""),
            stat_line(
                self.theme,
                "Speed",
                format!("{} WPM ({})", shared.wpm, SpeedTier::from_wpm(shared.wpm).label()),
            ),
            stat_line(self.theme, "Accuracy", format!("{:.2}%", shared.accuracy)),
            stat_line(self.theme, "Score", shared.score.to_string()),
        ];
        if let Some(when) = shared.timestamp.and_then(DateTime::<Utc>::from_timestamp_millis) {
            lines.push(stat_line(self.theme, "Typed on", format_timestamp(when)));
        }

        let block = Block::bordered()
            .title(" Shared result ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
