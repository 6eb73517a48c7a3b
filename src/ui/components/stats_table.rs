use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::store::summary::{StatsRow, StatsSummary};
use crate::ui::theme::Theme;

pub struct StatsTable<'a> {
    pub summary: &'a StatsSummary,
    pub rows: &'a [StatsRow],
    pub scroll: usize,
    pub theme: &'a Theme,
}

pub fn format_row(row: &StatsRow) -> String {
    format!(
        "{when:<18} {wpm:>6.1} {acc:>9.1}% {err:>7.1}%  {title}",
        when = row.when,
        wpm = row.wpm,
        acc = row.accuracy * 100.0,
        err = row.error_rate * 100.0,
        title = row.title,
    )
}

fn format_practice_time(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}h {m:02}m")
    } else {
        format!("{m}m {s:02}s")
    }
}

impl Widget for StatsTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(3)])
            .split(area);

        let label = Style::default().fg(colors.text_pending());
        let value = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);
        let summary_lines = vec![
            Line::from(vec![
                Span::styled("Total Sessions:   ", label),
                Span::styled(self.summary.total.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Average WPM:      ", label),
                Span::styled(format!("{:.1}", self.summary.avg_wpm), value),
            ]),
            Line::from(vec![
                Span::styled("Average Accuracy: ", label),
                Span::styled(format!("{:.1}%", self.summary.avg_accuracy * 100.0), value),
            ]),
            Line::from(vec![
                Span::styled("Best WPM:         ", label),
                Span::styled(format!("{:.1}", self.summary.best_wpm), value),
            ]),
            Line::from(vec![
                Span::styled("Practice Time:    ", label),
                Span::styled(format_practice_time(self.summary.total_practice_secs), value),
            ]),
        ];
        Paragraph::new(summary_lines)
            .block(
                Block::bordered()
                    .title(" Stats Summary ")
                    .border_style(Style::default().fg(colors.accent())),
            )
            .render(layout[0], buf);

        let table_block = Block::bordered()
            .title(" Recent Sessions ")
            .border_style(Style::default().fg(colors.border()));
        let inner = table_block.inner(layout[1]);
        table_block.render(layout[1], buf);

        let mut lines = vec![Line::from(Span::styled(
            format!("{:<18} {:>6} {:>10} {:>8}  Article", "When", "WPM", "Accuracy", "Error"),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ))];

        if self.rows.is_empty() {
            lines.push(Line::from(Span::styled(
                "No sessions yet. Finish one to see it here.",
                label,
            )));
        }

        let visible = (inner.height as usize).saturating_sub(1);
        lines.extend(self.rows.iter().skip(self.scroll).take(visible).map(|row| {
            Line::from(Span::styled(
                format_row(row),
                Style::default().fg(colors.accuracy(row.accuracy)),
            ))
        }));

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row() {
        let row = StatsRow {
            when: "2 hours ago".to_string(),
            title: "Rust".to_string(),
            wpm: 42.04,
            accuracy: 0.975,
            error_rate: 0.025,
        };
        let line = format_row(&row);
        assert!(line.starts_with("2 hours ago       "));
        assert!(line.contains("  42.0"));
        assert!(line.contains("97.5%"));
        assert!(line.contains("2.5%"));
        assert!(line.ends_with("Rust"));
    }

    #[test]
    fn test_practice_time() {
        assert_eq!(format_practice_time(75.0), "1m 15s");
        assert_eq!(format_practice_time(3725.0), "1h 02m");
        assert_eq!(format_practice_time(-4.0), "0m 00s");
    }
}
