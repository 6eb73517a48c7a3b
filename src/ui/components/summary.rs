use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::result::SessionRecord;
use crate::ui::theme::Theme;

pub struct SessionSummary<'a> {
    pub record: &'a SessionRecord,
    pub save_error: Option<&'a str>,
    pub theme: &'a Theme,
}

impl Widget for SessionSummary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let record = self.record;

        let block = Block::bordered()
            .title(" Session Summary ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));

        let label = Style::default().fg(colors.text_pending());
        let value = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);
        let title = if record.source_meta.title.is_empty() {
            "Unknown"
        } else {
            record.source_meta.title.as_str()
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("WPM:      ", label),
                Span::styled(format!("{:.1}", record.wpm), value),
            ]),
            Line::from(vec![
                Span::styled("Accuracy: ", label),
                Span::styled(
                    format!("{:.1}%", record.accuracy * 100.0),
                    value.fg(colors.accuracy(record.accuracy)),
                ),
            ]),
            Line::from(vec![
                Span::styled("Duration: ", label),
                Span::styled(format!("{:.1}s", record.duration_s), value),
            ]),
            Line::from(vec![
                Span::styled("Typed:    ", label),
                Span::styled(
                    format!("{} / {} chars, {} correct", record.typed_len, record.text_len, record.correct_chars),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled("Article:  ", label),
                Span::styled(title.to_string(), Style::default().fg(colors.accent())),
            ]),
        ];

        if let Some(err) = self.save_error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Could not save this session: {err}"),
                Style::default().fg(colors.error()),
            )));
        }

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
