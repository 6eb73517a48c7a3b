use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::metrics::{CharState, char_states};
use crate::session::typing::TypingSession;
use crate::ui::theme::{Theme, ThemeColors};

pub struct TypingArea<'a> {
    session: &'a TypingSession,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(session: &'a TypingSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

/// Group consecutive characters sharing a style into spans.
fn styled_spans(target: &str, typed: &str, colors: &ThemeColors) -> Vec<Span<'static>> {
    let cursor = typed.chars().count();
    let states = char_states(target, typed);

    let style_for = |idx: usize, state: CharState| match state {
        CharState::Correct => Style::default().fg(colors.text_correct()),
        CharState::Incorrect => Style::default()
            .fg(colors.text_incorrect())
            .bg(colors.text_incorrect_bg())
            .add_modifier(Modifier::UNDERLINED),
        CharState::Pending if idx == cursor => Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg()),
        CharState::Pending => Style::default().fg(colors.text_pending()),
    };

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style: Option<Style> = None;

    for (idx, (ch, state)) in target.chars().zip(states).enumerate() {
        let style = style_for(idx, state);
        if run_style != Some(style) {
            if let Some(prev) = run_style {
                spans.push(Span::styled(std::mem::take(&mut run), prev));
            }
            run_style = Some(style);
        }
        run.push(ch);
    }
    if let Some(style) = run_style {
        spans.push(Span::styled(run, style));
    }

    let overtyped = cursor.saturating_sub(target.chars().count());
    if overtyped > 0 {
        spans.push(Span::styled(
            format!(" +{overtyped}"),
            Style::default().fg(colors.text_incorrect()),
        ));
    }
    spans
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let spans = styled_spans(self.session.target(), self.session.typed(), colors);

        let block = Block::bordered()
            .title(format!(" {} ", self.session.article().title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_spans_cover_target() {
        let colors = ThemeColors::default();
        let spans = styled_spans("hello world", "helo", &colors);
        assert_eq!(text_of(&spans), "hello world");
    }

    #[test]
    fn test_runs_are_merged() {
        let colors = ThemeColors::default();
        // correct "ab", cursor "c", pending "d"
        let spans = styled_spans("abcd", "ab", &colors);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].content, "ab");
        assert_eq!(spans[1].content, "c");
        assert_eq!(spans[2].content, "d");
    }

    #[test]
    fn test_overtyping_marker() {
        let colors = ThemeColors::default();
        let spans = styled_spans("ab", "abxyz", &colors);
        assert_eq!(spans.last().unwrap().content, " +3");
    }
}
