use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    StartSession,
    ViewStats,
    Quit,
}

pub struct MenuItem {
    pub key: char,
    pub label: &'static str,
    pub description: &'static str,
    pub action: MenuAction,
}

pub struct Menu {
    pub items: Vec<MenuItem>,
    pub selected: usize,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub fn new() -> Self {
        Self {
            items: vec![
                MenuItem {
                    key: '1',
                    label: "Start Session",
                    description: "Type a random Wikipedia passage",
                    action: MenuAction::StartSession,
                },
                MenuItem {
                    key: 's',
                    label: "View Stats",
                    description: "Averages and recent sessions",
                    action: MenuAction::ViewStats,
                },
                MenuItem {
                    key: 'q',
                    label: "Quit",
                    description: "Leave wikitype",
                    action: MenuAction::Quit,
                },
            ],
            selected: 0,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> MenuAction {
        self.items[self.selected].action
    }

    pub fn action_for_key(&self, key: char) -> Option<MenuAction> {
        self.items.iter().find(|item| item.key == key).map(|item| item.action)
    }
}

pub struct MenuView<'a> {
    pub menu: &'a Menu,
    pub theme: &'a Theme,
    pub status: &'a str,
}

impl Widget for MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Typing Tutor",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Daily practice with random Wikipedia text.",
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let lines: Vec<Line> = self
            .menu
            .items
            .iter()
            .enumerate()
            .flat_map(|(i, item)| {
                let is_selected = i == self.menu.selected;
                let indicator = if is_selected { ">" } else { " " };
                let label_style = if is_selected {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                [
                    Line::from(Span::styled(
                        format!(" {indicator} [{}] {}", item.key, item.label),
                        label_style,
                    )),
                    Line::from(Span::styled(
                        format!("     {}", item.description),
                        Style::default().fg(colors.text_pending()),
                    )),
                    Line::from(""),
                ]
            })
            .collect();
        Paragraph::new(lines).render(layout[2], buf);

        Paragraph::new(Span::styled(
            format!(" Prefetch: {}", self.status),
            Style::default().fg(colors.text_pending()),
        ))
        .render(layout[3], buf);
    }
}
