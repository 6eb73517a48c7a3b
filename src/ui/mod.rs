pub mod components;
pub mod layout;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::app::{App, AppScreen};
use crate::ui::components::menu::MenuView;
use crate::ui::components::stats_table::StatsTable;
use crate::ui::components::summary::SessionSummary;
use crate::ui::components::typing_area::TypingArea;
use crate::ui::layout::{AppLayout, pack_hint_lines};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    frame.render_widget(Block::default().style(Style::default().bg(colors.bg())), area);

    if app.screen == AppScreen::Home {
        let status = app.pool_status();
        frame.render_widget(
            MenuView {
                menu: &app.menu,
                theme: &app.theme,
                status: &status,
            },
            area,
        );
        return;
    }

    let layout = AppLayout::new(area);
    let header_block = Block::bordered().border_style(Style::default().fg(colors.border()));
    let header_style = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);

    let header = match app.screen {
        AppScreen::Loading => Line::from("Loading article..."),
        AppScreen::Session => match app.session.as_ref() {
            Some(session) => {
                let m = session.metrics();
                Line::from(vec![
                    Span::styled(format!("WPM: {:.1}", m.wpm), header_style),
                    Span::raw("   "),
                    Span::styled(
                        format!("Accuracy: {:.1}%", m.accuracy * 100.0),
                        header_style.fg(colors.accuracy(m.accuracy)),
                    ),
                    Span::raw("   "),
                    Span::styled(
                        format!("{}/{} chars", m.total_typed, session.target().chars().count()),
                        Style::default().fg(colors.text_pending()),
                    ),
                ])
            }
            None => Line::default(),
        },
        AppScreen::Summary => Line::from(Span::styled("Session complete", header_style)),
        AppScreen::Stats => Line::from(Span::styled("Your progress", header_style)),
        AppScreen::Home => Line::default(),
    };

    frame.render_widget(Paragraph::new(header).block(header_block), layout.header);

    match app.screen {
        AppScreen::Loading => {
            let text = Paragraph::new("Fetching a random article...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(colors.text_pending()));
            frame.render_widget(text, layout.main);
        }
        AppScreen::Session => {
            if let Some(session) = app.session.as_ref() {
                frame.render_widget(TypingArea::new(session, &app.theme), layout.main);
            }
        }
        AppScreen::Summary => {
            if let Some(record) = app.last_record.as_ref() {
                frame.render_widget(
                    SessionSummary {
                        record,
                        save_error: app.last_save_error.as_deref(),
                        theme: &app.theme,
                    },
                    layout.main,
                );
            }
        }
        AppScreen::Stats => frame.render_widget(
            StatsTable {
                summary: &app.stats_summary,
                rows: &app.stats_rows,
                scroll: app.stats_scroll,
                theme: &app.theme,
            },
            layout.main,
        ),
        AppScreen::Home => {}
    }

    let footer = pack_hint_lines(screen_hints(app.screen), layout.footer.width as usize)
        .into_iter()
        .next()
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().fg(colors.text_pending())),
        layout.footer,
    );
}

fn screen_hints(screen: AppScreen) -> &'static [&'static str] {
    match screen {
        AppScreen::Home | AppScreen::Loading => &[],
        AppScreen::Session => &["[Tab] Finish", "[Esc] Back"],
        AppScreen::Summary => &["[Enter] Home", "[n] New session", "[s] Stats"],
        AppScreen::Stats => &["[Up/Down] Scroll", "[Esc] Back"],
    }
}
