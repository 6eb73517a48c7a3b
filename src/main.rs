use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use wikitype::app::{App, AppScreen};
use wikitype::config::Config;
use wikitype::event::{AppEvent, EventHandler};
use wikitype::logging::{LogConfig, init_logging};
use wikitype::ui;
use wikitype::ui::components::menu::MenuAction;

#[derive(Parser)]
#[command(name = "wikitype", version, about = "Practice typing on random Wikipedia passages")]
struct Cli {
    #[arg(long, help = "Path of the session stats file")]
    stats_path: Option<PathBuf>,

    #[arg(long, help = "Log level (trace, debug, info, warn, error)")]
    log_level: Option<String>,

    #[arg(long, help = "Do not prefetch articles in the background")]
    no_prefetch: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Ignoring unreadable config {}: {e}", Config::config_path().display());
            Config::default()
        }
    };
    if !Config::config_path().exists()
        && let Err(e) = config.save()
    {
        eprintln!("Could not write default config: {e}");
    }
    if let Some(path) = cli.stats_path {
        config.stats_path = path.to_string_lossy().to_string();
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.no_prefetch {
        config.prefetch_enabled = false;
    }
    config.validate();

    let log_config = LogConfig {
        level: config.log_level.clone(),
        file: PathBuf::from(&config.log_file),
    };
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Logging disabled: {e}");
    }

    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));
    let result = run_app(&mut terminal, &mut app, &events);

    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "application error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // The loading screen is on display now; fetch the article.
        if app.screen == AppScreen::Loading {
            app.load_pending();
            continue;
        }

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Home => handle_menu_key(app, key),
        AppScreen::Loading => {}
        AppScreen::Session => handle_session_key(app, key),
        AppScreen::Summary => handle_summary_key(app, key),
        AppScreen::Stats => handle_stats_key(app, key),
    }
}

fn run_menu_action(app: &mut App, action: MenuAction) {
    match action {
        MenuAction::StartSession => app.request_session(),
        MenuAction::ViewStats => app.go_to_stats(),
        MenuAction::Quit => app.should_quit = true,
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            let action = app.menu.selected_action();
            run_menu_action(app, action);
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                run_menu_action(app, action);
            }
        }
        _ => {}
    }
}

fn handle_session_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.abandon_session(),
        KeyCode::Tab => app.finish_session(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Char('n') => app.request_session(),
        KeyCode::Char('s') => app.go_to_stats(),
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_stats(-1),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_stats(1),
        KeyCode::PageUp => app.scroll_stats(-10),
        KeyCode::PageDown => app.scroll_stats(10),
        _ => {}
    }
}
