use std::sync::Arc;

use chrono::Utc;

use crate::config::Config;
use crate::generator::article::Article;
use crate::generator::pool::ArticlePool;
use crate::generator::prefetch::{PrefetchSettings, Prefetcher};
use crate::generator::wikipedia::{WikipediaSource, fetch_random_article};
use crate::session::result::SessionRecord;
use crate::session::typing::{Progress, TypingSession};
use crate::store::StatsStore;
use crate::store::schema::StatsDocument;
use crate::store::summary::{StatsRow, StatsSummary, stats_rows};
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

/// Synchronous fetches tried when the pool is empty before accepting a
/// recently served article.
const SYNC_FETCH_ATTEMPTS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Loading,
    Session,
    Summary,
    Stats,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: Theme,
    pub menu: Menu,
    pub store: StatsStore,
    pub pool: Arc<ArticlePool>,
    pub session: Option<TypingSession>,
    pub last_record: Option<SessionRecord>,
    pub last_save_error: Option<String>,
    pub stats_summary: StatsSummary,
    pub stats_rows: Vec<StatsRow>,
    pub stats_scroll: usize,
    pub should_quit: bool,
    prefetcher: Option<Prefetcher>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let theme = Theme::load(&config.theme).unwrap_or_default();
        let store = StatsStore::new(config.stats_path());
        let pool = Arc::new(ArticlePool::new(config.pool_target_size, config.pool_history_size));

        let prefetcher = if config.prefetch_enabled && cfg!(feature = "network") {
            let source = WikipediaSource {
                min_chars: config.min_chars,
                max_chars: config.max_chars,
                tries: config.fetch_tries,
            };
            Some(Prefetcher::spawn(Arc::clone(&pool), source, PrefetchSettings::default()))
        } else {
            None
        };

        Self {
            screen: AppScreen::Home,
            config,
            theme,
            menu: Menu::new(),
            store,
            pool,
            session: None,
            last_record: None,
            last_save_error: None,
            stats_summary: StatsSummary::default(),
            stats_rows: Vec::new(),
            stats_scroll: 0,
            should_quit: false,
            prefetcher,
        }
    }

    /// Show the loading screen; the article is fetched by [`App::load_pending`]
    /// after the next draw.
    pub fn request_session(&mut self) {
        self.screen = AppScreen::Loading;
    }

    pub fn load_pending(&mut self) {
        if self.screen != AppScreen::Loading {
            return;
        }
        let article = self.next_article();
        self.session = Some(TypingSession::start(article));
        self.last_record = None;
        self.last_save_error = None;
        self.screen = AppScreen::Session;
    }

    fn next_article(&self) -> Article {
        if let Some(article) = self.pool.try_take() {
            return article;
        }

        let mut last = None;
        for _ in 0..SYNC_FETCH_ATTEMPTS {
            let article = fetch_random_article(
                self.config.min_chars,
                self.config.max_chars,
                self.config.fetch_tries,
            );
            if article.is_fallback() {
                return article;
            }
            // Route through the pool so the article enters the recent-history window.
            if self.pool.try_add(article.clone())
                && let Some(taken) = self.pool.try_take()
            {
                return taken;
            }
            last = Some(article);
        }
        last.unwrap_or_else(Article::fallback)
    }

    pub fn type_char(&mut self, ch: char) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.push_char(ch) == Progress::Complete {
            self.finish_session();
        }
    }

    pub fn backspace(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.backspace();
        }
    }

    pub fn tick(&mut self) {
        if self.screen == AppScreen::Session
            && let Some(session) = self.session.as_mut()
        {
            session.tick();
        }
    }

    /// Finalize the current session and persist it. Safe to call repeatedly;
    /// only the first call for a session records anything.
    pub fn finish_session(&mut self) {
        let Some(record) = self.session.as_mut().and_then(TypingSession::finalize) else {
            return;
        };
        self.last_save_error = match self.store.append_session(&record) {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "failed to save session");
                Some(format!("{e:#}"))
            }
        };
        self.last_record = Some(record);
        self.screen = AppScreen::Summary;
    }

    /// Leave the session screen without recording anything.
    pub fn abandon_session(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("session abandoned");
        }
        self.go_to_menu();
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Home;
    }

    pub fn go_to_stats(&mut self) {
        let doc = self.store.load();
        self.refresh_stats(&doc);
        self.stats_scroll = 0;
        self.screen = AppScreen::Stats;
    }

    fn refresh_stats(&mut self, doc: &StatsDocument) {
        self.stats_summary = StatsSummary::from_sessions(&doc.sessions);
        self.stats_rows = stats_rows(doc, Utc::now());
    }

    pub fn scroll_stats(&mut self, delta: isize) {
        let max = self.stats_rows.len().saturating_sub(1);
        self.stats_scroll = self.stats_scroll.saturating_add_signed(delta).min(max);
    }

    pub fn pool_status(&self) -> String {
        let failures = self.pool.fetch_failures();
        if failures > 0 {
            format!("{} ready, {failures} failed fetches", self.pool.len())
        } else {
            format!("{} ready", self.pool.len())
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(mut prefetcher) = self.prefetcher.take() {
            prefetcher.stop();
        }
    }
}
