use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::engine::metrics::{Metrics, compute_metrics};
use crate::generator::article::Article;
use crate::session::result::SessionRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    InProgress,
    /// Typed length reached the target length.
    Complete,
}

/// Live state of one attempt at typing an article.
///
/// Metrics are recomputed from the whole input after every edit. The session
/// produces its [`SessionRecord`] exactly once: later `finalize` calls and
/// further edits are ignored.
pub struct TypingSession {
    article: Article,
    typed: String,
    started_at: DateTime<Utc>,
    started: Instant,
    metrics: Metrics,
    finalized: bool,
}

impl TypingSession {
    pub fn start(article: Article) -> Self {
        Self::start_at(article, Utc::now(), Instant::now())
    }

    pub fn start_at(article: Article, started_at: DateTime<Utc>, started: Instant) -> Self {
        tracing::debug!(title = %article.title, len = article.extract_len, "session started");
        Self {
            article,
            typed: String::new(),
            started_at,
            started,
            metrics: Metrics::default(),
            finalized: false,
        }
    }

    pub fn article(&self) -> &Article {
        &self.article
    }

    pub fn target(&self) -> &str {
        &self.article.text
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn is_complete(&self) -> bool {
        self.typed.chars().count() >= self.article.text.chars().count()
    }

    /// Replace the whole input, as a text widget reports it.
    pub fn update(&mut self, typed: &str, elapsed_secs: f64) -> Progress {
        if self.finalized {
            return Progress::Complete;
        }
        self.typed.clear();
        self.typed.push_str(typed);
        self.refresh(elapsed_secs)
    }

    pub fn push_char(&mut self, ch: char) -> Progress {
        if self.finalized {
            return Progress::Complete;
        }
        self.typed.push(ch);
        self.refresh(self.elapsed_secs())
    }

    pub fn backspace(&mut self) -> Progress {
        if self.finalized {
            return Progress::Complete;
        }
        self.typed.pop();
        self.refresh(self.elapsed_secs())
    }

    /// Recompute metrics against the clock without changing the input, so
    /// the WPM readout decays while the user pauses.
    pub fn tick(&mut self) {
        if !self.finalized && !self.typed.is_empty() {
            self.refresh(self.elapsed_secs());
        }
    }

    fn refresh(&mut self, elapsed_secs: f64) -> Progress {
        self.metrics = compute_metrics(&self.article.text, &self.typed, elapsed_secs);
        if self.is_complete() {
            Progress::Complete
        } else {
            Progress::InProgress
        }
    }

    pub fn finalize(&mut self) -> Option<SessionRecord> {
        let elapsed = self.elapsed_secs();
        self.finalize_at(Utc::now(), elapsed)
    }

    /// Build the record from metrics recomputed at `elapsed_secs`. Returns
    /// `None` if the session was already finalized.
    pub fn finalize_at(&mut self, ended_at: DateTime<Utc>, elapsed_secs: f64) -> Option<SessionRecord> {
        if self.finalized {
            tracing::debug!("ignoring repeated finalize");
            return None;
        }
        self.finalized = true;
        self.metrics = compute_metrics(&self.article.text, &self.typed, elapsed_secs);

        let record = SessionRecord::from_metrics(
            format_timestamp(self.started_at),
            format_timestamp(ended_at),
            elapsed_secs,
            &self.article,
            &self.metrics,
        );
        tracing::info!(
            id = %record.id,
            wpm = record.wpm,
            accuracy = record.accuracy,
            duration_s = record.duration_s,
            "session finalized"
        );
        Some(record)
    }
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn session(text: &str) -> TypingSession {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        TypingSession::start_at(Article::new("T", "https://x/t", text), start, Instant::now())
    }

    #[test]
    fn test_update_reports_completion() {
        let mut s = session("abc");
        assert_eq!(s.update("ab", 1.0), Progress::InProgress);
        assert_eq!(s.metrics().correct_chars, 2);
        assert_eq!(s.update("abx", 2.0), Progress::Complete);
        assert_eq!(s.metrics().correct_chars, 2);
    }

    #[test]
    fn test_overtyping_is_complete() {
        let mut s = session("ab");
        assert_eq!(s.update("abcd", 1.0), Progress::Complete);
        assert_eq!(s.metrics().total_typed, 4);
    }

    #[test]
    fn test_push_and_backspace() {
        let mut s = session("hi there");
        s.push_char('h');
        s.push_char('x');
        assert_eq!(s.typed(), "hx");
        s.backspace();
        s.push_char('i');
        assert_eq!(s.typed(), "hi");
        assert_eq!(s.metrics().correct_chars, 2);
    }

    #[test]
    fn test_finalize_only_once() {
        let mut s = session("hello world");
        s.update("hello world", 60.0);
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 12, 1, 0).unwrap();

        let record = s.finalize_at(end, 60.0).unwrap();
        assert_eq!(record.correct_chars, 11);
        assert!((record.wpm - 2.2).abs() < 1e-9);
        assert_eq!(record.accuracy, 1.0);
        assert_eq!(record.started_at, "2024-05-01T12:00:00.000000+00:00");
        assert_eq!(record.ended_at, "2024-05-01T12:01:00.000000+00:00");

        assert!(s.finalize_at(end, 61.0).is_none());
        assert!(s.finalize().is_none());
        assert!(s.is_finalized());
    }

    #[test]
    fn test_edits_after_finalize_are_ignored() {
        let mut s = session("abc");
        s.update("a", 1.0);
        s.finalize();
        s.push_char('b');
        assert_eq!(s.typed(), "a");
    }

    #[test]
    fn test_early_finalize_with_no_input() {
        let mut s = session("abc");
        let record = s.finalize().unwrap();
        assert_eq!(record.typed_len, 0);
        assert_eq!(record.accuracy, 0.0);
        assert_eq!(record.wpm, 0.0);
    }
}
