use serde::{Deserialize, Serialize};

use crate::engine::metrics::Metrics;
use crate::generator::article::Article;

pub const SOURCE_WIKIPEDIA: &str = "wikipedia";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub extract_len: usize,
}

impl From<&Article> for SourceMeta {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            url: article.url.clone(),
            extract_len: article.extract_len,
        }
    }
}

/// One finished typing session as stored in the stats document.
///
/// Timestamps stay strings so documents written with naive (zone-less)
/// timestamps load unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub ended_at: String,
    #[serde(default)]
    pub duration_s: f64,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub source_meta: SourceMeta,
    #[serde(default)]
    pub text_len: usize,
    #[serde(default)]
    pub typed_len: usize,
    #[serde(default)]
    pub correct_chars: usize,
    #[serde(default)]
    pub wpm: f64,
    #[serde(default)]
    pub accuracy: f64,
}

fn default_source() -> String {
    SOURCE_WIKIPEDIA.to_string()
}

impl SessionRecord {
    pub fn from_metrics(
        started_at: String,
        ended_at: String,
        duration_s: f64,
        article: &Article,
        metrics: &Metrics,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            started_at,
            ended_at,
            duration_s: duration_s.max(0.0),
            source: SOURCE_WIKIPEDIA.to_string(),
            source_meta: SourceMeta::from(article),
            text_len: article.text.chars().count(),
            typed_len: metrics.total_typed,
            correct_chars: metrics.correct_chars,
            wpm: metrics.wpm,
            accuracy: metrics.accuracy,
        }
    }

    pub fn error_rate(&self) -> f64 {
        (1.0 - self.accuracy).max(0.0)
    }

    /// Timestamp used for ordering and display: end time, else start time.
    pub fn sort_key(&self) -> &str {
        if self.ended_at.is_empty() {
            &self.started_at
        } else {
            &self.ended_at
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::metrics::compute_metrics;

    #[test]
    fn test_from_metrics_copies_article_meta() {
        let article = Article::new("Ferris", "https://en.wikipedia.org/wiki/Crab", "crab text");
        let metrics = compute_metrics(&article.text, "crab tex", 10.0);
        let record = SessionRecord::from_metrics(
            "2024-01-01T00:00:00+00:00".into(),
            "2024-01-01T00:00:10+00:00".into(),
            10.0,
            &article,
            &metrics,
        );
        assert_eq!(record.source, "wikipedia");
        assert_eq!(record.source_meta.title, "Ferris");
        assert_eq!(record.source_meta.extract_len, 9);
        assert_eq!(record.text_len, 9);
        assert_eq!(record.typed_len, 8);
        assert_eq!(record.correct_chars, 8);
        assert!(record.correct_chars <= record.typed_len.min(record.text_len));
        assert!(uuid::Uuid::parse_str(&record.id).is_ok());
    }

    #[test]
    fn test_field_names_match_stored_documents() {
        let json = r#"{
            "id": "abc",
            "started_at": "2024-01-01T10:00:00",
            "ended_at": "2024-01-01T10:01:00",
            "duration_s": 60.0,
            "source": "wikipedia",
            "source_meta": {"title": "T", "url": "https://u", "extract_len": 700},
            "text_len": 700,
            "typed_len": 650,
            "correct_chars": 640,
            "wpm": 25.6,
            "accuracy": 0.98
        }"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.started_at, "2024-01-01T10:00:00");
        assert_eq!(record.source_meta.extract_len, 700);

        let value = serde_json::to_value(&record).unwrap();
        for key in [
            "id",
            "started_at",
            "ended_at",
            "duration_s",
            "source",
            "source_meta",
            "text_len",
            "typed_len",
            "correct_chars",
            "wpm",
            "accuracy",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_sort_key_falls_back_to_start() {
        let json = r#"{"id": "x", "started_at": "2024-02-01", "ended_at": ""}"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.sort_key(), "2024-02-01");
        assert_eq!(record.error_rate(), 1.0);
    }
}
