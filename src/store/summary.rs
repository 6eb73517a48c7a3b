use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::session::result::SessionRecord;
use crate::store::schema::StatsDocument;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsSummary {
    pub total: usize,
    pub avg_wpm: f64,
    pub avg_accuracy: f64,
    pub best_wpm: f64,
    pub total_practice_secs: f64,
}

impl StatsSummary {
    pub fn from_sessions(sessions: &[SessionRecord]) -> Self {
        let total = sessions.len();
        if total == 0 {
            return Self::default();
        }
        let n = total as f64;
        Self {
            total,
            avg_wpm: sessions.iter().map(|s| s.wpm).sum::<f64>() / n,
            avg_accuracy: sessions.iter().map(|s| s.accuracy).sum::<f64>() / n,
            best_wpm: sessions.iter().map(|s| s.wpm).fold(0.0, f64::max),
            total_practice_secs: sessions.iter().map(|s| s.duration_s.max(0.0)).sum(),
        }
    }
}

/// One line of the history table.
#[derive(Clone, Debug, PartialEq)]
pub struct StatsRow {
    pub when: String,
    pub title: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub error_rate: f64,
}

/// Most recent first by end time (start time when the end is missing).
/// Equal keys keep their stored order.
pub fn sorted_recent_first(sessions: &[SessionRecord]) -> Vec<&SessionRecord> {
    let mut sorted: Vec<&SessionRecord> = sessions.iter().collect();
    sorted.sort_by(|a, b| b.sort_key().cmp(a.sort_key()));
    sorted
}

pub fn stats_rows(doc: &StatsDocument, now: DateTime<Utc>) -> Vec<StatsRow> {
    sorted_recent_first(&doc.sessions)
        .into_iter()
        .map(|s| StatsRow {
            when: humanize_timestamp(s.sort_key(), now),
            title: s.source_meta.title.clone(),
            wpm: s.wpm,
            accuracy: s.accuracy,
            error_rate: s.error_rate(),
        })
        .collect()
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(ts, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// "just now", "3 minutes ago", "1 year ago", ...
///
/// Months are 30 days and years 365 days. Future timestamps read as
/// "just now".
pub fn humanize_timestamp(ts: &str, now: DateTime<Utc>) -> String {
    if ts.is_empty() {
        return "Unknown time".to_string();
    }
    let Some(parsed) = parse_timestamp(ts) else {
        return ts.to_string();
    };

    let secs = (now - parsed).num_seconds().max(0);
    match secs {
        s if s < MINUTE => "just now".to_string(),
        s if s < HOUR => plural(s / MINUTE, "minute"),
        s if s < DAY => plural(s / HOUR, "hour"),
        s if s < MONTH => plural(s / DAY, "day"),
        s if s < YEAR => plural(s / MONTH, "month"),
        s => plural(s / YEAR, "year"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::session::result::SourceMeta;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn ago(d: Duration) -> String {
        (now() - d).to_rfc3339()
    }

    fn session(ended_at: &str, wpm: f64, accuracy: f64) -> SessionRecord {
        SessionRecord {
            id: ended_at.to_string(),
            started_at: String::new(),
            ended_at: ended_at.to_string(),
            duration_s: 30.0,
            source: "wikipedia".to_string(),
            source_meta: SourceMeta::default(),
            text_len: 100,
            typed_len: 100,
            correct_chars: 90,
            wpm,
            accuracy,
        }
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let summary = StatsSummary::from_sessions(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.avg_wpm, 0.0);
        assert_eq!(summary.avg_accuracy, 0.0);
    }

    #[test]
    fn test_summary_averages() {
        let sessions = vec![
            session("2024-01-01", 30.0, 0.9),
            session("2024-01-02", 60.0, 0.8),
            session("2024-01-03", 45.0, 1.0),
        ];
        let summary = StatsSummary::from_sessions(&sessions);
        assert_eq!(summary.total, 3);
        assert!((summary.avg_wpm - 45.0).abs() < 1e-9);
        assert!((summary.avg_accuracy - 0.9).abs() < 1e-9);
        assert_eq!(summary.best_wpm, 60.0);
        assert_eq!(summary.total_practice_secs, 90.0);
    }

    #[test]
    fn test_sorted_most_recent_first() {
        let sessions = vec![
            session("2024-01-01", 1.0, 1.0),
            session("2024-03-01", 2.0, 1.0),
            session("2024-02-01", 3.0, 1.0),
        ];
        let order: Vec<&str> = sorted_recent_first(&sessions)
            .iter()
            .map(|s| s.ended_at.as_str())
            .collect();
        assert_eq!(order, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
    }

    #[test]
    fn test_sort_uses_start_when_end_missing_and_is_stable() {
        let mut no_end = session("", 1.0, 1.0);
        no_end.id = "no-end".to_string();
        no_end.started_at = "2024-02-15".to_string();
        let mut tie_a = session("2024-01-01", 1.0, 1.0);
        tie_a.id = "tie-a".to_string();
        let mut tie_b = session("2024-01-01", 1.0, 1.0);
        tie_b.id = "tie-b".to_string();

        let sessions = vec![tie_a, no_end, tie_b];
        let ids: Vec<&str> = sorted_recent_first(&sessions)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["no-end", "tie-a", "tie-b"]);
    }

    #[test]
    fn test_humanize_thresholds() {
        let cases = [
            (Duration::seconds(30), "just now"),
            (Duration::seconds(59), "just now"),
            (Duration::seconds(60), "1 minute ago"),
            (Duration::minutes(5), "5 minutes ago"),
            (Duration::hours(1), "1 hour ago"),
            (Duration::hours(2), "2 hours ago"),
            (Duration::days(1), "1 day ago"),
            (Duration::days(29), "29 days ago"),
            (Duration::days(30), "1 month ago"),
            (Duration::days(364), "12 months ago"),
            (Duration::days(365), "1 year ago"),
            (Duration::days(400), "1 year ago"),
            (Duration::days(800), "2 years ago"),
        ];
        for (delta, expected) in cases {
            assert_eq!(humanize_timestamp(&ago(delta), now()), expected, "{delta:?}");
        }
    }

    #[test]
    fn test_humanize_naive_timestamp_is_utc() {
        assert_eq!(humanize_timestamp("2025-06-15T10:00:00.123456", now()), "2 hours ago");
        assert_eq!(humanize_timestamp("2025-06-15T10:00:00", now()), "2 hours ago");
    }

    #[test]
    fn test_humanize_future_is_just_now() {
        assert_eq!(humanize_timestamp(&ago(Duration::hours(-3)), now()), "just now");
    }

    #[test]
    fn test_humanize_empty_and_garbage() {
        assert_eq!(humanize_timestamp("", now()), "Unknown time");
        assert_eq!(humanize_timestamp("yesterday-ish", now()), "yesterday-ish");
    }

    #[test]
    fn test_rows_carry_error_rate() {
        let doc = StatsDocument {
            sessions: vec![
                session(&ago(Duration::days(2)), 40.0, 0.75),
                session(&ago(Duration::minutes(3)), 50.0, 1.0),
            ],
            ..StatsDocument::default()
        };
        let rows = stats_rows(&doc, now());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].when, "3 minutes ago");
        assert_eq!(rows[0].error_rate, 0.0);
        assert_eq!(rows[1].when, "2 days ago");
        assert!((rows[1].error_rate - 0.25).abs() < 1e-9);
    }
}
