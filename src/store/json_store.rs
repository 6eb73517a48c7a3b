use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::session::result::SessionRecord;
use crate::store::schema::StatsDocument;

/// Append-only session log backed by a single pretty-printed JSON file.
///
/// Writes replace the file through a temporary sibling and a rename, but the
/// load-append-save cycle is not coordinated across processes: only one
/// writer at a time is supported.
#[derive(Clone, Debug)]
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.typing-tutor/stats.json`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".typing-tutor")
            .join("stats.json")
    }

    pub fn default_location() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. A missing, unreadable or corrupt file yields an
    /// empty document.
    pub fn load(&self) -> StatsDocument {
        if !self.path.exists() {
            return StatsDocument::default();
        }
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read stats file");
                return StatsDocument::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "stats file is corrupt, starting fresh");
                StatsDocument::default()
            }
        }
    }

    pub fn append_session(&self, record: &SessionRecord) -> Result<()> {
        let mut doc = self.load();
        doc.sessions.push(record.clone());
        self.save(&doc)?;
        tracing::info!(
            id = %record.id,
            total = doc.sessions.len(),
            path = %self.path.display(),
            "session recorded"
        );
        Ok(())
    }

    fn save(&self, doc: &StatsDocument) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let tmp_path = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(doc)?;
        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::result::SourceMeta;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, StatsStore) {
        let dir = TempDir::new().unwrap();
        let store = StatsStore::new(dir.path().join("nested").join("stats.json"));
        (dir, store)
    }

    fn record(id: &str, wpm: f64, accuracy: f64) -> SessionRecord {
        SessionRecord {
            id: id.to_string(),
            started_at: "2024-01-01T10:00:00+00:00".to_string(),
            ended_at: "2024-01-01T10:01:00+00:00".to_string(),
            duration_s: 60.0,
            source: "wikipedia".to_string(),
            source_meta: SourceMeta {
                title: "Rust".to_string(),
                url: "https://en.wikipedia.org/wiki/Rust".to_string(),
                extract_len: 640,
            },
            text_len: 640,
            typed_len: 600,
            correct_chars: 590,
            wpm,
            accuracy,
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let (_dir, store) = make_test_store();
        let doc = store.load();
        assert!(doc.sessions.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_append_creates_directory_and_round_trips() {
        let (_dir, store) = make_test_store();
        let r = record("one", 42.5, 0.97);
        store.append_session(&r).unwrap();

        let doc = store.load();
        assert_eq!(doc.sessions, vec![r]);
    }

    #[test]
    fn test_append_preserves_prior_sessions_in_order() {
        let (_dir, store) = make_test_store();
        for (i, wpm) in [30.0, 40.0, 50.0].into_iter().enumerate() {
            store.append_session(&record(&i.to_string(), wpm, 0.9)).unwrap();
        }
        let ids: Vec<String> = store.load().sessions.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_corrupt_file_loads_empty_and_is_repaired() {
        let (_dir, store) = make_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load().sessions.is_empty());

        store.append_session(&record("fresh", 20.0, 0.8)).unwrap();
        let doc = store.load();
        assert_eq!(doc.sessions.len(), 1);
        assert_eq!(doc.sessions[0].id, "fresh");
    }

    #[test]
    fn test_written_file_is_two_space_indented() {
        let (_dir, store) = make_test_store();
        store.append_session(&record("a", 1.0, 1.0)).unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.starts_with("{\n  \"sessions\": [\n    {"));
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_unknown_top_level_keys_survive_append() {
        let (_dir, store) = make_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"sessions": [], "note": "hand edited"}"#).unwrap();

        store.append_session(&record("a", 1.0, 1.0)).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["note"], "hand edited");
        assert_eq!(raw["sessions"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_document_without_sessions_key() {
        let (_dir, store) = make_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{}").unwrap();
        assert!(store.load().sessions.is_empty());
    }
}
