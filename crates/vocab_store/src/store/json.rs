use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use tempfile::NamedTempFile;

use crate::store::{HistoryStore, HISTORY_LIMIT};

/// History persisted as a JSON array of strings in a single file
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
    limit: usize,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            limit: HISTORY_LIMIT,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `words` to a sibling temp file and renames it over the target
    fn persist(&self, words: &[String]) -> anyhow::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create history directory {}", dir.display()))?;

        let data = serde_json::to_vec(words).context("Failed to serialize history")?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(&data)
            .and_then(|_| tmp.as_file().sync_all())
            .context("Failed to write history temp file")?;
        tmp.persist(&self.path)
            .inspect_err(|e| tracing::error!(error = ?e.error, path = ?self.path, "Failed to replace history file"))
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to persist history to {}", self.path.display()))?;

        Ok(())
    }
}

impl HistoryStore for JsonHistoryStore {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> anyhow::Result<Vec<String>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No history file yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read history {}", self.path.display()))
            }
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice::<Vec<String>>(&data)
            .with_context(|| format!("History {} is not a JSON string array", self.path.display()))
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn append(&self, word: &str) -> anyhow::Result<Vec<String>> {
        let mut words = self.load()?;
        words.push(word.to_string());

        if words.len() > self.limit {
            let excess = words.len() - self.limit;
            words.drain(..excess);
        }

        self.persist(&words)?;
        tracing::info!(count = words.len(), "History updated");

        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> JsonHistoryStore {
        JsonHistoryStore::new(dir.path().join("posted_vocabs.json"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn empty_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), b"").unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn append_then_load_contains_word() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.append("der Apfel").unwrap();
        store.append("die Birne").unwrap();

        assert_eq!(store.load().unwrap(), vec!["der Apfel", "die Birne"]);
    }

    #[test]
    fn append_keeps_only_the_last_fifty_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for i in 0..73 {
            let written = store.append(&format!("word-{i}")).unwrap();
            assert!(written.len() <= HISTORY_LIMIT);
        }

        let expected = (23..73).map(|i| format!("word-{i}")).collect::<Vec<_>>();
        assert_eq!(store.load().unwrap(), expected);
    }

    #[test]
    fn persisted_file_is_a_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.append("das Haus").unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"["das Haus"]"#);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), b"{not json").unwrap();

        assert!(store.load().is_err());
        assert!(store.append("der Hund").is_err());
    }

    #[test]
    fn creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("state").join("history.json"));

        store.append("die Katze").unwrap();

        assert_eq!(store.load().unwrap(), vec!["die Katze"]);
    }
}
