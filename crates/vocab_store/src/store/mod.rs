pub mod json;

/// Maximum number of words kept in the history
pub const HISTORY_LIMIT: usize = 50;

/// Single-writer store of previously produced vocabulary words.
pub trait HistoryStore {
    /// Returns the stored words, oldest first.
    /// A store that has never been written yields an empty list.
    fn load(&self) -> anyhow::Result<Vec<String>>;

    /// Appends `word`, evicts the oldest entries beyond the limit and
    /// persists the result. Returns the list as written.
    fn append(&self, word: &str) -> anyhow::Result<Vec<String>>;
}

impl<T: HistoryStore> HistoryStore for &T {
    fn load(&self) -> anyhow::Result<Vec<String>> {
        (**self).load()
    }

    fn append(&self, word: &str) -> anyhow::Result<Vec<String>> {
        (**self).append(word)
    }
}
