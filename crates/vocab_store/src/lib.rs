//! # Vocabulary History Store
//!
//! Keeps a bounded, oldest-first-evicted list of the words already
//! published so the vocabulary source can be told to avoid them.
//!
//! The list is persisted as a JSON array of strings. Writes go through a
//! temporary file in the same directory followed by a rename, so a crash
//! mid-write leaves the previous list intact.

mod store;

pub use store::json::JsonHistoryStore;
pub use store::{HistoryStore, HISTORY_LIMIT};
