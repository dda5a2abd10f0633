use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::notice::Notice;

/// Upper bound on kept entries.
pub const MAX_SAVED: usize = 5;
/// Name the collection is stored under.
pub const STORAGE_KEY: &str = "savedRoasts";

pub const SAVED: &str = "Roast saved!";
pub const DELETED: &str = "Roast deleted!";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedEntry {
    pub id: String,
    pub content: String,
    pub response: String,
    /// Unix milliseconds.
    pub timestamp: i64,
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Backing storage for the saved collection. Both directions move the whole
/// collection; there are no partial writes.
pub trait HistoryRepository {
    /// Returns an empty collection when nothing has been stored yet.
    fn load(&self) -> Result<Vec<SavedEntry>, HistoryError>;
    fn store(&mut self, entries: &[SavedEntry]) -> Result<(), HistoryError>;
}

/// Keeps the serialized collection in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    raw: Option<String>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw<S: Into<String>>(raw: S) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl HistoryRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<SavedEntry>, HistoryError> {
        match &self.raw {
            Some(s) => Ok(serde_json::from_str(s)?),
            None => Ok(Vec::new()),
        }
    }

    fn store(&mut self, entries: &[SavedEntry]) -> Result<(), HistoryError> {
        self.raw = Some(serde_json::to_string(entries)?);
        Ok(())
    }
}

/// Most-recent-first list of saved exchanges, mirrored to a repository.
pub struct SavedHistory<R: HistoryRepository> {
    repo: R,
    entries: Vec<SavedEntry>,
    last_id: i64,
}

impl<R: HistoryRepository> SavedHistory<R> {
    pub fn initialize(repo: R) -> Self {
        let entries = match repo.load() {
            Ok(mut v) => {
                v.truncate(MAX_SAVED);
                v
            }
            Err(e) => {
                warn!(target: "roast_core::history", "discarding unreadable saved roasts: {}", e);
                Vec::new()
            }
        };
        let last_id = entries
            .iter()
            .filter_map(|e| e.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        debug!(target: "roast_core::history", "loaded {} saved roasts", entries.len());
        Self {
            repo,
            entries,
            last_id,
        }
    }

    pub fn entries(&self) -> &[SavedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SavedEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Returns `Ok(None)` without touching anything when either side is empty.
    pub fn save(&mut self, content: &str, response: &str) -> Result<Option<Notice>, HistoryError> {
        self.save_at(content, response, chrono::Utc::now().timestamp_millis())
    }

    fn save_at(
        &mut self,
        content: &str,
        response: &str,
        now: i64,
    ) -> Result<Option<Notice>, HistoryError> {
        if content.is_empty() || response.is_empty() {
            return Ok(None);
        }
        // ids stay unique when two saves land on the same millisecond
        let id = match self.last_id.checked_add(1) {
            Some(next) => now.max(next),
            None => now,
        };
        let entry = SavedEntry {
            id: id.to_string(),
            content: content.to_string(),
            response: response.to_string(),
            timestamp: now,
        };
        let mut next = Vec::with_capacity(MAX_SAVED);
        next.push(entry);
        next.extend(self.entries.iter().take(MAX_SAVED - 1).cloned());
        self.commit(next)?;
        self.last_id = id;
        info!(target: "roast_core::history", "saved roast id={} total={}", id, self.entries.len());
        Ok(Some(Notice::success(SAVED)))
    }

    pub fn delete(&mut self, id: &str) -> Result<Notice, HistoryError> {
        let next: Vec<SavedEntry> = self
            .entries
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();
        self.commit(next)?;
        info!(target: "roast_core::history", "deleted roast id={} total={}", id, self.entries.len());
        Ok(Notice::success(DELETED))
    }

    fn commit(&mut self, next: Vec<SavedEntry>) -> Result<(), HistoryError> {
        self.repo.store(&next)?;
        self.entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenRepository;

    impl HistoryRepository for BrokenRepository {
        fn load(&self) -> Result<Vec<SavedEntry>, HistoryError> {
            Ok(Vec::new())
        }
        fn store(&mut self, _entries: &[SavedEntry]) -> Result<(), HistoryError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    fn contents<R: HistoryRepository>(h: &SavedHistory<R>) -> Vec<&str> {
        h.entries().iter().map(|e| e.content.as_str()).collect()
    }

    #[test]
    fn keeps_five_newest_first() {
        let mut h = SavedHistory::initialize(MemoryRepository::new());
        for (i, name) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            let n = h.save_at(name, "{}", 1_000 + i as i64).unwrap();
            assert_eq!(n, Some(Notice::success(SAVED)));
        }
        assert_eq!(contents(&h), vec!["F", "E", "D", "C", "B"]);
    }

    #[test]
    fn sixth_save_evicts_oldest() {
        let mut h = SavedHistory::initialize(MemoryRepository::new());
        for i in 0..5 {
            h.save(&format!("entry {i}"), "{}").unwrap();
        }
        let oldest = h.entries()[4].id.clone();
        h.save("newest", "{}").unwrap();
        assert_eq!(h.len(), MAX_SAVED);
        assert_eq!(h.entries()[0].content, "newest");
        assert!(h.get(&oldest).is_none());
    }

    #[test]
    fn same_millisecond_ids_are_unique() {
        let mut h = SavedHistory::initialize(MemoryRepository::new());
        h.save_at("a", "{}", 42).unwrap();
        h.save_at("b", "{}", 42).unwrap();
        h.save_at("c", "{}", 41).unwrap();
        let ids: Vec<&str> = h.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["44", "43", "42"]);
        // timestamps record the clock as-is
        assert_eq!(h.entries()[2].timestamp, 42);
        assert_eq!(h.entries()[0].timestamp, 41);
    }

    #[test]
    fn order_follows_insertion_not_clock() {
        let mut h = SavedHistory::initialize(MemoryRepository::new());
        h.save_at("later clock", "{}", 5_000).unwrap();
        h.save_at("earlier clock", "{}", 1_000).unwrap();
        assert_eq!(contents(&h), vec!["earlier clock", "later clock"]);
    }

    #[test]
    fn empty_arguments_are_ignored() {
        let mut h = SavedHistory::initialize(MemoryRepository::new());
        assert_eq!(h.save("", "{}").unwrap(), None);
        assert_eq!(h.save("hi", "").unwrap(), None);
        assert!(h.is_empty());
        assert_eq!(h.repository().raw(), None);
    }

    #[test]
    fn delete_unknown_id_changes_nothing() {
        let mut h = SavedHistory::initialize(MemoryRepository::new());
        h.save_at("a", "{}", 1).unwrap();
        h.save_at("b", "{}", 2).unwrap();
        let before = h.entries().to_vec();
        let n = h.delete("nope").unwrap();
        assert_eq!(n, Notice::success(DELETED));
        assert_eq!(h.entries(), before.as_slice());
    }

    #[test]
    fn delete_removes_and_persists() {
        let mut h = SavedHistory::initialize(MemoryRepository::new());
        h.save_at("a", "{}", 1).unwrap();
        h.save_at("b", "{}", 2).unwrap();
        h.delete("1").unwrap();
        assert_eq!(contents(&h), vec!["b"]);

        let reloaded = SavedHistory::initialize(h.into_repository());
        assert_eq!(contents(&reloaded), vec!["b"]);
    }

    #[test]
    fn reload_round_trips_every_field() {
        let mut h = SavedHistory::initialize(MemoryRepository::new());
        h.save_at("one", "{\n  \"roasts\": []\n}", 1_700_000_000_000).unwrap();
        h.save_at("two", "Error occurred while fetching response", 1_700_000_000_500)
            .unwrap();
        h.save_at("three", "{}", 1_700_000_001_000).unwrap();
        let before = h.entries().to_vec();

        let reloaded = SavedHistory::initialize(h.into_repository());
        assert_eq!(reloaded.entries(), before.as_slice());
    }

    #[test]
    fn reads_collection_written_by_browser_build() {
        let raw = r#"[{"id":"1717000000000","content":"my code","response":"{\n  \"roasts\": [\n    \"x\"\n  ]\n}","timestamp":1717000000000}]"#;
        let mut h = SavedHistory::initialize(MemoryRepository::with_raw(raw));
        assert_eq!(h.len(), 1);
        assert_eq!(h.entries()[0].content, "my code");
        h.save_at("new", "{}", 1_000).unwrap();
        // a clock behind the stored id still produces a fresh id
        assert_eq!(h.entries()[0].id, "1717000000001");
    }

    #[test]
    fn largest_stored_id_does_not_overflow() {
        let raw = r#"[{"id":"9223372036854775807","content":"a","response":"{}","timestamp":1}]"#;
        let mut h = SavedHistory::initialize(MemoryRepository::with_raw(raw));
        h.save_at("b", "{}", 1_700_000_000_000).unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h.entries()[0].id, "1700000000000");
        assert_eq!(h.entries()[1].id, "9223372036854775807");
        h.save_at("c", "{}", 1_700_000_000_000).unwrap();
        assert_eq!(h.entries()[0].id, "1700000000001");
    }

    #[test]
    fn malformed_storage_loads_empty() {
        let h = SavedHistory::initialize(MemoryRepository::with_raw("{not json"));
        assert!(h.is_empty());
        let h = SavedHistory::initialize(MemoryRepository::with_raw(r#"{"id":"1"}"#));
        assert!(h.is_empty());
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let mut h = SavedHistory::initialize(BrokenRepository);
        assert!(h.save("a", "{}").is_err());
        assert!(h.is_empty());
    }
}
