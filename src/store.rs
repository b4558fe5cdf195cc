use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use crate::service::ServiceError;
use crate::word::{WordEntry, WordPairSet};

/// Name of the slot the fetched word pairs are persisted under.
pub const DEFAULT_CACHE_KEY: &str = "wordPairs";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access cache file at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to serialize word pairs: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("cache storage is unavailable: {0}")]
    Unavailable(String),
}

impl PartialEq for StoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Io { path: left, .. }, Self::Io { path: right, .. }) => left == right,
            (Self::Serialize(_), Self::Serialize(_)) => true,
            (Self::Unavailable(left), Self::Unavailable(right)) => left == right,
            _ => false,
        }
    }
}

impl Eq for StoreError {}

/// A single named storage slot holding a serialized string.
///
/// Each call is expected to be atomic from the caller's point of view.
pub trait CacheSlot {
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&mut self, value: &str) -> Result<(), StoreError>;
    fn erase(&mut self) -> Result<(), StoreError>;
}

/// In-process slot, used by tests and when no browser storage exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySlot {
    value: Option<String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl CacheSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> Result<(), StoreError> {
        self.value = Some(value.to_string());
        Ok(())
    }

    fn erase(&mut self) -> Result<(), StoreError> {
        self.value = None;
        Ok(())
    }
}

/// Slot backed by a JSON file on disk.
///
/// Writes go to a sibling temporary file first and are renamed into place,
/// so a reader never observes a half-written cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl CacheSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(self.io_error(error)),
        }
    }

    fn write(&mut self, value: &str) -> Result<(), StoreError> {
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, value).map_err(|source| self.io_error(source))?;
        fs::rename(&staging, &self.path).map_err(|source| self.io_error(source))
    }

    fn erase(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.io_error(error)),
        }
    }
}

/// Browser `localStorage` slot.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStorageSlot {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageSlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage(&self) -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or_else(|| StoreError::Unavailable("localStorage is not accessible".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(error: wasm_bindgen::JsValue) -> StoreError {
    StoreError::Unavailable(format!("{error:?}"))
}

#[cfg(target_arch = "wasm32")]
impl CacheSlot for LocalStorageSlot {
    fn read(&self) -> Result<Option<String>, StoreError> {
        self.storage()?.get_item(&self.key).map_err(js_error)
    }

    fn write(&mut self, value: &str) -> Result<(), StoreError> {
        self.storage()?.set_item(&self.key, value).map_err(js_error)
    }

    fn erase(&mut self) -> Result<(), StoreError> {
        self.storage()?.remove_item(&self.key).map_err(js_error)
    }
}

/// Local copy of the last fetched word pairs.
///
/// Every successful fetch replaces the whole set; there is no merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPairStore<S> {
    slot: S,
    entries: WordPairSet,
}

impl<S: CacheSlot> WordPairStore<S> {
    /// Opens the store and reads back whatever the slot holds.
    ///
    /// A missing, unreadable or corrupt cache starts the store empty.
    pub fn open(slot: S) -> Self {
        let entries = match slot.read() {
            Ok(Some(raw)) => match serde_json::from_str::<WordPairSet>(&raw) {
                Ok(entries) => entries,
                Err(error) => {
                    log::warn!("ignoring unreadable word pair cache: {error}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                log::warn!("word pair cache could not be read: {error}");
                Vec::new()
            }
        };

        Self { slot, entries }
    }

    pub fn load(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owned copy handed to a quiz so later fetches cannot disturb it.
    pub fn snapshot(&self) -> WordPairSet {
        self.entries.clone()
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Overwrites the cached set and persists it.
    ///
    /// Repeated words keep their first occurrence. If persisting fails the
    /// previous set stays in place.
    pub fn replace_all(&mut self, entries: WordPairSet) -> Result<(), StoreError> {
        let entries = dedupe_words(entries);
        let serialized = serde_json::to_string(&entries)?;
        self.slot.write(&serialized)?;
        self.entries = entries;
        log::info!("cached {} word pairs", self.entries.len());
        Ok(())
    }

    /// Applies the outcome of a fetch-all call.
    ///
    /// Returns `true` when the cache was replaced. Failures are logged and
    /// leave the previous cache untouched.
    pub fn refresh(&mut self, fetched: Result<WordPairSet, ServiceError>) -> bool {
        match fetched {
            Ok(entries) => match self.replace_all(entries) {
                Ok(()) => true,
                Err(error) => {
                    log::error!("failed to persist word pairs: {error}");
                    false
                }
            },
            Err(error) => {
                log::error!("error fetching word pairs: {error}");
                false
            }
        }
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.slot.erase()?;
        self.entries.clear();
        Ok(())
    }
}

fn dedupe_words(entries: WordPairSet) -> WordPairSet {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(entries.len());

    for entry in entries {
        if seen.insert(entry.word.clone()) {
            unique.push(entry);
        } else {
            log::warn!("dropping repeated word '{}' from fetched pairs", entry.word);
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Slot whose writes always fail.
    struct BrokenSlot {
        initial: Option<String>,
    }

    impl CacheSlot for BrokenSlot {
        fn read(&self) -> Result<Option<String>, StoreError> {
            Ok(self.initial.clone())
        }

        fn write(&mut self, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }

        fn erase(&mut self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }
    }

    fn sample_entries() -> Vec<WordEntry> {
        vec![
            WordEntry::new("happy", ["joyful", "glad"]),
            WordEntry::new("calm", ["serene"]),
        ]
    }

    #[test]
    fn empty_slot_loads_nothing() {
        let store = WordPairStore::open(MemorySlot::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn reads_existing_cache_at_open() {
        let slot = MemorySlot::with_value(r#"[{"happy":["joyful","glad"]},{"calm":["serene"]}]"#);
        let store = WordPairStore::open(slot);

        assert_eq!(store.load(), sample_entries().as_slice());
    }

    #[test]
    fn corrupt_cache_starts_empty() {
        let store = WordPairStore::open(MemorySlot::with_value("{not json"));
        assert!(store.is_empty());
    }

    #[test]
    fn replace_all_persists_serialized_set() {
        let mut store = WordPairStore::open(MemorySlot::new());
        store
            .replace_all(sample_entries())
            .expect("memory slot accepts writes");

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.slot().value(),
            Some(r#"[{"happy":["joyful","glad"]},{"calm":["serene"]}]"#)
        );
    }

    #[test]
    fn replace_all_overwrites_instead_of_merging() {
        let mut store = WordPairStore::open(MemorySlot::new());
        store.replace_all(sample_entries()).expect("first write");
        store
            .replace_all(vec![WordEntry::new("sad", ["blue"])])
            .expect("second write");

        assert_eq!(store.load(), [WordEntry::new("sad", ["blue"])].as_slice());
    }

    #[test]
    fn replace_all_drops_repeated_words() {
        let mut store = WordPairStore::open(MemorySlot::new());
        store
            .replace_all(vec![
                WordEntry::new("happy", ["joyful"]),
                WordEntry::new("happy", ["glad"]),
            ])
            .expect("memory slot accepts writes");

        assert_eq!(store.load(), [WordEntry::new("happy", ["joyful"])].as_slice());
    }

    #[test]
    fn failed_write_keeps_previous_entries() {
        let mut store = WordPairStore::open(BrokenSlot {
            initial: Some(r#"[{"calm":["serene"]}]"#.to_string()),
        });

        let error = store
            .replace_all(sample_entries())
            .expect_err("broken slot rejects writes");

        assert_eq!(error, StoreError::Unavailable("quota exceeded".to_string()));
        assert_eq!(store.load(), [WordEntry::new("calm", ["serene"])].as_slice());
    }

    #[test]
    fn failed_clear_keeps_snapshot() {
        let mut store = WordPairStore::open(BrokenSlot {
            initial: Some(r#"[{"calm":["serene"]}]"#.to_string()),
        });
        let mut session = crate::QuizSession::new();

        let error = session.reset(&mut store).expect_err("broken slot rejects erase");

        assert_eq!(error, StoreError::Unavailable("quota exceeded".to_string()));
        assert_eq!(store.snapshot(), vec![WordEntry::new("calm", ["serene"])]);
    }

    #[test]
    fn failed_fetch_leaves_cache_intact() {
        let mut store = WordPairStore::open(MemorySlot::new());
        store.replace_all(sample_entries()).expect("initial write");

        let replaced = store.refresh(Err(ServiceError::RemoteUnavailable(
            "connection refused".to_string(),
        )));

        assert!(!replaced);
        assert_eq!(store.load(), sample_entries().as_slice());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut store = WordPairStore::open(MemorySlot::new());
        store.replace_all(sample_entries()).expect("initial write");

        store.clear().expect("first clear");
        assert!(store.is_empty());
        assert_eq!(store.slot().value(), None);

        store.clear().expect("second clear");
        assert!(store.is_empty());
        assert_eq!(store.slot().value(), None);
    }

    #[test]
    fn file_slot_round_trips_through_disk() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        let path = root.path().join("word_pairs.json");

        let mut store = WordPairStore::open(FileSlot::new(&path));
        store.replace_all(sample_entries()).expect("file write");
        assert!(!path.with_extension("tmp").exists());

        let reopened = WordPairStore::open(FileSlot::new(&path));
        assert_eq!(reopened.load(), sample_entries().as_slice());

        let mut reopened = reopened;
        reopened.clear().expect("file removal");
        assert!(!path.exists());
        reopened.clear().expect("missing file is fine");
    }
}
