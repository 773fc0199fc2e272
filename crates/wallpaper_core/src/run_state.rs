use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Items requested per listing page.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// How a collection is queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchMode {
    /// The collection's default feed.
    Browse,
    /// Newest-first search restricted to the collection.
    Search { query: String },
}

impl FetchMode {
    /// Whether a finished collection stays finished in this mode.
    pub fn honors_finished(&self) -> bool {
        matches!(self, FetchMode::Browse)
    }
}

/// Persisted cursor and end-of-feed flag for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectionState {
    #[serde(rename = "id")]
    pub cursor: String,
    #[serde(rename = "isFinish", default)]
    pub finished: bool,
}

/// Summary of one consumed page, enough to advance a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub last_id: Option<String>,
    pub item_count: usize,
    pub limit: usize,
}

impl PageCursor {
    pub fn is_last_page(&self) -> bool {
        self.item_count < self.limit
    }
}

// Older state files stored the bare cursor string per collection.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Current(CollectionState),
    Legacy(String),
}

impl From<StoredEntry> for CollectionState {
    fn from(entry: StoredEntry) -> Self {
        match entry {
            StoredEntry::Current(state) => state,
            StoredEntry::Legacy(cursor) => CollectionState {
                cursor,
                finished: false,
            },
        }
    }
}

/// Per-collection pagination state for a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, StoredEntry>",
    into = "BTreeMap<String, CollectionState>"
)]
pub struct RunState {
    collections: BTreeMap<String, CollectionState>,
}

impl From<BTreeMap<String, StoredEntry>> for RunState {
    fn from(stored: BTreeMap<String, StoredEntry>) -> Self {
        Self {
            collections: stored
                .into_iter()
                .map(|(name, entry)| (name, entry.into()))
                .collect(),
        }
    }
}

impl From<RunState> for BTreeMap<String, CollectionState> {
    fn from(state: RunState) -> Self {
        state.collections
    }
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, collection: &str) -> Option<&CollectionState> {
        self.collections.get(collection)
    }

    /// Pagination token for the next request; empty when never fetched.
    pub fn cursor(&self, collection: &str) -> &str {
        self.collections
            .get(collection)
            .map(|state| state.cursor.as_str())
            .unwrap_or("")
    }

    pub fn is_finished(&self, collection: &str) -> bool {
        self.collections
            .get(collection)
            .is_some_and(|state| state.finished)
    }

    /// Collections that should be fetched this run, in the given order.
    pub fn pending<'a>(&self, collections: &'a [String], mode: &FetchMode) -> Vec<&'a str> {
        collections
            .iter()
            .map(String::as_str)
            .filter(|name| !(mode.honors_finished() && self.is_finished(name)))
            .collect()
    }

    /// Advance a collection past a consumed page.
    ///
    /// The cursor only moves when the page carried an id, so an empty page
    /// never rewinds it. A short page marks the feed as finished.
    pub fn record_page(&mut self, collection: &str, page: &PageCursor) {
        let entry = self.collections.entry(collection.to_string()).or_default();
        if let Some(last_id) = &page.last_id {
            entry.cursor.clone_from(last_id);
        }
        entry.finished = page.is_last_page();
    }

    /// Forget a collection so the next run starts from the head of its feed.
    pub fn reset(&mut self, collection: &str) -> bool {
        self.collections.remove(collection).is_some()
    }

    pub fn clear(&mut self) {
        self.collections.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CollectionState)> {
        self.collections
            .iter()
            .map(|(name, state)| (name.as_str(), state))
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
