//! The versioned key-value store

use crate::compaction::CompactOptions;
use crate::core::history::VersionHistory;
use crate::core::temporal::Timestamp;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use tracing::{debug, trace};

/// In-memory store keeping a timestamp-ordered history per key.
///
/// Writes take `&mut self` and reads take `&self`; no operation fails. A key
/// whose history becomes empty is removed, so an emptied key and a key that
/// was never written behave identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedStore<V> {
    histories: HashMap<String, VersionHistory<V>>,
}

impl<V> VersionedStore<V> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            histories: HashMap::new(),
        }
    }

    /// Record `value` for `key` at `timestamp`, overwriting any value
    /// already stored at exactly that timestamp.
    pub fn insert(&mut self, timestamp: impl Into<Timestamp>, key: &str, value: V) {
        let timestamp = timestamp.into();
        trace!(key, %timestamp, "insert");

        match self.histories.get_mut(key) {
            Some(history) => history.insert(timestamp, value),
            None => {
                let mut history = VersionHistory::new();
                history.insert(timestamp, value);
                self.histories.insert(key.to_owned(), history);
            }
        }
    }

    /// Insert a batch of `(timestamp, key, value)` entries.
    ///
    /// The final state is the same as calling [`insert`](Self::insert) for
    /// each entry in order. Entries are grouped per key and stably sorted by
    /// timestamp first, so most writes land on the append path; when a key
    /// and timestamp repeat, the entry that came later in the input wins.
    pub fn insert_many<I, T, K>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (T, K, V)>,
        T: Into<Timestamp>,
        K: Into<String>,
    {
        let mut groups: HashMap<String, Vec<(Timestamp, V)>> = HashMap::new();
        let mut total = 0usize;
        for (timestamp, key, value) in entries {
            groups
                .entry(key.into())
                .or_default()
                .push((timestamp.into(), value));
            total += 1;
        }

        let key_count = groups.len();
        for (key, mut items) in groups {
            items.sort_by_key(|(timestamp, _)| *timestamp);
            let history = self.histories.entry(key).or_default();
            for (timestamp, value) in items {
                history.insert(timestamp, value);
            }
        }

        debug!(entries = total, keys = key_count, "applied batch insert");
    }

    /// Value of `key` as of `timestamp`: the one recorded at the largest
    /// timestamp not after it.
    pub fn get(&self, timestamp: impl Into<Timestamp>, key: &str) -> Option<&V> {
        self.histories.get(key)?.get(timestamp.into())
    }

    /// Most recent value of `key`
    pub fn latest(&self, key: &str) -> Option<&V> {
        self.histories.get(key)?.latest()
    }

    /// All versions of `key` with `start <= timestamp <= end`, ascending.
    ///
    /// Returns an empty vector for an unknown key or when `start > end`.
    pub fn get_range(
        &self,
        key: &str,
        start: impl Into<Timestamp>,
        end: impl Into<Timestamp>,
    ) -> Vec<(Timestamp, &V)> {
        match self.histories.get(key) {
            Some(history) => history.range(start.into(), end.into()),
            None => Vec::new(),
        }
    }

    /// Remove every version of `key` at or before `timestamp`.
    ///
    /// Returns the number of versions removed.
    pub fn delete_upto(&mut self, key: &str, timestamp: impl Into<Timestamp>) -> usize {
        let timestamp = timestamp.into();
        let Some(history) = self.histories.get_mut(key) else {
            return 0;
        };

        let removed = history.delete_upto(timestamp);
        if history.is_empty() {
            self.histories.remove(key);
        }
        if removed > 0 {
            debug!(key, %timestamp, removed, "deleted versions");
        }
        removed
    }

    /// Borrow the full history of `key`
    pub fn history(&self, key: &str) -> Option<&VersionHistory<V>> {
        self.histories.get(key)
    }

    /// Number of versions stored for `key`
    pub fn version_count(&self, key: &str) -> usize {
        self.histories.get(key).map_or(0, VersionHistory::len)
    }

    /// Check if `key` has at least one version
    pub fn contains_key(&self, key: &str) -> bool {
        self.histories.contains_key(key)
    }

    /// Keys with at least one version, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.histories.keys().map(String::as_str)
    }

    /// Number of keys with at least one version
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    /// Check if the store holds no versions at all
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    /// Number of versions across every key
    pub fn total_versions(&self) -> usize {
        self.histories.values().map(VersionHistory::len).sum()
    }
}

impl<V: PartialEq> VersionedStore<V> {
    /// Compact the history of `key`.
    ///
    /// When `keep_last_n` is `Some(n)` with `n >= 0`, only the newest `n`
    /// versions survive; negative counts are ignored. With
    /// `dedup_same_value`, consecutive versions carrying equal values are
    /// then collapsed to the earliest of each run.
    pub fn compact(&mut self, key: &str, keep_last_n: Option<i64>, dedup_same_value: bool) {
        self.compact_with(key, &CompactOptions::new(keep_last_n, dedup_same_value));
    }

    /// Compact the history of `key` with `options`, returning how many
    /// versions were removed
    pub fn compact_with(&mut self, key: &str, options: &CompactOptions) -> usize {
        let Some(history) = self.histories.get_mut(key) else {
            return 0;
        };

        let removed = history.compact(options);
        if history.is_empty() {
            self.histories.remove(key);
        }
        if removed > 0 {
            debug!(key, removed, ?options, "compacted history");
        }
        removed
    }

    /// Compact every key with `options`, returning the total removed
    pub fn compact_all(&mut self, options: &CompactOptions) -> usize {
        let mut removed = 0;
        self.histories.retain(|_, history| {
            removed += history.compact(options);
            !history.is_empty()
        });
        debug!(removed, keys = self.histories.len(), "compacted store");
        removed
    }
}

impl<V> Default for VersionedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for VersionedStore<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.histories.serialize(serializer)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for VersionedStore<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut histories = HashMap::<String, VersionHistory<V>>::deserialize(deserializer)?;
        histories.retain(|_, history| !history.is_empty());
        Ok(Self { histories })
    }
}
