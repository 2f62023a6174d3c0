//! Per-key version history
//!
//! A [`VersionHistory`] keeps two index-aligned vectors, timestamps and
//! values, with the timestamps strictly increasing. Every lookup is a binary
//! search over the timestamp vector, so point reads and inserts locate their
//! position in `O(log n)` and range reads cost `O(log n + k)`.

use crate::compaction::CompactOptions;
use crate::core::temporal::Timestamp;
use crate::core::version::Version;
use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize};

/// The ordered versions recorded for a single key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionHistory<V> {
    timestamps: Vec<Timestamp>,
    values: Vec<V>,
}

/// Unvalidated wire shape of a history
#[derive(Deserialize)]
struct RawHistory<V> {
    timestamps: Vec<Timestamp>,
    values: Vec<V>,
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for VersionHistory<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawHistory::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

impl<V> VersionHistory<V> {
    fn from_raw(raw: RawHistory<V>) -> Result<Self, Error> {
        if raw.timestamps.len() != raw.values.len() {
            return Err(Error::Serialization(format!(
                "history has {} timestamps but {} values",
                raw.timestamps.len(),
                raw.values.len()
            )));
        }
        if let Some(pair) = raw.timestamps.windows(2).find(|w| w[0] >= w[1]) {
            return Err(Error::Serialization(format!(
                "history timestamps not strictly increasing at {} -> {}",
                pair[0], pair[1]
            )));
        }
        Ok(Self {
            timestamps: raw.timestamps,
            values: raw.values,
        })
    }
}

impl<V> VersionHistory<V> {
    /// Create an empty history
    pub fn new() -> Self {
        Self {
            timestamps: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Stored timestamps, strictly increasing
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    /// Stored values, aligned with [`timestamps`](Self::timestamps)
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Number of versions
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the history holds no versions
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Oldest stored timestamp (if any)
    pub fn first_timestamp(&self) -> Option<Timestamp> {
        self.timestamps.first().copied()
    }

    /// Newest stored timestamp (if any)
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.timestamps.last().copied()
    }

    /// Iterate versions in ascending timestamp order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Version<&V>> + ExactSizeIterator + '_ {
        self.timestamps
            .iter()
            .zip(self.values.iter())
            .map(|(ts, value)| Version {
                timestamp: *ts,
                value,
            })
    }

    /// Index of the first timestamp `>= ts`
    fn lower_bound(&self, ts: Timestamp) -> usize {
        self.timestamps.partition_point(|t| *t < ts)
    }

    /// Index of the first timestamp `> ts`
    fn upper_bound(&self, ts: Timestamp) -> usize {
        self.timestamps.partition_point(|t| *t <= ts)
    }

    /// Record `value` at `ts`, overwriting any value already stored there.
    ///
    /// Writes at or past the newest timestamp take the append path; older
    /// writes are placed by binary search and shift later entries.
    pub fn insert(&mut self, ts: Timestamp, value: V) {
        match self.last_timestamp() {
            None => {
                self.timestamps.push(ts);
                self.values.push(value);
            }
            Some(last) if ts >= last => {
                if ts == last {
                    if let Some(slot) = self.values.last_mut() {
                        *slot = value;
                    }
                } else {
                    self.timestamps.push(ts);
                    self.values.push(value);
                }
            }
            Some(_) => {
                let pos = self.upper_bound(ts);
                if pos > 0 && self.timestamps[pos - 1] == ts {
                    self.values[pos - 1] = value;
                } else {
                    self.timestamps.insert(pos, ts);
                    self.values.insert(pos, value);
                }
            }
        }
    }

    /// Value effective at `ts`: the one stored at the largest timestamp `<= ts`
    pub fn get(&self, ts: Timestamp) -> Option<&V> {
        let pos = self.upper_bound(ts);
        pos.checked_sub(1).map(|i| &self.values[i])
    }

    /// Value at the newest timestamp
    pub fn latest(&self) -> Option<&V> {
        self.values.last()
    }

    /// Versions with `start <= timestamp <= end`, ascending.
    ///
    /// An inverted interval yields nothing.
    pub fn range(&self, start: Timestamp, end: Timestamp) -> Vec<(Timestamp, &V)> {
        if start > end {
            return Vec::new();
        }
        let left = self.lower_bound(start);
        let right = self.upper_bound(end);
        self.timestamps[left..right]
            .iter()
            .copied()
            .zip(self.values[left..right].iter())
            .collect()
    }

    /// Drop every version with timestamp `<= ts`, returning how many went
    pub fn delete_upto(&mut self, ts: Timestamp) -> usize {
        let cut = self.upper_bound(ts);
        if cut > 0 {
            self.timestamps.drain(..cut);
            self.values.drain(..cut);
        }
        cut
    }

    /// Keep only the newest `n` versions, returning how many were dropped
    pub fn retain_last(&mut self, n: usize) -> usize {
        let excess = self.len().saturating_sub(n);
        if excess > 0 {
            self.timestamps.drain(..excess);
            self.values.drain(..excess);
        }
        excess
    }
}

impl<V: PartialEq> VersionHistory<V> {
    /// Collapse runs of equal adjacent values to their earliest entry.
    ///
    /// Returns the number of versions removed.
    pub fn dedup_values(&mut self) -> usize {
        let before = self.len();
        if before < 2 {
            return 0;
        }

        let timestamps = std::mem::take(&mut self.timestamps);
        let values = std::mem::take(&mut self.values);
        self.timestamps.reserve(before);
        self.values.reserve(before);

        for (ts, value) in timestamps.into_iter().zip(values) {
            if self.values.last() == Some(&value) {
                continue;
            }
            self.timestamps.push(ts);
            self.values.push(value);
        }

        before - self.len()
    }

    /// Apply count retention then adjacent dedup, as selected by `options`.
    ///
    /// Returns the total number of versions removed.
    pub fn compact(&mut self, options: &CompactOptions) -> usize {
        let mut removed = 0;
        if let Some(n) = options.retain_count() {
            removed += self.retain_last(n);
        }
        if options.dedup_same_value {
            removed += self.dedup_values();
        }
        removed
    }
}

impl<V> Default for VersionHistory<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(v: i64) -> Timestamp {
        Timestamp::new(v)
    }

    fn history_of(pairs: &[(i64, &'static str)]) -> VersionHistory<&'static str> {
        let mut history = VersionHistory::new();
        for (t, v) in pairs {
            history.insert(ts(*t), *v);
        }
        history
    }

    fn raw(history: &VersionHistory<&'static str>) -> (Vec<i64>, Vec<&'static str>) {
        (
            history.timestamps().iter().map(|t| t.get()).collect(),
            history.values().to_vec(),
        )
    }

    #[test]
    fn test_append_and_overwrite_tail() {
        let mut history = VersionHistory::new();
        history.insert(ts(1), "apple");
        history.insert(ts(5), "avocado");
        history.insert(ts(5), "avocado2");

        assert_eq!(raw(&history), (vec![1, 5], vec!["apple", "avocado2"]));
    }

    #[test]
    fn test_out_of_order_insert_and_overwrite() {
        let mut history = history_of(&[(1, "a"), (3, "c"), (5, "e")]);
        history.insert(ts(4), "d");
        history.insert(ts(0), "z");
        history.insert(ts(3), "C");

        assert_eq!(
            raw(&history),
            (vec![0, 1, 3, 4, 5], vec!["z", "a", "C", "d", "e"])
        );
    }

    #[test]
    fn test_get_is_floor_lookup() {
        let history = history_of(&[(1, "apple"), (2, "apricot"), (5, "avocado")]);

        assert_eq!(history.get(ts(0)), None);
        assert_eq!(history.get(ts(1)), Some(&"apple"));
        assert_eq!(history.get(ts(3)), Some(&"apricot"));
        assert_eq!(history.get(ts(5)), Some(&"avocado"));
        assert_eq!(history.get(ts(999)), Some(&"avocado"));
        assert_eq!(history.get(Timestamp::MIN), None);
        assert_eq!(history.latest(), Some(&"avocado"));
    }

    #[test]
    fn test_range_is_closed_interval() {
        let history = history_of(&[(1, "apple"), (2, "apricot"), (5, "avocado")]);

        assert_eq!(history.range(ts(2), ts(4)), vec![(ts(2), &"apricot")]);
        assert_eq!(
            history.range(ts(1), ts(5)),
            vec![(ts(1), &"apple"), (ts(2), &"apricot"), (ts(5), &"avocado")]
        );
        assert!(history.range(ts(4), ts(2)).is_empty());
        assert!(history.range(ts(6), ts(9)).is_empty());
        assert_eq!(history.range(ts(5), ts(5)), vec![(ts(5), &"avocado")]);
    }

    #[test]
    fn test_delete_upto_removes_prefix() {
        let mut history = history_of(&[(4, "anchovy"), (5, "avocado2")]);

        assert_eq!(history.delete_upto(ts(2)), 0);
        assert_eq!(history.len(), 2);

        assert_eq!(history.delete_upto(ts(4)), 1);
        assert_eq!(raw(&history), (vec![5], vec!["avocado2"]));

        assert_eq!(history.delete_upto(Timestamp::MAX), 1);
        assert!(history.is_empty());
        assert_eq!(history.delete_upto(ts(10)), 0);
    }

    #[test]
    fn test_retain_last() {
        let mut history = history_of(&[(1, "a"), (2, "b"), (3, "c")]);

        assert_eq!(history.retain_last(5), 0);
        assert_eq!(history.retain_last(2), 1);
        assert_eq!(raw(&history), (vec![2, 3], vec!["b", "c"]));
        assert_eq!(history.retain_last(0), 2);
        assert!(history.is_empty());
    }

    #[test]
    fn test_dedup_keeps_first_of_each_run() {
        let mut history = history_of(&[(1, "x"), (2, "x"), (3, "y"), (4, "y"), (5, "y")]);

        assert_eq!(history.dedup_values(), 3);
        assert_eq!(raw(&history), (vec![1, 3], vec!["x", "y"]));
    }

    #[test]
    fn test_dedup_only_collapses_adjacent_values() {
        let mut history = history_of(&[(1, "x"), (2, "y"), (3, "x")]);

        assert_eq!(history.dedup_values(), 0);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_compact_trims_before_dedup() {
        let mut history = history_of(&[(1, "x"), (2, "y"), (3, "y"), (4, "z")]);
        let removed = history.compact(&CompactOptions::new(Some(3), true));

        assert_eq!(removed, 2);
        assert_eq!(raw(&history), (vec![2, 4], vec!["y", "z"]));
    }

    #[test]
    fn test_iter_yields_versions() {
        let history = history_of(&[(2, "b"), (1, "a")]);
        let versions: Vec<_> = history.iter().collect();

        assert_eq!(versions, vec![Version::new(1, &"a"), Version::new(2, &"b")]);
        assert_eq!(history.first_timestamp(), Some(ts(1)));
        assert_eq!(history.last_timestamp(), Some(ts(2)));
    }

    #[test]
    fn test_deserialize_validates_ordering() {
        let ok: VersionHistory<String> =
            serde_json::from_str(r#"{"timestamps":[1,4],"values":["a","b"]}"#).unwrap();
        assert_eq!(ok.len(), 2);

        let unsorted = serde_json::from_str::<VersionHistory<String>>(
            r#"{"timestamps":[4,1],"values":["a","b"]}"#,
        );
        assert!(unsorted.is_err());

        let mismatched = serde_json::from_str::<VersionHistory<String>>(
            r#"{"timestamps":[1],"values":["a","b"]}"#,
        );
        assert!(mismatched.is_err());
    }
}
