//! Compaction settings

use serde::{Deserialize, Serialize};

/// Which reduction passes a compaction applies.
///
/// Count retention runs first, then adjacent-value dedup runs over whatever
/// remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactOptions {
    /// Keep only this many of the newest versions. Negative values disable
    /// the pass; zero empties the history.
    pub keep_last_n: Option<i64>,
    /// Drop versions whose value equals the previous retained value
    pub dedup_same_value: bool,
}

impl CompactOptions {
    /// Create options from both passes' settings
    pub fn new(keep_last_n: Option<i64>, dedup_same_value: bool) -> Self {
        Self {
            keep_last_n,
            dedup_same_value,
        }
    }

    /// Count retention only, no dedup
    pub fn keep_last(n: i64) -> Self {
        Self::new(Some(n), false)
    }

    /// Number of versions the retention pass keeps, if it is active
    pub fn retain_count(&self) -> Option<usize> {
        self.keep_last_n.and_then(|n| usize::try_from(n).ok())
    }
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            keep_last_n: None,
            dedup_same_value: true,
        }
    }
}
