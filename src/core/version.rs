//! A single recorded version of a key

use crate::core::temporal::Timestamp;
use serde::{Deserialize, Serialize};

/// A value together with the timestamp from which it is effective
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version<V> {
    /// When the value became effective
    pub timestamp: Timestamp,
    /// The recorded value
    pub value: V,
}

impl<V> Version<V> {
    /// Create a new version
    pub fn new(timestamp: impl Into<Timestamp>, value: V) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}
