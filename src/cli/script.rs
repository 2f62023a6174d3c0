//! JSON Lines command scripts
//!
//! Each non-blank line is one JSON object tagged by `"op"`:
//!
//! ```text
//! {"op": "insert", "ts": 1, "key": "a", "value": "apple"}
//! {"op": "insert_many", "entries": [[2, "a", "apricot"], [1, "b", 10]]}
//! {"op": "get", "ts": 3, "key": "a"}
//! {"op": "latest", "key": "a"}
//! {"op": "range", "key": "a", "start": 1, "end": 4}
//! {"op": "delete_upto", "key": "a", "ts": 1}
//! {"op": "compact", "key": "a", "keep_last_n": 1}
//! {"op": "dump"}
//! ```
//!
//! Reads and maintenance commands write one JSON result line; inserts write
//! nothing. Lines starting with `#` are comments.

use crate::compaction::CompactOptions;
use crate::core::temporal::Timestamp;
use crate::error::{Error, Result};
use crate::store::VersionedStore;
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// One script command
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Insert {
        /// Defaults to the current wall-clock time
        ts: Option<Timestamp>,
        key: String,
        value: Value,
    },
    InsertMany {
        entries: Vec<(Timestamp, String, Value)>,
    },
    Get {
        ts: Timestamp,
        key: String,
    },
    Latest {
        key: String,
    },
    Range {
        key: String,
        start: Timestamp,
        end: Timestamp,
    },
    DeleteUpto {
        key: String,
        ts: Timestamp,
    },
    Compact {
        key: String,
        keep_last_n: Option<i64>,
        dedup_same_value: Option<bool>,
    },
    Dump {
        key: Option<String>,
    },
}

/// Totals reported after a script finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub commands: usize,
    pub outputs: usize,
}

/// Executes commands against a store of JSON values
#[derive(Debug, Default)]
pub struct ScriptRunner {
    store: VersionedStore<Value>,
    defaults: CompactOptions,
}

impl ScriptRunner {
    /// Create a runner; `defaults` fills in omitted `compact` fields
    pub fn new(defaults: CompactOptions) -> Self {
        Self {
            store: VersionedStore::new(),
            defaults,
        }
    }

    /// The store commands have been applied to
    pub fn store(&self) -> &VersionedStore<Value> {
        &self.store
    }

    /// Parse one script line; `None` for blanks and comments
    pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Command>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|e| Error::Script {
                line: line_no,
                message: e.to_string(),
            })
    }

    /// Apply a command, returning its result line if it produces one
    pub fn execute(&mut self, command: Command) -> Option<Value> {
        match command {
            Command::Insert { ts, key, value } => {
                let ts = ts.unwrap_or_else(Timestamp::now);
                self.store.insert(ts, &key, value);
                None
            }
            Command::InsertMany { entries } => {
                self.store.insert_many(entries);
                None
            }
            Command::Get { ts, key } => {
                let value = self.store.get(ts, &key);
                Some(json!({ "op": "get", "key": key, "ts": ts, "value": value }))
            }
            Command::Latest { key } => {
                let value = self.store.latest(&key);
                Some(json!({ "op": "latest", "key": key, "value": value }))
            }
            Command::Range { key, start, end } => {
                let versions: Vec<Value> = self
                    .store
                    .get_range(&key, start, end)
                    .into_iter()
                    .map(|(timestamp, value)| json!({ "timestamp": timestamp, "value": value }))
                    .collect();
                Some(json!({ "op": "range", "key": key, "versions": versions }))
            }
            Command::DeleteUpto { key, ts } => {
                let removed = self.store.delete_upto(&key, ts);
                Some(json!({ "op": "delete_upto", "key": key, "removed": removed }))
            }
            Command::Compact {
                key,
                keep_last_n,
                dedup_same_value,
            } => {
                let options = CompactOptions::new(
                    keep_last_n.or(self.defaults.keep_last_n),
                    dedup_same_value.unwrap_or(self.defaults.dedup_same_value),
                );
                let removed = self.store.compact_with(&key, &options);
                Some(json!({ "op": "compact", "key": key, "removed": removed }))
            }
            Command::Dump { key: Some(key) } => {
                let history = self.store.history(&key);
                Some(json!({ "op": "dump", "key": key, "history": history }))
            }
            Command::Dump { key: None } => Some(json!({ "op": "dump", "store": &self.store })),
        }
    }

    /// Run every line of `input`, writing result lines to `out`.
    ///
    /// Stops at the first line that fails to parse.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let Some(command) = Self::parse_line(&line, index + 1)? else {
                continue;
            };
            debug!(line = index + 1, ?command, "executing");

            summary.commands += 1;
            if let Some(output) = self.execute(command) {
                serde_json::to_writer(&mut out, &output)?;
                writeln!(out)?;
                summary.outputs += 1;
            }
        }
        out.flush()?;

        info!(
            commands = summary.commands,
            keys = self.store.len(),
            versions = self.store.total_versions(),
            "script finished"
        );
        Ok(summary)
    }
}
