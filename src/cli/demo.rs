//! Built-in walkthrough of the store's operations

use crate::compaction::CompactOptions;
use crate::core::history::VersionHistory;
use crate::error::Result;
use crate::store::VersionedStore;
use std::io::Write;

fn describe(history: Option<&VersionHistory<&str>>) -> String {
    let Some(history) = history else {
        return "(empty)".to_string();
    };
    history
        .iter()
        .map(|version| format!("{}={}", version.timestamp, version.value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replay the reference walkthrough for key `a`, writing each step and the
/// resulting history to `out`. Returns the final store.
pub fn run_demo<W: Write>(mut out: W) -> Result<VersionedStore<&'static str>> {
    let mut store = VersionedStore::new();
    let key = "a";

    for (ts, value) in [
        (1, "apple"),
        (2, "apricot"),
        (5, "avocado"),
        (5, "avocado2"),
        (4, "anchovy"),
    ] {
        store.insert(ts, key, value);
        writeln!(out, "insert {ts} {value:<9} -> {}", describe(store.history(key)))?;
    }

    for ts in [0, 1, 3, 4, 999] {
        let value = store.get(ts, key).copied().unwrap_or("(none)");
        writeln!(out, "get {ts:<3} -> {value}")?;
    }
    writeln!(
        out,
        "latest  -> {}",
        store.latest(key).copied().unwrap_or("(none)")
    )?;

    let range: Vec<String> = store
        .get_range(key, 2, 4)
        .into_iter()
        .map(|(ts, value)| format!("{ts}={value}"))
        .collect();
    writeln!(out, "range [2, 4] -> {}", range.join(" "))?;

    let removed = store.delete_upto(key, 2);
    writeln!(
        out,
        "delete_upto 2 removed {removed} -> {}",
        describe(store.history(key))
    )?;

    let removed = store.compact_with(key, &CompactOptions::new(Some(1), true));
    writeln!(
        out,
        "compact keep_last_n=1 removed {removed} -> {}",
        describe(store.history(key))
    )?;

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_reaches_final_state() {
        let mut out = Vec::new();
        let store = run_demo(&mut out).unwrap();

        let history = store.history("a").unwrap();
        assert_eq!(history.timestamps().len(), 1);
        assert_eq!(history.values(), &["avocado2"]);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("insert 4 anchovy   -> 1=apple 2=apricot 4=anchovy 5=avocado2"));
        assert!(text.contains("range [2, 4] -> 2=apricot 4=anchovy"));
        assert!(text.contains("delete_upto 2 removed 2 -> 4=anchovy 5=avocado2"));
        assert!(text.contains("compact keep_last_n=1 removed 1 -> 5=avocado2"));
    }
}
