//! The common engine contract shared by the B-tree and Linear Hashing
//! indexes (spec.md §6 "Engine contract").

use super::record::Record;

/// Point-access operations offered by both index engines.
///
/// Duplicate insertion and removal of an absent key are not errors; they
/// are observed through the `bool` return value (spec.md §5, §7).
pub trait Index {
    /// Inserts `record`, keyed by `record.key()`. Returns `true` if the
    /// record was stored, `false` if the engine rejected it as a
    /// duplicate (hash index only — the B-tree always accepts).
    fn insert(&mut self, record: Record) -> bool;

    /// Removes the first record matching `key`. Returns whether a
    /// record was removed.
    fn remove(&mut self, key: i64) -> bool;

    /// Returns every stored record matching `key` (possibly empty,
    /// possibly more than one for the B-tree).
    fn search(&self, key: i64) -> Vec<Record>;
}
