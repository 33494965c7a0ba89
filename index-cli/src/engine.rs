//! Type-erases the two concrete engines behind one value so the CLI can
//! dispatch without knowing which index type the user picked.

use btree_index::{BTree, BTreeStatistics};
use hash_index::{HashStatistics, LinearHash};
use index_core::error::IndexError;
use index_core::index::Index;
use index_core::record::Record;

/// Either concrete engine, selected at startup by `-t` (spec.md §6).
pub enum AnyEngine {
    Tree(BTree),
    Hash(LinearHash),
}

/// Parsed `-t` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Tree,
    Hash,
}

impl IndexKind {
    pub fn parse(raw: &str) -> Result<Self, IndexError> {
        match raw {
            "btree" | "b" => Ok(IndexKind::Tree),
            "linear" | "l" => Ok(IndexKind::Hash),
            other => Err(IndexError::Usage(format!(
                "unknown index type '{other}', expected one of btree|b|linear|l"
            ))),
        }
    }
}

/// Statistics from either engine, for uniform printing (see `stats.rs`).
pub enum AnyStatistics {
    Tree(BTreeStatistics),
    Hash(HashStatistics),
}

impl AnyEngine {
    pub fn statistics(&self) -> AnyStatistics {
        match self {
            AnyEngine::Tree(tree) => AnyStatistics::Tree(tree.statistics()),
            AnyEngine::Hash(hash) => AnyStatistics::Hash(hash.statistics()),
        }
    }

    /// `None` for the hash engine: range scans are B-tree only (spec.md
    /// §4.3, §6).
    pub fn range_search(&self, lo: i64, hi: i64) -> Option<Vec<Record>> {
        match self {
            AnyEngine::Tree(tree) => Some(tree.range_search(lo, hi)),
            AnyEngine::Hash(_) => None,
        }
    }

}

impl Index for AnyEngine {
    fn insert(&mut self, record: Record) -> bool {
        match self {
            AnyEngine::Tree(tree) => tree.insert(record),
            AnyEngine::Hash(hash) => hash.insert(record),
        }
    }

    fn remove(&mut self, key: i64) -> bool {
        match self {
            AnyEngine::Tree(tree) => tree.remove(key),
            AnyEngine::Hash(hash) => hash.remove(key),
        }
    }

    fn search(&self, key: i64) -> Vec<Record> {
        match self {
            AnyEngine::Tree(tree) => tree.search(key),
            AnyEngine::Hash(hash) => hash.search(key),
        }
    }
}
