//! The B-tree driver: root pointer, insert/remove/search, root split and
//! collapse (spec.md §4.3).

use std::mem;

use index_core::error::IndexError;
use index_core::index::Index;
use index_core::record::Record;
use index_core::size::MIN_PAGE_SIZE;
use tracing::debug;

use crate::internal::{InternalPage, Node};

/// Statistics computed by a single postorder walk (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BTreeStatistics {
    pub height: usize,
    pub num_nodes: usize,
    pub num_leaf_nodes: usize,
    pub num_records: usize,
}

/// A B-tree secondary index keyed by each record's first element.
pub struct BTree {
    root: Node,
    page_size: usize,
}

impl BTree {
    /// Creates an empty B-tree whose root is a leaf.
    ///
    /// # Errors
    /// Returns [`IndexError::Usage`] if `page_size < 256` (spec.md §6).
    pub fn new(page_size: usize) -> Result<Self, IndexError> {
        if page_size < MIN_PAGE_SIZE {
            return Err(IndexError::Usage(format!(
                "page_size must be at least {MIN_PAGE_SIZE} bytes, got {page_size}"
            )));
        }
        Ok(Self { root: Node::leaf(), page_size })
    }

    /// Performs a root split if the root overflowed after the last
    /// insert (spec.md §4.3 "insert(record)").
    fn split_root_if_needed(&mut self) {
        if !self.root.needs_split(self.page_size) {
            return;
        }
        debug!("root overflowed, splitting");
        let mut old_root = mem::replace(&mut self.root, Node::leaf());
        let (new_sibling, separator) = old_root.split();
        self.root = Node::Internal(Box::new(InternalPage::new_root(old_root, separator, new_sibling)));
    }

    /// Collapses the root if it is internal with a single child
    /// (spec.md §4.3 "remove(key)", P8).
    fn collapse_root_if_needed(&mut self) {
        let should_collapse = matches!(&self.root, Node::Internal(internal) if internal.child_count() == 1);
        if !should_collapse {
            return;
        }
        debug!("root has a single child, collapsing");
        let old_root = mem::replace(&mut self.root, Node::leaf());
        if let Node::Internal(internal) = old_root {
            if let Some(child) = internal.sole_child() {
                self.root = child;
            }
        }
    }

    /// Every record whose key lies in `[lo, hi]`, found by a naive
    /// whole-tree traversal (spec.md §4.3 "range_search").
    pub fn range_search(&self, lo: i64, hi: i64) -> Vec<Record> {
        self.root.range(lo, hi)
    }

    pub fn statistics(&self) -> BTreeStatistics {
        BTreeStatistics {
            height: self.root.height(),
            num_nodes: self.root.num_nodes(),
            num_leaf_nodes: self.root.num_leaf_nodes(),
            num_records: self.root.num_records(),
        }
    }
}

impl Index for BTree {
    /// Always succeeds: the B-tree tolerates duplicate keys (spec.md §3).
    fn insert(&mut self, record: Record) -> bool {
        debug!(key = record.key(), "btree insert");
        self.root.insert(record, self.page_size);
        self.split_root_if_needed();
        true
    }

    fn remove(&mut self, key: i64) -> bool {
        debug!(key, "btree remove");
        let removed = self.root.remove(key);
        self.collapse_root_if_needed();
        removed
    }

    fn search(&self, key: i64) -> Vec<Record> {
        self.root.search(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(k: i64) -> Record {
        Record::new(vec![k, 0])
    }

    #[test]
    fn rejects_too_small_page_size() {
        assert!(matches!(BTree::new(100), Err(IndexError::Usage(_))));
    }

    #[test]
    fn insert_then_search_finds_record() {
        let mut tree = BTree::new(512).unwrap();
        tree.insert(rec(50));
        assert_eq!(tree.search(50), vec![rec(50)]);
    }

    #[test]
    fn bulk_insert_grows_height_and_keeps_all_records() {
        let mut tree = BTree::new(512).unwrap();
        for k in 1..=100 {
            tree.insert(Record::new(vec![k, 0]));
        }
        let stats = tree.statistics();
        assert_eq!(stats.num_records, 100);
        assert!(stats.height >= 2, "expected root split by 100 inserts, got height {}", stats.height);
        assert_eq!(tree.search(50), vec![Record::new(vec![50, 0])]);
    }

    #[test]
    fn duplicates_are_returned_in_insertion_order() {
        let mut tree = BTree::new(512).unwrap();
        tree.insert(Record::new(vec![5, 1]));
        tree.insert(Record::new(vec![5, 2]));
        assert_eq!(tree.search(5), vec![Record::new(vec![5, 1]), Record::new(vec![5, 2])]);
    }

    #[test]
    fn root_split_increases_height_by_exactly_one() {
        let mut tree = BTree::new(512).unwrap();
        let mut last_height = tree.statistics().height;
        for k in 1..=200 {
            tree.insert(Record::new(vec![k, 0]));
            let height = tree.statistics().height;
            assert!(height == last_height || height == last_height + 1, "height jumped by more than one");
            last_height = height;
        }
    }

    #[test]
    fn root_collapses_after_removals_leave_a_single_child() {
        let mut tree = BTree::new(256).unwrap();
        for k in 1..=40 {
            tree.insert(Record::new(vec![k, 0, 0, 0]));
        }
        assert!(tree.statistics().height >= 2);
        for k in 1..=40 {
            tree.remove(k);
        }
        assert_eq!(tree.statistics().num_records, 0);
    }

    /// Regression test for an internal-node split promoting the wrong
    /// separator: once the root itself is internal and splits (height
    /// reaches 3+), every previously inserted key must still resolve —
    /// a wrong separator silently strands a whole subtree's keys on the
    /// side the parent no longer routes to.
    #[test]
    fn every_key_is_searchable_after_an_internal_node_split() {
        let mut tree = BTree::new(256).unwrap();
        for k in 1..=2000 {
            tree.insert(Record::new(vec![k]));
        }
        assert!(tree.statistics().height >= 3, "test needs an internal split to exercise the regression");
        for k in 1..=2000 {
            assert_eq!(tree.search(k), vec![Record::new(vec![k])], "key {k} not found after internal split");
        }
        let mut ranged: Vec<i64> = tree.range_search(1, 2000).iter().map(Record::key).collect();
        ranged.sort_unstable();
        assert_eq!(ranged, (1..=2000).collect::<Vec<_>>());
    }

    #[test]
    fn range_search_returns_bounded_records() {
        let mut tree = BTree::new(512).unwrap();
        for k in 1..=20 {
            tree.insert(Record::new(vec![k]));
        }
        let mut found: Vec<i64> = tree.range_search(5, 10).iter().map(Record::key).collect();
        found.sort_unstable();
        assert_eq!(found, (5..=10).collect::<Vec<_>>());
    }
}
