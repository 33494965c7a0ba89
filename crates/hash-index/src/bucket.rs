//! Hash buckets: an unordered record page with a singly-linked overflow
//! chain (spec.md §3 "Hash bucket", §4.4).

use index_core::record::Record;
use index_core::size::{record_size, records_size};

/// The head (or a link) of a bucket's overflow chain.
///
/// `occupied_size`/overflow decisions are local to the head page only —
/// a chain's tail pages are addressed the same way recursively.
#[derive(Debug, Default)]
pub struct HashBucket {
    records: Vec<Record>,
    overflow: Option<Box<HashBucket>>,
}

impl HashBucket {
    pub fn new() -> Self {
        Self { records: Vec::new(), overflow: None }
    }

    fn occupied_size(&self) -> usize {
        records_size(&self.records)
    }

    /// Rejects duplicates (chain-wide), then appends to the head if it
    /// still fits the page budget, else recurses into the tail
    /// (allocating one on demand) — spec.md §4.4 "Insert".
    pub fn insert(&mut self, record: Record, page_size: usize) -> bool {
        if !self.search(record.key()).is_empty() {
            return false;
        }
        if self.occupied_size() + record_size(&record) <= page_size {
            self.records.push(record);
            return true;
        }
        self.overflow.get_or_insert_with(|| Box::new(HashBucket::new())).insert(record, page_size)
    }

    /// Drops the first match in the head, else delegates to the tail.
    /// No coalescing of chained pages (spec.md §4.4 "Remove").
    pub fn remove(&mut self, key: i64) -> bool {
        if let Some(position) = self.records.iter().position(|r| r.key() == key) {
            self.records.remove(position);
            return true;
        }
        match &mut self.overflow {
            Some(tail) => tail.remove(key),
            None => false,
        }
    }

    /// Scans head then tail; duplicate rejection guarantees at most one
    /// match (spec.md §4.4 "Search").
    pub fn search(&self, key: i64) -> Vec<Record> {
        if let Some(record) = self.records.iter().find(|r| r.key() == key) {
            return vec![record.clone()];
        }
        match &self.overflow {
            Some(tail) => tail.search(key),
            None => Vec::new(),
        }
    }

    /// Concatenates head and tail payloads in order, for redistribution
    /// during a split (spec.md §4.4 "all_records()").
    pub fn all_records(&self) -> Vec<Record> {
        let mut out = self.records.clone();
        if let Some(tail) = &self.overflow {
            out.extend(tail.all_records());
        }
        out
    }

    /// Resets this chain to a single empty head page, dropping any tail.
    pub fn clear(&mut self) {
        self.records.clear();
        self.overflow = None;
    }

    pub fn has_overflow(&self) -> bool {
        self.overflow.is_some()
    }

    /// Number of overflow pages beyond the head, for statistics.
    pub fn count_overflow_pages(&self) -> usize {
        match &self.overflow {
            Some(tail) => 1 + tail.count_overflow_pages(),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(k: i64) -> Record {
        Record::new(vec![k, 0])
    }

    #[test]
    fn rejects_duplicate_key() {
        let mut bucket = HashBucket::new();
        assert!(bucket.insert(rec(7), 512));
        assert!(!bucket.insert(Record::new(vec![7, 99]), 512));
        assert_eq!(bucket.search(7), vec![rec(7)]);
    }

    #[test]
    fn overflows_into_a_tail_page_when_the_head_is_full() {
        let mut bucket = HashBucket::new();
        for k in 0..40 {
            assert!(bucket.insert(rec(k), 256));
        }
        assert!(bucket.has_overflow());
        assert_eq!(bucket.all_records().len(), 40);
        assert_eq!(bucket.search(39), vec![rec(39)]);
    }

    #[test]
    fn remove_scans_head_then_tail() {
        let mut bucket = HashBucket::new();
        for k in 0..40 {
            bucket.insert(rec(k), 256);
        }
        assert!(bucket.remove(39));
        assert!(bucket.search(39).is_empty());
        assert_eq!(bucket.all_records().len(), 39);
    }

    #[test]
    fn clear_drops_the_whole_chain() {
        let mut bucket = HashBucket::new();
        for k in 0..40 {
            bucket.insert(rec(k), 256);
        }
        bucket.clear();
        assert!(bucket.all_records().is_empty());
        assert!(!bucket.has_overflow());
    }
}
