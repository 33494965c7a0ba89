//! The Linear Hashing engine: dual-hash addressing, the `next_split`
//! pointer, and the global load-factor controller (spec.md §4.5).

use index_core::error::IndexError;
use index_core::index::Index;
use index_core::record::Record;
use index_core::size::{nominal_record_size, MIN_PAGE_SIZE};
use tracing::debug;

use crate::bucket::HashBucket;

/// Everything `statistics()` reports (spec.md §4.5 "Statistics").
#[derive(Debug, Clone, PartialEq)]
pub struct HashStatistics {
    pub num_buckets: usize,
    pub num_records: usize,
    pub level: usize,
    pub next_split: usize,
    pub num_splits: usize,
    pub total_overflow_pages: usize,
    /// Overflow page count for each bucket chain, indexed by bucket index
    /// (spec.md §4.5 "Statistics": "total **and per-bucket** overflow
    /// counts").
    pub overflow_pages_per_bucket: Vec<usize>,
    pub mean_occupancy: f64,
}

/// A Linear Hashing secondary index keyed by each record's first element.
pub struct LinearHash {
    buckets: Vec<HashBucket>,
    level: usize,
    next_split: usize,
    initial_buckets: usize,
    num_records: usize,
    num_splits: usize,
    utilization: f64,
    page_size: usize,
    /// `C`: records-per-page, fixed at construction (Open Question 3).
    capacity_per_page: usize,
}

impl LinearHash {
    /// # Errors
    /// Returns [`IndexError::Usage`] if `page_size < 256`, `initial_buckets`
    /// is not a power of two `>= 1`, or `utilization` is outside `(0, 1]`
    /// (spec.md §6).
    pub fn new(page_size: usize, initial_buckets: usize, utilization: f64) -> Result<Self, IndexError> {
        if page_size < MIN_PAGE_SIZE {
            return Err(IndexError::Usage(format!(
                "page_size must be at least {MIN_PAGE_SIZE} bytes, got {page_size}"
            )));
        }
        if initial_buckets == 0 || !initial_buckets.is_power_of_two() {
            return Err(IndexError::Usage(format!(
                "initial_buckets must be a power of two, got {initial_buckets}"
            )));
        }
        if !(utilization > 0.0 && utilization <= 1.0) {
            return Err(IndexError::Usage(format!(
                "utilization must be in (0, 1], got {utilization}"
            )));
        }
        let capacity_per_page = (page_size / nominal_record_size()).max(1);
        Ok(Self {
            buckets: (0..initial_buckets).map(|_| HashBucket::new()).collect(),
            level: 0,
            next_split: 0,
            initial_buckets,
            num_records: 0,
            num_splits: 0,
            utilization,
            page_size,
            capacity_per_page,
        })
    }

    /// `h_d(key) := key mod (2^d * N0)`, reduced to a non-negative
    /// remainder so negative keys address a valid bucket (spec.md §7).
    fn h(&self, key: i64, level: usize) -> usize {
        let modulus = (1i64 << level) * self.initial_buckets as i64;
        key.rem_euclid(modulus) as usize
    }

    /// The composite addressing rule: `h_d`, promoted to `h_{d+1}` for any
    /// address already split this round (spec.md §4.5 "Addressing").
    fn bucket_index(&self, key: i64) -> usize {
        let i = self.h(key, self.level);
        if i < self.next_split {
            self.h(key, self.level + 1)
        } else {
            i
        }
    }

    fn load_factor_triggered(&self) -> bool {
        let ratio = self.num_records as f64 / self.buckets.len() as f64;
        ratio >= self.utilization * self.capacity_per_page as f64
    }

    /// Splits exactly the bucket at `next_split` (spec.md §4.5 "Split
    /// procedure").
    fn split(&mut self) {
        let old = self.next_split;
        debug!(old, level = self.level, "linear hash split");
        let new_index = self.buckets.len();
        self.buckets.push(HashBucket::new());

        let drained = self.buckets[old].all_records();
        self.buckets[old].clear();

        for record in drained {
            let target = self.h(record.key(), self.level + 1);
            debug_assert!(target == old || target == new_index);
            self.buckets[target].insert(record, self.page_size);
        }

        self.next_split += 1;
        self.num_splits += 1;
        let round_size = (1usize << self.level) * self.initial_buckets;
        if self.next_split == round_size {
            self.level += 1;
            self.next_split = 0;
        }
    }

    pub fn statistics(&self) -> HashStatistics {
        let overflow_pages_per_bucket: Vec<usize> =
            self.buckets.iter().map(HashBucket::count_overflow_pages).collect();
        let total_overflow_pages = overflow_pages_per_bucket.iter().sum();
        HashStatistics {
            num_buckets: self.buckets.len(),
            num_records: self.num_records,
            level: self.level,
            next_split: self.next_split,
            num_splits: self.num_splits,
            total_overflow_pages,
            overflow_pages_per_bucket,
            mean_occupancy: self.num_records as f64 / self.buckets.len() as f64,
        }
    }
}

impl Index for LinearHash {
    /// Rejects duplicates (returns `false`, no counters move). Otherwise
    /// stores the record and, if the load factor now requires it, splits
    /// exactly one bucket (spec.md §4.5 "Insert").
    fn insert(&mut self, record: Record) -> bool {
        let key = record.key();
        let index = self.bucket_index(key);
        if !self.buckets[index].insert(record, self.page_size) {
            debug!(key, "linear hash duplicate rejected");
            return false;
        }
        self.num_records += 1;
        if self.load_factor_triggered() {
            self.split();
        }
        true
    }

    fn remove(&mut self, key: i64) -> bool {
        let index = self.bucket_index(key);
        let removed = self.buckets[index].remove(key);
        if removed {
            self.num_records -= 1;
        }
        removed
    }

    fn search(&self, key: i64) -> Vec<Record> {
        let index = self.bucket_index(key);
        self.buckets[index].search(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(k: i64) -> Record {
        Record::new(vec![k, 0])
    }

    #[test]
    fn rejects_invalid_construction_options() {
        assert!(matches!(LinearHash::new(100, 4, 0.8), Err(IndexError::Usage(_))));
        assert!(matches!(LinearHash::new(512, 3, 0.8), Err(IndexError::Usage(_))));
        assert!(matches!(LinearHash::new(512, 4, 0.0), Err(IndexError::Usage(_))));
        assert!(matches!(LinearHash::new(512, 4, 1.5), Err(IndexError::Usage(_))));
        assert!(LinearHash::new(512, 4, 0.8).is_ok());
    }

    #[test]
    fn insert_then_search_finds_record() {
        let mut hash = LinearHash::new(512, 4, 0.8).unwrap();
        hash.insert(rec(7));
        assert_eq!(hash.search(7), vec![rec(7)]);
    }

    #[test]
    fn duplicate_insert_is_rejected_and_uncounted() {
        let mut hash = LinearHash::new(512, 4, 0.8).unwrap();
        assert!(hash.insert(Record::new(vec![7, 1])));
        assert!(!hash.insert(Record::new(vec![7, 2])));
        assert_eq!(hash.search(7), vec![Record::new(vec![7, 1])]);
        assert_eq!(hash.statistics().num_records, 1);
    }

    #[test]
    fn every_key_maps_to_at_most_one_record() {
        let mut hash = LinearHash::new(512, 4, 0.8).unwrap();
        for k in -50..50 {
            hash.insert(rec(k));
        }
        for k in -50..50 {
            assert_eq!(hash.search(k).len(), 1, "key {k} should resolve to exactly one record");
        }
    }

    #[test]
    fn split_occurs_exactly_once_when_the_load_factor_first_crosses() {
        let mut hash = LinearHash::new(512, 4, 0.8).unwrap();
        let mut key = 0i64;
        while hash.statistics().num_splits == 0 {
            hash.insert(rec(key));
            key += 1;
        }
        assert_eq!(hash.statistics().num_splits, 1);
        assert_eq!(hash.statistics().num_buckets, 5);
    }

    #[test]
    fn statistics_report_overflow_per_bucket_not_just_the_total() {
        let mut hash = LinearHash::new(256, 4, 1.0).unwrap();
        for k in (0..400).step_by(4) {
            hash.insert(rec(k));
        }
        let stats = hash.statistics();
        assert_eq!(stats.overflow_pages_per_bucket.len(), stats.num_buckets);
        assert_eq!(stats.overflow_pages_per_bucket.iter().sum::<usize>(), stats.total_overflow_pages);
        assert!(stats.total_overflow_pages > 0, "this many inserts into one address should overflow a page");
    }

    #[test]
    fn bucket_holding_a_key_always_matches_current_addressing() {
        let mut hash = LinearHash::new(256, 4, 0.8).unwrap();
        for k in 0..200 {
            hash.insert(rec(k));
        }
        for k in 0..200 {
            let expected = hash.bucket_index(k);
            assert!(hash.buckets[expected].search(k).len() == 1);
        }
    }

    #[test]
    fn negative_keys_address_a_valid_bucket() {
        let hash = LinearHash::new(512, 4, 0.8).unwrap();
        assert!(hash.h(-1, 0) < hash.initial_buckets);
        assert!(hash.h(-17, 0) < hash.initial_buckets);
    }
}
