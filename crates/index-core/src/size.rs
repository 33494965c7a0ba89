//! The deterministic monotone byte-size model shared by every page kind.
//!
//! `spec.md` §3 requires only that "serialized size" be a deterministic
//! monotone function of a slot's contents, not that it match any real
//! wire format — there is no on-disk representation (see Non-goals).
//! The constants below stand in for it and, per Open Question 3, are
//! fixed once and never recomputed from live record sizes.

use super::record::Record;

/// Per-record bookkeeping overhead charged regardless of element count.
pub const RECORD_OVERHEAD_BYTES: usize = 56;

/// Bytes charged per `i64` element.
pub const ELEMENT_SIZE_BYTES: usize = 8;

/// The minimum page size accepted by either engine (spec.md §6).
pub const MIN_PAGE_SIZE: usize = 256;

/// The default page size used when the caller doesn't specify one.
pub const DEFAULT_PAGE_SIZE: usize = 512;

/// Occupied size, in bytes, of a single record.
pub fn record_size(record: &Record) -> usize {
    RECORD_OVERHEAD_BYTES + ELEMENT_SIZE_BYTES * record.len()
}

/// Occupied size, in bytes, of an ordered run of records.
pub fn records_size<'a>(records: impl IntoIterator<Item = &'a Record>) -> usize {
    records.into_iter().map(record_size).sum()
}

/// The nominal per-record footprint used to derive the hash engine's
/// load-factor capacity constant `C`. A nominal record carries a key plus
/// one payload attribute — the shape `spec.md`'s scenarios insert.
pub fn nominal_record_size() -> usize {
    RECORD_OVERHEAD_BYTES + ELEMENT_SIZE_BYTES * 2
}
