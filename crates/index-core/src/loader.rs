//! CSV script interpreter (spec.md §4.6, §6 "CSV script format").
//!
//! The loader is the sole collaborator between a CSV stream and an
//! [`Index`]; it never inspects engine internals, matching how
//! `original_source/base.py::Index.load_file` drove the Python
//! reference implementation through nothing but `insert`/`remove`/`search`.

use std::io::Read;

use csv::ReaderBuilder;
use tracing::{debug, info, warn};

use super::error::IndexError;
use super::index::Index;
use super::record::Record;

/// Tally of what a script load did, plus every `?` search's result —
/// the script format has no other way to observe a query's outcome.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub rows_processed: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub removed: usize,
    pub not_found: usize,
    pub skipped: usize,
    pub searches: Vec<(i64, Vec<Record>)>,
}

/// Applies every operation in a CSV script to `index`.
///
/// The first row is a header and is discarded. Blank rows, and rows
/// carrying only an operation with no values, are skipped. A row whose
/// value fields are not all integers aborts the load with
/// [`IndexError::Parse`].
pub fn load_script<I: Index, R: Read>(index: &mut I, mut reader: R) -> Result<LoadReport, IndexError> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;

    let mut report = LoadReport::default();

    // Blank lines never reach `csv::Reader::records()` as a yielded record —
    // the crate consumes them while scanning for the next row — so blank-row
    // detection has to happen on the raw lines, not on what csv yields.
    let mut lines = contents.lines();
    lines.next(); // header

    for (position, line) in lines.enumerate() {
        if line.trim().is_empty() {
            debug!(row = position, "empty line, skipping");
            report.skipped += 1;
            continue;
        }

        let mut line_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());
        let row = line_reader
            .records()
            .next()
            .ok_or_else(|| IndexError::Parse { row: position + 1, detail: "no fields on row".into() })?
            .map_err(|e| IndexError::Parse {
                row: position + 1,
                detail: e.to_string(),
            })?;

        let op = row.get(0).unwrap_or("").trim();
        if row.len() < 2 {
            debug!(row = position, %op, "no data after operation, skipping");
            report.skipped += 1;
            continue;
        }

        let mut values = Vec::with_capacity(row.len() - 1);
        for field in row.iter().skip(1) {
            let value: i64 = field.trim().parse().map_err(|_| IndexError::Parse {
                row: position + 1,
                detail: format!("non-integer field {:?}", field),
            })?;
            values.push(value);
        }

        report.rows_processed += 1;

        match op {
            "+" => {
                let key = values[0];
                if index.insert(Record::new(values)) {
                    report.inserted += 1;
                } else {
                    report.duplicates += 1;
                    debug!(row = position, key, "duplicate key rejected");
                }
            }
            "-" => {
                let key = values[0];
                if index.remove(key) {
                    report.removed += 1;
                } else {
                    report.not_found += 1;
                    debug!(row = position, key, "remove: key absent");
                }
            }
            "?" => {
                let key = values[0];
                let found = index.search(key);
                info!(row = position, key, matches = found.len(), "search");
                report.searches.push((key, found));
            }
            other => {
                warn!(row = position, op = other, "unrecognized operation, skipping");
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// A trivial in-memory index used only to exercise the loader in
    /// isolation from either real engine.
    #[derive(Default)]
    struct FakeIndex(HashMap<i64, Vec<Record>>);

    impl Index for FakeIndex {
        fn insert(&mut self, record: Record) -> bool {
            let entry = self.0.entry(record.key()).or_default();
            if entry.is_empty() {
                entry.push(record);
                true
            } else {
                false
            }
        }

        fn remove(&mut self, key: i64) -> bool {
            match self.0.get_mut(&key) {
                Some(v) if !v.is_empty() => {
                    v.remove(0);
                    true
                }
                _ => false,
            }
        }

        fn search(&self, key: i64) -> Vec<Record> {
            self.0.get(&key).cloned().unwrap_or_default()
        }
    }

    #[test]
    fn round_trip_script() {
        let script = "op,v0,v1\n+,1,10\n+,17,20\n+,33,30\n-,17\n?,1\n?,17\n";
        let mut index = FakeIndex::default();
        let report = load_script(&mut index, script.as_bytes()).unwrap();

        assert_eq!(report.inserted, 3);
        assert_eq!(report.removed, 1);
        assert_eq!(report.searches.len(), 2);
        assert_eq!(report.searches[0].1, vec![Record::new(vec![1, 10])]);
        assert!(report.searches[1].1.is_empty());
    }

    #[test]
    fn skips_blank_and_op_only_rows() {
        let script = "op,v0\n+,1\n-\n\n+,2\n";
        let mut index = FakeIndex::default();
        let report = load_script(&mut index, script.as_bytes()).unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn non_integer_field_aborts() {
        let script = "op,v0\n+,abc\n";
        let mut index = FakeIndex::default();
        let err = load_script(&mut index, script.as_bytes()).unwrap_err();
        assert!(matches!(err, IndexError::Parse { .. }));
    }
}
