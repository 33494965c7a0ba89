//! Shared primitives for the B-tree and Linear Hashing secondary indexes:
//! the record type, the page-budget byte-size model, the engine contract,
//! the structured error type, and the CSV script loader.

pub mod error;
pub mod index;
pub mod loader;
pub mod record;
pub mod size;

pub use error::IndexError;
pub use index::Index;
pub use loader::{load_script, LoadReport};
pub use record::Record;
