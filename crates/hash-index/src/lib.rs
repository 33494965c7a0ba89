//! A global-load-factor-controlled Linear Hashing secondary index
//! (spec.md §4.4–§4.5).

mod bucket;
mod engine;

pub use engine::{HashStatistics, LinearHash};
