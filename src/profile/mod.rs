//! Profiling of delimited cell matrices.

mod records;

pub use records::{profile_records, RecordProfile};
