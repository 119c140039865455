//! Splitting delimited cells into numbers.

pub mod cell;
pub mod config;
mod matrix;

pub use cell::{parse_records, reduce_cell, sort_values, split_records};
pub use config::{ParseFailure, SortOrder, SplitConfig, SplitMode};
pub use matrix::{masplit, masplit_flags, masplit_or_sentinel, MasplitOutput};
