//! Splitting of delimited matrix cells
//!
//! This library turns a matrix of delimited numeric strings, such as the
//! allelic depth (`AD`) field extracted from a VCF file (`"7,2,0"`), into a
//! numeric matrix. Each cell is reduced to either the number of records it
//! holds or one selected record, optionally after sorting.
//!
//! # Overview
//!
//! - **data**: Core data structures (CellMatrix, NumericMatrix)
//! - **split**: Cell reduction and matrix splitting
//! - **profile**: Record-count profiling
//!
//! # Example
//!
//! ```
//! use masplit::prelude::*;
//!
//! let cells = CellMatrix::from_rows(vec![
//!     vec![Some("9,23,12".to_string()), None],
//!     vec![Some("10,19".to_string()), Some("7".to_string())],
//! ])
//! .unwrap();
//!
//! // Largest depth per cell
//! let largest = masplit(&cells, &SplitConfig::default()).unwrap();
//! assert_eq!(largest.get(0, 0), Some(23.0));
//! assert_eq!(largest.get(0, 1), None);
//!
//! // Second-largest depth; cells with one record become missing
//! let second = masplit(&cells, &SplitConfig::new().select(2)).unwrap();
//! assert_eq!(second.get(1, 0), Some(10.0));
//! assert_eq!(second.get(1, 1), None);
//! ```

pub mod data;
pub mod error;
pub mod profile;
pub mod split;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{CellMatrix, NumericMatrix};
    pub use crate::error::{MasplitError, Result};
    pub use crate::profile::{profile_records, RecordProfile};
    pub use crate::split::{
        masplit, masplit_flags, masplit_or_sentinel, reduce_cell, MasplitOutput, ParseFailure,
        SortOrder, SplitConfig, SplitMode,
    };
}
