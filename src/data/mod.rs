//! Matrix types for delimited cell input and numeric output.

mod cell_matrix;
mod numeric_matrix;

pub use cell_matrix::{missing_markers, CellMatrix, DEFAULT_MISSING};
pub use numeric_matrix::NumericMatrix;

use crate::error::{MasplitError, Result};

/// Marker written to TSV output for missing values.
pub const NA: &str = "NA";

/// Header of the identifier column in TSV files.
pub(crate) const ID_HEADER: &str = "id";

/// Check that a label vector matches the dimension it annotates.
pub(crate) fn check_ids(ids: &[String], expected: usize) -> Result<()> {
    if ids.len() != expected {
        return Err(MasplitError::DimensionMismatch {
            expected,
            actual: ids.len(),
        });
    }
    Ok(())
}

/// Labels used when writing a matrix that carries no identifiers.
pub(crate) fn fallback_ids(ids: Option<&[String]>, prefix: &str, n: usize) -> Vec<String> {
    match ids {
        Some(ids) => ids.to_vec(),
        None => (1..=n).map(|i| format!("{}{}", prefix, i)).collect(),
    }
}
