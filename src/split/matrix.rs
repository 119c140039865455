//! Splitting every cell of a matrix.

use super::cell::reduce_validated;
use super::config::SplitConfig;
use crate::data::{CellMatrix, NumericMatrix};
use crate::error::Result;
use rayon::prelude::*;

/// Split a matrix of delimited cells into a numeric matrix.
///
/// The config is validated once before any cell is touched; an invalid
/// config is returned as an error and no cell is processed. Otherwise every
/// cell is reduced as by [`reduce_cell`](super::reduce_cell) and the result
/// carries the shape and identifiers of the input.
///
/// # Arguments
/// * `cells` - The matrix of delimited strings
/// * `config` - Delimiter, mode, record and sort settings
///
/// # Returns
/// A NumericMatrix with one value (or missing) per input cell.
pub fn masplit(cells: &CellMatrix, config: &SplitConfig) -> Result<NumericMatrix> {
    config.validate()?;

    let (nrows, ncols) = cells.shape();
    tracing::debug!(rows = nrows, cols = ncols, mode = ?config.mode, "splitting cell matrix");

    // Rows are independent; reduce them in parallel
    let values: Vec<Option<f64>> = if ncols == 0 {
        Vec::new()
    } else {
        cells
            .cells()
            .par_chunks(ncols)
            .flat_map_iter(|row| row.iter().map(|cell| reduce_validated(cell.as_deref(), config)))
            .collect()
    };

    Ok(NumericMatrix::new(values, nrows, ncols)?.with_labels(cells.row_ids(), cells.col_ids()))
}

/// Outcome of a split that reports failure as a value.
#[derive(Debug, Clone, PartialEq)]
pub enum MasplitOutput {
    /// Every cell was processed.
    Computed(NumericMatrix),
    /// The configuration was rejected and no cell was processed.
    NotAvailable,
}

impl MasplitOutput {
    /// Whether the split refused to run.
    pub fn is_not_available(&self) -> bool {
        matches!(self, Self::NotAvailable)
    }

    /// The computed matrix, if any.
    pub fn matrix(&self) -> Option<&NumericMatrix> {
        match self {
            Self::Computed(matrix) => Some(matrix),
            Self::NotAvailable => None,
        }
    }

    /// Convert to a matrix, using a 1×1 missing matrix for a refused split.
    pub fn into_matrix(self) -> NumericMatrix {
        match self {
            Self::Computed(matrix) => matrix,
            Self::NotAvailable => NumericMatrix::not_available(),
        }
    }
}

/// Split a matrix, logging configuration errors and returning
/// [`MasplitOutput::NotAvailable`] instead of an error.
pub fn masplit_or_sentinel(cells: &CellMatrix, config: &SplitConfig) -> MasplitOutput {
    match masplit(cells, config) {
        Ok(matrix) => MasplitOutput::Computed(matrix),
        Err(e) => {
            tracing::error!(error = %e, "cell matrix was not split");
            MasplitOutput::NotAvailable
        }
    }
}

/// Split a matrix using integer flags.
///
/// # Arguments
/// * `delim` - Single character separating records (usually `","`)
/// * `count` - 1 to return the number of records per cell
/// * `record` - 1-based record to return
/// * `sort` - 1 to sort records before selecting one
/// * `decreasing` - 1 to sort decreasing, 0 to sort increasing
pub fn masplit_flags(
    cells: &CellMatrix,
    delim: &str,
    count: i64,
    record: i64,
    sort: i64,
    decreasing: i64,
) -> MasplitOutput {
    match SplitConfig::from_flags(delim, count, record, sort, decreasing) {
        Ok(config) => masplit_or_sentinel(cells, &config),
        Err(e) => {
            tracing::error!(error = %e, "cell matrix was not split");
            MasplitOutput::NotAvailable
        }
    }
}
