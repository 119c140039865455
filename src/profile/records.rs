//! Record-count profiling for cell matrices.

use crate::data::CellMatrix;
use crate::split::split_records;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Profile of how many records the cells of a matrix carry.
///
/// For allelic depths the record count of a cell is the number of alleles
/// at the variant, so this summarises how multi-allelic the data is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordProfile {
    /// Number of rows.
    pub n_rows: usize,
    /// Number of columns.
    pub n_cols: usize,
    /// Total number of cells (rows × columns).
    pub total_cells: usize,
    /// Number of missing cells.
    pub missing_cells: usize,
    /// Proportion of missing cells.
    pub missing_fraction: f64,
    /// Fewest records in a non-missing cell (0 if all cells are missing).
    pub min_records: usize,
    /// Most records in a non-missing cell (0 if all cells are missing).
    pub max_records: usize,
    /// Mean records per non-missing cell.
    pub mean_records: f64,
    /// Number of non-missing cells for each record count.
    pub record_histogram: BTreeMap<usize, usize>,
    /// Most records in any cell of each row.
    pub row_max_records: Vec<usize>,
    /// Records that are not valid numbers.
    pub unparseable_records: usize,
}

impl RecordProfile {
    /// Check if every non-missing cell has the same number of records.
    pub fn is_uniform(&self) -> bool {
        self.record_histogram.len() <= 1
    }

    /// Rows whose cells carry more than `n` records somewhere.
    pub fn rows_above(&self, n: usize) -> Vec<usize> {
        self.row_max_records
            .iter()
            .enumerate()
            .filter(|(_, &max)| max > n)
            .map(|(i, _)| i)
            .collect()
    }
}

impl std::fmt::Display for RecordProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Record Profile")?;
        writeln!(f, "  Rows:          {}", self.n_rows)?;
        writeln!(f, "  Columns:       {}", self.n_cols)?;
        writeln!(f, "  Total cells:   {}", self.total_cells)?;
        writeln!(f, "  Missing cells: {} ({:.2}%)", self.missing_cells, self.missing_fraction * 100.0)?;
        writeln!(f, "  Records per cell: min {}, max {}, mean {:.2}", self.min_records, self.max_records, self.mean_records)?;
        writeln!(f, "  Unparseable records: {}", self.unparseable_records)?;
        writeln!(f, "  Record counts:")?;
        for (n, cells) in &self.record_histogram {
            writeln!(f, "    {:>3} records: {} cells", n, cells)?;
        }
        Ok(())
    }
}

/// Per-row tallies, merged into the profile.
#[derive(Default)]
struct RowStats {
    max_records: usize,
    missing: usize,
    unparseable: usize,
    histogram: BTreeMap<usize, usize>,
}

fn row_stats(row: &[Option<String>], delimiter: char) -> RowStats {
    let mut stats = RowStats::default();
    for cell in row {
        match cell {
            None => stats.missing += 1,
            Some(text) => {
                let records = split_records(text, delimiter);
                stats.unparseable += records
                    .iter()
                    .filter(|r| r.trim().parse::<f64>().is_err())
                    .count();
                stats.max_records = stats.max_records.max(records.len());
                *stats.histogram.entry(records.len()).or_insert(0) += 1;
            }
        }
    }
    stats
}

/// Profile the record counts of a cell matrix split on `delimiter`.
pub fn profile_records(cells: &CellMatrix, delimiter: char) -> RecordProfile {
    let (n_rows, n_cols) = cells.shape();
    let total_cells = n_rows * n_cols;

    let rows: Vec<RowStats> = if n_cols == 0 {
        (0..n_rows).map(|_| RowStats::default()).collect()
    } else {
        cells
            .cells()
            .par_chunks(n_cols)
            .map(|row| row_stats(row, delimiter))
            .collect()
    };

    let mut missing_cells = 0;
    let mut unparseable_records = 0;
    let mut record_histogram = BTreeMap::new();
    let mut row_max_records = Vec::with_capacity(n_rows);
    for stats in rows {
        missing_cells += stats.missing;
        unparseable_records += stats.unparseable;
        row_max_records.push(stats.max_records);
        for (n, count) in stats.histogram {
            *record_histogram.entry(n).or_insert(0) += count;
        }
    }

    let present = total_cells - missing_cells;
    let total_records: usize = record_histogram.iter().map(|(n, c)| n * c).sum();
    let mean_records = if present > 0 {
        total_records as f64 / present as f64
    } else {
        0.0
    };
    let missing_fraction = if total_cells > 0 {
        missing_cells as f64 / total_cells as f64
    } else {
        0.0
    };

    RecordProfile {
        n_rows,
        n_cols,
        total_cells,
        missing_cells,
        missing_fraction,
        min_records: record_histogram.keys().next().copied().unwrap_or(0),
        max_records: record_histogram.keys().next_back().copied().unwrap_or(0),
        mean_records,
        record_histogram,
        row_max_records,
        unparseable_records,
    }
}
