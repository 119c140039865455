//! Numeric result matrix with missing values.

use super::{check_ids, fallback_ids, ID_HEADER, NA};
use crate::error::{MasplitError, Result};
use nalgebra::DMatrix;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A dense matrix of optional floating point values.
///
/// Produced by splitting a [`CellMatrix`](super::CellMatrix); carries the
/// same shape and identifiers as its input.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericMatrix {
    /// Values in row-major order (`None` = missing)
    values: Vec<Option<f64>>,
    nrows: usize,
    ncols: usize,
    row_ids: Option<Vec<String>>,
    col_ids: Option<Vec<String>>,
}

impl NumericMatrix {
    /// Create an unlabelled matrix from row-major values.
    pub fn new(values: Vec<Option<f64>>, nrows: usize, ncols: usize) -> Result<Self> {
        if values.len() != nrows * ncols {
            return Err(MasplitError::DimensionMismatch {
                expected: nrows * ncols,
                actual: values.len(),
            });
        }
        Ok(Self {
            values,
            nrows,
            ncols,
            row_ids: None,
            col_ids: None,
        })
    }

    /// The 1×1 missing matrix returned when a split refuses to run.
    pub fn not_available() -> Self {
        Self {
            values: vec![None],
            nrows: 1,
            ncols: 1,
            row_ids: None,
            col_ids: None,
        }
    }

    /// Attach row identifiers.
    pub fn with_row_ids(mut self, row_ids: Vec<String>) -> Result<Self> {
        check_ids(&row_ids, self.nrows)?;
        self.row_ids = Some(row_ids);
        Ok(self)
    }

    /// Attach column identifiers.
    pub fn with_col_ids(mut self, col_ids: Vec<String>) -> Result<Self> {
        check_ids(&col_ids, self.ncols)?;
        self.col_ids = Some(col_ids);
        Ok(self)
    }

    /// Copy identifiers from another source of the same shape.
    pub(crate) fn with_labels(
        mut self,
        row_ids: Option<&[String]>,
        col_ids: Option<&[String]>,
    ) -> Self {
        self.row_ids = row_ids.map(<[String]>::to_vec);
        self.col_ids = col_ids.map(<[String]>::to_vec);
        self
    }

    /// Get the value at (row, col), `None` if missing.
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        assert!(row < self.nrows && col < self.ncols, "value index out of bounds");
        self.values[row * self.ncols + col]
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.ncols
    }

    /// Dimensions as (rows, columns).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Row identifiers.
    #[inline]
    pub fn row_ids(&self) -> Option<&[String]> {
        self.row_ids.as_deref()
    }

    /// Column identifiers.
    #[inline]
    pub fn col_ids(&self) -> Option<&[String]> {
        self.col_ids.as_deref()
    }

    /// All values in row-major order.
    #[inline]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Get a copy of one row.
    pub fn row(&self, row: usize) -> Vec<Option<f64>> {
        self.values[row * self.ncols..(row + 1) * self.ncols].to_vec()
    }

    /// Get a copy of one column.
    pub fn col(&self, col: usize) -> Vec<Option<f64>> {
        (0..self.nrows).map(|row| self.get(row, col)).collect()
    }

    /// Number of missing values.
    pub fn n_missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Convert to a dense nalgebra matrix, with NaN for missing values.
    pub fn to_dense(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.nrows, self.ncols, |row, col| {
            self.get(row, col).unwrap_or(f64::NAN)
        })
    }

    /// Write the matrix to a TSV file. Missing values are written as `NA`.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.to_writer(file)
    }

    /// Write the matrix in TSV layout to any writer.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);

        let col_ids = fallback_ids(self.col_ids(), "V", self.ncols);
        let row_ids = fallback_ids(self.row_ids(), "", self.nrows);

        wtr.write_record(std::iter::once(ID_HEADER).chain(col_ids.iter().map(String::as_str)))?;
        for (row, row_id) in row_ids.iter().enumerate() {
            let mut record = Vec::with_capacity(self.ncols + 1);
            record.push(row_id.clone());
            for col in 0..self.ncols {
                record.push(match self.get(row, col) {
                    Some(value) => value.to_string(),
                    None => NA.to_string(),
                });
            }
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_matrix() -> NumericMatrix {
        NumericMatrix::new(vec![Some(23.0), None, Some(0.5), Some(12.0)], 2, 2)
            .unwrap()
            .with_row_ids(vec!["v1".into(), "v2".into()])
            .unwrap()
            .with_col_ids(vec!["S1".into(), "S2".into()])
            .unwrap()
    }

    #[test]
    fn test_dimensions() {
        let mat = create_test_matrix();
        assert_eq!(mat.shape(), (2, 2));
        assert_eq!(mat.n_missing(), 1);
        assert!(NumericMatrix::new(vec![Some(1.0)], 2, 2).is_err());
    }

    #[test]
    fn test_rows_and_cols() {
        let mat = create_test_matrix();
        assert_eq!(mat.row(1), vec![Some(0.5), Some(12.0)]);
        assert_eq!(mat.col(1), vec![None, Some(12.0)]);
    }

    #[test]
    fn test_not_available() {
        let na = NumericMatrix::not_available();
        assert_eq!(na.shape(), (1, 1));
        assert_eq!(na.get(0, 0), None);
        assert!(na.row_ids().is_none());
    }

    #[test]
    fn test_to_dense() {
        let dense = create_test_matrix().to_dense();
        assert_eq!(dense.nrows(), 2);
        assert!((dense[(0, 0)] - 23.0).abs() < 1e-10);
        assert!(dense[(0, 1)].is_nan());
        assert!((dense[(1, 0)] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_to_writer() {
        let mut out = Vec::new();
        create_test_matrix().to_writer(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "id\tS1\tS2\nv1\t23\tNA\nv2\t0.5\t12\n");
    }

    #[test]
    fn test_to_writer_unlabelled() {
        let mat = NumericMatrix::new(vec![Some(1.0), Some(2.0)], 1, 2).unwrap();
        let mut out = Vec::new();
        mat.to_writer(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "id\tV1\tV2\n1\t1\t2\n");
    }
}
