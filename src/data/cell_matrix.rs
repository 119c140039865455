//! Matrix of optional delimited text cells.

use super::{check_ids, fallback_ids, ID_HEADER, NA};
use crate::error::{MasplitError, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Tokens treated as missing when reading TSV input.
pub const DEFAULT_MISSING: &[&str] = &[NA];

/// Combine extra missing markers with [`DEFAULT_MISSING`], keeping each once.
pub fn missing_markers<S: AsRef<str>>(extra: &[S]) -> Vec<String> {
    let mut markers: Vec<String> = DEFAULT_MISSING.iter().map(|m| m.to_string()).collect();
    for marker in extra {
        let marker = marker.as_ref();
        if !markers.iter().any(|m| m == marker) {
            markers.push(marker.to_string());
        }
    }
    markers
}

/// A rectangular matrix of text cells, each either missing or a delimited
/// string such as `"7,2,0"`.
///
/// Rows usually represent variants and columns samples, matching the layout
/// of a genotype field extracted from a VCF file. Cells are stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CellMatrix {
    /// Cell values in row-major order (`None` = missing)
    cells: Vec<Option<String>>,
    nrows: usize,
    ncols: usize,
    /// Row identifiers (variants), if any
    row_ids: Option<Vec<String>>,
    /// Column identifiers (samples), if any
    col_ids: Option<Vec<String>>,
}

impl CellMatrix {
    /// Create an unlabelled matrix from row-major cells.
    pub fn new(cells: Vec<Option<String>>, nrows: usize, ncols: usize) -> Result<Self> {
        if cells.len() != nrows * ncols {
            return Err(MasplitError::DimensionMismatch {
                expected: nrows * ncols,
                actual: cells.len(),
            });
        }
        Ok(Self {
            cells,
            nrows,
            ncols,
            row_ids: None,
            col_ids: None,
        })
    }

    /// Create a matrix from a vector of rows. All rows must have equal length.
    pub fn from_rows(rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(MasplitError::DimensionMismatch {
                    expected: ncols,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }
        Self::new(cells, nrows, ncols)
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

    /// Load a cell matrix from a TSV file, treating `NA` as missing.
    ///
    /// Expected format:
    /// - First row: header with column IDs (first column is the row ID header)
    /// - Subsequent rows: row ID followed by cells
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_tsv_with_missing(path, DEFAULT_MISSING)
    }

    /// Load a cell matrix from a TSV file with custom missing markers.
    pub fn from_tsv_with_missing<P: AsRef<Path>, S: AsRef<str>>(
        path: P,
        missing: &[S],
    ) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, missing)
    }

    /// Read a cell matrix in TSV layout from any reader.
    pub fn from_reader<R: Read, S: AsRef<str>>(reader: R, missing: &[S]) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);

        let header = rdr.headers()?.clone();
        if header.len() < 2 {
            return Err(MasplitError::EmptyData(
                "TSV must have at least one data column".to_string(),
            ));
        }
        let col_ids: Vec<String> = header.iter().skip(1).map(|s| s.to_string()).collect();
        let ncols = col_ids.len();

        let mut row_ids = Vec::new();
        let mut cells = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let mut fields = record.iter();
            // The reader rejects rows whose length differs from the header.
            let Some(row_id) = fields.next() else {
                continue;
            };
            row_ids.push(row_id.to_string());
            cells.extend(fields.map(|field| {
                if missing.iter().any(|m| m.as_ref() == field) {
                    None
                } else {
                    Some(field.to_string())
                }
            }));
        }

        let nrows = row_ids.len();
        Self::new(cells, nrows, ncols)?
            .with_row_ids(row_ids)?
            .with_col_ids(col_ids)
    }

    /// Write the cell matrix to a TSV file. Missing cells are written as `NA`.
    ///
    /// A text cell that is literally `NA` is written the same way, so it
    /// reads back as missing.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.to_writer(file)
    }

    /// Write the cell matrix in TSV layout to any writer. See [`Self::to_tsv`]
    /// for how missing cells are written.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);

        let col_ids = fallback_ids(self.col_ids(), "V", self.ncols);
        let row_ids = fallback_ids(self.row_ids(), "", self.nrows);

        wtr.write_record(std::iter::once(ID_HEADER).chain(col_ids.iter().map(String::as_str)))?;
        for (row_id, row) in row_ids.iter().zip(self.rows()) {
            let fields = row.iter().map(|cell| cell.as_deref().unwrap_or(NA));
            wtr.write_record(std::iter::once(row_id.as_str()).chain(fields))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Get the cell at (row, col). Returns `None` for missing cells.
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        assert!(row < self.nrows && col < self.ncols, "cell index out of bounds");
        self.cells[row * self.ncols + col].as_deref()
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

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Option<String>] {
        &self.cells
    }

    /// Iterate over rows as slices of cells.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> + '_ {
        // chunks() rejects a zero chunk size; a matrix without columns has no cells.
        self.cells
            .chunks(self.ncols.max(1))
            .take(if self.ncols == 0 { 0 } else { self.nrows })
    }

    /// Number of missing cells.
    pub fn n_missing(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cell(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn create_test_matrix() -> CellMatrix {
        // 2 variants × 3 samples
        CellMatrix::from_rows(vec![
            vec![cell("9,23,12"), cell("10,19"), cell("7,2")],
            vec![None, cell("12,20"), cell("0,0")],
        ])
        .unwrap()
        .with_row_ids(vec!["Variant_1".into(), "Variant_2".into()])
        .unwrap()
        .with_col_ids(vec!["Sample_1".into(), "Sample_2".into(), "Sample_3".into()])
        .unwrap()
    }

    #[test]
    fn test_dimensions() {
        let mat = create_test_matrix();
        assert_eq!(mat.shape(), (2, 3));
        assert_eq!(mat.n_missing(), 1);
    }

    #[test]
    fn test_get_cells() {
        let mat = create_test_matrix();
        assert_eq!(mat.get(0, 0), Some("9,23,12"));
        assert_eq!(mat.get(1, 0), None);
        assert_eq!(mat.get(1, 2), Some("0,0"));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = CellMatrix::from_rows(vec![vec![cell("1")], vec![cell("1"), cell("2")]]);
        assert!(matches!(
            result,
            Err(MasplitError::DimensionMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_label_length_checked() {
        let mat = CellMatrix::new(vec![cell("1"), cell("2")], 1, 2).unwrap();
        assert!(mat.clone().with_row_ids(vec!["a".into(), "b".into()]).is_err());
        assert!(mat.with_col_ids(vec!["a".into(), "b".into()]).is_ok());
    }

    #[test]
    fn test_rows_iterator() {
        let mat = create_test_matrix();
        let rows: Vec<_> = mat.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1].as_deref(), Some("12,20"));

        let empty = CellMatrix::new(Vec::new(), 3, 0).unwrap();
        assert_eq!(empty.rows().count(), 0);
    }

    #[test]
    fn test_from_tsv_missing_markers() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "variant\tS1\tS2").unwrap();
        writeln!(file, "v1\t7,2\tNA").unwrap();
        writeln!(file, "v2\t.\t3,4").unwrap();
        file.flush().unwrap();

        let mat = CellMatrix::from_tsv(file.path()).unwrap();
        assert_eq!(mat.shape(), (2, 2));
        assert_eq!(mat.get(0, 1), None);
        assert_eq!(mat.get(1, 0), Some("."));

        let mat = CellMatrix::from_tsv_with_missing(file.path(), &["NA", "."]).unwrap();
        assert_eq!(mat.get(1, 0), None);
        assert_eq!(mat.row_ids().unwrap(), &["v1", "v2"]);
        assert_eq!(mat.col_ids().unwrap(), &["S1", "S2"]);
    }

    #[test]
    fn test_tsv_roundtrip() {
        let mat = create_test_matrix();

        let temp_file = NamedTempFile::new().unwrap();
        mat.to_tsv(temp_file.path()).unwrap();

        let loaded = CellMatrix::from_tsv(temp_file.path()).unwrap();
        assert_eq!(loaded, mat);
    }

    #[test]
    fn test_tsv_without_columns() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "variant").unwrap();
        writeln!(file, "v1").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            CellMatrix::from_tsv(file.path()),
            Err(MasplitError::EmptyData(_))
        ));
    }

    #[test]
    fn test_na_text_reads_back_missing() {
        let mat = CellMatrix::from_rows(vec![vec![cell("NA"), cell("")]]).unwrap();

        let mut out = Vec::new();
        mat.to_writer(&mut out).unwrap();
        let loaded = CellMatrix::from_reader(out.as_slice(), DEFAULT_MISSING).unwrap();

        assert_eq!(loaded.get(0, 0), None);
        assert_eq!(loaded.get(0, 1), Some(""));
    }

    #[test]
    fn test_missing_markers_keep_default() {
        assert_eq!(missing_markers::<&str>(&[]), vec!["NA"]);
        assert_eq!(missing_markers(&["."]), vec!["NA", "."]);
        assert_eq!(missing_markers(&[".", "NA", "."]), vec!["NA", "."]);
    }
}
