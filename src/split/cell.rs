//! Reduction of a single delimited cell.

use super::config::{ParseFailure, SortOrder, SplitConfig, SplitMode};
use crate::error::Result;

/// Split a cell into its records.
///
/// Consecutive delimiters are not merged, so empty records are kept.
pub fn split_records(text: &str, delimiter: char) -> Vec<&str> {
    text.split(delimiter).collect()
}

/// Parse records as floats.
///
/// Surrounding whitespace is ignored. Records that are not numbers are
/// logged and handled by `policy`; returns `None` when the policy makes the
/// whole cell missing.
pub fn parse_records(text: &str, records: &[&str], policy: ParseFailure) -> Option<Vec<f64>> {
    let mut values = Vec::with_capacity(records.len());
    for record in records {
        match record.trim().parse::<f64>() {
            Ok(value) => values.push(value),
            Err(_) => {
                tracing::warn!(cell = text, record = *record, "failed to convert record to a float");
                match policy {
                    ParseFailure::Zero => values.push(0.0),
                    ParseFailure::Drop => {}
                    ParseFailure::Missing => return None,
                }
            }
        }
    }
    Some(values)
}

/// Sort values in place with a total order over floats.
pub fn sort_values(values: &mut [f64], order: SortOrder) {
    match order {
        SortOrder::Decreasing => values.sort_unstable_by(|a, b| b.total_cmp(a)),
        SortOrder::Increasing => values.sort_unstable_by(|a, b| a.total_cmp(b)),
    }
}

/// Reduce one cell to a number.
///
/// Missing cells stay missing. In count mode the number of parsed records is
/// returned; in select mode the records are optionally sorted and the
/// configured record is returned, or `None` if the cell has fewer records.
///
/// The config is validated first; an invalid record is an error rather than
/// a per-cell outcome.
pub fn reduce_cell(cell: Option<&str>, config: &SplitConfig) -> Result<Option<f64>> {
    config.validate()?;
    Ok(reduce_validated(cell, config))
}

/// Reduce one cell with a config that already passed
/// [`SplitConfig::validate`].
pub(crate) fn reduce_validated(cell: Option<&str>, config: &SplitConfig) -> Option<f64> {
    let text = cell?;
    let records = split_records(text, config.delimiter);
    let mut values = parse_records(text, &records, config.on_parse_error)?;

    match config.mode {
        SplitMode::Count => Some(values.len() as f64),
        SplitMode::Select => {
            if config.sort {
                sort_values(&mut values, config.order);
            }
            values.get(config.record_index()).copied()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MasplitError;

    fn select(record: i64) -> SplitConfig {
        SplitConfig::new().select(record)
    }

    fn reduce(cell: Option<&str>, config: &SplitConfig) -> Option<f64> {
        reduce_cell(cell, config).unwrap()
    }

    #[test]
    fn test_split_keeps_empty_records() {
        assert_eq!(split_records("7,,2,", ','), vec!["7", "", "2", ""]);
        assert_eq!(split_records("", ','), vec![""]);
        assert_eq!(split_records("9", ','), vec!["9"]);
        assert_eq!(split_records("1|2", '|'), vec!["1", "2"]);
    }

    #[test]
    fn test_parse_accepts_float_grammar() {
        let records = ["-1.5", "+2", "3e2", " 4 ", ".5"];
        let values = parse_records("", &records, ParseFailure::Zero).unwrap();
        assert_eq!(values, vec![-1.5, 2.0, 300.0, 4.0, 0.5]);
    }

    #[test]
    fn test_parse_failure_policies() {
        let records = ["7", "x", "2"];
        assert_eq!(
            parse_records("7,x,2", &records, ParseFailure::Zero),
            Some(vec![7.0, 0.0, 2.0])
        );
        assert_eq!(
            parse_records("7,x,2", &records, ParseFailure::Drop),
            Some(vec![7.0, 2.0])
        );
        assert_eq!(parse_records("7,x,2", &records, ParseFailure::Missing), None);
    }

    #[test]
    fn test_sort_values() {
        let mut values = vec![7.0, 2.0, 12.0, f64::NEG_INFINITY];
        sort_values(&mut values, SortOrder::Decreasing);
        assert_eq!(values, vec![12.0, 7.0, 2.0, f64::NEG_INFINITY]);
        sort_values(&mut values, SortOrder::Increasing);
        assert_eq!(values, vec![f64::NEG_INFINITY, 2.0, 7.0, 12.0]);
    }

    #[test]
    fn test_missing_cell_stays_missing() {
        assert_eq!(reduce(None, &SplitConfig::new()), None);
        assert_eq!(reduce(None, &SplitConfig::new().count()), None);
        assert_eq!(reduce(None, &select(3).unsorted()), None);
    }

    #[test]
    fn test_count_ignores_sort_and_record() {
        let configs = [
            SplitConfig::new().count(),
            SplitConfig::new().count().unsorted(),
            SplitConfig::new().select(5).sorted(SortOrder::Increasing).count(),
        ];
        for config in &configs {
            assert_eq!(reduce(Some("a,b,c"), config), Some(3.0));
        }
        assert_eq!(reduce(Some(""), &SplitConfig::new().count()), Some(1.0));
        assert_eq!(reduce(Some("1,,2"), &SplitConfig::new().count()), Some(3.0));
    }

    #[test]
    fn test_count_with_drop_policy() {
        let config = SplitConfig::new().count().on_parse_error(ParseFailure::Drop);
        assert_eq!(reduce(Some("1,x,2"), &config), Some(2.0));
    }

    #[test]
    fn test_select_unsorted() {
        let config = select(2).unsorted();
        assert_eq!(reduce(Some("7,2,12"), &config), Some(2.0));
    }

    #[test]
    fn test_select_sorted_decreasing() {
        let config = select(1).sorted(SortOrder::Decreasing);
        assert_eq!(reduce(Some("7,2,12"), &config), Some(12.0));
    }

    #[test]
    fn test_select_sorted_increasing() {
        let config = select(3).sorted(SortOrder::Increasing);
        assert_eq!(reduce(Some("7,2,12"), &config), Some(12.0));
        let config = select(1).sorted(SortOrder::Increasing);
        assert_eq!(reduce(Some("7,2,12"), &config), Some(2.0));
    }

    #[test]
    fn test_select_out_of_range_is_missing() {
        assert_eq!(reduce(Some("9"), &select(2)), None);
        assert_eq!(reduce(Some("9"), &select(2).unsorted()), None);
    }

    #[test]
    fn test_select_with_unparseable_record() {
        // "x" becomes 0.0 and sorts last in decreasing order
        let config = select(3);
        assert_eq!(reduce(Some("7,x,2"), &config), Some(0.0));

        let config = select(3).on_parse_error(ParseFailure::Drop);
        assert_eq!(reduce(Some("7,x,2"), &config), None);

        let config = select(1).on_parse_error(ParseFailure::Missing);
        assert_eq!(reduce(Some("7,x,2"), &config), None);
    }

    #[test]
    fn test_custom_delimiter() {
        let config = select(1).delimiter('|');
        assert_eq!(reduce(Some("3|8|1"), &config), Some(8.0));
    }

    #[test]
    fn test_invalid_record_rejected() {
        for record in [0, -5] {
            let config = SplitConfig {
                record,
                ..SplitConfig::default()
            };
            assert!(matches!(
                reduce_cell(Some("7,2,12"), &config),
                Err(MasplitError::InvalidRecord(r)) if r == record
            ));
            // Missing cells do not bypass validation
            assert!(reduce_cell(None, &config).is_err());
        }
    }

    #[test]
    fn test_huge_record_is_missing() {
        assert_eq!(reduce(Some("7,2,12"), &select(i64::MAX)), None);
        assert_eq!(reduce(Some("7,2,12"), &select(i64::MAX).unsorted()), None);
    }
}
