//! Configuration for splitting delimited cells.

use crate::error::{MasplitError, Result};
use serde::{Deserialize, Serialize};

/// How a cell is reduced to a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Report the number of records in the cell.
    Count,
    /// Report one record, chosen by its 1-based position.
    #[default]
    Select,
}

/// Direction in which records are sorted before selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Largest value first.
    #[default]
    Decreasing,
    /// Smallest value first.
    Increasing,
}

impl TryFrom<i64> for SortOrder {
    type Error = MasplitError;

    /// Interpret an integer flag: 1 is decreasing, 0 is increasing.
    fn try_from(flag: i64) -> Result<Self> {
        match flag {
            1 => Ok(Self::Decreasing),
            0 => Ok(Self::Increasing),
            other => Err(MasplitError::InvalidSortOrder(other)),
        }
    }
}

/// What to do with a record that is not a valid number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseFailure {
    /// Use 0.0 in place of the record.
    #[default]
    Zero,
    /// Remove the record from the cell.
    Drop,
    /// Treat the whole cell as missing.
    Missing,
}

/// Settings shared by every cell of one split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Character separating records within a cell.
    pub delimiter: char,
    /// Count records or select one.
    pub mode: SplitMode,
    /// 1-based record to select. Must be at least one.
    pub record: i64,
    /// Sort records before selecting.
    pub sort: bool,
    /// Sort direction, used when `sort` is set.
    pub order: SortOrder,
    /// Handling of records that fail to parse.
    pub on_parse_error: ParseFailure,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            mode: SplitMode::Select,
            record: 1,
            sort: true,
            order: SortOrder::Decreasing,
            on_parse_error: ParseFailure::Zero,
        }
    }
}

impl SplitConfig {
    /// Create a config selecting the largest record of comma-delimited cells.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from integer flags.
    ///
    /// `count` and `sort` are enabled only when equal to 1. `decreasing` must
    /// be 1 or 0, `record` at least 1, and `delim` exactly one character.
    pub fn from_flags(delim: &str, count: i64, record: i64, sort: i64, decreasing: i64) -> Result<Self> {
        let mut chars = delim.chars();
        let delimiter = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(MasplitError::InvalidDelimiter(delim.to_string())),
        };

        let config = Self {
            delimiter,
            mode: if count == 1 {
                SplitMode::Count
            } else {
                SplitMode::Select
            },
            record,
            sort: sort == 1,
            order: SortOrder::try_from(decreasing)?,
            on_parse_error: ParseFailure::Zero,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the delimiter.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Report record counts instead of values.
    pub fn count(mut self) -> Self {
        self.mode = SplitMode::Count;
        self
    }

    /// Select the given 1-based record.
    pub fn select(mut self, record: i64) -> Self {
        self.mode = SplitMode::Select;
        self.record = record;
        self
    }

    /// Sort records in the given order before selecting.
    pub fn sorted(mut self, order: SortOrder) -> Self {
        self.sort = true;
        self.order = order;
        self
    }

    /// Keep records in their original order.
    pub fn unsorted(mut self) -> Self {
        self.sort = false;
        self
    }

    /// Set the handling of unparseable records.
    pub fn on_parse_error(mut self, policy: ParseFailure) -> Self {
        self.on_parse_error = policy;
        self
    }

    /// Check the config before any cell is processed.
    pub fn validate(&self) -> Result<()> {
        if self.record < 1 {
            return Err(MasplitError::InvalidRecord(self.record));
        }
        Ok(())
    }

    /// 0-based position of the selected record.
    pub(crate) fn record_index(&self) -> usize {
        // Positions beyond usize are out of range for any cell
        usize::try_from(self.record.saturating_sub(1)).unwrap_or(usize::MAX)
    }

    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(MasplitError::from)
    }
}
