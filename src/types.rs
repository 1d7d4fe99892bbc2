//! Core data model types.
//!
//! Ingestion decodes raw bytes into a [`RawTable`], which the pipeline
//! normalizes, validates, and coerces into a [`CanonicalDataset`] of typed
//! [`CanonicalRecord`]s. Aggregation renders results as tables of [`Value`]
//! cells (see [`crate::analysis`]).

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;

/// Canonical required field names, stored uppercase, in canonical order.
pub const REQUIRED_FIELDS: [&str; 5] = ["DATE", "PLAYER", "SOURCE", "CHEST", "SCORE"];

/// A decoded but untyped table: ordered column names plus row-major raw cells.
///
/// Produced by the encoding resolver, repaired by the text normalizer, and
/// renamed by the schema mapper. Discarded once a [`CanonicalDataset`] exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Column names in file order.
    pub columns: Vec<String>,
    /// Row-major raw string cells, one `Vec<String>` per row.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows (headers excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a column by exact name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// A single typed cell in an aggregation or raw view.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer (counts).
    Int(i64),
    /// 64-bit float (scores, totals, means).
    Float(f64),
    /// Calendar date.
    Date(NaiveDate),
    /// UTF-8 text.
    Text(String),
}

impl Value {
    /// Numeric reading of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// True for [`Value::Int`] and [`Value::Float`].
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }
}

/// Export rendering: ISO dates, minimal float form, empty string for null.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// One fully typed row.
///
/// Invariants: `score` is finite, `date` is a valid calendar date, and
/// `extras` is aligned with the owning dataset's `extra_columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    /// Calendar date of the entry.
    pub date: NaiveDate,
    /// Player name.
    pub player: String,
    /// Where the chest came from (guild, battle, event, ...).
    pub source: String,
    /// Chest kind.
    pub chest: String,
    /// Score value; always finite.
    pub score: f64,
    /// Preserved non-required columns, in `extra_columns` order.
    pub extras: Vec<String>,
}

/// Ordered sequence of [`CanonicalRecord`]s plus the preserved extra columns.
///
/// Rows that failed type coercion are excluded at construction time, never
/// retained with null values. Replaced wholesale on reload; filtering returns
/// a new dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalDataset {
    /// Names of preserved non-required columns, in file order.
    pub extra_columns: Vec<String>,
    /// Records in input order.
    pub records: Vec<CanonicalRecord>,
}

impl CanonicalDataset {
    /// Create a dataset from extra column names and records.
    pub fn new(extra_columns: Vec<String>, records: Vec<CanonicalRecord>) -> Self {
        Self {
            extra_columns,
            records,
        }
    }

    /// A dataset with no records and no extra columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// True if the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all scores.
    pub fn total_score(&self) -> f64 {
        self.records.iter().map(|r| r.score).sum()
    }

    /// Create a new dataset containing only records matching `predicate`.
    ///
    /// Preserves record order and the extra column list.
    pub fn filter_records<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&CanonicalRecord) -> bool,
    {
        let records = self
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        Self {
            extra_columns: self.extra_columns.clone(),
            records,
        }
    }
}

/// Grouping dimensions for the aggregate views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Group by player name.
    Player,
    /// Group by chest kind.
    Chest,
    /// Group by chest source.
    Source,
    /// Group by calendar date.
    Date,
}

impl Dimension {
    /// Canonical column name of this dimension.
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Player => "PLAYER",
            Dimension::Chest => "CHEST",
            Dimension::Source => "SOURCE",
            Dimension::Date => "DATE",
        }
    }
}

/// A declarative record filter: value subsets per text dimension plus an
/// inclusive date range. `None` fields match everything.
///
/// Applying the same filter twice yields the same dataset; filters never
/// mutate their input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Keep only these players.
    pub players: Option<BTreeSet<String>>,
    /// Keep only these chest kinds.
    pub chests: Option<BTreeSet<String>>,
    /// Keep only these sources.
    pub sources: Option<BTreeSet<String>>,
    /// Keep records dated on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Keep records dated on or before this date.
    pub date_to: Option<NaiveDate>,
}

impl RecordFilter {
    /// Does `record` pass every configured constraint?
    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        if let Some(players) = &self.players {
            if !players.contains(&record.player) {
                return false;
            }
        }
        if let Some(chests) = &self.chests {
            if !chests.contains(&record.chest) {
                return false;
            }
        }
        if let Some(sources) = &self.sources {
            if !sources.contains(&record.source) {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if record.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if record.date > to {
                return false;
            }
        }
        true
    }

    /// Returns the restricted dataset.
    pub fn apply(&self, dataset: &CanonicalDataset) -> CanonicalDataset {
        dataset.filter_records(|r| self.matches(r))
    }
}
