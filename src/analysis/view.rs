//! Named result tables produced by the aggregation engine.

use std::cmp::Ordering;

use crate::types::Value;

/// Measure column substituted when a chart requests one a view lacks.
pub const DEFAULT_MEASURE: &str = "total";

/// A named table keyed by one dimension, with derived numeric columns.
///
/// The key column comes first. Invariant: one row per distinct key of the
/// source dimension. Views are value types; consumers re-sort by building a
/// new view via [`AggregationView::sorted_by`], never by mutating one in
/// place.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationView {
    /// View name (e.g. `player_totals`).
    pub name: String,
    /// Column names, key column first.
    pub columns: Vec<String>,
    /// Row-major cells in the same order as `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl AggregationView {
    /// Create a view from columns and rows.
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let view = Self {
            name: name.into(),
            columns,
            rows,
        };
        debug_assert!(
            view.rows.iter().all(|r| r.len() == view.columns.len()),
            "row arity must match column count"
        );
        view
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a column by exact name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// A copy of this view stably re-sorted by `column`.
    ///
    /// Equal cells keep their current relative order. Returns `None` for an
    /// unknown column.
    pub fn sorted_by(&self, column: &str, ascending: bool) -> Option<Self> {
        let idx = self.column_index(column)?;
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            let ord = cmp_cells(a.get(idx), b.get(idx));
            if ascending { ord } else { ord.reverse() }
        });
        Some(Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Pick the measure column for charting.
    ///
    /// The requested column wins when it exists and holds numbers; otherwise
    /// the documented default measure [`DEFAULT_MEASURE`] is substituted, and
    /// failing that the first numeric non-key column. `None` only when the
    /// view has no numeric column at all.
    pub fn measure_column(&self, requested: &str) -> Option<usize> {
        if let Some(idx) = self.column_index(requested) {
            if self.is_numeric_column(idx) {
                return Some(idx);
            }
        }
        if let Some(idx) = self.column_index(DEFAULT_MEASURE) {
            return Some(idx);
        }
        (1..self.columns.len()).find(|&idx| self.is_numeric_column(idx))
    }

    fn is_numeric_column(&self, idx: usize) -> bool {
        self.rows
            .iter()
            .any(|row| row.get(idx).is_some_and(Value::is_numeric))
    }
}

fn cmp_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => cmp_values(a, b),
    }
}

// Null sorts first, then numbers, dates, text; numbers compare across
// Int/Float.
fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => kind_rank(a).cmp(&kind_rank(b)),
        },
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Int(_) | Value::Float(_) => 1,
        Value::Date(_) => 2,
        Value::Text(_) => 3,
    }
}
