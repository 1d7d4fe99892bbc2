//! Typed coercion of validated tables into canonical records.
//!
//! `SCORE` is parsed as a float after locale-decimal repair (`,` → `.`);
//! `DATE` is parsed with a day-first format chain. A row failing either parse
//! is excluded from the dataset, never retained with a null — the count of
//! dropped rows is returned for diagnostics and is not an error.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::{IngestError, IngestResult};
use crate::types::{CanonicalDataset, CanonicalRecord, RawTable, REQUIRED_FIELDS};

/// Date formats tried in order. Day-first forms come before anything that
/// could swallow them, so an ambiguous `01/02` always reads day 1, month 2.
/// Two-digit-year forms precede their four-digit twins because `%Y` would
/// otherwise accept `24` as the year 24 AD.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
];

/// Result of coercing one table: the typed dataset plus how many rows were
/// excluded because SCORE or DATE failed to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionOutcome {
    /// The typed dataset.
    pub dataset: CanonicalDataset,
    /// Number of input rows excluded by failed coercion.
    pub dropped_rows: usize,
}

/// Coerce a schema-validated table into a [`CanonicalDataset`].
///
/// Expects the canonical uppercase column names to be present (the schema
/// stage guarantees this); all other columns ride along as extras in their
/// original order.
pub fn coerce_table(table: &RawTable) -> IngestResult<CoercionOutcome> {
    let date_idx = require_column(table, "DATE")?;
    let player_idx = require_column(table, "PLAYER")?;
    let source_idx = require_column(table, "SOURCE")?;
    let chest_idx = require_column(table, "CHEST")?;
    let score_idx = require_column(table, "SCORE")?;

    let canonical = [date_idx, player_idx, source_idx, chest_idx, score_idx];
    let extra_idx: Vec<usize> = (0..table.columns.len())
        .filter(|idx| !canonical.contains(idx))
        .collect();
    let extra_columns: Vec<String> = extra_idx
        .iter()
        .map(|&idx| table.columns[idx].clone())
        .collect();

    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped_rows = 0usize;
    for row in &table.rows {
        let score = row.get(score_idx).and_then(|raw| parse_score(raw));
        let date = row.get(date_idx).and_then(|raw| parse_date(raw));
        let (Some(score), Some(date)) = (score, date) else {
            dropped_rows += 1;
            continue;
        };
        records.push(CanonicalRecord {
            date,
            player: cell(row, player_idx),
            source: cell(row, source_idx),
            chest: cell(row, chest_idx),
            score,
            extras: extra_idx.iter().map(|&idx| cell(row, idx)).collect(),
        });
    }

    if dropped_rows > 0 {
        warn!(
            dropped_rows,
            kept = records.len(),
            "dropped rows with unparseable SCORE or DATE"
        );
    }

    Ok(CoercionOutcome {
        dataset: CanonicalDataset::new(extra_columns, records),
        dropped_rows,
    })
}

/// Parse a score cell: locale decimal commas become periods, and only finite
/// numbers are accepted.
pub fn parse_score(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.replace(',', ".").parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Parse a date cell using the day-first format chain.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

fn require_column(table: &RawTable, name: &'static str) -> IngestResult<usize> {
    table
        .column_index(name)
        .ok_or_else(|| IngestError::SchemaValidation {
            missing: vec![name.to_string()],
        })
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).map(|s| s.trim().to_owned()).unwrap_or_default()
}
