//! Delimited export of result views.
//!
//! Output is always UTF-8, regardless of what encoding was detected on
//! input, so non-ASCII names survive a round trip: re-ingesting an exported
//! `raw` view reproduces equivalent canonical records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analysis::AggregationView;
use crate::error::IngestResult;

/// Write `view` as comma-delimited UTF-8 to `writer`.
///
/// Cells are rendered via [`crate::types::Value`]'s `Display`: ISO dates,
/// minimal float form, empty string for null.
pub fn write_view<W: Write>(view: &AggregationView, writer: W) -> IngestResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&view.columns)?;
    for row in &view.rows {
        out.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    out.flush()?;
    Ok(())
}

/// Write `view` as a comma-delimited UTF-8 file at `path`.
pub fn write_view_to_path(view: &AggregationView, path: impl AsRef<Path>) -> IngestResult<()> {
    let file = File::create(path)?;
    write_view(view, BufWriter::new(file))
}

/// Render `view` as an in-memory UTF-8 CSV string.
pub fn view_to_string(view: &AggregationView) -> IngestResult<String> {
    let mut buf = Vec::new();
    write_view(view, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
