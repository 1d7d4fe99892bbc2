//! Application-facing session state: one loaded dataset, one current bundle.
//!
//! An [`AnalysisSession`] owns the full [`CanonicalDataset`] for the lifetime
//! of a loaded file and the [`AnalysisBundle`] currently shown to consumers.
//! Filtering always recomputes from the full dataset, so applying the same
//! filter repeatedly yields identical bundles, and clearing the filter
//! restores the unfiltered bundle exactly.

use std::path::Path;

use crate::analysis::AnalysisBundle;
use crate::error::IngestResult;
use crate::ingestion::{IngestOptions, ingest_bytes, ingest_from_path};
use crate::types::{CanonicalDataset, RecordFilter};

/// Session state for one loaded export file.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSession {
    dataset: CanonicalDataset,
    bundle: AnalysisBundle,
    filter: Option<RecordFilter>,
    encoding: &'static str,
    separator: u8,
    lossy_decode: bool,
    dropped_rows: usize,
}

impl AnalysisSession {
    /// Ingest `buf` and compute the initial (unfiltered) bundle.
    pub fn load_bytes(buf: &[u8], options: &IngestOptions) -> IngestResult<Self> {
        let outcome = ingest_bytes(buf, options)?;
        Ok(Self::from_outcome(outcome))
    }

    /// Read and ingest a file, then compute the initial bundle.
    pub fn load_path(path: impl AsRef<Path>, options: &IngestOptions) -> IngestResult<Self> {
        let outcome = ingest_from_path(path, options)?;
        Ok(Self::from_outcome(outcome))
    }

    fn from_outcome(outcome: crate::ingestion::IngestOutcome) -> Self {
        let bundle = AnalysisBundle::compute(outcome.dataset.clone());
        Self {
            dataset: outcome.dataset,
            bundle,
            filter: None,
            encoding: outcome.encoding,
            separator: outcome.separator,
            lossy_decode: outcome.lossy_decode,
            dropped_rows: outcome.dropped_rows,
        }
    }

    /// The full dataset as loaded (never filtered).
    pub fn dataset(&self) -> &CanonicalDataset {
        &self.dataset
    }

    /// The bundle for the current filter (or the full dataset if none).
    pub fn bundle(&self) -> &AnalysisBundle {
        &self.bundle
    }

    /// The currently applied filter, if any.
    pub fn filter(&self) -> Option<&RecordFilter> {
        self.filter.as_ref()
    }

    /// Recompute the bundle over the restriction of the full dataset.
    pub fn apply_filter(&mut self, filter: RecordFilter) {
        self.bundle = AnalysisBundle::compute(filter.apply(&self.dataset));
        self.filter = Some(filter);
    }

    /// Drop any filter and restore the unfiltered bundle.
    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.bundle = AnalysisBundle::compute(self.dataset.clone());
    }

    /// Name of the encoding the load resolved to.
    pub fn encoding(&self) -> &'static str {
        self.encoding
    }

    /// Field separator the load resolved to.
    pub fn separator(&self) -> u8 {
        self.separator
    }

    /// True when the input only decoded with replacement characters.
    pub fn lossy_decode(&self) -> bool {
        self.lossy_decode
    }

    /// Rows excluded by failed type coercion during the load.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }
}
