//! Unified ingestion entrypoint: bytes in, canonical dataset out.
//!
//! [`ingest_bytes`] (and the path convenience [`ingest_from_path`]) runs the
//! stages strictly in order:
//!
//! 1. encoding/separator resolution ([`super::encoding`])
//! 2. text repair + normalization ([`super::normalize`])
//! 3. schema validation + canonical renaming ([`super::schema`])
//! 4. type coercion ([`super::coerce`])
//!
//! Each stage either produces its output or fails the call with a typed
//! [`IngestError`]; no stage mutates shared state. All behavior is driven by
//! the [`IngestOptions`] value passed in — there are no process-wide toggles.
//! A [`CancelToken`] can be supplied so a superseded load can stop between
//! stages.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use encoding_rs::Encoding;
use tracing::debug;

use crate::error::{IngestError, IngestResult};
use crate::types::CanonicalDataset;

use super::coerce;
use super::encoding::{self, DEFAULT_ENCODINGS, DEFAULT_SEPARATORS};
use super::normalize::{self, NormalizeOptions};
use super::observability::{IngestContext, IngestObserver, IngestSeverity, IngestStats};
use super::schema;

/// Cooperative cancellation flag checked between pipeline stages.
///
/// Cloning shares the flag; cancelling any clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options controlling the ingestion pipeline.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestOptions {
    /// Candidate encodings tried in order; `None` uses
    /// [`DEFAULT_ENCODINGS`](super::encoding::DEFAULT_ENCODINGS).
    pub encodings: Option<Vec<&'static Encoding>>,
    /// Field separators tried in order; `None` uses
    /// [`DEFAULT_SEPARATORS`](super::encoding::DEFAULT_SEPARATORS).
    pub separators: Option<Vec<u8>>,
    /// Text normalizer options.
    pub normalize: NormalizeOptions,
    /// Optional observer for outcomes/alerts.
    pub observer: Option<Arc<dyn IngestObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestSeverity,
    /// Optional cooperative cancellation token.
    pub cancel: Option<CancelToken>,
}

impl fmt::Debug for IngestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestOptions")
            .field(
                "encodings",
                &self
                    .encodings
                    .as_ref()
                    .map(|e| e.iter().map(|enc| enc.name()).collect::<Vec<_>>()),
            )
            .field("separators", &self.separators)
            .field("normalize", &self.normalize)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("cancel_set", &self.cancel.is_some())
            .finish()
    }
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            encodings: None,
            separators: None,
            normalize: NormalizeOptions::default(),
            observer: None,
            alert_at_or_above: IngestSeverity::Critical,
            cancel: None,
        }
    }
}

/// Result of a successful ingestion: the dataset plus decode diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    /// The canonical dataset.
    pub dataset: CanonicalDataset,
    /// Name of the encoding actually used.
    pub encoding: &'static str,
    /// Field separator actually used.
    pub separator: u8,
    /// True when only the lossy/replacement decode succeeded.
    pub lossy_decode: bool,
    /// Rows excluded by failed type coercion (informational, non-fatal).
    pub dropped_rows: usize,
}

/// Ingest a raw byte buffer.
///
/// # Examples
///
/// ```
/// use chest_analytics::ingestion::{ingest_bytes, IngestOptions};
///
/// # fn main() -> Result<(), chest_analytics::IngestError> {
/// let data = b"Date,Player,Source,Chest,Score\n2024-01-01,Alice,Guild,Gold,100\n";
/// let outcome = ingest_bytes(data, &IngestOptions::default())?;
/// assert_eq!(outcome.dataset.record_count(), 1);
/// assert_eq!(outcome.encoding, "UTF-8");
/// # Ok(())
/// # }
/// ```
pub fn ingest_bytes(buf: &[u8], options: &IngestOptions) -> IngestResult<IngestOutcome> {
    observed(options, &IngestContext::default(), || {
        run_pipeline(buf, options)
    })
}

/// Read a file and ingest its contents.
///
/// I/O failures are reported through the observer (as Critical) like any
/// other pipeline failure.
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    options: &IngestOptions,
) -> IngestResult<IngestOutcome> {
    let path = path.as_ref();
    let ctx = IngestContext {
        path: Some(path.to_path_buf()),
    };
    observed(options, &ctx, || {
        let buf = std::fs::read(path)?;
        run_pipeline(&buf, options)
    })
}

fn observed<F>(
    options: &IngestOptions,
    ctx: &IngestContext,
    run: F,
) -> IngestResult<IngestOutcome>
where
    F: FnOnce() -> IngestResult<IngestOutcome>,
{
    let result = run();
    if let Some(observer) = options.observer.as_ref() {
        match &result {
            Ok(outcome) => observer.on_success(
                ctx,
                IngestStats {
                    rows: outcome.dataset.record_count(),
                    dropped_rows: outcome.dropped_rows,
                },
            ),
            Err(error) => {
                let severity = severity_for_error(error);
                observer.on_failure(ctx, severity, error);
                if severity >= options.alert_at_or_above {
                    observer.on_alert(ctx, severity, error);
                }
            }
        }
    }
    result
}

fn run_pipeline(buf: &[u8], options: &IngestOptions) -> IngestResult<IngestOutcome> {
    check_cancelled(options)?;
    let encodings = options.encodings.as_deref().unwrap_or(DEFAULT_ENCODINGS);
    let separators = options.separators.as_deref().unwrap_or(DEFAULT_SEPARATORS);

    let decoded = encoding::resolve_bytes(buf, encodings, separators)?;
    debug!(
        encoding = decoded.encoding,
        separator = %char::from(decoded.separator),
        lossy = decoded.lossy,
        rows = decoded.table.row_count(),
        "decoded input"
    );
    check_cancelled(options)?;

    let normalized = normalize::normalize_table(decoded.table, &options.normalize);
    check_cancelled(options)?;

    let validated = schema::validate_columns(normalized)?;
    check_cancelled(options)?;

    let coerced = coerce::coerce_table(&validated)?;
    Ok(IngestOutcome {
        dataset: coerced.dataset,
        encoding: decoded.encoding,
        separator: decoded.separator,
        lossy_decode: decoded.lossy,
        dropped_rows: coerced.dropped_rows,
    })
}

fn check_cancelled(options: &IngestOptions) -> IngestResult<()> {
    match &options.cancel {
        Some(token) if token.is_cancelled() => Err(IngestError::Cancelled),
        _ => Ok(()),
    }
}

fn severity_for_error(error: &IngestError) -> IngestSeverity {
    match error {
        IngestError::Io(_) => IngestSeverity::Critical,
        IngestError::Cancelled => IngestSeverity::Info,
        IngestError::EmptyInput
        | IngestError::EncodingDetection { .. }
        | IngestError::SchemaValidation { .. }
        | IngestError::Csv(_) => IngestSeverity::Error,
    }
}
