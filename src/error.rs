use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Error type returned by the ingestion pipeline.
///
/// Failures in encoding resolution and schema validation are fatal to an
/// ingestion call; row-level coercion problems are not errors (rows are
/// dropped and counted instead, see [`crate::ingestion::CoercionOutcome`]).
#[derive(Debug, Error)]
pub enum IngestError {
    /// The input buffer contained zero bytes; nothing was decoded.
    #[error("input is empty (0 bytes)")]
    EmptyInput,

    /// No candidate (encoding, separator) pair produced a usable table.
    ///
    /// Carries one human-readable reason per failed attempt so the final
    /// error is diagnosable.
    #[error("could not decode input as a delimited table; attempts: {}", .attempts.join("; "))]
    EncodingDetection { attempts: Vec<String> },

    /// One or more required columns had no case-insensitive match.
    #[error("missing required column(s): {}", .missing.join(", "))]
    SchemaValidation { missing: Vec<String> },

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited writer error during export.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The pipeline was cancelled between stages via
    /// [`crate::ingestion::CancelToken`].
    #[error("ingestion cancelled")]
    Cancelled,
}
