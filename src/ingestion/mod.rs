//! Ingestion pipeline stages and the unified entrypoint.
//!
//! Most callers should use [`ingest_bytes`] or [`ingest_from_path`] (from
//! [`pipeline`]), which:
//!
//! - resolve the input's encoding and field separator ([`encoding`])
//! - repair mojibake and normalize text to NFC ([`normalize`])
//! - validate required fields and canonicalize column names ([`schema`])
//! - coerce SCORE/DATE, excluding unparseable rows ([`coerce`])
//! - optionally report the outcome to an [`IngestObserver`]
//!
//! Stage-specific functions are also available in the submodules for callers
//! that need to run a single stage (e.g. re-parsing an exported view).

pub mod coerce;
pub mod encoding;
pub mod normalize;
pub mod observability;
pub mod pipeline;
pub mod schema;

pub use coerce::{CoercionOutcome, coerce_table};
pub use encoding::{DEFAULT_ENCODINGS, DEFAULT_SEPARATORS, DecodedTable, resolve_bytes};
pub use normalize::{NormalizeOptions, normalize_table};
pub use observability::{
    CompositeObserver, IngestContext, IngestObserver, IngestSeverity, IngestStats, TracingObserver,
};
pub use pipeline::{CancelToken, IngestOptions, IngestOutcome, ingest_bytes, ingest_from_path};
pub use schema::validate_columns;
