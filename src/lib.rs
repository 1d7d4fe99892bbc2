//! `chest-analytics` ingests delimited chest-score export files of unknown
//! encoding and locale formatting into a canonical in-memory dataset, and
//! computes the grouped aggregate views consumed by table, chart, and report
//! frontends.
//!
//! The pipeline is strictly linear:
//!
//! bytes → decoded table → normalized text → validated schema → typed
//! records → aggregate bundle
//!
//! ## Ingestion
//!
//! [`ingestion::ingest_bytes`] resolves the encoding (UTF-8 with BOM
//! handling, then single-byte Western/Central-European candidates) and the
//! field separator (`,` then `;`), repairs mojibake, normalizes text to NFC,
//! validates the required fields `DATE, PLAYER, SOURCE, CHEST, SCORE`
//! case-insensitively, and coerces types. Rows whose score or date cannot be
//! parsed are dropped and counted, not kept as nulls.
//!
//! ```
//! use chest_analytics::ingestion::{ingest_bytes, IngestOptions};
//!
//! # fn main() -> Result<(), chest_analytics::IngestError> {
//! let data = b"Date,Player,Source,Chest,Score\n\
//! 2024-01-01,Alice,Guild,Gold,100\n\
//! 2024-01-02,Bob,Battle,Silver,200\n";
//!
//! let outcome = ingest_bytes(data, &IngestOptions::default())?;
//! assert_eq!(outcome.dataset.record_count(), 2);
//! assert_eq!(outcome.dropped_rows, 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Aggregation
//!
//! [`analysis::AnalysisBundle::compute`] derives every view from a dataset;
//! it never fails, and an empty dataset yields empty views.
//!
//! ```
//! use chest_analytics::analysis::AnalysisBundle;
//! use chest_analytics::ingestion::{ingest_bytes, IngestOptions};
//! use chest_analytics::types::Value;
//!
//! # fn main() -> Result<(), chest_analytics::IngestError> {
//! let data = b"DATE,PLAYER,SOURCE,CHEST,SCORE\n\
//! 2024-01-01,Alice,Guild,Gold,100\n\
//! 2024-01-02,Bob,Battle,Silver,200\n\
//! 2024-01-01,Alice,Event,Gold,50\n";
//!
//! let outcome = ingest_bytes(data, &IngestOptions::default())?;
//! let bundle = AnalysisBundle::compute(outcome.dataset);
//!
//! let totals = bundle.view("player_totals").unwrap();
//! assert_eq!(totals.rows[0][0], Value::Text("Bob".to_string()));
//! assert_eq!(totals.rows[0][1], Value::Float(200.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Sessions and filtering
//!
//! [`session::AnalysisSession`] holds the full dataset for the lifetime of a
//! load and recomputes the bundle from it on every filter change, so
//! filtering is idempotent and never loses rows.
//!
//! ## Export
//!
//! [`export::write_view`] serializes any view as comma-delimited UTF-8 —
//! always UTF-8, whatever encoding the input arrived in — so exported data
//! re-ingests losslessly.
//!
//! ## Modules
//!
//! - [`ingestion`]: encoding resolution, text repair, schema validation,
//!   type coercion, the unified pipeline, and observer hooks
//! - [`analysis`]: aggregate views and the immutable bundle
//! - [`session`]: load/filter lifecycle for application frontends
//! - [`export`]: UTF-8 delimited output
//! - [`types`]: raw table, canonical records, cells, filters
//! - [`error`]: the error taxonomy

pub mod analysis;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod session;
pub mod types;

pub use error::{IngestError, IngestResult};
