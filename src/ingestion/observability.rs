//! Observer hooks for ingestion outcomes.
//!
//! The pipeline reports each attempt's outcome to an optional
//! [`IngestObserver`]; implementors can record metrics or raise alerts.
//! [`TracingObserver`] is the stock implementation and forwards everything to
//! the `tracing` subscriber.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use crate::error::IngestError;

/// Severity classification used for observer callbacks and alert thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the ingestion call failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone, Default)]
pub struct IngestContext {
    /// Input path, when ingestion started from a file.
    pub path: Option<PathBuf>,
}

/// Stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    /// Number of canonical records produced.
    pub rows: usize,
    /// Number of rows excluded by failed type coercion (informational).
    pub dropped_rows: usize,
}

/// Observer interface for ingestion outcomes.
pub trait IngestObserver: Send + Sync {
    /// Called when ingestion succeeds.
    fn on_success(&self, _ctx: &IngestContext, _stats: IngestStats) {}

    /// Called when ingestion fails.
    fn on_failure(&self, _ctx: &IngestContext, _severity: IngestSeverity, _error: &IngestError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestContext, severity: IngestSeverity, error: &IngestError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestObserver>>,
}

impl CompositeObserver {
    /// Create a composite from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestContext, stats: IngestStats) {
        for observer in &self.observers {
            observer.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestContext, severity: IngestSeverity, error: &IngestError) {
        for observer in &self.observers {
            observer.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestContext, severity: IngestSeverity, error: &IngestError) {
        for observer in &self.observers {
            observer.on_alert(ctx, severity, error);
        }
    }
}

/// Forwards ingestion outcomes to the `tracing` subscriber.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestContext, stats: IngestStats) {
        info!(
            path = ?ctx.path,
            rows = stats.rows,
            dropped_rows = stats.dropped_rows,
            "ingestion succeeded"
        );
    }

    fn on_failure(&self, ctx: &IngestContext, severity: IngestSeverity, error: &IngestError) {
        error!(path = ?ctx.path, ?severity, %error, "ingestion failed");
    }

    fn on_alert(&self, ctx: &IngestContext, severity: IngestSeverity, error: &IngestError) {
        error!(path = ?ctx.path, ?severity, %error, "ingestion alert");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        successes: Mutex<Vec<IngestStats>>,
        failures: Mutex<Vec<IngestSeverity>>,
    }

    impl IngestObserver for Recording {
        fn on_success(&self, _ctx: &IngestContext, stats: IngestStats) {
            self.successes.lock().unwrap().push(stats);
        }

        fn on_failure(&self, _ctx: &IngestContext, severity: IngestSeverity, _error: &IngestError) {
            self.failures.lock().unwrap().push(severity);
        }
    }

    #[test]
    fn severity_ordering_supports_thresholds() {
        assert!(IngestSeverity::Critical > IngestSeverity::Error);
        assert!(IngestSeverity::Error > IngestSeverity::Warning);
        assert!(IngestSeverity::Warning > IngestSeverity::Info);
    }

    #[test]
    fn composite_fans_out_to_all_observers() {
        let a = Arc::new(Recording::default());
        let b = Arc::new(Recording::default());
        let composite = CompositeObserver::new(vec![a.clone(), b.clone()]);

        let ctx = IngestContext::default();
        composite.on_success(
            &ctx,
            IngestStats {
                rows: 3,
                dropped_rows: 1,
            },
        );
        composite.on_failure(&ctx, IngestSeverity::Error, &IngestError::EmptyInput);

        assert_eq!(a.successes.lock().unwrap().len(), 1);
        assert_eq!(b.successes.lock().unwrap().len(), 1);
        assert_eq!(a.failures.lock().unwrap().len(), 1);
        assert_eq!(b.failures.lock().unwrap().len(), 1);
    }
}
