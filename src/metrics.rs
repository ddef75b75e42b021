use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing pipeline and query activity.
#[derive(Default)]
pub struct ServiceMetrics {
    documents_processed: AtomicU64,
    chunks_embedded: AtomicU64,
    chunks_failed: AtomicU64,
    queries_answered: AtomicU64,
}

impl ServiceMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed processing run and its per-chunk outcomes.
    pub fn record_document(&self, embedded: u64, failed: u64) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.chunks_embedded.fetch_add(embedded, Ordering::Relaxed);
        self.chunks_failed.fetch_add(failed, Ordering::Relaxed);
    }

    /// Record an answered query (degraded answers included).
    pub fn record_query(&self) {
        self.queries_answered.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_processed: self.documents_processed.load(Ordering::Relaxed),
            chunks_embedded: self.chunks_embedded.load(Ordering::Relaxed),
            chunks_failed: self.chunks_failed.load(Ordering::Relaxed),
            queries_answered: self.queries_answered.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of activity counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of processing runs that reached the embedding stage.
    pub documents_processed: u64,
    /// Total chunks embedded and persisted across all runs.
    pub chunks_embedded: u64,
    /// Total chunks whose embedding attempt failed.
    pub chunks_failed: u64,
    /// Number of queries answered since startup.
    pub queries_answered: u64,
}
