//! Per-producer results and the aggregate run summary.

use hdrhistogram::Histogram;
use std::time::Duration;

/// One failed send, converted to data at the producer boundary.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub source: String,
    pub line: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Outcome of one producer task, finalized when its source is exhausted
/// and immutable afterwards.
pub struct ProducerResult {
    pub source: String,
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub failures: Vec<FailureRecord>,
    /// Set when the source itself could not be opened (attempted stays 0).
    pub source_error: Option<String>,
    pub elapsed: Duration,
    pub latency: Histogram<u64>,
}

impl ProducerResult {
    pub fn new(source: String) -> Self {
        Self {
            source,
            attempted: 0,
            succeeded: 0,
            failed: 0,
            failures: Vec::new(),
            source_error: None,
            elapsed: Duration::ZERO,
            latency: new_latency_hist(),
        }
    }

    pub fn unopened(source: String, error: String) -> Self {
        let mut result = Self::new(source);
        result.source_error = Some(error);
        result
    }

    pub fn record_success(&mut self, latency_ns: u64) {
        self.attempted += 1;
        self.succeeded += 1;
        let _ = self.latency.record(latency_ns.max(1));
    }

    pub fn record_failure(&mut self, failure: FailureRecord) {
        self.attempted += 1;
        self.failed += 1;
        self.failures.push(failure);
    }

    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{:.3},{},{},{}",
            self.source,
            self.attempted,
            self.succeeded,
            self.failed,
            self.elapsed.as_secs_f64(),
            self.latency.value_at_quantile(0.5),
            self.latency.value_at_quantile(0.95),
            self.latency.value_at_quantile(0.99),
        )
    }

    pub fn csv_header() -> &'static str {
        "source,attempted,succeeded,failed,elapsed_s,latency_ns_p50,latency_ns_p95,latency_ns_p99"
    }
}

/// Aggregate of all producer results; terminal artifact of a run.
pub struct DispatchSummary {
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub producers: Vec<ProducerResult>,
    pub elapsed: Duration,
    pub latency: Histogram<u64>,
}

impl DispatchSummary {
    pub fn aggregate(producers: Vec<ProducerResult>, elapsed: Duration) -> Self {
        let mut attempted = 0;
        let mut succeeded = 0;
        let mut failed = 0;
        let mut latency = new_latency_hist();
        for p in &producers {
            attempted += p.attempted;
            succeeded += p.succeeded;
            failed += p.failed;
            let _ = latency.add(&p.latency);
        }
        Self {
            attempted,
            succeeded,
            failed,
            producers,
            elapsed,
            latency,
        }
    }

    /// True when every producer ended on a source-open failure, i.e. the
    /// run performed no work at all.
    pub fn all_sources_failed(&self) -> bool {
        !self.producers.is_empty() && self.producers.iter().all(|p| p.source_error.is_some())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.producers.iter().flat_map(|p| p.failures.iter())
    }

    pub fn to_csv_row(&self) -> String {
        format!(
            "TOTAL,{},{},{},{:.3},{},{},{}",
            self.attempted,
            self.succeeded,
            self.failed,
            self.elapsed.as_secs_f64(),
            self.latency.value_at_quantile(0.5),
            self.latency.value_at_quantile(0.95),
            self.latency.value_at_quantile(0.99),
        )
    }
}

// 1ns to 60s range, 3 significant digits
fn new_latency_hist() -> Histogram<u64> {
    Histogram::new_with_bounds(1, 60_000_000_000, 3).unwrap()
}
