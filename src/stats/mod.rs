use chrono::{DateTime, Duration, Utc};
use log::info;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub responses_received: usize,
    pub bytes_downloaded: usize,
    pub status_codes: BTreeMap<u16, usize>,
    /// Entries dropped during parsing, keyed by what was being parsed.
    pub skipped_items: BTreeMap<String, usize>,
    pub average_response_time: f64, // in milliseconds
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<RunStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(RunStats {
                start_time: Utc::now(),
                end_time: None,
                total_requests: 0,
                successful_requests: 0,
                failed_requests: 0,
                responses_received: 0,
                bytes_downloaded: 0,
                status_codes: BTreeMap::new(),
                skipped_items: BTreeMap::new(),
                average_response_time: 0.0,
            })),
        }
    }

    pub fn record_request(&self, status: u16, size: usize, duration: Duration) {
        let mut stats = self.stats.write();
        stats.total_requests += 1;
        stats.responses_received += 1;

        if status < 400 {
            stats.successful_requests += 1;
        } else {
            stats.failed_requests += 1;
        }

        *stats.status_codes.entry(status).or_insert(0) += 1;
        stats.bytes_downloaded += size;

        let received = stats.responses_received as f64;
        let current_total = stats.average_response_time * (received - 1.0);
        let new_duration = duration.num_milliseconds() as f64;
        stats.average_response_time = (current_total + new_duration) / received;
    }

    /// A request that never produced a response (connect error, timeout).
    pub fn record_failure(&self) {
        let mut stats = self.stats.write();
        stats.total_requests += 1;
        stats.failed_requests += 1;
    }

    pub fn record_skipped(&self, kind: &str) {
        *self
            .stats
            .write()
            .skipped_items
            .entry(kind.to_string())
            .or_insert(0) += 1;
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> RunStats {
        self.stats.read().clone()
    }

    /// Logs the summary rather than printing it; stdout is reserved for results.
    pub fn log_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        info!(
            "Run finished in {}s: {} requests ({} ok, {} failed), {:.2} KB, avg {:.0}ms",
            duration.num_seconds(),
            stats.total_requests,
            stats.successful_requests,
            stats.failed_requests,
            stats.bytes_downloaded as f64 / 1_000.0,
            stats.average_response_time
        );
        for (code, count) in &stats.status_codes {
            info!("  status {}: {}", code, count);
        }
        for (kind, count) in &stats.skipped_items {
            info!("  skipped {}: {}", kind, count);
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
