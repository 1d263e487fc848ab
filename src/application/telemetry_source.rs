// Source traits for simulated (or real) device data
use crate::domain::telemetry::{HistoryReport, TelemetrySample};

/// Produces one complete realtime sample per call
pub trait TelemetrySource: Send + 'static {
    /// Short name used in logs when the feed switches sources
    fn name(&self) -> &str;

    /// Builds the next sample; `seq` is the tick number assigned by the feed
    fn next_sample(&mut self, seq: u64) -> TelemetrySample;
}

/// Produces hourly usage history for a dock
pub trait HistorySource: Send + Sync {
    fn hourly_usage(&self, dock: u32) -> HistoryReport;
}
