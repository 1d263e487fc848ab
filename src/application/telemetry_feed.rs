// Telemetry feed - timer driven sampling published as whole snapshots
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::telemetry::TelemetrySample;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub type Snapshot = Option<Arc<TelemetrySample>>;

/// Shortest sampling period; `tokio::time::interval` rejects a zero period
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

pub struct TelemetryFeed;

impl TelemetryFeed {
    /// Spawns the sampling task. Each tick replaces the published sample in
    /// one `watch` send, so subscribers never see a partially updated sample.
    pub fn start<S: TelemetrySource>(mut source: S, period: Duration) -> FeedHandle {
        let (tx, rx) = watch::channel::<Snapshot>(None);
        let source_name = source.name().to_string();
        if period < MIN_PERIOD {
            tracing::warn!(source = %source_name, ?period, "sampling period too short, using {:?}", MIN_PERIOD);
        }
        let period = period.max(MIN_PERIOD);
        tracing::info!(source = %source_name, ?period, "starting telemetry feed");

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first interval tick completes immediately; skip it so the
            // first sample lands one full period after start.
            ticker.tick().await;
            let mut seq = 0u64;
            loop {
                ticker.tick().await;
                seq += 1;
                let sample = Arc::new(source.next_sample(seq));
                if tx.send(Some(sample)).is_err() {
                    tracing::debug!("all feed subscribers dropped");
                }
            }
        });

        FeedHandle {
            source_name,
            rx,
            task: Some(task),
        }
    }
}

/// Owner of a running feed; stopping or dropping it cancels the timer
pub struct FeedHandle {
    source_name: String,
    rx: watch::Receiver<Snapshot>,
    task: Option<JoinHandle<()>>,
}

impl FeedHandle {
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.rx.clone()
    }

    pub fn latest(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancels the sampling task and waits until it has fully exited
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            tracing::info!(source = %self.source_name, "telemetry feed stopped");
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Holds at most one live feed for a view; switching sources releases the
/// previous feed before the next one starts.
pub struct ChartSession {
    period: Duration,
    feed: Option<FeedHandle>,
    generation: u64,
}

impl ChartSession {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            feed: None,
            generation: 0,
        }
    }

    pub async fn switch_source<S: TelemetrySource>(&mut self, source: S) -> watch::Receiver<Snapshot> {
        if let Some(previous) = self.feed.take() {
            previous.stop().await;
        }
        self.generation += 1;
        let handle = TelemetryFeed::start(source, self.period);
        let rx = handle.subscribe();
        self.feed = Some(handle);
        rx
    }

    pub fn feed(&self) -> Option<&FeedHandle> {
        self.feed.as_ref()
    }

    pub fn latest(&self) -> Snapshot {
        self.feed.as_ref().and_then(FeedHandle::latest)
    }

    pub fn subscribe(&self) -> Option<watch::Receiver<Snapshot>> {
        self.feed.as_ref().map(FeedHandle::subscribe)
    }

    /// Number of feeds started over the session's lifetime
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn close(&mut self) {
        if let Some(feed) = self.feed.take() {
            feed.stop().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::{DockReading, Phase, PhaseReading};
    use chrono::Utc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Writes the tick number into every field so torn samples are detectable
    struct Counting {
        calls: Arc<AtomicU64>,
    }

    impl TelemetrySource for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn next_sample(&mut self, seq: u64) -> TelemetrySample {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let v = 210.0 + (seq % 20) as f64;
            TelemetrySample {
                seq,
                taken_at: Utc::now(),
                phases: Phase::ALL
                    .iter()
                    .map(|&phase| PhaseReading { phase, voltage: v, current: 1.0 + (seq % 2) as f64 })
                    .collect(),
                docks: vec![DockReading {
                    dock: 1,
                    active: true,
                    power_kwh: seq as f64 * 0.25,
                    frequency_hz: 60.0,
                }],
            }
        }
    }

    fn counting() -> (Counting, Arc<AtomicU64>) {
        let calls = Arc::new(AtomicU64::new(0));
        (Counting { calls: calls.clone() }, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_ticks_yield_three_whole_samples() {
        let (source, _) = counting();
        let handle = TelemetryFeed::start(source, Duration::from_secs(5));
        let mut rx = handle.subscribe();

        let mut seen = Vec::new();
        for _ in 0..3 {
            rx.changed().await.unwrap();
            let sample = rx.borrow_and_update().clone().unwrap();
            seen.push(sample);
        }

        let seqs: Vec<u64> = seen.iter().map(|s| s.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        for sample in &seen {
            assert!(sample.within_domain());
            let expected_v = 210.0 + (sample.seq % 20) as f64;
            assert!(sample.phases.iter().all(|p| p.voltage == expected_v));
            assert_eq!(sample.docks[0].power_kwh, sample.seq as f64 * 0.25);
        }
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_still_samples() {
        let (source, _) = counting();
        let handle = TelemetryFeed::start(source, Duration::ZERO);
        let mut rx = handle.subscribe();
        rx.changed().await.unwrap();
        assert!(handle.is_running());
        assert!(handle.latest().is_some_and(|s| s.seq >= 1));
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_leaves_no_running_timer() {
        let (source, calls) = counting();
        let handle = TelemetryFeed::start(source, Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(handle.is_running());
        handle.stop().await;

        let after_stop = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_feed() {
        let (source, calls) = counting();
        let handle = TelemetryFeed::start(source, Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        drop(handle);
        tokio::task::yield_now().await;

        let after_drop = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_drop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_source_releases_previous_feed() {
        let (first, first_calls) = counting();
        let (second, second_calls) = counting();
        let mut session = ChartSession::new(Duration::from_secs(1));

        session.switch_source(first).await;
        tokio::time::sleep(Duration::from_millis(2500)).await;
        let mut rx = session.switch_source(second).await;
        let first_total = first_calls.load(Ordering::SeqCst);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().map(|s| s.seq), Some(1));
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(first_calls.load(Ordering::SeqCst), first_total);
        assert!(second_calls.load(Ordering::SeqCst) >= 5);
        assert_eq!(session.generation(), 2);

        session.close().await;
        assert!(session.feed().is_none());
        assert!(session.latest().is_none());
    }
}
