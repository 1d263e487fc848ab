// Realtime service - owns the live feed and fans samples out to streams
use crate::application::telemetry_feed::{ChartSession, Snapshot};
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::telemetry::TelemetrySample;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

const STREAM_BUFFER: usize = 16;

pub struct RealtimeService {
    session: Mutex<ChartSession>,
}

impl RealtimeService {
    pub fn new(period: Duration) -> Self {
        Self {
            session: Mutex::new(ChartSession::new(period)),
        }
    }

    /// Starts (or restarts) the feed on `source`
    pub async fn activate<S: TelemetrySource>(&self, source: S) {
        self.session.lock().await.switch_source(source).await;
    }

    pub async fn latest(&self) -> Snapshot {
        self.session.lock().await.latest()
    }

    pub async fn is_active(&self) -> bool {
        self.session
            .lock()
            .await
            .feed()
            .is_some_and(|feed| feed.is_running())
    }

    /// Forwards every new sample until the client goes away or the feed stops
    pub async fn stream_samples(&self) -> Option<mpsc::Receiver<Arc<TelemetrySample>>> {
        let mut watch_rx = self.session.lock().await.subscribe()?;
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);

        tokio::spawn(async move {
            let current = watch_rx.borrow_and_update().clone();
            if let Some(sample) = current {
                if tx.send(sample).await.is_err() {
                    return;
                }
            }
            while watch_rx.changed().await.is_ok() {
                let next = watch_rx.borrow_and_update().clone();
                let Some(sample) = next else { continue };
                if tx.send(sample).await.is_err() {
                    tracing::debug!("realtime stream client disconnected");
                    return;
                }
            }
            tracing::debug!("realtime feed closed, ending stream");
        });

        Some(rx)
    }

    pub async fn shutdown(&self) {
        self.session.lock().await.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::random_source::RandomTelemetrySource;

    #[tokio::test(start_paused = true)]
    async fn test_stream_receives_ticks_then_ends_on_shutdown() {
        let service = RealtimeService::new(Duration::from_secs(1));
        assert!(service.stream_samples().await.is_none());

        service.activate(RandomTelemetrySource::seeded(11, 9)).await;
        let mut rx = service.stream_samples().await.unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.seq + 1, second.seq);
        assert!(service.latest().await.is_some());

        service.shutdown().await;
        assert!(!service.is_active().await);
        // Drain anything buffered; the stream must terminate
        while rx.recv().await.is_some() {}
    }
}
