use crate::state::messages::SourceRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Re-reads the states document on a fixed cadence. Each reload is pushed into
/// the card as a new snapshot.
pub struct PeriodicRefresher {
    source_requests: mpsc::Sender<SourceRequest>,
    every: Duration,
}

impl PeriodicRefresher {
    pub fn new(source_requests: mpsc::Sender<SourceRequest>, every: Duration) -> Self {
        Self { source_requests, every }
    }

    pub async fn run(self) {
        let mut states_interval = interval(self.every);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        states_interval.tick().await;

        loop {
            states_interval.tick().await;
            if self
                .source_requests
                .send(SourceRequest::LoadStates)
                .await
                .is_err()
            {
                break;
            }
        }
    }
}
