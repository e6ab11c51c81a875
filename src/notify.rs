// src/notify.rs

use tokio::sync::broadcast;

use crate::models::progress::ProgressEvent;

const CHANNEL_CAPACITY: usize = 256;

/// Process-wide fan-out of solved-set changes. Subscribers filter by user.
#[derive(Debug, Clone)]
pub struct ProgressNotifier {
    sender: broadcast::Sender<ProgressEvent>,
}

impl Default for ProgressNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: ProgressEvent) {
        if self.sender.send(event).is_err() {
            tracing::debug!("No progress subscribers connected");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }
}
