use tokio::sync::broadcast;
use tracing::{trace, warn};

use crate::domain::AppEvent;

const EVENT_CAPACITY: usize = 64;

/// Process-wide publish/subscribe channel.
///
/// Owned by the app controller and handed to each component that publishes
/// or listens; clones share the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Publish an event. Returns how many subscribers received it.
    pub fn publish(&self, event: AppEvent) -> usize {
        trace!(topic = event.topic(), "Publishing event");
        // No subscribers is not an error
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to every topic.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Subscribe to a single topic, e.g. `"homeTabPressed"`.
    pub fn subscribe_topic(&self, topic: &'static str) -> TopicSubscription {
        TopicSubscription {
            topic,
            receiver: self.sender.subscribe(),
        }
    }
}

/// A subscription that only yields events for one topic.
pub struct TopicSubscription {
    topic: &'static str,
    receiver: broadcast::Receiver<AppEvent>,
}

impl TopicSubscription {
    /// Wait for the next matching event. Returns `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<AppEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.topic() == self.topic => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(topic = self.topic, skipped, "Subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<AppEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if event.topic() == self.topic => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}
