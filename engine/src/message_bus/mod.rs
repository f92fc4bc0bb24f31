//! Message Bus for console events
//!
//! Front ends subscribe here to render the console incrementally: every
//! history append, tab change, busy transition and sub-session transition is
//! published as an [`Event`]. Subscribers get bounded channels. A full
//! channel applies backpressure: `publish` waits for the subscriber to catch
//! up, so every subscriber sees every event in order and
//! `LineAppended.index` never skips.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use sdk::types::{ConsoleLine, SubSessionKind};

use crate::workspace::WorkspaceSnapshot;

/// Channel buffer size for bounded channels
const CHANNEL_BUFFER_SIZE: usize = 100;

/// Event types that can be published on the message bus
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum EventType {
    LineAppended,
    TabsChanged,
    BusyChanged,
    SubSessionChanged,
    SubmissionRejected,
    /// Subscribe to all event types
    All,
}

/// Events that can be published on the message bus
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A line was appended at `index` in the console history
    LineAppended { index: usize, line: ConsoleLine },
    /// The open tabs or the active pointer changed
    TabsChanged { workspace: WorkspaceSnapshot },
    BusyChanged { busy: bool },
    SubSessionChanged { sub_session: Option<SubSessionKind> },
    /// A submission was dropped by the admission gate; history is unchanged
    SubmissionRejected { input: String },
}

impl Event {
    /// Get the event type for this event
    pub fn event_type(&self) -> EventType {
        match self {
            Event::LineAppended { .. } => EventType::LineAppended,
            Event::TabsChanged { .. } => EventType::TabsChanged,
            Event::BusyChanged { .. } => EventType::BusyChanged,
            Event::SubSessionChanged { .. } => EventType::SubSessionChanged,
            Event::SubmissionRejected { .. } => EventType::SubmissionRejected,
        }
    }
}

/// Pub/sub hub between the orchestrator and any number of front ends.
pub struct MessageBus {
    channels: Arc<Mutex<HashMap<EventType, Vec<mpsc::Sender<Event>>>>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Subscribe to a specific event type, or `EventType::All`.
    pub async fn subscribe(&self, event_type: EventType) -> mpsc::Receiver<Event> {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let mut channels = self.channels.lock().await;
        channels.entry(event_type).or_default().push(tx);
        rx
    }

    /// Publish to subscribers of the event's type and of `EventType::All`.
    ///
    /// Waits while a subscriber's buffer is full. Closed subscribers are pruned.
    pub async fn publish(&self, event: Event) {
        let mut channels = self.channels.lock().await;
        let event_type = event.event_type();

        for key in [event_type, EventType::All] {
            if let Some(subscribers) = channels.get_mut(&key) {
                let mut closed = Vec::new();
                for (i, tx) in subscribers.iter().enumerate() {
                    if tx.send(event.clone()).await.is_err() {
                        closed.push(i);
                    }
                }
                for i in closed.into_iter().rev() {
                    debug!(?event_type, "pruning closed subscriber");
                    subscribers.remove(i);
                }
            }
        }
    }

    pub async fn subscriber_count(&self) -> usize {
        self.channels.lock().await.values().map(Vec::len).sum()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_and_publish() {
        let bus = MessageBus::new();
        let mut rx = bus.subscribe(EventType::LineAppended).await;

        bus.publish(Event::LineAppended {
            index: 1,
            line: ConsoleLine::input("ls"),
        })
        .await;

        match rx.recv().await.unwrap() {
            Event::LineAppended { index, line } => {
                assert_eq!(index, 1);
                assert_eq!(line.text, "ls");
            }
            _ => panic!("Wrong event type received"),
        }
    }

    #[tokio::test]
    async fn test_all_event_type() {
        let bus = MessageBus::new();
        let mut rx_all = bus.subscribe(EventType::All).await;
        let mut rx_busy = bus.subscribe(EventType::BusyChanged).await;

        bus.publish(Event::BusyChanged { busy: true }).await;

        assert_eq!(rx_all.recv().await.unwrap(), Event::BusyChanged { busy: true });
        assert_eq!(rx_busy.recv().await.unwrap(), Event::BusyChanged { busy: true });
    }

    #[tokio::test]
    async fn test_different_event_types() {
        let bus = MessageBus::new();
        let mut rx_busy = bus.subscribe(EventType::BusyChanged).await;
        let mut rx_sub = bus.subscribe(EventType::SubSessionChanged).await;

        bus.publish(Event::BusyChanged { busy: false }).await;

        assert!(rx_busy.recv().await.is_some());
        assert!(rx_sub.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_subscriber_holds_publisher_back() {
        let bus = Arc::new(MessageBus::new());
        let mut rx = bus.subscribe(EventType::LineAppended).await;
        let total = CHANNEL_BUFFER_SIZE + 10;

        let publisher = tokio::spawn({
            let bus = Arc::clone(&bus);
            async move {
                for index in 0..total {
                    bus.publish(Event::LineAppended {
                        index,
                        line: ConsoleLine::output("x"),
                    })
                    .await;
                }
            }
        });

        // Nobody reads yet, so the publisher stalls once the buffer fills.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!publisher.is_finished());

        let mut received = Vec::new();
        while received.len() < total {
            match rx.recv().await {
                Some(Event::LineAppended { index, .. }) => received.push(index),
                other => panic!("unexpected event {:?}", other),
            }
        }
        publisher.await.unwrap();
        assert_eq!(received, (0..total).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_full_buffer_is_not_skipped() {
        let bus = MessageBus::new();
        let mut rx = bus.subscribe(EventType::BusyChanged).await;

        for _ in 0..CHANNEL_BUFFER_SIZE {
            bus.publish(Event::BusyChanged { busy: true }).await;
        }
        let blocked = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            bus.publish(Event::BusyChanged { busy: false }),
        )
        .await;
        assert!(blocked.is_err());

        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, CHANNEL_BUFFER_SIZE);
    }

    #[tokio::test]
    async fn test_closed_subscribers_are_pruned() {
        let bus = MessageBus::new();
        let rx = bus.subscribe(EventType::All).await;
        drop(rx);

        bus.publish(Event::BusyChanged { busy: true }).await;
        assert_eq!(bus.subscriber_count().await, 0);
    }
}
