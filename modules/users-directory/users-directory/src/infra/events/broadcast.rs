use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use crate::domain::events::UserEvent;
use crate::domain::ports::EventPublisher;

/// In-process fan-out of user events over a bounded broadcast channel.
///
/// Publishing with no subscribers is not an error. A subscriber that falls
/// behind by more than the channel capacity skips the oldest events.
#[derive(Clone)]
pub struct BroadcastEventPublisher {
    tx: broadcast::Sender<UserEvent>,
}

impl BroadcastEventPublisher {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<UserEvent> {
        self.tx.subscribe()
    }

    /// Stream of events published after this call; lagged gaps are skipped.
    pub fn subscribe_stream(&self) -> impl tokio_stream::Stream<Item = UserEvent> + Send + use<> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|item| match item {
            Ok(event) => Some(event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "User event subscriber lagged");
                None
            }
        })
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventPublisher {
    async fn publish(&self, event: &UserEvent) -> anyhow::Result<()> {
        match self.tx.send(event.clone()) {
            Ok(receivers) => tracing::trace!(receivers, "Broadcast user event"),
            Err(_) => tracing::trace!("No user event subscribers"),
        }
        Ok(())
    }
}
