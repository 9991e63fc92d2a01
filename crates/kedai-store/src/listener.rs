//! Pub/sub listener container.
//!
//! A [`ListenerContainer`] holds one dedicated subscriber connection and fans
//! every incoming message out to the listeners registered for its channel or
//! pattern. Subscriptions are confirmed before [`ListenerContainer::start`]
//! returns, so anything published afterwards is delivered.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use kedai_core::{KedaiError, KedaiResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::StorePoolInterface;

/// A message received on a subscribed channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Channel the message was published to.
    pub channel: String,
    /// Pattern that matched, for pattern subscriptions.
    pub pattern: Option<String>,
    /// Message body.
    pub payload: String,
    /// When the container received it.
    pub received_at: DateTime<Utc>,
}

/// Receives messages from a [`ListenerContainer`].
#[async_trait]
pub trait MessageListener: Send + Sync {
    /// Handles one message. Listeners for the same topic run one after another.
    async fn on_message(&self, message: &Message);
}

/// Logs every message at `info`.
#[derive(Debug, Default, Clone)]
pub struct LoggingListener;

#[async_trait]
impl MessageListener for LoggingListener {
    async fn on_message(&self, message: &Message) {
        info!(
            channel = %message.channel,
            pattern = ?message.pattern,
            "Received message: {}",
            message.payload
        );
    }
}

/// Forwards every message into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ForwardingListener {
    tx: mpsc::UnboundedSender<Message>,
}

impl ForwardingListener {
    /// Creates a listener and the receiving end of its channel.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl MessageListener for ForwardingListener {
    async fn on_message(&self, message: &Message) {
        // Receiver gone means nobody is interested any more
        let _ = self.tx.send(message.clone());
    }
}

type Listeners = HashMap<String, Vec<Arc<dyn MessageListener>>>;

/// Subscribes to channels and patterns and dispatches to listeners.
pub struct ListenerContainer {
    client: redis::Client,
    channels: Listeners,
    patterns: Listeners,
}

impl ListenerContainer {
    /// Creates a container that will open its own connection from `client`.
    #[must_use]
    pub fn new(client: redis::Client) -> Self {
        Self {
            client,
            channels: HashMap::new(),
            patterns: HashMap::new(),
        }
    }

    /// Creates a container using the store's client.
    pub fn from_store(store: &dyn StorePoolInterface) -> KedaiResult<Self> {
        Ok(Self::new(store.client()?.clone()))
    }

    /// Registers a listener for an exact channel name.
    pub fn add_channel_listener(
        &mut self,
        channel: impl Into<String>,
        listener: Arc<dyn MessageListener>,
    ) -> &mut Self {
        self.channels.entry(channel.into()).or_default().push(listener);
        self
    }

    /// Registers a listener for a glob pattern such as `orders.*`.
    pub fn add_pattern_listener(
        &mut self,
        pattern: impl Into<String>,
        listener: Arc<dyn MessageListener>,
    ) -> &mut Self {
        self.patterns.entry(pattern.into()).or_default().push(listener);
        self
    }

    /// Subscribes and starts dispatching on a background task.
    pub async fn start(self) -> KedaiResult<ListenerHandle> {
        if self.channels.is_empty() && self.patterns.is_empty() {
            return Err(KedaiError::validation(
                "Listener container has no channels or patterns",
            ));
        }

        let mut pubsub = self.client.get_async_pubsub().await?;
        for channel in self.channels.keys() {
            pubsub.subscribe(channel).await?;
        }
        for pattern in self.patterns.keys() {
            pubsub.psubscribe(pattern).await?;
        }

        info!(
            channels = ?self.channels.keys().collect::<Vec<_>>(),
            patterns = ?self.patterns.keys().collect::<Vec<_>>(),
            "Listener container subscribed"
        );

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let channels = self.channels;
        let patterns = self.patterns;

        let task = tokio::spawn(async move {
            let mut stream = std::pin::pin!(pubsub.into_on_message());
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        debug!("Listener container shutting down");
                        break;
                    }
                    next = stream.next() => {
                        let Some(msg) = next else {
                            warn!("Subscriber connection closed");
                            break;
                        };
                        dispatch(&msg, &channels, &patterns).await;
                    }
                }
            }
        });

        Ok(ListenerHandle {
            shutdown: Some(shutdown_tx),
            task,
        })
    }
}

async fn dispatch(msg: &redis::Msg, channels: &Listeners, patterns: &Listeners) {
    let payload: String = match msg.get_payload() {
        Ok(payload) => payload,
        Err(e) => {
            warn!(channel = msg.get_channel_name(), "Dropping non-text message: {}", e);
            return;
        }
    };

    let pattern = if msg.from_pattern() {
        msg.get_pattern::<String>().ok()
    } else {
        None
    };

    let listeners = match &pattern {
        Some(pattern) => patterns.get(pattern),
        None => channels.get(msg.get_channel_name()),
    };
    let Some(listeners) = listeners else {
        return;
    };

    let message = Message {
        channel: msg.get_channel_name().to_string(),
        pattern,
        payload,
        received_at: Utc::now(),
    };

    for listener in listeners {
        listener.on_message(&message).await;
    }
}

/// Owns the dispatch task of a started [`ListenerContainer`].
#[derive(Debug)]
pub struct ListenerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    /// Returns true once the dispatch loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops dispatching, unsubscribes and waits for the task to end.
    pub async fn shutdown(mut self) -> KedaiResult<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task
            .await
            .map_err(|e| KedaiError::internal(format!("Listener task failed: {}", e)))?;
        info!("Listener container stopped");
        Ok(())
    }
}
