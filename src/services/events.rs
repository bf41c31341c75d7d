//! In-process event bus.
//!
//! Usecases publish lifecycle events (`model.removed`, `chat.started`, …) and
//! interested parties subscribe with dotted patterns such as `model.*`.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::{
    sync::mpsc::{self, Receiver, Sender},
    task::JoinHandle,
};

const CHANNEL_CAPACITY: usize = 100;

/// A named event with a JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Dotted event name, e.g. `model.removed`.
    pub name: String,
    /// Event specific data.
    pub payload: serde_json::Value,
    /// When the event was published.
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Creates an event stamped with the current time.
    pub fn new(name: &str, payload: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            payload,
            timestamp: Utc::now(),
        }
    }
}

/// The event bus actor has stopped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("event bus is not running")]
pub struct EventBusClosed;

enum BusCommand {
    Subscribe {
        id: usize,
        pattern: String,
        sender: Sender<Event>,
    },
    Unsubscribe {
        id: usize,
    },
    Publish(Event),
}

struct ActorSubscription {
    id: usize,
    pattern: String,
    sender: Sender<Event>,
}

/// Subscription handle; unsubscribes when dropped.
pub struct Subscription {
    id: usize,
    bus: EventBus,
    receiver: Receiver<Event>,
}

impl Subscription {
    /// Waits for the next matching event.
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Returns a matching event if one is already queued.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self
            .bus
            .command_tx
            .try_send(BusCommand::Unsubscribe { id: self.id });
    }
}

/// Handle to the event bus actor.
///
/// Cloning is cheap; all clones talk to the same actor task, which owns the
/// subscriber list and processes commands in order.
#[derive(Clone)]
pub struct EventBus {
    command_tx: Sender<BusCommand>,
    next_id: Arc<AtomicUsize>,
    _handle: Arc<JoinHandle<()>>,
}

impl EventBus {
    /// Spawns the actor task. Must be called inside a tokio runtime.
    pub fn new() -> Self {
        let (command_tx, mut command_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let handle = tokio::spawn(async move {
            actor_loop(&mut command_rx).await;
        });

        Self {
            command_tx,
            next_id: Arc::new(AtomicUsize::new(1)),
            _handle: Arc::new(handle),
        }
    }

    /// Subscribes to events whose name matches `pattern` (`*` segments allowed).
    ///
    /// # Errors
    ///
    /// Returns [`EventBusClosed`] if the actor has stopped.
    pub async fn subscribe(&self, pattern: &str) -> Result<Subscription, EventBusClosed> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.command_tx
            .send(BusCommand::Subscribe {
                id,
                pattern: pattern.to_string(),
                sender: tx,
            })
            .await
            .map_err(|_| EventBusClosed)?;

        Ok(Subscription {
            id,
            bus: self.clone(),
            receiver: rx,
        })
    }

    /// Publishes an event to every matching subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusClosed`] if the actor has stopped.
    pub async fn publish(&self, event: Event) -> Result<(), EventBusClosed> {
        self.command_tx
            .send(BusCommand::Publish(event))
            .await
            .map_err(|_| EventBusClosed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

async fn actor_loop(command_rx: &mut Receiver<BusCommand>) {
    let mut subscriptions: Vec<ActorSubscription> = Vec::new();

    while let Some(command) = command_rx.recv().await {
        match command {
            BusCommand::Subscribe {
                id,
                pattern,
                sender,
            } => {
                subscriptions.push(ActorSubscription {
                    id,
                    pattern,
                    sender,
                });
            }

            BusCommand::Unsubscribe { id } => {
                subscriptions.retain(|sub| sub.id != id);
            }

            BusCommand::Publish(event) => {
                subscriptions.retain(|sub| {
                    if name_matches(&event.name, &sub.pattern) {
                        sub.sender.try_send(event.clone()).is_ok()
                    } else {
                        true
                    }
                });
            }
        }
    }
}

/// Checks a dotted event name against a pattern.
///
/// `"*"` matches everything; a `*` segment matches any single segment.
pub(crate) fn name_matches(name: &str, pattern: &str) -> bool {
    const WILDCARD: &str = "*";

    if pattern == WILDCARD {
        return true;
    }

    let name_parts: Vec<&str> = name.split('.').collect();
    let pattern_parts: Vec<&str> = pattern.split('.').collect();

    if name_parts.len() != pattern_parts.len() {
        return false;
    }

    name_parts
        .iter()
        .zip(pattern_parts.iter())
        .all(|(part, pattern_part)| *pattern_part == WILDCARD || part == pattern_part)
}
