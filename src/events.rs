use async_channel::{Receiver, Sender, TryRecvError, TrySendError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{AvailabilityStatus, CompletedRide, RideStage};

const CAPACITY: usize = 64;

/// Things a screen reacts to without polling the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Event {
    AvailabilityChanged { status: AvailabilityStatus },
    RequestsUpdated { count: usize },
    StageChanged { ride_id: Uuid, stage: RideStage },
    RideCompleted { ride: CompletedRide },
    RideCancelled { ride_id: Uuid, reason: String },
    Alert { title: String, message: String },
}

impl Event {
    pub fn alert(title: &str, message: &str) -> Self {
        Self::Alert {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Bounded queue that drops the oldest event when nobody is draining it.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: Sender<Event>,
    receiver: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, receiver) = async_channel::bounded(CAPACITY);
        Self { sender, receiver }
    }

    pub fn publish(&self, event: Event) {
        let mut event = event;

        loop {
            match self.sender.try_send(event) {
                Ok(()) => return,
                Err(TrySendError::Full(rejected)) => {
                    if let Ok(dropped) = self.receiver.try_recv() {
                        tracing::debug!(?dropped, "event queue full, dropping oldest");
                    }
                    event = rejected;
                }
                Err(TrySendError::Closed(_)) => return,
            }
        }
    }

    pub fn subscribe(&self) -> Receiver<Event> {
        self.receiver.clone()
    }

    pub fn drain(&self) -> Vec<Event> {
        let mut events = vec![];

        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return events,
            }
        }
    }
}
