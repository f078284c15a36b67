use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::entities::{Coordinates, FALLBACK_COORDINATES};
use crate::error::Error;
use crate::events::{Event, EventBus};

/// Device positioning, as exposed by the platform.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_permission(&self) -> Result<(), Error>;

    async fn last_known_position(&self) -> Result<Option<Coordinates>, Error>;

    /// Next position update; `None` once the subscription ends.
    async fn next_position(&self) -> Option<Coordinates>;
}

/// Positions pushed from outside the process, e.g. the HTTP surface.
/// Waits for the first push before reporting a position.
#[derive(Debug)]
pub struct ChannelLocationProvider {
    updates: async_channel::Receiver<Coordinates>,
}

impl ChannelLocationProvider {
    pub fn new() -> (async_channel::Sender<Coordinates>, Self) {
        let (sender, updates) = async_channel::bounded(16);
        (sender, Self { updates })
    }
}

#[async_trait]
impl LocationProvider for ChannelLocationProvider {
    async fn request_permission(&self) -> Result<(), Error> {
        Ok(())
    }

    async fn last_known_position(&self) -> Result<Option<Coordinates>, Error> {
        Ok(self.updates.recv().await.ok())
    }

    async fn next_position(&self) -> Option<Coordinates> {
        self.updates.recv().await.ok()
    }
}

/// Holds the latest known device position. Last update wins.
#[derive(Debug)]
pub struct LocationTracker {
    sender: Arc<watch::Sender<Option<Coordinates>>>,
    receiver: watch::Receiver<Option<Coordinates>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationTracker {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(None);

        Self {
            sender: Arc::new(sender),
            receiver,
            task: Mutex::new(None),
        }
    }

    /// Latest position, or the fallback if nothing was ever reported.
    pub fn current(&self) -> Coordinates {
        (*self.receiver.borrow()).unwrap_or(FALLBACK_COORDINATES)
    }

    pub fn is_known(&self) -> bool {
        self.receiver.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Coordinates>> {
        self.receiver.clone()
    }

    pub fn push(&self, coordinates: Coordinates) {
        let _ = self.sender.send(Some(coordinates));
    }

    /// Subscribes to `provider` until `stop` is called. Replaces any previous
    /// subscription.
    pub fn track(&self, provider: Arc<dyn LocationProvider>, events: EventBus) {
        let sender = self.sender.clone();

        let task = tokio::spawn(async move {
            subscribe(provider, sender, events).await;
        });

        if let Some(previous) = self.slot().replace(task) {
            previous.abort();
        }
    }

    pub fn stop(&self) {
        if let Some(task) = self.slot().take() {
            task.abort();
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for LocationTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[tracing::instrument(skip_all)]
async fn subscribe(
    provider: Arc<dyn LocationProvider>,
    sender: Arc<watch::Sender<Option<Coordinates>>>,
    events: EventBus,
) {
    if let Err(err) = provider.request_permission().await {
        tracing::warn!(?err, "location permission denied, using fallback");
        let _ = sender.send(Some(FALLBACK_COORDINATES));
        events.publish(Event::alert("Permission required", "Using default location."));
        return;
    }

    match provider.last_known_position().await {
        Ok(Some(position)) => {
            let _ = sender.send(Some(position));
        }
        Ok(None) | Err(_) => {
            tracing::warn!("initial location unavailable, using fallback");
            let _ = sender.send(Some(FALLBACK_COORDINATES));
            events.publish(Event::alert("Error", "Using default location."));
        }
    }

    while let Some(position) = provider.next_position().await {
        let _ = sender.send(Some(position));
    }

    tracing::debug!("location subscription ended");
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedProvider {
        granted: bool,
        initial: Option<Coordinates>,
        updates: async_channel::Receiver<Coordinates>,
    }

    #[async_trait]
    impl LocationProvider for ScriptedProvider {
        async fn request_permission(&self) -> Result<(), Error> {
            if self.granted {
                Ok(())
            } else {
                Err(Error::permission_denied_error())
            }
        }

        async fn last_known_position(&self) -> Result<Option<Coordinates>, Error> {
            Ok(self.initial)
        }

        async fn next_position(&self) -> Option<Coordinates> {
            self.updates.recv().await.ok()
        }
    }

    async fn wait_for(tracker: &LocationTracker, expected: Coordinates) {
        let mut receiver = tracker.subscribe();
        while *receiver.borrow() != Some(expected) {
            receiver.changed().await.unwrap();
        }
    }

    #[test]
    fn unknown_position_reads_as_fallback() {
        let tracker = LocationTracker::new();

        assert!(!tracker.is_known());
        assert_eq!(tracker.current(), FALLBACK_COORDINATES);
    }

    #[test]
    fn last_push_wins() {
        let tracker = LocationTracker::new();
        tracker.push(Coordinates::new(1.0, 1.0));
        tracker.push(Coordinates::new(2.0, 2.0));

        assert_eq!(tracker.current(), Coordinates::new(2.0, 2.0));
    }

    #[tokio::test]
    async fn denied_permission_falls_back_and_alerts() {
        let (_tx, updates) = async_channel::unbounded();
        let provider = ScriptedProvider {
            granted: false,
            initial: Some(Coordinates::new(1.0, 1.0)),
            updates,
        };
        let events = EventBus::new();
        let tracker = LocationTracker::new();

        tracker.track(Arc::new(provider), events.clone());
        wait_for(&tracker, FALLBACK_COORDINATES).await;

        assert!(matches!(events.drain().as_slice(), [Event::Alert { .. }]));
    }

    #[tokio::test]
    async fn channel_provider_forwards_pushed_positions() {
        let (sender, provider) = ChannelLocationProvider::new();
        let events = EventBus::new();
        let tracker = LocationTracker::new();

        tracker.track(Arc::new(provider), events.clone());
        assert!(!tracker.is_known());

        sender.send(Coordinates::new(-23.5, -46.6)).await.unwrap();
        wait_for(&tracker, Coordinates::new(-23.5, -46.6)).await;

        sender.send(Coordinates::new(-23.6, -46.7)).await.unwrap();
        wait_for(&tracker, Coordinates::new(-23.6, -46.7)).await;

        assert!(events.drain().is_empty());
    }

    #[tokio::test]
    async fn follows_provider_updates() {
        let (tx, updates) = async_channel::unbounded();
        let provider = ScriptedProvider {
            granted: true,
            initial: Some(Coordinates::new(1.0, 1.0)),
            updates,
        };
        let events = EventBus::new();
        let tracker = LocationTracker::new();

        tracker.track(Arc::new(provider), events.clone());
        wait_for(&tracker, Coordinates::new(1.0, 1.0)).await;

        tx.send(Coordinates::new(3.0, 4.0)).await.unwrap();
        wait_for(&tracker, Coordinates::new(3.0, 4.0)).await;

        assert!(events.drain().is_empty());
        tracker.stop();
    }
}
