use super::Engine;

use std::future::Future;
use std::sync::{MutexGuard, PoisonError};

use crate::{
    entities::{AvailabilityStatus, DriverSession, DriverSnapshot, RideStage},
    error::Error,
    events::Event,
    simulation::RequestFeed,
};

impl Engine {
    pub(super) fn feed_slot(&self) -> MutexGuard<'_, Option<RequestFeed>> {
        self.feed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Keeps exactly one feed running while the driver is available.
    pub(super) fn sync_feed(&self, status: AvailabilityStatus) {
        let mut feed = self.feed_slot();

        match status {
            AvailabilityStatus::Available => {
                if feed.as_ref().map_or(true, RequestFeed::is_finished) {
                    *feed = Some(RequestFeed::spawn(
                        self.session.clone(),
                        self.source.clone(),
                        self.matcher.clone(),
                        self.events.clone(),
                        self.config.feed_interval,
                    ));
                }
            }
            AvailabilityStatus::Unavailable | AvailabilityStatus::OnRide => {
                feed.take();
            }
        }
    }

    pub(super) fn snapshot(&self, session: &DriverSession) -> Result<DriverSnapshot, Error> {
        session.snapshot(self.clock.hour())
    }

    #[tracing::instrument(skip(self))]
    pub(super) async fn advance_ride(&self, to: RideStage) -> Result<DriverSnapshot, Error> {
        let mut session = self.session.lock().await;

        let ride_id = session.advance(to)?.id;

        tracing::info!(%ride_id, stage = %to.name(), "ride stage changed");
        self.events.publish(Event::StageChanged { ride_id, stage: to });

        self.snapshot(&session)
    }

    /// Runs an outbound lookup under the in-flight registry.
    pub(super) async fn lookup<T, F>(&self, lookup: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        self.in_flight.run(lookup).await
    }
}
