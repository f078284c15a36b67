use super::Engine;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    api::DriverAPI,
    entities::{CancelReason, CompletedRide, DriverPreferences, DriverSnapshot, RideStage},
    error::Error,
    events::Event,
    pricing::price,
};

#[async_trait]
impl DriverAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn driver_session(&self) -> Result<DriverSnapshot, Error> {
        let session = self.session.lock().await;

        self.snapshot(&session)
    }

    #[tracing::instrument(skip(self))]
    async fn toggle_availability(&self) -> Result<DriverSnapshot, Error> {
        let mut session = self.session.lock().await;

        let status = session.toggle_availability()?;
        self.sync_feed(status);

        tracing::info!(?status, "availability changed");
        self.events.publish(Event::AvailabilityChanged { status });

        self.snapshot(&session)
    }

    #[tracing::instrument(skip(self))]
    async fn accept_request(&self, request_id: String) -> Result<DriverSnapshot, Error> {
        let mut session = self.session.lock().await;

        let ride_id = session.accept(&request_id, Utc::now())?.id;
        let status = session.status();
        self.sync_feed(status);

        tracing::info!(%ride_id, "request accepted");
        self.events.publish(Event::AvailabilityChanged { status });

        self.snapshot(&session)
    }

    #[tracing::instrument(skip(self))]
    async fn decline_request(&self, request_id: String) -> Result<DriverSnapshot, Error> {
        let mut session = self.session.lock().await;

        session.decline(&request_id)?;
        self.events.publish(Event::RequestsUpdated {
            count: session.incoming().len(),
        });

        self.snapshot(&session)
    }

    async fn arrive_at_pickup(&self) -> Result<DriverSnapshot, Error> {
        self.advance_ride(RideStage::ArrivedAtPickup).await
    }

    async fn start_trip(&self) -> Result<DriverSnapshot, Error> {
        self.advance_ride(RideStage::InProgress).await
    }

    async fn arrive_at_destination(&self) -> Result<DriverSnapshot, Error> {
        self.advance_ride(RideStage::ArrivedAtDestination).await
    }

    #[tracing::instrument(skip(self))]
    async fn finish_ride(&self) -> Result<CompletedRide, Error> {
        let mut session = self.session.lock().await;

        let distance_km = session
            .active_ride()
            .ok_or_else(Error::invalid_state_error)?
            .request
            .trip_distance_km;
        let fare = price(distance_km, self.clock.hour())?;

        let completed = session.finish(fare, Utc::now())?;
        self.sync_feed(session.status());

        tracing::info!(ride_id = %completed.ride_id, fare = %completed.fare, "ride finished");
        self.events.publish(Event::RideCompleted {
            ride: completed.clone(),
        });

        Ok(completed)
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_ride(&self, reason: CancelReason) -> Result<DriverSnapshot, Error> {
        let mut session = self.session.lock().await;

        let ride = session.cancel(reason.clone())?;
        self.sync_feed(session.status());

        self.events.publish(Event::RideCancelled {
            ride_id: ride.id,
            reason: reason.label(),
        });

        self.snapshot(&session)
    }

    async fn ride_history(&self) -> Result<Vec<CompletedRide>, Error> {
        Ok(self.session.lock().await.history.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn update_preferences(
        &self,
        preferences: DriverPreferences,
    ) -> Result<DriverPreferences, Error> {
        preferences.validate()?;

        let mut session = self.session.lock().await;
        session.preferences = preferences.clone();

        Ok(preferences)
    }
}
