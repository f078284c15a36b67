use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::entities::{Coordinates, DriverPreferences, DriverSession, RideRequest};
use crate::error::Error;
use crate::events::{Event, EventBus};

/// The fixed set of requests a driver sees while available.
pub fn mock_requests() -> Vec<RideRequest> {
    vec![
        RideRequest {
            id: "req1".into(),
            passenger_name: "Ana Silva".into(),
            pickup_address: "Rua Augusta, 500 - Consolação".into(),
            pickup: Coordinates::new(-23.555, -46.645),
            destination_address: "Av. Paulista, 1500 - Bela Vista".into(),
            destination: Coordinates::new(-23.561, -46.656),
            distance_to_pickup_km: 1.2,
            trip_distance_km: 3.5,
            estimated_duration_min: 15,
        },
        RideRequest {
            id: "req2".into(),
            passenger_name: "Carlos Souza".into(),
            pickup_address: "Rua Oscar Freire, 200 - Jardins".into(),
            pickup: Coordinates::new(-23.558, -46.669),
            destination_address: "Parque Ibirapuera - Vila Mariana".into(),
            destination: Coordinates::new(-23.588, -46.658),
            distance_to_pickup_km: 3.5,
            trip_distance_km: 7.8,
            estimated_duration_min: 25,
        },
    ]
}

#[async_trait]
pub trait RequestSource: Send + Sync {
    async fn next_batch(&self) -> Result<Vec<RideRequest>, Error>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MockRequestSource;

#[async_trait]
impl RequestSource for MockRequestSource {
    async fn next_batch(&self) -> Result<Vec<RideRequest>, Error> {
        Ok(mock_requests())
    }
}

/// Decides whether a request is offered to the driver.
pub trait RequestMatcher: Send + Sync {
    fn matches(&self, request: &RideRequest, preferences: &DriverPreferences) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PassThroughMatcher;

impl RequestMatcher for PassThroughMatcher {
    // TODO: filter on preferences once requests carry passenger gender, rating and payment method.
    fn matches(&self, _request: &RideRequest, _preferences: &DriverPreferences) -> bool {
        true
    }
}

/// Periodically replaces the pending list while the driver is available.
/// The task stops when dropped or when the session leaves `available`.
#[derive(Debug)]
pub struct RequestFeed {
    handle: JoinHandle<()>,
}

impl RequestFeed {
    #[tracing::instrument(skip_all, fields(period_ms = period.as_millis() as u64))]
    pub fn spawn(
        session: Arc<Mutex<DriverSession>>,
        source: Arc<dyn RequestSource>,
        matcher: Arc<dyn RequestMatcher>,
        events: EventBus,
        period: Duration,
    ) -> Self {
        tracing::debug!("starting request feed");

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let batch = match source.next_batch().await {
                    Ok(batch) => batch,
                    Err(err) => {
                        tracing::warn!(?err, "request source failed, skipping tick");
                        continue;
                    }
                };

                let mut session = session.lock().await;
                let batch: Vec<RideRequest> = batch
                    .into_iter()
                    .filter(|request| matcher.matches(request, &session.preferences))
                    .collect();
                let count = batch.len();

                if session.receive_requests(batch).is_err() {
                    tracing::debug!("driver no longer available, stopping feed");
                    return;
                }
                drop(session);

                events.publish(Event::RequestsUpdated { count });
            }
        });

        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RequestFeed {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AvailabilityStatus;

    fn available_session() -> Arc<Mutex<DriverSession>> {
        let mut session = DriverSession::new();
        session.toggle_availability().unwrap();
        Arc::new(Mutex::new(session))
    }

    fn spawn_feed(session: &Arc<Mutex<DriverSession>>, events: &EventBus) -> RequestFeed {
        RequestFeed::spawn(
            session.clone(),
            Arc::new(MockRequestSource),
            Arc::new(PassThroughMatcher),
            events.clone(),
            Duration::from_secs(10),
        )
    }

    #[test]
    fn mock_set_is_fixed() {
        let requests = mock_requests();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].id, "req1");
        assert_eq!(requests[1].passenger_name, "Carlos Souza");
        assert_eq!(requests[1].trip_distance_km, 7.8);
    }

    #[tokio::test(start_paused = true)]
    async fn first_batch_arrives_after_one_period() {
        let session = available_session();
        let events = EventBus::new();
        let _feed = spawn_feed(&session, &events);

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert!(session.lock().await.incoming().is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(session.lock().await.incoming(), mock_requests().as_slice());
        assert_eq!(events.drain(), vec![Event::RequestsUpdated { count: 2 }]);
    }

    #[tokio::test(start_paused = true)]
    async fn each_tick_replaces_the_pending_list() {
        let session = available_session();
        let events = EventBus::new();
        let _feed = spawn_feed(&session, &events);

        tokio::time::sleep(Duration::from_secs(11)).await;
        session.lock().await.decline("req1").unwrap();
        assert_eq!(session.lock().await.incoming().len(), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(session.lock().await.incoming().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_once_the_driver_goes_unavailable() {
        let session = available_session();
        let events = EventBus::new();
        let feed = spawn_feed(&session, &events);

        let status = session.lock().await.toggle_availability().unwrap();
        assert_eq!(status, AvailabilityStatus::Unavailable);

        tokio::time::sleep(Duration::from_secs(11)).await;

        assert!(feed.is_finished());
        assert!(events.drain().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_feed_aborts_it() {
        let session = available_session();
        let events = EventBus::new();

        drop(spawn_feed(&session, &events));
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert!(session.lock().await.incoming().is_empty());
    }
}
