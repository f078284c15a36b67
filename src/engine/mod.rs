mod driver_api;
mod helpers;
mod inflight;
mod location_api;
mod profile_api;
mod signup_api;
mod trip_api;

pub use inflight::InFlight;

use std::sync::{Arc, Mutex as StdMutex};

use async_channel::Sender;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    api::{EventAPI, API},
    config::Config,
    entities::{Coordinates, DriverSession},
    error::Error,
    events::{Event, EventBus},
    external::{google_maps::GoogleMaps, viacep::ViaCep},
    location::{ChannelLocationProvider, LocationProvider, LocationTracker},
    pricing::{Clock, SystemClock},
    simulation::{MockRequestSource, PassThroughMatcher, RequestFeed, RequestMatcher, RequestSource},
    store::{InMemoryProfileStore, ProfileStore},
};

pub struct Engine {
    config: Config,
    clock: Arc<dyn Clock>,
    maps: GoogleMaps,
    viacep: ViaCep,
    session: Arc<Mutex<DriverSession>>,
    feed: StdMutex<Option<RequestFeed>>,
    source: Arc<dyn RequestSource>,
    matcher: Arc<dyn RequestMatcher>,
    location: LocationTracker,
    location_updates: Sender<Coordinates>,
    profiles: Arc<dyn ProfileStore>,
    in_flight: InFlight,
    events: EventBus,
}

impl Engine {
    /// Must be called from within a tokio runtime: location tracking starts
    /// immediately, fed by `update_location`.
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(config: Config) -> Result<Self, Error> {
        let maps = GoogleMaps::new(&config)?;
        let viacep = ViaCep::new(&config)?;

        if config.google_maps_api_key.is_none() {
            tracing::warn!("GOOGLE_MAPS_API_KEY not set, map lookups will fail");
        }

        let (location_updates, provider) = ChannelLocationProvider::new();
        let events = EventBus::new();
        let location = LocationTracker::new();
        location.track(Arc::new(provider), events.clone());

        Ok(Self {
            config,
            clock: Arc::new(SystemClock),
            maps,
            viacep,
            session: Arc::new(Mutex::new(DriverSession::new())),
            feed: StdMutex::new(None),
            source: Arc::new(MockRequestSource),
            matcher: Arc::new(PassThroughMatcher),
            location,
            location_updates,
            profiles: Arc::new(InMemoryProfileStore::new()),
            in_flight: InFlight::new(),
            events,
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_request_source(mut self, source: impl RequestSource + 'static) -> Self {
        self.source = Arc::new(source);
        self
    }

    pub fn with_request_matcher(mut self, matcher: impl RequestMatcher + 'static) -> Self {
        self.matcher = Arc::new(matcher);
        self
    }

    pub fn with_profile_store(mut self, profiles: impl ProfileStore + 'static) -> Self {
        self.profiles = Arc::new(profiles);
        self
    }

    /// Replaces the pushed-position provider with a device provider.
    pub fn with_location_provider(self, provider: Arc<dyn LocationProvider>) -> Self {
        self.location.track(provider, self.events.clone());
        self
    }

    pub fn subscribe(&self) -> async_channel::Receiver<Event> {
        self.events.subscribe()
    }

    /// Stops the feed and the location subscription and cancels every
    /// outbound lookup still running. Later lookups fail as cancelled.
    #[tracing::instrument(skip(self))]
    pub async fn shutdown(&self) {
        self.feed_slot().take();
        self.location.stop();
        self.in_flight.cancel_all();
        self.location_updates.close();

        tracing::info!("engine shut down");
    }
}

#[async_trait]
impl EventAPI for Engine {
    async fn drain_events(&self) -> Result<Vec<Event>, Error> {
        Ok(self.events.drain())
    }
}

impl API for Engine {}
