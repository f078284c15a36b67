use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{
    CancelReason, CompletedRide, Coordinates, DriverPreferences, DriverSnapshot, PlaceSuggestions,
    PostalAddress, Profile, TripEndpoint, TripPlan,
};
use crate::error::Error;
use crate::events::Event;
use crate::external::google_maps::SuggestionBias;
use crate::pricing::Fare;
use crate::signup::SignupForm;

#[async_trait]
pub trait DriverAPI {
    async fn driver_session(&self) -> Result<DriverSnapshot, Error>;
    async fn toggle_availability(&self) -> Result<DriverSnapshot, Error>;
    async fn accept_request(&self, request_id: String) -> Result<DriverSnapshot, Error>;
    async fn decline_request(&self, request_id: String) -> Result<DriverSnapshot, Error>;
    async fn arrive_at_pickup(&self) -> Result<DriverSnapshot, Error>;
    async fn start_trip(&self) -> Result<DriverSnapshot, Error>;
    async fn arrive_at_destination(&self) -> Result<DriverSnapshot, Error>;
    async fn finish_ride(&self) -> Result<CompletedRide, Error>;
    async fn cancel_ride(&self, reason: CancelReason) -> Result<DriverSnapshot, Error>;
    async fn ride_history(&self) -> Result<Vec<CompletedRide>, Error>;
    async fn update_preferences(
        &self,
        preferences: DriverPreferences,
    ) -> Result<DriverPreferences, Error>;
}

#[async_trait]
pub trait LocationAPI {
    async fn update_location(&self, coordinates: Coordinates) -> Result<(), Error>;
    async fn current_location(&self) -> Result<Coordinates, Error>;
}

#[async_trait]
pub trait TripAPI {
    async fn quote_fare(&self, distance_km: f64) -> Result<Fare, Error>;
    async fn suggest_places(
        &self,
        input: String,
        bias: SuggestionBias,
    ) -> Result<PlaceSuggestions, Error>;
    async fn geocode(&self, address: String) -> Result<Coordinates, Error>;
    async fn plan_trip(
        &self,
        origin: TripEndpoint,
        destination: TripEndpoint,
    ) -> Result<TripPlan, Error>;
}

#[async_trait]
pub trait SignupAPI {
    async fn lookup_postal_code(&self, cep: String) -> Result<PostalAddress, Error>;
    async fn fill_postal_address(&self, form: SignupForm) -> Result<SignupForm, Error>;
    async fn register(&self, form: SignupForm) -> Result<Profile, Error>;
}

#[async_trait]
pub trait ProfileAPI {
    async fn save_profile(&self, profile: Profile) -> Result<Profile, Error>;
    async fn find_profile(&self, id: Uuid) -> Result<Profile, Error>;
}

#[async_trait]
pub trait EventAPI {
    async fn drain_events(&self) -> Result<Vec<Event>, Error>;
}

pub trait API: DriverAPI + LocationAPI + TripAPI + SignupAPI + ProfileAPI + EventAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
