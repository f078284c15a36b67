use super::Engine;

use async_trait::async_trait;

use crate::{
    api::TripAPI,
    entities::{Coordinates, PlaceSuggestions, TripEndpoint, TripPlan},
    error::Error,
    events::Event,
    external::google_maps::SuggestionBias,
    pricing::{price, Fare},
};

/// Autocomplete only runs from this many characters on.
const MIN_SUGGESTION_INPUT: usize = 3;

impl Engine {
    async fn geocode_address(&self, address: &str) -> Result<Coordinates, Error> {
        let address = address.trim();

        if address.is_empty() {
            return Err(Error::invalid_input_error());
        }

        self.lookup(self.maps.geocode(address)).await
    }

    async fn resolve(&self, endpoint: TripEndpoint) -> Result<Coordinates, Error> {
        match endpoint {
            TripEndpoint::CurrentLocation => Ok(self.location.current()),
            TripEndpoint::Address { address } => self.geocode_address(&address).await,
        }
    }

    async fn route_between(
        &self,
        origin: TripEndpoint,
        destination: TripEndpoint,
    ) -> Result<TripPlan, Error> {
        if destination == TripEndpoint::CurrentLocation {
            return Err(Error::invalid_input_error());
        }

        let origin = self.resolve(origin).await?;
        let destination = self.resolve(destination).await?;

        let route = self
            .lookup(self.maps.directions(origin, destination))
            .await?;
        let fare = price(route.distance_km, self.clock.hour())?;

        tracing::info!(distance_km = route.distance_km, %fare, "trip planned");

        Ok(TripPlan::new(origin, destination, route, fare))
    }
}

#[async_trait]
impl TripAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn quote_fare(&self, distance_km: f64) -> Result<Fare, Error> {
        price(distance_km, self.clock.hour())
    }

    #[tracing::instrument(skip(self))]
    async fn suggest_places(
        &self,
        input: String,
        bias: SuggestionBias,
    ) -> Result<PlaceSuggestions, Error> {
        if input.trim().chars().count() < MIN_SUGGESTION_INPUT {
            return Ok(vec![]);
        }

        match self
            .lookup(self.maps.find_place_suggestions(&input, &bias))
            .await
        {
            Ok(suggestions) => Ok(suggestions),
            Err(err) => {
                tracing::warn!(?err, "place suggestions failed");
                self.events.publish(Event::alert(
                    "Error",
                    "Could not load address suggestions.",
                ));
                Ok(vec![])
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn geocode(&self, address: String) -> Result<Coordinates, Error> {
        self.geocode_address(&address).await.map_err(|err| {
            tracing::warn!(?err, "geocoding failed");
            self.events
                .publish(Event::alert("Geocoding error", "Could not find that address."));
            err
        })
    }

    #[tracing::instrument(skip(self))]
    async fn plan_trip(
        &self,
        origin: TripEndpoint,
        destination: TripEndpoint,
    ) -> Result<TripPlan, Error> {
        self.route_between(origin, destination).await.map_err(|err| {
            tracing::warn!(?err, "trip planning failed");
            self.events
                .publish(Event::alert("Error", "Could not plan the route."));
            err
        })
    }
}
