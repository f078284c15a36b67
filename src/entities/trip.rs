use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, RouteInfo};
use crate::pricing::Fare;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TripEndpoint {
    CurrentLocation,
    Address { address: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub route: RouteInfo,
    pub fare: Fare,
    pub fare_text: String,
}

impl TripPlan {
    pub fn new(origin: Coordinates, destination: Coordinates, route: RouteInfo, fare: Fare) -> Self {
        Self {
            origin,
            destination,
            route,
            fare_text: fare.to_string(),
            fare,
        }
    }
}
