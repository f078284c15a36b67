use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;
use crate::error::Error;
use crate::pricing::Fare;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RideRequest {
    pub id: String,
    pub passenger_name: String,
    pub pickup_address: String,
    pub pickup: Coordinates,
    pub destination_address: String,
    pub destination: Coordinates,
    pub distance_to_pickup_km: f64,
    pub trip_distance_km: f64,
    pub estimated_duration_min: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStage {
    GoingToPickup,
    ArrivedAtPickup,
    InProgress,
    ArrivedAtDestination,
}

impl RideStage {
    pub fn name(&self) -> String {
        match self {
            Self::GoingToPickup => "going_to_pickup".into(),
            Self::ArrivedAtPickup => "arrived_at_pickup".into(),
            Self::InProgress => "in_progress".into(),
            Self::ArrivedAtDestination => "arrived_at_destination".into(),
        }
    }

    pub fn next(&self) -> Option<RideStage> {
        match self {
            Self::GoingToPickup => Some(Self::ArrivedAtPickup),
            Self::ArrivedAtPickup => Some(Self::InProgress),
            Self::InProgress => Some(Self::ArrivedAtDestination),
            Self::ArrivedAtDestination => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveRide {
    pub id: Uuid,
    pub request: RideRequest,
    pub stage: RideStage,
    pub accepted_at: DateTime<Utc>,
}

impl ActiveRide {
    pub fn new(request: RideRequest, accepted_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            stage: RideStage::GoingToPickup,
            accepted_at,
        }
    }

    /// Moves to `to`, which must be the stage directly after the current one.
    #[tracing::instrument(skip(self), fields(ride_id = %self.id, from = ?self.stage))]
    pub fn advance(&mut self, to: RideStage) -> Result<(), Error> {
        match self.stage.next() {
            Some(next) if next == to => {
                self.stage = to;
                Ok(())
            }
            _ => Err(Error::invalid_state_error()),
        }
    }

    /// Where the driver is currently heading: the pickup until the passenger
    /// boards, the destination afterwards.
    pub fn target(&self) -> Coordinates {
        match self.stage {
            RideStage::GoingToPickup | RideStage::ArrivedAtPickup => self.request.pickup,
            RideStage::InProgress | RideStage::ArrivedAtDestination => self.request.destination,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    PassengerNoShow,
    PassengerRequested,
    VehicleProblem,
    WrongAddress,
    Personal,
    Other,
}

impl CancelReason {
    pub fn label(&self) -> String {
        match self {
            Self::PassengerNoShow => "passenger did not show up".into(),
            Self::PassengerRequested => "passenger requested cancellation".into(),
            Self::VehicleProblem => "vehicle problem".into(),
            Self::WrongAddress => "wrong address".into(),
            Self::Personal => "personal reason".into(),
            Self::Other => "other reason".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletedRide {
    pub ride_id: Uuid,
    pub request: RideRequest,
    pub fare: Fare,
    pub accepted_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::mock_requests;

    fn ride() -> ActiveRide {
        ActiveRide::new(mock_requests().remove(0), Utc::now())
    }

    #[test]
    fn stages_form_a_total_order() {
        let mut stage = RideStage::GoingToPickup;
        let mut seen = vec![stage];

        while let Some(next) = stage.next() {
            assert!(next > stage);
            seen.push(next);
            stage = next;
        }

        assert_eq!(seen.len(), 4);
        assert!(stage.is_terminal());
    }

    #[test]
    fn advance_walks_forward_one_stage_at_a_time() {
        let mut ride = ride();

        ride.advance(RideStage::ArrivedAtPickup).unwrap();
        ride.advance(RideStage::InProgress).unwrap();
        ride.advance(RideStage::ArrivedAtDestination).unwrap();

        assert_eq!(ride.stage, RideStage::ArrivedAtDestination);
    }

    #[test]
    fn advance_rejects_skips_backward_moves_and_repeats() {
        let mut ride = ride();

        assert!(ride.advance(RideStage::InProgress).unwrap_err().is_invalid_state_error());
        assert!(ride.advance(RideStage::ArrivedAtDestination).is_err());
        assert!(ride.advance(RideStage::GoingToPickup).is_err());
        assert_eq!(ride.stage, RideStage::GoingToPickup);

        ride.advance(RideStage::ArrivedAtPickup).unwrap();
        assert!(ride.advance(RideStage::GoingToPickup).is_err());
        assert!(ride.advance(RideStage::ArrivedAtPickup).is_err());
        assert_eq!(ride.stage, RideStage::ArrivedAtPickup);
    }

    #[test]
    fn target_switches_to_destination_once_the_trip_starts() {
        let mut ride = ride();
        assert_eq!(ride.target(), ride.request.pickup);

        ride.advance(RideStage::ArrivedAtPickup).unwrap();
        assert_eq!(ride.target(), ride.request.pickup);

        ride.advance(RideStage::InProgress).unwrap();
        assert_eq!(ride.target(), ride.request.destination);
    }

    #[test]
    fn stage_names_are_snake_case() {
        assert_eq!(RideStage::GoingToPickup.name(), "going_to_pickup");
        assert_eq!(
            serde_json::to_value(RideStage::ArrivedAtDestination).unwrap(),
            serde_json::json!("arrived_at_destination")
        );
    }
}
