use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{
    ActiveRide, CancelReason, CompletedRide, Coordinates, DriverPreferences, RideRequest,
    RideStage,
};
use crate::error::Error;
use crate::pricing::{price, Fare, TimeBand};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Unavailable,
    Available,
    OnRide,
}

/// The pending list only exists while available and the active ride only
/// while on a ride, so neither can leak into the wrong status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Availability {
    Unavailable,
    Available { incoming: Vec<RideRequest> },
    OnRide { ride: ActiveRide },
}

impl Availability {
    pub fn status(&self) -> AvailabilityStatus {
        match self {
            Self::Unavailable => AvailabilityStatus::Unavailable,
            Self::Available { incoming: _ } => AvailabilityStatus::Available,
            Self::OnRide { ride: _ } => AvailabilityStatus::OnRide,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverSession {
    pub availability: Availability,
    pub preferences: DriverPreferences,
    pub history: Vec<CompletedRide>,
}

/// What the driver screen renders at a given hour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverSnapshot {
    pub status: AvailabilityStatus,
    pub incoming: Vec<RideRequest>,
    pub ride: Option<ActiveRide>,
    /// Where the driver is heading: pickup, then destination.
    pub target: Option<Coordinates>,
    pub fare: Option<Fare>,
    pub fare_text: Option<String>,
    pub period: String,
    pub preferences: DriverPreferences,
}

impl Default for DriverSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverSession {
    pub fn new() -> Self {
        Self {
            availability: Availability::Unavailable,
            preferences: DriverPreferences::default(),
            history: vec![],
        }
    }

    pub fn status(&self) -> AvailabilityStatus {
        self.availability.status()
    }

    pub fn incoming(&self) -> &[RideRequest] {
        match &self.availability {
            Availability::Available { incoming } => incoming,
            _ => &[],
        }
    }

    pub fn active_ride(&self) -> Option<&ActiveRide> {
        match &self.availability {
            Availability::OnRide { ride } => Some(ride),
            _ => None,
        }
    }

    pub fn stage(&self) -> Option<RideStage> {
        self.active_ride().map(|ride| ride.stage)
    }

    pub fn snapshot(&self, hour: u32) -> Result<DriverSnapshot, Error> {
        let band = TimeBand::from_hour(hour)?;
        let fare = match self.active_ride() {
            Some(ride) => Some(price(ride.request.trip_distance_km, hour)?),
            None => None,
        };

        Ok(DriverSnapshot {
            status: self.status(),
            incoming: self.incoming().to_vec(),
            ride: self.active_ride().cloned(),
            target: self.active_ride().map(ActiveRide::target),
            fare_text: fare.map(|fare| fare.to_string()),
            fare,
            period: band.label(),
            preferences: self.preferences.clone(),
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn toggle_availability(&mut self) -> Result<AvailabilityStatus, Error> {
        match self.availability {
            Availability::Unavailable => {
                self.availability = Availability::Available { incoming: vec![] };
            }
            Availability::Available { incoming: _ } => {
                self.availability = Availability::Unavailable;
            }
            Availability::OnRide { ride: _ } => return Err(Error::invalid_state_error()),
        };

        Ok(self.status())
    }

    /// Replaces the pending list with a fresh batch from the feed.
    pub fn receive_requests(&mut self, batch: Vec<RideRequest>) -> Result<(), Error> {
        match &mut self.availability {
            Availability::Available { incoming } => {
                *incoming = batch;
                Ok(())
            }
            _ => Err(Error::invalid_state_error()),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn accept(
        &mut self,
        request_id: &str,
        accepted_at: DateTime<Utc>,
    ) -> Result<&ActiveRide, Error> {
        let request = match &self.availability {
            Availability::Available { incoming } => incoming
                .iter()
                .find(|request| request.id == request_id)
                .cloned()
                .ok_or_else(Error::invalid_input_error)?,
            _ => return Err(Error::invalid_state_error()),
        };

        self.availability = Availability::OnRide {
            ride: ActiveRide::new(request, accepted_at),
        };

        self.active_ride().ok_or_else(Error::unexpected_error)
    }

    #[tracing::instrument(skip(self))]
    pub fn decline(&mut self, request_id: &str) -> Result<(), Error> {
        match &mut self.availability {
            Availability::Available { incoming } => {
                let index = incoming
                    .iter()
                    .position(|request| request.id == request_id)
                    .ok_or_else(Error::invalid_input_error)?;

                incoming.remove(index);
                Ok(())
            }
            _ => Err(Error::invalid_state_error()),
        }
    }

    pub fn advance(&mut self, to: RideStage) -> Result<&ActiveRide, Error> {
        match &mut self.availability {
            Availability::OnRide { ride } => {
                ride.advance(to)?;
                Ok(&*ride)
            }
            _ => Err(Error::invalid_state_error()),
        }
    }

    /// Closes a ride that reached its destination and goes back to available.
    #[tracing::instrument(skip(self))]
    pub fn finish(
        &mut self,
        fare: Fare,
        finished_at: DateTime<Utc>,
    ) -> Result<CompletedRide, Error> {
        let ride = match &self.availability {
            Availability::OnRide { ride } if ride.stage.is_terminal() => ride.clone(),
            _ => return Err(Error::invalid_state_error()),
        };

        let completed = CompletedRide {
            ride_id: ride.id,
            request: ride.request,
            fare,
            accepted_at: ride.accepted_at,
            finished_at,
        };

        self.availability = Availability::Available { incoming: vec![] };
        self.history.push(completed.clone());

        Ok(completed)
    }

    #[tracing::instrument(skip(self))]
    pub fn cancel(&mut self, reason: CancelReason) -> Result<ActiveRide, Error> {
        let ride = match &self.availability {
            Availability::OnRide { ride } if !ride.stage.is_terminal() => ride.clone(),
            _ => return Err(Error::invalid_state_error()),
        };

        tracing::info!(ride_id = %ride.id, reason = %reason.label(), "ride cancelled");

        self.availability = Availability::Available { incoming: vec![] };

        Ok(ride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::mock_requests;

    fn available_with_requests() -> DriverSession {
        let mut session = DriverSession::new();
        session.toggle_availability().unwrap();
        session.receive_requests(mock_requests()).unwrap();
        session
    }

    fn batch_of(ids: &[&str]) -> Vec<RideRequest> {
        let template = mock_requests().remove(0);
        ids.iter()
            .map(|id| RideRequest {
                id: id.to_string(),
                ..template.clone()
            })
            .collect()
    }

    fn assert_consistent(session: &DriverSession) {
        let on_ride = session.status() == AvailabilityStatus::OnRide;
        assert_eq!(on_ride, session.active_ride().is_some());
        assert_eq!(on_ride, session.stage().is_some());
    }

    #[test]
    fn starts_unavailable_and_toggles() {
        let mut session = DriverSession::new();
        assert_eq!(session.status(), AvailabilityStatus::Unavailable);

        assert_eq!(session.toggle_availability().unwrap(), AvailabilityStatus::Available);
        assert_eq!(session.toggle_availability().unwrap(), AvailabilityStatus::Unavailable);
        assert_consistent(&session);
    }

    #[test]
    fn going_unavailable_clears_pending_requests() {
        let mut session = available_with_requests();
        assert_eq!(session.incoming().len(), 2);

        session.toggle_availability().unwrap();
        assert!(session.incoming().is_empty());

        session.toggle_availability().unwrap();
        assert!(session.incoming().is_empty());
    }

    #[test]
    fn requests_are_only_received_while_available() {
        let mut session = DriverSession::new();
        assert!(session.receive_requests(mock_requests()).is_err());
        assert!(session.incoming().is_empty());
    }

    #[test]
    fn accepting_any_entry_clears_the_list_and_sets_one_ride() {
        for id in ["a", "b", "c"] {
            let mut session = DriverSession::new();
            session.toggle_availability().unwrap();
            session.receive_requests(batch_of(&["a", "b", "c"])).unwrap();

            let ride = session.accept(id, Utc::now()).unwrap();
            assert_eq!(ride.request.id, id);
            assert_eq!(ride.stage, RideStage::GoingToPickup);

            assert_eq!(session.status(), AvailabilityStatus::OnRide);
            assert!(session.incoming().is_empty());
            assert_consistent(&session);
        }
    }

    #[test]
    fn accepting_unknown_or_while_unavailable_fails() {
        let mut session = available_with_requests();
        assert!(session.accept("missing", Utc::now()).is_err());
        assert_eq!(session.incoming().len(), 2);

        let mut session = DriverSession::new();
        assert!(session.accept("req1", Utc::now()).unwrap_err().is_invalid_state_error());
    }

    #[test]
    fn declining_removes_exactly_one_and_keeps_order() {
        let mut session = DriverSession::new();
        session.toggle_availability().unwrap();
        session.receive_requests(batch_of(&["a", "b", "c", "d"])).unwrap();

        session.decline("b").unwrap();

        let ids: Vec<&str> = session.incoming().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);

        assert!(session.decline("b").is_err());
        assert_eq!(session.incoming().len(), 3);
    }

    #[test]
    fn toggling_is_rejected_while_on_a_ride() {
        let mut session = available_with_requests();
        session.accept("req1", Utc::now()).unwrap();

        assert!(session.toggle_availability().unwrap_err().is_invalid_state_error());
        assert_eq!(session.status(), AvailabilityStatus::OnRide);
    }

    #[test]
    fn cancel_from_every_non_terminal_stage_returns_to_available() {
        let stages = [
            RideStage::GoingToPickup,
            RideStage::ArrivedAtPickup,
            RideStage::InProgress,
        ];

        for (steps, _) in stages.iter().enumerate() {
            let mut session = available_with_requests();
            session.accept("req2", Utc::now()).unwrap();

            let mut stage = RideStage::GoingToPickup;
            for _ in 0..steps {
                stage = stage.next().unwrap();
                session.advance(stage).unwrap();
            }

            let cancelled = session.cancel(CancelReason::VehicleProblem).unwrap();
            assert_eq!(cancelled.stage, stage);
            assert_eq!(session.status(), AvailabilityStatus::Available);
            assert!(session.active_ride().is_none());
            assert_consistent(&session);
        }
    }

    #[test]
    fn cancel_is_not_available_at_the_destination() {
        let mut session = available_with_requests();
        session.accept("req1", Utc::now()).unwrap();
        session.advance(RideStage::ArrivedAtPickup).unwrap();
        session.advance(RideStage::InProgress).unwrap();
        session.advance(RideStage::ArrivedAtDestination).unwrap();

        assert!(session.cancel(CancelReason::Other).is_err());
        assert_eq!(session.status(), AvailabilityStatus::OnRide);
    }

    #[test]
    fn finish_requires_arrival_and_records_history() {
        let mut session = available_with_requests();
        session.accept("req1", Utc::now()).unwrap();

        let fare = price(3.5, 13).unwrap();
        assert!(session.finish(fare, Utc::now()).is_err());

        session.advance(RideStage::ArrivedAtPickup).unwrap();
        session.advance(RideStage::InProgress).unwrap();
        session.advance(RideStage::ArrivedAtDestination).unwrap();

        let completed = session.finish(fare, Utc::now()).unwrap();
        assert_eq!(completed.request.id, "req1");
        assert_eq!(completed.fare.to_string(), "R$ 22.25");
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.status(), AvailabilityStatus::Available);
        assert_consistent(&session);
    }

    #[test]
    fn stage_transitions_require_an_active_ride() {
        let mut session = available_with_requests();
        assert!(session.advance(RideStage::ArrivedAtPickup).is_err());
    }

    #[test]
    fn availability_serializes_with_a_name_tag() {
        let session = DriverSession::new();
        let value = serde_json::to_value(&session.availability).unwrap();
        assert_eq!(value, serde_json::json!({ "name": "unavailable" }));
    }

    #[test]
    fn snapshot_prices_the_active_ride_at_the_given_hour() {
        let mut session = available_with_requests();
        assert_eq!(session.snapshot(13).unwrap().fare, None);

        session.accept("req1", Utc::now()).unwrap();
        let snapshot = session.snapshot(8).unwrap();

        assert_eq!(snapshot.status, AvailabilityStatus::OnRide);
        assert_eq!(snapshot.fare_text.as_deref(), Some("R$ 24.70"));
        assert_eq!(snapshot.period, "rush hour (+20%)");
        assert_eq!(snapshot.target, Some(mock_requests()[0].pickup));
        assert!(snapshot.incoming.is_empty());
    }
}
