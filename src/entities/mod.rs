mod address;
mod driver;
mod location;
mod place;
mod preferences;
mod profile;
mod ride;
mod route;
mod trip;

pub use address::PostalAddress;
pub use driver::{Availability, AvailabilityStatus, DriverSession, DriverSnapshot};
pub use location::{Coordinates, FALLBACK_COORDINATES};
pub use place::{PlaceSuggestion, PlaceSuggestions};
pub use preferences::{DriverPreferences, GenderPreference, PaymentPreference, RatingPreference};
pub use profile::{Profile, Role, Vehicle};
pub use ride::{ActiveRide, CancelReason, CompletedRide, RideRequest, RideStage};
pub use route::{RouteInfo, Viewport};
pub use trip::{TripEndpoint, TripPlan};
