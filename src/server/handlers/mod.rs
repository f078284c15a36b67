pub mod drivers;
pub mod events;
pub mod google_places;
pub mod locations;
pub mod profiles;
pub mod signup;
pub mod trips;
