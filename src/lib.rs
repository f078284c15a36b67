pub mod api;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod events;
pub mod external;
pub mod location;
pub mod pricing;
pub mod server;
pub mod signup;
pub mod simulation;
pub mod store;
