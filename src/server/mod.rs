mod handlers;

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

pub use crate::api::DynAPI;
use crate::error::Error;
use crate::server::handlers::{
    drivers, events, google_places, locations, profiles, signup, trips,
};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/drivers/session", get(drivers::find_session))
        .route("/drivers/availability", patch(drivers::toggle_availability))
        .route("/drivers/requests/:id/accept", patch(drivers::accept_request))
        .route("/drivers/requests/:id/decline", patch(drivers::decline_request))
        .route("/drivers/ride/arrive_pickup", patch(drivers::arrive_at_pickup))
        .route("/drivers/ride/start", patch(drivers::start_trip))
        .route(
            "/drivers/ride/arrive_destination",
            patch(drivers::arrive_at_destination),
        )
        .route("/drivers/ride/finish", patch(drivers::finish_ride))
        .route("/drivers/ride/cancel", patch(drivers::cancel_ride))
        .route("/drivers/history", get(drivers::list_history))
        .route("/drivers/preferences", patch(drivers::update_preferences))
        .route(
            "/drivers/location",
            get(locations::find_current).patch(locations::update),
        )
        .route("/events", get(events::drain))
        .route("/fares", get(trips::quote))
        .route("/trips/plan", post(trips::plan))
        .route("/geocode", get(locations::geocode))
        .route(
            "/google_places/suggestions",
            get(google_places::list_suggestions),
        )
        .route("/postal_codes/:cep", get(signup::find_postal_code))
        .route("/signup/address", post(signup::fill))
        .route("/signup", post(signup::register))
        .route("/profiles", post(profiles::save))
        .route("/profiles/:id", get(profiles::find))
        .layer(Extension(api))
}

/// Serves the API until `shutdown` resolves.
pub async fn serve<S>(api: DynAPI, addr: SocketAddr, shutdown: S) -> Result<(), Error>
where
    S: Future<Output = ()>,
{
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::try_bind(&addr)
        .map_err(|err| {
            tracing::error!(?err, %addr, "failed to bind");
            Error::configuration_error()
        })?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|err| {
            tracing::error!(?err, "server error");
            Error::unexpected_error()
        })
}
