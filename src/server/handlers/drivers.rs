use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::entities::{CancelReason, CompletedRide, DriverPreferences, DriverSnapshot};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CancelParams {
    reason: CancelReason,
}

pub async fn find_session(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<DriverSnapshot>, Error> {
    let snapshot = api.driver_session().await?;

    Ok(snapshot.into())
}

pub async fn toggle_availability(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<DriverSnapshot>, Error> {
    let snapshot = api.toggle_availability().await?;

    Ok(snapshot.into())
}

pub async fn accept_request(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<DriverSnapshot>, Error> {
    let snapshot = api.accept_request(id).await?;

    Ok(snapshot.into())
}

pub async fn decline_request(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<DriverSnapshot>, Error> {
    let snapshot = api.decline_request(id).await?;

    Ok(snapshot.into())
}

pub async fn arrive_at_pickup(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<DriverSnapshot>, Error> {
    let snapshot = api.arrive_at_pickup().await?;

    Ok(snapshot.into())
}

pub async fn start_trip(Extension(api): Extension<DynAPI>) -> Result<Json<DriverSnapshot>, Error> {
    let snapshot = api.start_trip().await?;

    Ok(snapshot.into())
}

pub async fn arrive_at_destination(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<DriverSnapshot>, Error> {
    let snapshot = api.arrive_at_destination().await?;

    Ok(snapshot.into())
}

pub async fn finish_ride(Extension(api): Extension<DynAPI>) -> Result<Json<CompletedRide>, Error> {
    let completed = api.finish_ride().await?;

    Ok(completed.into())
}

pub async fn cancel_ride(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CancelParams>,
) -> Result<Json<DriverSnapshot>, Error> {
    let snapshot = api.cancel_ride(params.reason).await?;

    Ok(snapshot.into())
}

pub async fn list_history(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<Vec<CompletedRide>>, Error> {
    let history = api.ride_history().await?;

    Ok(history.into())
}

pub async fn update_preferences(
    Extension(api): Extension<DynAPI>,
    Json(preferences): Json<DriverPreferences>,
) -> Result<Json<DriverPreferences>, Error> {
    let preferences = api.update_preferences(preferences).await?;

    Ok(preferences.into())
}
