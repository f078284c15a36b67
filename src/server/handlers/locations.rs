use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct GeocodeParams {
    address: String,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateParams {
    coordinates: Coordinates,
}

pub async fn find_current(Extension(api): Extension<DynAPI>) -> Result<Json<Coordinates>, Error> {
    let coordinates = api.current_location().await?;

    Ok(coordinates.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<UpdateParams>,
) -> Result<Json<()>, Error> {
    api.update_location(params.coordinates).await?;

    Ok(().into())
}

pub async fn geocode(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<Coordinates>, Error> {
    let coordinates = api.geocode(params.address).await?;

    Ok(coordinates.into())
}
