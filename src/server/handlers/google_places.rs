use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, PlaceSuggestions};
use crate::error::Error;
use crate::external::google_maps::SuggestionBias;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct SuggestionParams {
    input: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius: Option<f64>,
    session_token: Option<String>,
}

pub async fn list_suggestions(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<SuggestionParams>,
) -> Result<Json<PlaceSuggestions>, Error> {
    let location = match (params.latitude, params.longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
        _ => None,
    };

    let bias = SuggestionBias {
        location,
        radius: params.radius,
        session_token: params.session_token,
    };

    let suggestions = api.suggest_places(params.input, bias).await?;

    Ok(suggestions.into())
}
