use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::entities::{TripEndpoint, TripPlan};
use crate::error::Error;
use crate::pricing::Fare;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct QuoteParams {
    distance_km: f64,
}

#[derive(Serialize, Deserialize)]
pub struct QuoteResponse {
    fare: Fare,
    text: String,
    period: String,
}

#[derive(Serialize, Deserialize)]
pub struct PlanParams {
    origin: TripEndpoint,
    destination: TripEndpoint,
}

pub async fn quote(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<QuoteParams>,
) -> Result<Json<QuoteResponse>, Error> {
    let fare = api.quote_fare(params.distance_km).await?;

    Ok(QuoteResponse {
        text: fare.to_string(),
        period: fare.band.label(),
        fare,
    }
    .into())
}

pub async fn plan(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<PlanParams>,
) -> Result<Json<TripPlan>, Error> {
    let plan = api.plan_trip(params.origin, params.destination).await?;

    Ok(plan.into())
}
