use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    entities::{Coordinates, PlaceSuggestions, RouteInfo},
    error::Error,
    external::{polyline, retry::with_retry, retry::RetryPolicy},
};

/// Keys shorter than this are placeholders, not real credentials.
const MIN_API_KEY_LEN: usize = 10;

#[derive(Clone, Debug)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<LatLng> for Coordinates {
    fn from(location: LatLng) -> Self {
        Coordinates::new(location.lat, location.lng)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
    geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ValueField {
    value: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Leg {
    distance: ValueField,
    duration: ValueField,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectionsRoute {
    overview_polyline: OverviewPolyline,
    legs: Vec<Leg>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    results: Option<T>,
    predictions: Option<T>,
    routes: Option<T>,
}

/// Optional biasing for autocomplete, mirrors the Places API parameters.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SuggestionBias {
    pub location: Option<Coordinates>,
    pub radius: Option<f64>,
    pub session_token: Option<String>,
}

impl GoogleMaps {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: config.google_maps_api_base.trim_end_matches('/').to_string(),
            api_key: config.google_maps_api_key.clone(),
            retry: config.retry,
        })
    }

    fn key(&self) -> Result<String, Error> {
        match &self.api_key {
            Some(key) if key.len() >= MIN_API_KEY_LEN => Ok(key.clone()),
            _ => {
                tracing::error!("google maps api key missing or too short");
                Err(Error::configuration_error())
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn geocode(&self, address: &str) -> Result<Coordinates, Error> {
        let url = format!("{}/maps/api/geocode/json", self.api_base);
        let key = self.key()?;

        let data: Response<Vec<GeocodeResult>> = with_retry(&self.retry, "geocode", || {
            self.get_json(&url, vec![("address", address.to_string()), ("key", key.clone())])
        })
        .await?;

        if data.status == "ZERO_RESULTS" {
            return Err(Error::not_found_error());
        } else if data.status != "OK" {
            return Err(status_error(&data.status));
        }

        let result = data
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(Error::not_found_error)?;

        tracing::debug!(formatted_address = ?result.formatted_address, "geocoded");

        Ok(result.geometry.location.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_place_suggestions(
        &self,
        input: &str,
        bias: &SuggestionBias,
    ) -> Result<PlaceSuggestions, Error> {
        let url = format!("{}/maps/api/place/autocomplete/json", self.api_base);
        let key = self.key()?;

        let mut query = vec![
            ("input", input.to_string()),
            ("key", key),
            ("language", "pt_BR".to_string()),
        ];

        if let Some(location) = bias.location {
            query.push(("location", location.into()));
        }
        if let Some(radius) = bias.radius {
            query.push(("radius", radius.to_string()));
        }
        if let Some(session_token) = &bias.session_token {
            query.push(("sessiontoken", session_token.clone()));
        }

        let data: Response<PlaceSuggestions> = with_retry(&self.retry, "autocomplete", || {
            self.get_json(&url, query.clone())
        })
        .await?;

        match data.status.as_str() {
            "OK" => Ok(data.predictions.unwrap_or_default()),
            "ZERO_RESULTS" => Ok(vec![]),
            status => Err(status_error(status)),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn directions(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteInfo, Error> {
        let url = format!("{}/maps/api/directions/json", self.api_base);
        let key = self.key()?;

        let query = vec![
            ("origin", String::from(origin)),
            ("destination", String::from(destination)),
            ("key", key),
        ];

        let data: Response<Vec<DirectionsRoute>> = with_retry(&self.retry, "directions", || {
            self.get_json(&url, query.clone())
        })
        .await?;

        if data.status == "ZERO_RESULTS" || data.status == "NOT_FOUND" {
            return Err(Error::not_found_error());
        } else if data.status != "OK" {
            return Err(status_error(&data.status));
        }

        let route = data
            .routes
            .and_then(|routes| routes.into_iter().next())
            .ok_or_else(Error::not_found_error)?;

        let distance_meters = route.legs.iter().map(|leg| leg.distance.value).sum();
        let duration_seconds = route.legs.iter().map(|leg| leg.duration.value).sum();
        let points = polyline::decode(&route.overview_polyline.points)?;

        Ok(RouteInfo::new(points, distance_meters, duration_seconds))
    }

    async fn get_json<T>(&self, url: &str, query: Vec<(&str, String)>) -> Result<T, Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        let res = self.client.get(url).query(&query).send().await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(Error::invalid_input_error());
        } else if status_code != 200 {
            return Err(Error::upstream_error());
        }

        Ok(res.json().await?)
    }
}

fn status_error(status: &str) -> Error {
    match status {
        "INVALID_REQUEST" => Error::invalid_input_error(),
        "REQUEST_DENIED" => Error::configuration_error(),
        _ => {
            tracing::warn!(status, "unexpected google maps status");
            Error::upstream_error()
        }
    }
}
