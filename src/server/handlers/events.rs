use axum::extract::{Extension, Json};

use crate::error::Error;
use crate::events::Event;
use crate::server::DynAPI;

/// Events queued since the last call.
pub async fn drain(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Event>>, Error> {
    let events = api.drain_events().await?;

    Ok(events.into())
}
