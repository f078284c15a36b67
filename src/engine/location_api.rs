use super::Engine;

use async_trait::async_trait;

use crate::{api::LocationAPI, entities::Coordinates, error::Error};

#[async_trait]
impl LocationAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn update_location(&self, coordinates: Coordinates) -> Result<(), Error> {
        if !(-90.0..=90.0).contains(&coordinates.latitude)
            || !(-180.0..=180.0).contains(&coordinates.longitude)
        {
            return Err(Error::invalid_input_error());
        }

        self.location_updates.send(coordinates).await.map_err(|_| {
            tracing::warn!("location is not fed by pushed updates");
            Error::invalid_state_error()
        })
    }

    async fn current_location(&self) -> Result<Coordinates, Error> {
        Ok(self.location.current())
    }
}
