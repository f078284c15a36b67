use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{api::ProfileAPI, entities::Profile, error::Error};

#[async_trait]
impl ProfileAPI for Engine {
    #[tracing::instrument(skip_all, fields(id = %profile.id))]
    async fn save_profile(&self, profile: Profile) -> Result<Profile, Error> {
        self.profiles.save(profile).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_profile(&self, id: Uuid) -> Result<Profile, Error> {
        self.profiles.find(id).await
    }
}
