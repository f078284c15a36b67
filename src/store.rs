use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::Profile;
use crate::error::Error;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Replaces any stored profile with the same id.
    async fn save(&self, profile: Profile) -> Result<Profile, Error>;

    async fn find(&self, id: Uuid) -> Result<Profile, Error>;
}

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    #[tracing::instrument(skip_all, fields(id = %profile.id))]
    async fn save(&self, profile: Profile) -> Result<Profile, Error> {
        profile.validate()?;

        self.profiles
            .write()
            .await
            .insert(profile.id, profile.clone());

        Ok(profile)
    }

    #[tracing::instrument(skip(self))]
    async fn find(&self, id: Uuid) -> Result<Profile, Error> {
        self.profiles
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(Error::not_found_error)
    }
}
