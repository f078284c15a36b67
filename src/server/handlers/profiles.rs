use axum::extract::{Extension, Json, Path};
use uuid::Uuid;

use crate::entities::Profile;
use crate::error::Error;
use crate::server::DynAPI;

pub async fn save(
    Extension(api): Extension<DynAPI>,
    Json(profile): Json<Profile>,
) -> Result<Json<Profile>, Error> {
    let profile = api.save_profile(profile).await?;

    Ok(profile.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, Error> {
    let profile = api.find_profile(id).await?;

    Ok(profile.into())
}
