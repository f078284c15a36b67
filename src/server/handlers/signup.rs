use axum::extract::{Extension, Json, Path};

use crate::entities::{PostalAddress, Profile};
use crate::error::Error;
use crate::server::DynAPI;
use crate::signup::SignupForm;

pub async fn find_postal_code(
    Extension(api): Extension<DynAPI>,
    Path(cep): Path<String>,
) -> Result<Json<PostalAddress>, Error> {
    let address = api.lookup_postal_code(cep).await?;

    Ok(address.into())
}

pub async fn fill(
    Extension(api): Extension<DynAPI>,
    Json(form): Json<SignupForm>,
) -> Result<Json<SignupForm>, Error> {
    let form = api.fill_postal_address(form).await?;

    Ok(form.into())
}

pub async fn register(
    Extension(api): Extension<DynAPI>,
    Json(form): Json<SignupForm>,
) -> Result<Json<Profile>, Error> {
    let profile = api.register(form).await?;

    Ok(profile.into())
}
