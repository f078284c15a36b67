use super::Engine;

use async_trait::async_trait;

use crate::{
    api::SignupAPI,
    entities::{PostalAddress, Profile},
    error::Error,
    events::Event,
    signup::{clean_digits, SignupForm},
};

#[async_trait]
impl SignupAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn lookup_postal_code(&self, cep: String) -> Result<PostalAddress, Error> {
        let cep = clean_digits(&cep);

        self.lookup(self.viacep.lookup(&cep)).await
    }

    /// Masks the phone and CEP fields and, for a complete CEP, prefills the
    /// address. Lookup failures are reported as alerts, not errors.
    #[tracing::instrument(skip_all)]
    async fn fill_postal_address(&self, form: SignupForm) -> Result<SignupForm, Error> {
        let mut form = form;

        let phone = form.phone.clone();
        form.set_phone(&phone);

        let typed = form.cep.clone();
        let cep = match form.set_cep(&typed) {
            Some(cep) => cep,
            None => return Ok(form),
        };

        let result = self.lookup(self.viacep.lookup(&cep)).await;

        match form.apply_postal_lookup(result) {
            Ok(()) => {}
            Err(err) if err.is_not_found_error() => {
                self.events.publish(Event::alert("Error", "CEP not found."));
            }
            Err(err) => {
                tracing::warn!(?err, "cep lookup failed");
                self.events.publish(Event::alert(
                    "Error",
                    "Could not look up the CEP. Try again.",
                ));
            }
        }

        Ok(form)
    }

    #[tracing::instrument(skip_all)]
    async fn register(&self, form: SignupForm) -> Result<Profile, Error> {
        let profile = form.into_profile()?;

        tracing::info!(id = %profile.id, role = ?profile.role, "registering profile");

        self.profiles.save(profile).await
    }
}
