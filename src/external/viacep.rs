use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::Config,
    entities::PostalAddress,
    error::Error,
    external::retry::{with_retry, RetryPolicy},
};

#[derive(Clone, Debug)]
pub struct ViaCep {
    client: reqwest::Client,
    api_base: String,
    retry: RetryPolicy,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    erro: Option<Value>,
}

impl Response {
    /// ViaCEP has answered both `"erro": true` and `"erro": "true"`.
    fn is_miss(&self) -> bool {
        match &self.erro {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(flag)) => flag != "false",
            Some(_) => true,
        }
    }
}

impl ViaCep {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: config.viacep_api_base.trim_end_matches('/').to_string(),
            retry: config.retry,
        })
    }

    /// `cep` must already be cleaned to exactly 8 digits.
    #[tracing::instrument(skip(self))]
    pub async fn lookup(&self, cep: &str) -> Result<PostalAddress, Error> {
        if cep.len() != 8 || !cep.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::invalid_input_error());
        }

        let url = format!("{}/ws/{}/json/", self.api_base, cep);

        let data = with_retry(&self.retry, "viacep", || self.fetch(&url)).await?;

        if data.is_miss() {
            tracing::info!("cep not found");
            return Err(Error::not_found_error());
        }

        Ok(PostalAddress {
            cep: cep.to_string(),
            street: data.logradouro,
            district: data.bairro,
            city: data.localidade,
            state: data.uf,
        })
    }

    async fn fetch(&self, url: &str) -> Result<Response, Error> {
        let res = self.client.get(url).send().await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(Error::invalid_input_error());
        } else if status_code != 200 {
            return Err(Error::upstream_error());
        }

        Ok(res.json().await?)
    }
}
