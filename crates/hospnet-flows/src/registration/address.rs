//! Postal-code (CEP) address autofill.

use std::time::Duration;

use async_trait::async_trait;
use hospnet_wizard::WizardEngine;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;

use super::fields::{CITY, NEIGHBORHOOD, STATE, STREET, ZIP_CODE};
use crate::error::LookupError;

/// Default public ViaCEP endpoint.
pub const VIACEP_URL: &str = "https://viacep.com.br";

/// Address parts resolved from a postal code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSuggestion {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

/// Resolves a postal code to an address.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn lookup(&self, cep: &str) -> Result<AddressSuggestion, LookupError>;
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    /// `true` (or `"true"`) when the CEP does not exist.
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        self.erro
            .as_ref()
            .is_some_and(|v| v.as_bool() == Some(true) || v.as_str() == Some("true"))
    }
}

/// `GET {base}/ws/{cep}/json/` against ViaCEP or a compatible service.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup(&self, cep: &str) -> Result<AddressSuggestion, LookupError> {
        let digits: String = cep.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != 8 {
            return Err(LookupError::InvalidCep(cep.to_string()));
        }

        let url = format!("{}/ws/{digits}/json/", self.base_url);
        tracing::debug!(%url, "looking up postal code");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: ViaCepResponse = response.json().await?;
        if body.is_error() {
            return Err(LookupError::NotFound(digits));
        }
        Ok(AddressSuggestion {
            street: body.logradouro,
            neighborhood: body.bairro,
            city: body.localidade,
            state: body.uf,
        })
    }
}

/// Fill street, neighborhood, city and state from the entered CEP.
///
/// Returns whether anything was filled. Lookup failures leave the fields
/// untouched and are only logged.
pub async fn autofill_address(engine: &mut WizardEngine, lookup: &dyn AddressLookup) -> bool {
    let cep = engine.data().text(ZIP_CODE).to_string();
    let suggestion = match lookup.lookup(&cep).await {
        Ok(suggestion) => suggestion,
        Err(error) => {
            tracing::debug!(%error, "address lookup ignored");
            return false;
        }
    };

    let values = [
        (STREET, suggestion.street),
        (NEIGHBORHOOD, suggestion.neighborhood),
        (CITY, suggestion.city),
        (STATE, suggestion.state),
    ];
    let mut filled = false;
    for (field, value) in values {
        if value.is_empty() {
            continue;
        }
        match engine.set_field(field, value) {
            Ok(()) => filled = true,
            Err(error) => tracing::debug!(%error, field, "address autofill skipped field"),
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erro_flag_accepts_bool_and_string() {
        let as_bool: ViaCepResponse = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        let as_text: ViaCepResponse = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        let found: ViaCepResponse =
            serde_json::from_str(r#"{"logradouro": "Praça da Sé", "uf": "SP"}"#).unwrap();
        assert!(as_bool.is_error());
        assert!(as_text.is_error());
        assert!(!found.is_error());
    }

    #[tokio::test]
    async fn short_cep_is_rejected_locally() {
        let client = ViaCepClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            client.lookup("0100-100").await,
            Err(LookupError::InvalidCep(_))
        ));
    }
}
