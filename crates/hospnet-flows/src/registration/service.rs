//! User-creation service and the registration submitter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hospnet_model::{PatientRegistration, SubmissionId};
use hospnet_wizard::{SubmissionError, Submitter};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use tokio::sync::Mutex;

use crate::error::ServiceError;

const USER_AGENT_VALUE: &str = concat!("hospnet/", env!("CARGO_PKG_VERSION"));

/// Creates user accounts.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn create_user(&self, user: &PatientRegistration) -> Result<(), ServiceError>;
}

/// `POST {api_url}/users` with the registration as JSON.
#[derive(Debug, Clone)]
pub struct HttpUserService {
    client: reqwest::Client,
    api_url: String,
}

impl HttpUserService {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl UserService for HttpUserService {
    async fn create_user(&self, user: &PatientRegistration) -> Result<(), ServiceError> {
        let url = format!("{}/users", self.api_url);
        tracing::debug!(%url, "creating user");

        let response = self.client.post(&url).json(user).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Keeps created users in memory.
#[derive(Debug, Default)]
pub struct RecordingUserService {
    created: Mutex<Vec<PatientRegistration>>,
    reject_with: Option<u16>,
}

impl RecordingUserService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service that answers every request with `status`.
    pub fn rejecting(status: u16) -> Self {
        Self {
            created: Mutex::default(),
            reject_with: Some(status),
        }
    }

    pub async fn created(&self) -> Vec<PatientRegistration> {
        self.created.lock().await.clone()
    }
}

#[async_trait]
impl UserService for RecordingUserService {
    async fn create_user(&self, user: &PatientRegistration) -> Result<(), ServiceError> {
        if let Some(status) = self.reject_with {
            return Err(ServiceError::Status {
                status,
                body: String::new(),
            });
        }
        self.created.lock().await.push(user.clone());
        Ok(())
    }
}

/// Adapts a [`UserService`] to the wizard's [`Submitter`] seam. The
/// submission id is the generated patient id.
#[derive(Clone)]
pub struct RegistrationSubmitter {
    service: Arc<dyn UserService>,
}

impl RegistrationSubmitter {
    pub fn new(service: Arc<dyn UserService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Submitter<PatientRegistration> for RegistrationSubmitter {
    async fn submit(&self, payload: &PatientRegistration) -> Result<SubmissionId, SubmissionError> {
        self.service
            .create_user(payload)
            .await
            .map_err(|e| SubmissionError::Rejected(e.to_string()))?;
        tracing::info!(patient_id = %payload.patient_id, "patient registered");
        Ok(payload.patient_id.clone().into())
    }
}
