//! Error types for service clients and entry forms.

use hospnet_model::ModelError;
use hospnet_validate::FieldError;
use hospnet_wizard::WizardError;
use thiserror::Error;

/// Errors from the user and workflow services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("workflow not found: {0}")]
    NotFound(String),

    #[error("invalid export document: {0}")]
    InvalidDocument(String),

    #[error("invalid workflow: {0}")]
    InvalidRecord(#[source] ModelError),

    #[error("unsupported export format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Errors from a postal-code lookup. Never shown to the user.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LookupError {
    #[error("postal code must have 8 digits: {0:?}")]
    InvalidCep(String),

    #[error("postal code not found: {0}")]
    NotFound(String),

    #[error("lookup request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("lookup service responded with {0}")]
    Status(u16),
}

/// Why an entry form could not be committed to its collection.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EntryError {
    #[error("{0}")]
    Invalid(FieldError),

    #[error("{message}")]
    Duplicate { key: String, message: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Wizard(#[from] WizardError),
}

impl EntryError {
    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(error) => error.message.clone(),
            Self::Duplicate { message, .. } => message.clone(),
            Self::Model(_) | Self::Wizard(_) => "Não foi possível adicionar o item.".to_string(),
        }
    }
}
