//! The seam to the external create/update operation.

use std::time::Duration;

use async_trait::async_trait;
use hospnet_model::SubmissionId;

use crate::error::SubmissionError;

/// Default time allowed for the external call before it is abandoned.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends a built payload to the service that owns it.
#[async_trait]
pub trait Submitter<T: Sync>: Send + Sync {
    async fn submit(&self, payload: &T) -> Result<SubmissionId, SubmissionError>;
}

/// Submission settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitConfig {
    pub timeout: Duration,
}

impl SubmitConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }
}
