//! Resumable snapshot of a wizard in progress.

use hospnet_model::FormData;
use serde::{Deserialize, Serialize};

/// What is needed to put a user back where they left off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardDraft {
    pub wizard_id: String,
    pub current_step: usize,
    pub data: FormData,
}
