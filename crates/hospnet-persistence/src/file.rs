//! On-disk draft envelope.
//!
//! ```text
//! {
//!   "format":   "hospnet-draft",
//!   "version":  1,
//!   "savedAt":  RFC 3339 timestamp,
//!   "checksum": hex SHA-256 of the serialized draft,
//!   "draft":    { "wizardId", "currentStep", "data" }
//! }
//! ```

use chrono::{DateTime, Utc};
use hospnet_wizard::WizardDraft;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{PersistenceError, Result};

/// Value of the `format` field.
pub const DRAFT_FORMAT: &str = "hospnet-draft";

/// Current envelope version.
pub const CURRENT_DRAFT_VERSION: u32 = 1;

/// Draft extension, appended to the wizard id.
pub const DRAFT_EXTENSION: &str = "draft.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftFile {
    pub format: String,
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub checksum: String,
    pub draft: WizardDraft,
}

impl DraftFile {
    pub fn new(draft: WizardDraft) -> Result<Self> {
        Ok(Self {
            format: DRAFT_FORMAT.to_string(),
            version: CURRENT_DRAFT_VERSION,
            saved_at: Utc::now(),
            checksum: draft_checksum(&draft)?,
            draft,
        })
    }
}

/// Hex SHA-256 of the draft's JSON serialization.
///
/// Form data is key-ordered, so the serialization is stable across a
/// save/load cycle.
pub fn draft_checksum(draft: &WizardDraft) -> Result<String> {
    let bytes = serde_json::to_vec(draft).map_err(|e| PersistenceError::Serialization {
        source: Box::new(e),
    })?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
