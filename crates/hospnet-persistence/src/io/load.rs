//! Draft loading.

use std::fs;
use std::path::{Path, PathBuf};

use hospnet_wizard::WizardDraft;

use crate::error::{PersistenceError, Result};
use crate::file::{CURRENT_DRAFT_VERSION, DRAFT_FORMAT, DraftFile, draft_checksum};

/// Load a draft, checking its format, version and checksum.
pub fn load_draft(path: &Path) -> Result<WizardDraft> {
    let bytes = fs::read(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_draft_bytes(&bytes, path)
}

/// Load a draft if one exists at `path`.
pub fn load_draft_if_present(path: &Path) -> Result<Option<WizardDraft>> {
    if !path.exists() {
        return Ok(None);
    }
    load_draft(path).map(Some)
}

/// Load a draft on the blocking thread pool.
pub async fn load_draft_async(path: PathBuf) -> Result<WizardDraft> {
    tokio::task::spawn_blocking(move || load_draft(&path))
        .await
        .map_err(|e| PersistenceError::Deserialization {
            source: Box::new(e),
        })?
}

fn parse_draft_bytes(bytes: &[u8], path: &Path) -> Result<WizardDraft> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("not JSON: {e}"),
        })?;

    if value.get("format").and_then(serde_json::Value::as_str) != Some(DRAFT_FORMAT) {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "missing hospnet-draft marker".to_string(),
        });
    }

    // Checked before the full parse so a newer layout reports its version.
    let version = value
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "missing version".to_string(),
        })?;
    if version > CURRENT_DRAFT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: version,
            max_supported: CURRENT_DRAFT_VERSION,
            path: path.to_path_buf(),
        });
    }

    let file: DraftFile = serde_json::from_value(value).map_err(|e| PersistenceError::Deserialization {
        source: Box::new(e),
    })?;

    let actual = draft_checksum(&file.draft)?;
    if actual != file.checksum {
        return Err(PersistenceError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: file.checksum,
            actual,
        });
    }

    tracing::info!(wizard = %file.draft.wizard_id, saved_at = %file.saved_at, "loaded draft from {}", path.display());
    Ok(file.draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::save::save_draft;
    use hospnet_model::{FieldValue, FormData};
    use tempfile::tempdir;

    fn draft() -> WizardDraft {
        let mut data = FormData::new();
        data.set("name", FieldValue::text("Ana"));
        data.set("hasAcceptedTerms", FieldValue::Flag(true));
        WizardDraft {
            wizard_id: "patient-registration".into(),
            current_step: 2,
            data,
        }
    }

    #[test]
    fn round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("d.draft.json");
        save_draft(&draft(), &path).unwrap();
        assert_eq!(load_draft(&path).unwrap(), draft());
    }

    #[test]
    fn tampered_payload_is_detected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("d.draft.json");
        save_draft(&draft(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap().replace("\"Ana\"", "\"Bia\"");
        fs::write(&path, text).unwrap();

        assert!(matches!(
            load_draft(&path),
            Err(PersistenceError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn rejects_foreign_json_and_future_versions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("d.draft.json");

        fs::write(&path, br#"{"hello": "world"}"#).unwrap();
        assert!(matches!(
            load_draft(&path),
            Err(PersistenceError::InvalidFormat { .. })
        ));

        fs::write(&path, br#"{"format": "hospnet-draft", "version": 99}"#).unwrap();
        assert!(matches!(
            load_draft(&path),
            Err(PersistenceError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn absent_draft_is_none() {
        let dir = tempdir().unwrap();
        assert!(load_draft_if_present(&dir.path().join("none.draft.json")).unwrap().is_none());
    }
}
