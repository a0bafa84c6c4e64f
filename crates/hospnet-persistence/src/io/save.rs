//! Draft saving.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use hospnet_wizard::WizardDraft;

use crate::error::{PersistenceError, Result};
use crate::file::DraftFile;

/// Save a draft.
///
/// Writes a temp file next to the target, syncs it, then renames it over
/// the target, so a crash never leaves a half-written draft behind.
pub fn save_draft(draft: &WizardDraft, path: &Path) -> Result<DraftFile> {
    let file = DraftFile::new(draft.clone())?;
    let bytes = serde_json::to_vec_pretty(&file).map_err(|e| PersistenceError::Serialization {
        source: Box::new(e),
    })?;

    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut out = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    out.write_all(&bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    out.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(wizard = %draft.wizard_id, step = draft.current_step, "saved draft to {}", path.display());
    Ok(file)
}

/// Save a draft on the blocking thread pool.
pub async fn save_draft_async(draft: WizardDraft, path: PathBuf) -> Result<DraftFile> {
    tokio::task::spawn_blocking(move || save_draft(&draft, &path))
        .await
        .map_err(|e| PersistenceError::Serialization {
            source: Box::new(e),
        })?
}

/// Delete a draft once its wizard has been submitted. A missing file is
/// not an error.
pub fn discard_draft(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("discarded draft {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PersistenceError::Io {
            operation: "delete",
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::DRAFT_FORMAT;
    use hospnet_model::FormData;
    use tempfile::tempdir;

    fn draft() -> WizardDraft {
        WizardDraft {
            wizard_id: "patient-registration".into(),
            current_step: 1,
            data: FormData::new(),
        }
    }

    #[test]
    fn save_creates_parent_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("patient-registration.draft.json");

        let file = save_draft(&draft(), &path).unwrap();

        assert_eq!(file.format, DRAFT_FORMAT);
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        let json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(json["draft"]["currentStep"], 1);
    }

    #[test]
    fn discard_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.draft.json");
        save_draft(&draft(), &path).unwrap();
        assert!(discard_draft(&path).unwrap());
        assert!(!discard_draft(&path).unwrap());
    }
}
