//! Resumable drafts for hospnet wizards.
//!
//! A draft is a [`WizardDraft`](hospnet_wizard::WizardDraft) wrapped in a
//! small JSON envelope (see [`DraftFile`]) carrying a format marker, a
//! version and a SHA-256 checksum of the payload.
//!
//! - **Atomic writes**: temp file, sync, rename
//! - **Integrity**: tampered or truncated drafts are refused on load
//! - **Auto-save** with debounce and a maximum delay
//!
//! # Example
//!
//! ```ignore
//! use hospnet_persistence::{draft_path, load_draft, save_draft};
//!
//! let path = draft_path(dir, engine.definition().id());
//! save_draft(&engine.snapshot(), &path)?;
//! let engine = WizardEngine::restore(definition, load_draft(&path)?)?;
//! ```

mod autosave;
mod error;
mod file;
mod io;

use std::path::{Path, PathBuf};

pub use autosave::{AutoSaveConfig, DirtyTracker, DraftAutoSaver};
pub use error::{PersistenceError, Result};
pub use file::{CURRENT_DRAFT_VERSION, DRAFT_EXTENSION, DRAFT_FORMAT, DraftFile, draft_checksum};
pub use io::{
    discard_draft, load_draft, load_draft_async, load_draft_if_present, save_draft,
    save_draft_async,
};

/// Conventional draft location for a wizard inside `dir`.
pub fn draft_path(dir: &Path, wizard_id: &str) -> PathBuf {
    dir.join(format!("{wizard_id}.{DRAFT_EXTENSION}"))
}
