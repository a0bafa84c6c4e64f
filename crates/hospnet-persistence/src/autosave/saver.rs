//! Debounced draft writer.

use std::path::{Path, PathBuf};

use hospnet_wizard::WizardDraft;

use super::{AutoSaveConfig, DirtyTracker};
use crate::error::Result;
use crate::io::save_draft;

/// Writes a wizard's draft to one path when the auto-save policy says so.
#[derive(Debug, Clone)]
pub struct DraftAutoSaver {
    path: PathBuf,
    config: AutoSaveConfig,
    tracker: DirtyTracker,
}

impl DraftAutoSaver {
    pub fn new(path: impl Into<PathBuf>, config: AutoSaveConfig) -> Self {
        Self {
            path: path.into(),
            config,
            tracker: DirtyTracker::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tracker(&self) -> &DirtyTracker {
        &self.tracker
    }

    pub fn note_change(&mut self) {
        self.tracker.mark_dirty();
    }

    /// Save if the debounce policy allows it. Returns whether a save ran.
    pub fn tick(&mut self, draft: &WizardDraft) -> Result<bool> {
        if !self.tracker.should_auto_save(&self.config) {
            return Ok(false);
        }
        self.write(draft).map(|()| true)
    }

    /// Save now if anything is unsaved, ignoring the debounce.
    pub fn flush(&mut self, draft: &WizardDraft) -> Result<bool> {
        if !self.config.enabled || !self.tracker.is_dirty() {
            return Ok(false);
        }
        self.write(draft).map(|()| true)
    }

    fn write(&mut self, draft: &WizardDraft) -> Result<()> {
        self.tracker.start_save();
        match save_draft(draft, &self.path) {
            Ok(_) => {
                self.tracker.save_complete();
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "auto-save failed");
                self.tracker.save_failed();
                Err(error)
            }
        }
    }
}
