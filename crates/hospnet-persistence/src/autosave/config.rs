//! Auto-save settings.

use serde::{Deserialize, Serialize};

/// When drafts are written while a wizard is being filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    pub enabled: bool,

    /// Quiet period after the last change before saving. Further changes
    /// restart it.
    pub debounce_ms: u64,

    /// Longest a change may stay unsaved while edits keep coming.
    pub max_delay_ms: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 1500,
            max_delay_ms: 20_000,
        }
    }
}

impl AutoSaveConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Whether to save, given the time since the last change and since the
    /// first change not yet saved.
    pub fn should_save(&self, since_last_change_ms: u64, since_first_unsaved_ms: u64) -> bool {
        self.enabled
            && (since_last_change_ms >= self.debounce_ms || since_first_unsaved_ms >= self.max_delay_ms)
    }
}
