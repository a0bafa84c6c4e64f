//! Unsaved-change tracking.

use std::time::Instant;

use super::AutoSaveConfig;

/// Tracks whether a wizard has changes not yet written to its draft.
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    dirty: bool,
    last_change: Option<Instant>,
    /// Cleared on a successful save.
    first_unsaved_change: Option<Instant>,
    saving: bool,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn mark_dirty(&mut self) {
        let now = Instant::now();
        self.dirty = true;
        self.last_change = Some(now);
        self.first_unsaved_change.get_or_insert(now);
    }

    pub fn start_save(&mut self) {
        self.saving = true;
    }

    pub fn save_complete(&mut self) {
        self.dirty = false;
        self.saving = false;
        self.first_unsaved_change = None;
    }

    /// The changes stay dirty.
    pub fn save_failed(&mut self) {
        self.saving = false;
    }

    pub fn ms_since_last_change(&self) -> Option<u64> {
        self.last_change.map(elapsed_ms)
    }

    pub fn ms_since_first_unsaved(&self) -> Option<u64> {
        self.first_unsaved_change.map(elapsed_ms)
    }

    pub fn should_auto_save(&self, config: &AutoSaveConfig) -> bool {
        if !self.dirty || self.saving {
            return false;
        }
        match (self.ms_since_last_change(), self.ms_since_first_unsaved()) {
            (Some(since_last), Some(since_first)) => config.should_save(since_last, since_first),
            _ => false,
        }
    }
}

fn elapsed_ms(at: Instant) -> u64 {
    u64::try_from(at.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn failed_save_stays_dirty() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty();
        tracker.start_save();
        tracker.save_failed();
        assert!(tracker.is_dirty());
        assert!(!tracker.is_saving());
    }

    #[test]
    fn waits_for_debounce() {
        let mut tracker = DirtyTracker::new();
        let config = AutoSaveConfig {
            debounce_ms: 50,
            ..AutoSaveConfig::default()
        };
        assert!(!tracker.should_auto_save(&config));

        tracker.mark_dirty();
        assert!(!tracker.should_auto_save(&config));

        thread::sleep(Duration::from_millis(60));
        assert!(tracker.should_auto_save(&config));

        tracker.start_save();
        assert!(!tracker.should_auto_save(&config));
        tracker.save_complete();
        assert!(tracker.ms_since_first_unsaved().is_none());
    }
}
