//! Mutable wizard state.

use hospnet_model::{FormData, SubmissionId};

/// Where a wizard is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardPhase {
    /// Editing the step at this index.
    Step(usize),
    Submitting,
    /// Terminal.
    Submitted(SubmissionId),
}

/// State owned by one [`WizardEngine`](crate::WizardEngine).
///
/// Field values accumulate: no transition ever removes a key from `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub(crate) current_step: usize,
    pub(crate) data: FormData,
    pub(crate) submitting: bool,
    pub(crate) submitted: Option<SubmissionId>,
    pub(crate) last_failure: Option<String>,
}

impl WizardState {
    pub(crate) fn new(data: FormData) -> Self {
        Self {
            current_step: 0,
            data,
            submitting: false,
            submitted: None,
            last_failure: None,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submitted(&self) -> Option<&SubmissionId> {
        self.submitted.as_ref()
    }

    /// User-facing message of the last failed submission, kept until the
    /// next attempt starts.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn phase(&self) -> WizardPhase {
        match (&self.submitted, self.submitting) {
            (Some(id), _) => WizardPhase::Submitted(id.clone()),
            (None, true) => WizardPhase::Submitting,
            (None, false) => WizardPhase::Step(self.current_step),
        }
    }
}
