//! The wizard engine: step progression, data entry and submission.

use std::collections::BTreeSet;
use std::sync::Arc;

use hospnet_model::{FieldKind, FieldValue, FormData, SubmissionId};
use hospnet_validate::ValidationResult;

use crate::collection::CollectionEditor;
use crate::definition::WizardDefinition;
use crate::draft::WizardDraft;
use crate::error::{SubmissionError, WizardError};
use crate::event::{Notification, WizardEvent};
use crate::state::{WizardPhase, WizardState};
use crate::submit::{SubmitConfig, Submitter};

/// Drives one user's pass through a [`WizardDefinition`].
///
/// The engine owns the [`WizardState`], keeps the set of active fields in
/// step with the data, and queues [`WizardEvent`]s for the caller to drain.
#[derive(Debug)]
pub struct WizardEngine {
    definition: Arc<WizardDefinition>,
    state: WizardState,
    active: BTreeSet<String>,
    events: Vec<WizardEvent>,
    config: SubmitConfig,
}

impl WizardEngine {
    /// Start at step 0 with every field at its default value.
    pub fn new(definition: Arc<WizardDefinition>) -> Self {
        let state = WizardState::new(definition.initial_data());
        let active = definition.resolver().active_fields(&state.data);
        Self {
            definition,
            state,
            active,
            events: Vec::new(),
            config: SubmitConfig::default(),
        }
    }

    #[must_use]
    pub fn with_submit_config(mut self, config: SubmitConfig) -> Self {
        self.config = config;
        self
    }

    /// Resume from a draft taken with [`snapshot`](Self::snapshot).
    ///
    /// Values the draft does not mention keep their defaults; values that do
    /// not fit the current definition are rejected.
    pub fn restore(definition: Arc<WizardDefinition>, draft: WizardDraft) -> Result<Self, WizardError> {
        if draft.wizard_id != definition.id() {
            return Err(WizardError::DraftMismatch {
                expected: definition.id().to_string(),
                found: draft.wizard_id,
            });
        }
        if draft.current_step >= definition.step_count() {
            return Err(WizardError::DraftStepOutOfRange {
                step: draft.current_step,
                count: definition.step_count(),
            });
        }

        let mut engine = Self::new(definition);
        for (name, value) in draft.data.iter() {
            engine.check_value(name, value)?;
            engine.state.data.set(name, value.clone());
        }
        engine.state.current_step = draft.current_step;
        engine.refresh_active();
        tracing::debug!(wizard = engine.definition.id(), step = draft.current_step, "wizard restored from draft");
        Ok(engine)
    }

    pub fn definition(&self) -> &WizardDefinition {
        &self.definition
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn phase(&self) -> WizardPhase {
        self.state.phase()
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn step_count(&self) -> usize {
        self.definition.step_count()
    }

    pub fn is_final_step(&self) -> bool {
        self.state.current_step + 1 == self.step_count()
    }

    pub fn data(&self) -> &FormData {
        &self.state.data
    }

    pub fn is_active(&self, field: &str) -> bool {
        self.active.contains(field)
    }

    pub fn active_fields(&self) -> &BTreeSet<String> {
        &self.active
    }

    /// Whether a failed submission can be attempted again.
    pub fn can_retry(&self) -> bool {
        self.state.last_failure.is_some() && self.state.submitted.is_none() && !self.state.submitting
    }

    /// Overwrite the value of `name`.
    ///
    /// While a submission is in flight the call is accepted and ignored.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), WizardError> {
        let value = value.into();
        if self.state.submitted.is_some() {
            return Err(WizardError::Finished);
        }
        self.check_value(name, &value)?;
        if self.state.submitting {
            tracing::debug!(field = name, "edit ignored while submitting");
            return Ok(());
        }
        self.state.data.set(name, value);
        self.refresh_active();
        Ok(())
    }

    /// Apply several values, stopping at the first rejected one.
    pub fn set_fields<I, S, V>(&mut self, values: I) -> Result<(), WizardError>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: Into<FieldValue>,
    {
        for (name, value) in values {
            self.set_field(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Edit the collection field `name` through a [`CollectionEditor`].
    pub fn with_collection<R>(
        &mut self,
        name: &str,
        edit: impl FnOnce(&mut CollectionEditor<'_>) -> R,
    ) -> Result<R, WizardError> {
        if self.state.submitted.is_some() {
            return Err(WizardError::Finished);
        }
        if self.state.submitting {
            return Err(WizardError::SubmissionInFlight);
        }
        let field = self
            .definition
            .field(name)
            .ok_or_else(|| WizardError::UnknownField(name.to_string()))?;
        if field.kind() != FieldKind::Collection {
            return Err(WizardError::NotACollection(name.to_string()));
        }
        if !self.state.data.contains(name) {
            self.state.data.set(name, FieldValue::Items(Vec::new()));
        }
        let Some(FieldValue::Items(items)) = self.state.data.get_mut(name) else {
            return Err(WizardError::NotACollection(name.to_string()));
        };
        let key_field = self.definition.collection_key(name);
        let out = edit(&mut CollectionEditor::new(name, items).with_key_field(key_field));
        self.refresh_active();
        Ok(out)
    }

    /// Run the current step's rules. Pure.
    pub fn validate_current_step(&self) -> ValidationResult {
        self.validate_step(self.state.current_step)
            .unwrap_or_default()
    }

    /// Run the rules of step `index`, or `None` if there is no such step.
    pub fn validate_step(&self, index: usize) -> Option<ValidationResult> {
        self.definition
            .step(index)
            .map(|step| step.validate(&self.state.data, &self.active))
    }

    /// Advance after validating the current step.
    ///
    /// On the final step a pass does not move; it requests submission.
    pub fn go_next(&mut self) -> bool {
        if self.state.submitting || self.state.submitted.is_some() {
            return false;
        }
        if let Some(error) = self.validate_current_step().first_error {
            tracing::debug!(step = self.state.current_step, field = %error.field, "step blocked by validation");
            self.events
                .push(WizardEvent::Notify(Notification::error(error.field, error.message)));
            return false;
        }
        if self.is_final_step() {
            self.events.push(WizardEvent::SubmitRequested);
        } else {
            self.state.current_step += 1;
            tracing::debug!(step = self.state.current_step, "advanced");
            self.events.push(WizardEvent::ScrollToTop);
        }
        true
    }

    /// Step back without validating. Returns whether the step changed.
    pub fn go_previous(&mut self) -> bool {
        if self.state.submitting || self.state.submitted.is_some() || self.state.current_step == 0 {
            return false;
        }
        self.state.current_step -= 1;
        tracing::debug!(step = self.state.current_step, "went back");
        self.events.push(WizardEvent::ScrollToTop);
        true
    }

    /// Data as it will be submitted: only fields that are currently active.
    pub fn submission_data(&self) -> FormData {
        self.state.data.retain_only(&self.active)
    }

    /// Enter the `Submitting` phase and return the submission view.
    pub fn begin_submission(&mut self) -> Result<FormData, SubmissionError> {
        if self.state.submitted.is_some() {
            return Err(SubmissionError::AlreadySubmitted);
        }
        if self.state.submitting {
            return Err(SubmissionError::AlreadySubmitting);
        }
        if !self.is_final_step() {
            return Err(SubmissionError::NotOnFinalStep {
                current: self.state.current_step,
                total: self.step_count(),
            });
        }
        if let Err(error) = self.validate_current_step().into_result() {
            self.events.push(WizardEvent::Notify(Notification::error(
                error.field.clone(),
                error.message.clone(),
            )));
            return Err(SubmissionError::Invalid(error));
        }
        self.state.submitting = true;
        self.state.last_failure = None;
        Ok(self.submission_data())
    }

    /// Leave the `Submitting` phase with the outcome of the external call.
    ///
    /// Success is terminal. Failure returns to the final step with the data
    /// intact and the message kept for a retry.
    pub fn complete_submission(
        &mut self,
        outcome: Result<SubmissionId, SubmissionError>,
    ) -> Result<SubmissionId, SubmissionError> {
        if !self.state.submitting {
            return Err(SubmissionError::NotInFlight);
        }
        self.state.submitting = false;
        match outcome {
            Ok(id) => {
                tracing::info!(wizard = self.definition.id(), id = %id, "submission accepted");
                self.state.submitted = Some(id.clone());
                self.events.push(WizardEvent::Submitted(id.clone()));
                Ok(id)
            }
            Err(error) => {
                tracing::warn!(wizard = self.definition.id(), error = %error, "submission failed");
                let message = error.user_message();
                self.state.current_step = self.step_count() - 1;
                self.state.last_failure = Some(message.clone());
                self.events.push(WizardEvent::SubmissionFailed {
                    message,
                    recoverable: error.is_recoverable(),
                });
                Err(error)
            }
        }
    }

    /// Validate, build the payload from the submission view, and hand it to
    /// `submitter` under the configured timeout.
    pub async fn submit<T, B, S>(&mut self, build: B, submitter: &S) -> Result<SubmissionId, SubmissionError>
    where
        T: Sync,
        B: FnOnce(&FormData) -> Result<T, SubmissionError>,
        S: Submitter<T> + ?Sized,
    {
        let view = self.begin_submission()?;
        let payload = match build(&view) {
            Ok(payload) => payload,
            Err(error) => return self.complete_submission(Err(error)),
        };
        let timeout = self.config.timeout;
        let outcome = match tokio::time::timeout(timeout, submitter.submit(&payload)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(SubmissionError::TimedOut(timeout)),
        };
        self.complete_submission(outcome)
    }

    /// Take the queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<WizardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> WizardDraft {
        WizardDraft {
            wizard_id: self.definition.id().to_string(),
            current_step: self.state.current_step,
            data: self.state.data.clone(),
        }
    }

    fn check_value(&self, name: &str, value: &FieldValue) -> Result<(), WizardError> {
        let field = self
            .definition
            .field(name)
            .ok_or_else(|| WizardError::UnknownField(name.to_string()))?;
        if !field.kind().accepts(value) {
            return Err(WizardError::KindMismatch {
                field: name.to_string(),
                expected: field.kind(),
            });
        }
        Ok(())
    }

    fn refresh_active(&mut self) {
        self.active = self.definition.resolver().active_fields(&self.state.data);
    }
}
