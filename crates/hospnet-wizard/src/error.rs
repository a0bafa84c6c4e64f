//! Error types for wizard construction, data entry and submission.

use std::time::Duration;

use hospnet_model::{FieldKind, ModelError};
use hospnet_validate::FieldError;
use thiserror::Error;

/// Errors detected while assembling a wizard definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DefinitionError {
    #[error("a wizard needs at least one step")]
    NoSteps,

    #[error("step indices must be sequential: expected {expected}, found {found}")]
    StepIndexGap { expected: usize, found: usize },

    #[error("field '{0}' is defined more than once")]
    DuplicateField(String),

    #[error("rule '{rule}' on step {step} targets unknown field '{field}'")]
    UnknownRuleField {
        step: usize,
        rule: String,
        field: String,
    },

    #[error("conditional section references unknown field '{0}'")]
    UnknownSectionField(String),

    #[error("collection key declared for '{0}', which is not a collection field")]
    NotACollection(String),

    #[error("default value given for unknown field '{0}'")]
    UnknownDefaultField(String),

    #[error("default value for '{field}' does not fit a {kind} field")]
    DefaultKindMismatch { field: String, kind: FieldKind },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors from data entry against a running wizard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum WizardError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field '{field}' expects a {expected} value")]
    KindMismatch { field: String, expected: FieldKind },

    #[error("field '{0}' is not a collection")]
    NotACollection(String),

    #[error("the wizard has already been submitted")]
    Finished,

    #[error("a submission is in progress")]
    SubmissionInFlight,

    #[error("draft belongs to wizard '{found}', expected '{expected}'")]
    DraftMismatch { expected: String, found: String },

    #[error("draft step {step} is out of range for a {count}-step wizard")]
    DraftStepOutOfRange { step: usize, count: usize },
}

/// Errors surfaced by the final submission.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmissionError {
    /// `submit` was called before reaching the last step.
    #[error("submission is only possible from the final step (on step {current} of {total})")]
    NotOnFinalStep { current: usize, total: usize },

    /// The final step failed validation.
    #[error("{0}")]
    Invalid(FieldError),

    #[error("a submission is already in progress")]
    AlreadySubmitting,

    #[error("the wizard has already been submitted")]
    AlreadySubmitted,

    #[error("no submission is in progress")]
    NotInFlight,

    /// The payload could not be assembled from the form data.
    #[error("could not build submission: {0}")]
    Build(String),

    /// The external create/update call rejected the payload.
    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("submission timed out after {0:?}")]
    TimedOut(Duration),
}

impl SubmissionError {
    /// Whether the user can fix something and try again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Invalid(_) | Self::Rejected(_) | Self::TimedOut(_) | Self::Build(_)
        )
    }

    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(error) => error.message.clone(),
            Self::Rejected(_) | Self::TimedOut(_) | Self::Build(_) => {
                "Não foi possível concluir o envio. Tente novamente.".to_string()
            }
            Self::AlreadySubmitting => "Envio em andamento.".to_string(),
            Self::AlreadySubmitted => "Formulário já enviado.".to_string(),
            Self::NotOnFinalStep { .. } | Self::NotInFlight => {
                "Conclua todas as etapas antes de enviar.".to_string()
            }
        }
    }
}
