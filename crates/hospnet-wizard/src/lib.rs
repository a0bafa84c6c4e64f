//! Multi-step wizard engine.
//!
//! A [`WizardDefinition`] fixes the steps, fields, rules and conditional
//! sections of a wizard. A [`WizardEngine`] runs one pass through it:
//!
//! 1. **Entry**: [`WizardEngine::set_field`] and
//!    [`WizardEngine::with_collection`] write typed values
//! 2. **Progression**: [`WizardEngine::go_next`] validates the current step
//!    and either advances or requests submission
//! 3. **Submission**: [`WizardEngine::submit`] builds a payload from the
//!    active fields and hands it to a [`Submitter`]
//!
//! Presentation concerns (toasts, scrolling) are reported as
//! [`WizardEvent`]s and drained by the caller.

pub mod collection;
pub mod conditional;
pub mod definition;
pub mod draft;
pub mod engine;
pub mod error;
pub mod event;
pub mod state;
pub mod submit;

pub use collection::CollectionEditor;
pub use conditional::{ConditionalSection, ConditionalSectionResolver, GuardPredicate, resolve};
pub use definition::{DEFAULT_REQUIRED_MESSAGE, StepDefinition, WizardDefinition, WizardDefinitionBuilder};
pub use draft::WizardDraft;
pub use engine::WizardEngine;
pub use error::{DefinitionError, SubmissionError, WizardError};
pub use event::{Notification, NotificationLevel, WizardEvent};
pub use state::{WizardPhase, WizardState};
pub use submit::{DEFAULT_SUBMIT_TIMEOUT, SubmitConfig, Submitter};
