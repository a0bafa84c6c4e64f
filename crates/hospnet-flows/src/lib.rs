//! Concrete hospnet wizards and the services they submit to.
//!
//! - [`registration`]: four-step patient self-registration, CEP autofill and
//!   the user-creation service
//! - [`workflow`]: the custom workflow editor, its SLA, exception-flow and
//!   module entry forms, templates and the workflow service

pub mod error;
pub mod registration;
pub mod workflow;

pub use error::{EntryError, LookupError, ServiceError};
