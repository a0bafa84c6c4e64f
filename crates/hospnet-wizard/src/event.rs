//! Events published by the engine for the presentation layer to consume.

use hospnet_model::SubmissionId;
use serde::Serialize;

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A transient message shown to the user (a toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    /// Field the message is about, if any.
    pub field: Option<String>,
    pub message: String,
}

impl Notification {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

/// Something the presentation layer should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// The visible step changed.
    ScrollToTop,
    Notify(Notification),
    /// `go_next` passed on the final step; the caller should submit.
    SubmitRequested,
    Submitted(SubmissionId),
    SubmissionFailed { message: String, recoverable: bool },
}
