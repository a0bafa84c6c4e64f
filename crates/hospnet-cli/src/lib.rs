//! Library side of the `hospnet` binary: logging, settings, answers files
//! and the step-by-step wizard walk.

pub mod answers;
pub mod logging;
pub mod settings;
pub mod walk;
