//! Auto-save: when to write a draft, and the writer that does it.

mod config;
mod saver;
mod tracker;

pub use config::AutoSaveConfig;
pub use saver::DraftAutoSaver;
pub use tracker::DirtyTracker;
