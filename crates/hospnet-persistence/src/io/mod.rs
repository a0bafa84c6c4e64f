//! Draft file I/O.

mod load;
mod save;

pub use load::{load_draft, load_draft_async, load_draft_if_present};
pub use save::{discard_draft, save_draft, save_draft_async};
