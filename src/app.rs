//! Application module: the model the TUI draws and the runtime drives.
//!
//! `App` owns the track catalog and the per-screen state. Text input goes
//! through `Prompt`s, one field at a time.

mod model;
mod prompt;

pub use model::*;
pub use prompt::{Prompt, PromptKind};
