pub mod autosave;
pub mod selection;

pub use autosave::AutosaveScheduler;
pub use selection::{SelectionAction, SelectionController};
