//! UI state that is independent of rendering
//!
//! Renderers draw these; the simulation never reads them.

pub mod name_entry;

pub use name_entry::{NameEntry, NameEntryError, MAX_NAME_LEN};
