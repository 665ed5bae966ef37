//! # Motion Studio Editor
//!
//! The editing-surface contract over the SvgKit core: a multi-document
//! store driven by discrete commands, global selection and UI state, the
//! inspector query surface, preview playback helpers, and the inline-edit
//! commit policy.
//!
//! Commands are total: a command naming a missing document is a no-op, and
//! the closed command enums make unknown commands unrepresentable. Every
//! document keeps its live tree in sync with its history's current
//! snapshot; undo/redo re-parse, so element identifiers are reassigned and
//! any held selection must be revalidated.

pub mod edit;
pub mod playback;
pub mod query;
pub mod selection;
pub mod store;
pub mod ui;

pub use edit::{commit_attribute_edit, commit_transform_edit, EditOutcome};
pub use selection::{Selection, SelectionCommand};
pub use store::{DocumentCommand, DocumentStore, EditorDocument};
pub use ui::{UiCommand, UiState};
