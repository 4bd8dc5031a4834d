//! Core library for Autonotes: notes that surface themselves based on what
//! is happening in a node-based workflow editor.
//!
//! Notes carry [`TriggerCondition`]s; [`select`] decides which notes to show
//! for a [`MatchContext`] describing the selected node, its attributes, the
//! nodes present in the workflow and the workflow's name. [`NoteStore`]
//! keeps each user's notes and folders as JSON snapshots on disk.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    error::{AutonotesError, Result},
    folder::{Folder, FolderPatch},
    matcher::{evaluate, note_matches, select, stringify_attribute, DisplayMode, MatchContext},
    namespace::{Namespace, DEFAULT_NAMESPACE},
    note::{FormatStyle, Note, NotePatch},
    store::NoteStore,
    trigger::TriggerCondition,
};
