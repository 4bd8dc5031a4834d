//! Internal domain modules for the Autonotes core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod error;
pub mod folder;
pub mod matcher;
pub mod namespace;
pub mod note;
pub mod store;
pub mod trigger;

#[doc(inline)]
pub use error::{AutonotesError, Result};
#[doc(inline)]
pub use folder::{Folder, FolderPatch};
#[doc(inline)]
pub use matcher::{evaluate, note_matches, select, stringify_attribute, DisplayMode, MatchContext};
#[doc(inline)]
pub use namespace::{Namespace, DEFAULT_NAMESPACE};
#[doc(inline)]
pub use note::{FormatStyle, Note, NotePatch};
#[doc(inline)]
pub use store::NoteStore;
#[doc(inline)]
pub use trigger::TriggerCondition;
