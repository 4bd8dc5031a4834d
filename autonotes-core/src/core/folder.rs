//! Folders: named, optionally nested groupings of notes.
//!
//! The hierarchy is advisory. `parent_uuid` is a plain id with no existence
//! or cycle checks; the front-end treats a dangling parent as the root.

use crate::core::note::present;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub uuid: String,
    pub parent_uuid: Option<String>,
    pub name: String,
}

impl Folder {
    pub fn new(uuid: String, name: String, parent_uuid: Option<String>) -> Self {
        Self {
            uuid,
            parent_uuid,
            name,
        }
    }

    /// Applies every field present in `patch`.
    pub fn apply(&mut self, patch: FolderPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(parent_uuid) = patch.parent_uuid {
            self.parent_uuid = parent_uuid;
        }
    }
}

/// A partial update to a [`Folder`]; `parent_uuid: null` moves it to the root.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FolderPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub parent_uuid: Option<Option<String>>,
}
