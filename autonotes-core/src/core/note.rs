use crate::TriggerCondition;
use serde::{Deserialize, Deserializer, Serialize};

/// How a note's `content` is rendered by the front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatStyle {
    #[default]
    Plaintext,
    #[serde(alias = "markdown")]
    Richtext,
}

/// A user-authored note, optionally filed in a folder.
///
/// `folder_uuid` is a weak reference: the folder may not exist, in which
/// case the note is simply treated as unfiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub uuid: String,
    pub folder_uuid: Option<String>,
    pub content: String,
    pub format_style: FormatStyle,
    pub trigger_conditions: Vec<TriggerCondition>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Note {
    /// A fresh, empty note: no content, no conditions, not pinned.
    pub fn new(uuid: String, name: String, folder_uuid: Option<String>) -> Self {
        Self {
            uuid,
            folder_uuid,
            content: String::new(),
            format_style: FormatStyle::Plaintext,
            trigger_conditions: vec![],
            pinned: false,
            name,
            tags: vec![],
        }
    }

    /// Applies every field present in `patch`. Returns `true` if anything changed.
    pub fn apply(&mut self, patch: NotePatch) -> bool {
        let before = self.clone();
        if let Some(folder_uuid) = patch.folder_uuid {
            self.folder_uuid = folder_uuid;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(format_style) = patch.format_style {
            self.format_style = format_style;
        }
        if let Some(trigger_conditions) = patch.trigger_conditions {
            self.trigger_conditions = trigger_conditions;
        }
        if let Some(pinned) = patch.pinned {
            self.pinned = pinned;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        *self != before
    }
}

/// A partial update to a [`Note`].
///
/// Absent fields are left alone. For `folder_uuid`, `Some(None)` (an
/// explicit JSON `null`) clears the folder. Unknown keys in incoming JSON
/// are ignored, and `uuid` is never patchable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NotePatch {
    #[serde(default, deserialize_with = "present")]
    pub folder_uuid: Option<Option<String>>,
    pub content: Option<String>,
    pub format_style: Option<FormatStyle>,
    pub trigger_conditions: Option<Vec<TriggerCondition>>,
    pub pinned: Option<bool>,
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NotePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Marks a field as present even when its value is `null`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
