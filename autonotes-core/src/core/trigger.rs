//! Trigger conditions: the rules that decide when a note is surfaced.
//!
//! On disk and on the wire every condition is a flat record carrying a
//! `type` tag plus the five optional rule fields; fields the tag does not
//! use are written as `null`:
//!
//! ```json
//! {
//!   "type": "node_selected",
//!   "node_types": ["KSampler"],
//!   "node_type": null,
//!   "attribute_name": null,
//!   "attribute_values": null,
//!   "workflow_names": null
//! }
//! ```
//!
//! In memory the record is a proper sum type so each variant carries only
//! the fields it needs. A record with an unknown tag, a field of the wrong
//! shape, or a missing required field becomes [`TriggerCondition::Unrecognized`],
//! which keeps the original JSON so it is written back untouched and never
//! matches anything.
//!
//! ```rust
//! use autonotes_core::TriggerCondition;
//!
//! let json = r#"{"type":"workflow_name","workflow_names":["prod"]}"#;
//! let condition: TriggerCondition = serde_json::from_str(json).unwrap();
//! assert_eq!(
//!     condition,
//!     TriggerCondition::WorkflowName { workflow_names: vec!["prod".to_string()] }
//! );
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const NODE_SELECTED: &str = "node_selected";
pub const NODE_SELECTED_ATTRIBUTE: &str = "node_selected_attribute";
pub const NODE_IN_WORKFLOW: &str = "node_in_workflow";
pub const NODE_IN_WORKFLOW_ATTRIBUTE: &str = "node_in_workflow_attribute";
pub const WORKFLOW_NAME: &str = "workflow_name";

/// One matching rule attached to a note.
///
/// A note is shown when any one of its conditions matches the editor
/// context; see [`crate::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerCondition {
    /// The selected node's type is one of `node_types`.
    NodeSelected { node_types: Vec<String> },

    /// The selected node is exactly `node_type` and its `attribute_name`
    /// attribute contains one of `attribute_values`.
    NodeSelectedAttribute {
        node_type: String,
        attribute_name: String,
        attribute_values: Vec<String>,
    },

    /// At least one of `node_types` is present in the workflow.
    NodeInWorkflow { node_types: Vec<String> },

    /// `node_type` is present in the workflow and carries `attribute_name`.
    ///
    /// With no (or empty) `attribute_values` presence alone matches;
    /// otherwise the attribute must contain one of the values.
    NodeInWorkflowAttribute {
        node_type: String,
        attribute_name: String,
        attribute_values: Option<Vec<String>>,
    },

    /// The workflow name contains one of `workflow_names`.
    WorkflowName { workflow_names: Vec<String> },

    /// A record that could not be read as any known rule. Never matches.
    Unrecognized(Value),
}

/// Flat persisted shape shared by every condition kind.
#[derive(Debug, Serialize, Deserialize)]
struct ConditionRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    node_types: Option<Vec<String>>,
    #[serde(default)]
    node_type: Option<String>,
    #[serde(default)]
    attribute_name: Option<String>,
    #[serde(default)]
    attribute_values: Option<Vec<String>>,
    #[serde(default)]
    workflow_names: Option<Vec<String>>,
}

impl ConditionRecord {
    fn tagged(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            node_types: None,
            node_type: None,
            attribute_name: None,
            attribute_values: None,
            workflow_names: None,
        }
    }

    /// Converts into a typed condition, or `None` when the tag is unknown
    /// or a field the tag requires is missing.
    fn into_condition(self) -> Option<TriggerCondition> {
        let condition = match self.kind.as_str() {
            NODE_SELECTED => TriggerCondition::NodeSelected {
                node_types: self.node_types?,
            },
            NODE_SELECTED_ATTRIBUTE => TriggerCondition::NodeSelectedAttribute {
                node_type: self.node_type?,
                attribute_name: self.attribute_name?,
                attribute_values: self.attribute_values?,
            },
            NODE_IN_WORKFLOW => TriggerCondition::NodeInWorkflow {
                node_types: self.node_types?,
            },
            NODE_IN_WORKFLOW_ATTRIBUTE => TriggerCondition::NodeInWorkflowAttribute {
                node_type: self.node_type?,
                attribute_name: self.attribute_name?,
                attribute_values: self.attribute_values,
            },
            WORKFLOW_NAME => TriggerCondition::WorkflowName {
                workflow_names: self.workflow_names?,
            },
            _ => return None,
        };
        Some(condition)
    }
}

impl TriggerCondition {
    /// Builds a condition from one persisted JSON record.
    ///
    /// Never fails: anything that is not a well-formed known rule is kept
    /// verbatim as [`TriggerCondition::Unrecognized`].
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value::<ConditionRecord>(value.clone())
            .ok()
            .and_then(ConditionRecord::into_condition)
            .unwrap_or(Self::Unrecognized(value))
    }

    /// Returns the persisted `type` tag, or `None` for an unrecognized record.
    #[must_use]
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            Self::NodeSelected { .. } => Some(NODE_SELECTED),
            Self::NodeSelectedAttribute { .. } => Some(NODE_SELECTED_ATTRIBUTE),
            Self::NodeInWorkflow { .. } => Some(NODE_IN_WORKFLOW),
            Self::NodeInWorkflowAttribute { .. } => Some(NODE_IN_WORKFLOW_ATTRIBUTE),
            Self::WorkflowName { .. } => Some(WORKFLOW_NAME),
            Self::Unrecognized(_) => None,
        }
    }

    fn to_record(&self) -> Option<ConditionRecord> {
        let mut record = ConditionRecord::tagged(self.kind()?);
        match self {
            Self::NodeSelected { node_types } | Self::NodeInWorkflow { node_types } => {
                record.node_types = Some(node_types.clone());
            }
            Self::NodeSelectedAttribute {
                node_type,
                attribute_name,
                attribute_values,
            } => {
                record.node_type = Some(node_type.clone());
                record.attribute_name = Some(attribute_name.clone());
                record.attribute_values = Some(attribute_values.clone());
            }
            Self::NodeInWorkflowAttribute {
                node_type,
                attribute_name,
                attribute_values,
            } => {
                record.node_type = Some(node_type.clone());
                record.attribute_name = Some(attribute_name.clone());
                record.attribute_values = attribute_values.clone();
            }
            Self::WorkflowName { workflow_names } => {
                record.workflow_names = Some(workflow_names.clone());
            }
            Self::Unrecognized(_) => return None,
        }
        Some(record)
    }
}

impl Serialize for TriggerCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unrecognized(raw) => raw.serialize(serializer),
            known => known.to_record().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TriggerCondition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}
