//! Decides which notes to surface for the current editor state.
//!
//! The editor reports a [`MatchContext`]: the selected node's type and
//! attributes, the node types present in the workflow (each with its own
//! attribute map), and the workflow's name. [`evaluate`] tests one
//! [`TriggerCondition`] against that context; [`select`] applies the
//! display mode and the per-note rules:
//!
//! - a pinned note is always shown,
//! - otherwise a note is shown when **any** of its conditions matches,
//! - a note without conditions is never shown automatically.
//!
//! List-valued comparisons (`attribute_values`, `workflow_names`) are
//! substring tests: the stored candidate must occur inside the actual
//! value's string form, so `"512"` matches `"512x512"`. Node types are
//! compared exactly. All comparisons are case-sensitive.
//!
//! Matching never fails. A missing context field, a missing attribute or an
//! unrecognized condition simply does not match.
//!
//! ```rust
//! use autonotes_core::{evaluate, MatchContext, TriggerCondition};
//!
//! let condition = TriggerCondition::WorkflowName { workflow_names: vec!["prod".to_string()] };
//! let context = MatchContext {
//!     workflow_name: Some("my-prod-pipeline".to_string()),
//!     ..MatchContext::default()
//! };
//! assert!(evaluate(&condition, &context));
//! ```

use crate::{Note, TriggerCondition};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Snapshot of the editor state that conditions are evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchContext {
    #[serde(default)]
    pub selected_node_type: Option<String>,
    #[serde(default)]
    pub selected_node_attributes: Option<Map<String, Value>>,
    #[serde(default)]
    pub workflow_name: Option<String>,
    /// Node type → that node's attribute map.
    #[serde(default)]
    pub workflow_nodes: Option<Map<String, Value>>,
}

impl MatchContext {
    fn selected_attribute(&self, attribute_name: &str) -> Option<&Value> {
        self.selected_node_attributes.as_ref()?.get(attribute_name)
    }

    /// Looks up an attribute on a workflow node. Entries that are not JSON
    /// objects have no attributes.
    fn workflow_attribute(&self, node_type: &str, attribute_name: &str) -> Option<&Value> {
        self.workflow_nodes
            .as_ref()?
            .get(node_type)?
            .as_object()?
            .get(attribute_name)
    }

    fn workflow_has_node(&self, node_type: &str) -> bool {
        self.workflow_nodes
            .as_ref()
            .is_some_and(|nodes| nodes.contains_key(node_type))
    }
}

/// Which notes a listing should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Every note, unfiltered.
    #[default]
    All,
    /// Pinned notes plus notes whose conditions match the context.
    Automatic,
}

impl DisplayMode {
    /// `"all"` selects [`DisplayMode::All`]; any other value means automatic.
    #[must_use]
    pub fn parse(mode: &str) -> Self {
        if mode == "all" {
            Self::All
        } else {
            Self::Automatic
        }
    }
}

/// Returns the string form an attribute value is matched against.
///
/// This is the form the editor's Python host prints values in, so trigger
/// values written against the node widgets match: strings as-is, `True` /
/// `False` / `None`, and lists and objects as `['a', 1]` / `{'k': 'v'}`.
#[must_use]
pub fn stringify_attribute(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => {
            let mut out = String::new();
            write_repr(other, &mut out);
            out
        }
    }
}

fn write_repr(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_quoted(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_quoted(key, out);
                out.push_str(": ");
                write_repr(item, out);
            }
            out.push('}');
        }
    }
}

/// Single quotes unless the text holds a `'` and no `"`.
fn write_quoted(s: &str, out: &mut String) {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

fn contains_any(value: &Value, candidates: &[String]) -> bool {
    let actual = stringify_attribute(value);
    candidates
        .iter()
        .any(|candidate| actual.contains(candidate.as_str()))
}

/// Tests a single condition against `context`.
#[must_use]
pub fn evaluate(condition: &TriggerCondition, context: &MatchContext) -> bool {
    match condition {
        TriggerCondition::NodeSelected { node_types } => context
            .selected_node_type
            .as_ref()
            .is_some_and(|selected| node_types.contains(selected)),

        TriggerCondition::NodeSelectedAttribute {
            node_type,
            attribute_name,
            attribute_values,
        } => {
            context.selected_node_type.as_deref() == Some(node_type.as_str())
                && context
                    .selected_attribute(attribute_name)
                    .is_some_and(|value| contains_any(value, attribute_values))
        }

        TriggerCondition::NodeInWorkflow { node_types } => node_types
            .iter()
            .any(|node_type| context.workflow_has_node(node_type)),

        TriggerCondition::NodeInWorkflowAttribute {
            node_type,
            attribute_name,
            attribute_values,
        } => match context.workflow_attribute(node_type, attribute_name) {
            None => false,
            Some(value) => match attribute_values {
                Some(values) if !values.is_empty() => contains_any(value, values),
                _ => true,
            },
        },

        TriggerCondition::WorkflowName { workflow_names } => {
            context.workflow_name.as_deref().is_some_and(|name| {
                workflow_names
                    .iter()
                    .any(|candidate| name.contains(candidate.as_str()))
            })
        }

        TriggerCondition::Unrecognized(_) => false,
    }
}

/// Whether `note` should be shown automatically for `context`.
#[must_use]
pub fn note_matches(note: &Note, context: &MatchContext) -> bool {
    note.pinned
        || note
            .trigger_conditions
            .iter()
            .any(|condition| evaluate(condition, context))
}

/// Filters `notes` for display, preserving their order.
///
/// [`DisplayMode::All`] ignores `context` entirely.
pub fn select<'a>(notes: &'a [Note], mode: DisplayMode, context: &MatchContext) -> Vec<&'a Note> {
    match mode {
        DisplayMode::All => notes.iter().collect(),
        DisplayMode::Automatic => notes
            .iter()
            .filter(|note| note_matches(note, context))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn map(value: Value) -> Option<Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            _ => panic!("expected a JSON object"),
        }
    }

    fn selected(node_type: &str, attributes: Value) -> MatchContext {
        MatchContext {
            selected_node_type: Some(node_type.to_string()),
            selected_node_attributes: map(attributes),
            ..MatchContext::default()
        }
    }

    fn in_workflow(nodes: Value) -> MatchContext {
        MatchContext {
            workflow_nodes: map(nodes),
            ..MatchContext::default()
        }
    }

    fn note(uuid: &str, pinned: bool, conditions: Vec<TriggerCondition>) -> Note {
        let mut note = Note::new(uuid.to_string(), uuid.to_string(), None);
        note.pinned = pinned;
        note.trigger_conditions = conditions;
        note
    }

    #[test]
    fn test_node_selected_is_exact_membership() {
        let condition = TriggerCondition::NodeSelected {
            node_types: strings(&["A", "B"]),
        };

        assert!(evaluate(&condition, &selected("A", json!({}))));
        assert!(evaluate(&condition, &selected("B", json!({}))));
        assert!(!evaluate(&condition, &selected("AB", json!({}))));
        assert!(!evaluate(&condition, &selected("a", json!({}))));
        assert!(!evaluate(&condition, &MatchContext::default()));
    }

    #[test]
    fn test_node_selected_attribute_substring_hit() {
        let condition = TriggerCondition::NodeSelectedAttribute {
            node_type: "X".to_string(),
            attribute_name: "res".to_string(),
            attribute_values: strings(&["512"]),
        };

        assert!(evaluate(&condition, &selected("X", json!({"res": "512x512"}))));
        assert!(!evaluate(&condition, &selected("Y", json!({"res": "512x512"}))));
        assert!(!evaluate(&condition, &selected("X", json!({"res": "1024x1024"}))));
        assert!(!evaluate(&condition, &selected("X", json!({"size": "512x512"}))));
    }

    #[test]
    fn test_node_selected_attribute_without_attributes() {
        let condition = TriggerCondition::NodeSelectedAttribute {
            node_type: "X".to_string(),
            attribute_name: "res".to_string(),
            attribute_values: strings(&["512"]),
        };
        let context = MatchContext {
            selected_node_type: Some("X".to_string()),
            ..MatchContext::default()
        };

        assert!(!evaluate(&condition, &context));
    }

    #[test]
    fn test_non_string_attributes_match_their_printed_form() {
        let condition = TriggerCondition::NodeSelectedAttribute {
            node_type: "KSampler".to_string(),
            attribute_name: "steps".to_string(),
            attribute_values: strings(&["20"]),
        };
        assert!(evaluate(&condition, &selected("KSampler", json!({"steps": 20}))));
        assert!(evaluate(&condition, &selected("KSampler", json!({"steps": 120}))));
        assert!(!evaluate(&condition, &selected("KSampler", json!({"steps": 30}))));

        let enabled = TriggerCondition::NodeSelectedAttribute {
            node_type: "X".to_string(),
            attribute_name: "enabled".to_string(),
            attribute_values: strings(&["True"]),
        };
        assert!(evaluate(&enabled, &selected("X", json!({"enabled": true}))));
        assert!(!evaluate(&enabled, &selected("X", json!({"enabled": false}))));
    }

    #[test]
    fn test_stringify_attribute_forms() {
        assert_eq!(stringify_attribute(&json!("plain")), "plain");
        assert_eq!(stringify_attribute(&json!(true)), "True");
        assert_eq!(stringify_attribute(&json!(false)), "False");
        assert_eq!(stringify_attribute(&json!(null)), "None");
        assert_eq!(stringify_attribute(&json!(512)), "512");
        assert_eq!(stringify_attribute(&json!(1.5)), "1.5");
        assert_eq!(stringify_attribute(&json!(["a", 1, null])), "['a', 1, None]");
        assert_eq!(
            stringify_attribute(&json!({"name": "lora", "strength": 0.8, "on": true})),
            "{'name': 'lora', 'strength': 0.8, 'on': True}"
        );
        assert_eq!(stringify_attribute(&json!(["it's"])), r#"["it's"]"#);
        assert_eq!(stringify_attribute(&json!(["a\nb"])), r"['a\nb']");
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let condition = TriggerCondition::WorkflowName {
            workflow_names: strings(&["Prod"]),
        };
        let context = MatchContext {
            workflow_name: Some("my-prod-pipeline".to_string()),
            ..MatchContext::default()
        };

        assert!(!evaluate(&condition, &context));
    }

    #[test]
    fn test_node_in_workflow_any_present() {
        let condition = TriggerCondition::NodeInWorkflow {
            node_types: strings(&["LoraLoader", "ControlNetApply"]),
        };

        assert!(evaluate(&condition, &in_workflow(json!({"ControlNetApply": {}, "KSampler": {}}))));
        assert!(!evaluate(&condition, &in_workflow(json!({"KSampler": {}}))));
        assert!(!evaluate(&condition, &MatchContext::default()));
    }

    #[test]
    fn test_node_in_workflow_attribute_presence_only() {
        let condition = TriggerCondition::NodeInWorkflowAttribute {
            node_type: "LoraLoader".to_string(),
            attribute_name: "lora_name".to_string(),
            attribute_values: Some(vec![]),
        };

        assert!(evaluate(&condition, &in_workflow(json!({"LoraLoader": {"lora_name": null}}))));
        assert!(evaluate(&condition, &in_workflow(json!({"LoraLoader": {"lora_name": "x.safetensors"}}))));
        assert!(!evaluate(&condition, &in_workflow(json!({"LoraLoader": {"strength": 1.0}}))));
        assert!(!evaluate(&condition, &in_workflow(json!({"KSampler": {"lora_name": "x"}}))));

        let unset = TriggerCondition::NodeInWorkflowAttribute {
            node_type: "LoraLoader".to_string(),
            attribute_name: "lora_name".to_string(),
            attribute_values: None,
        };
        assert!(evaluate(&unset, &in_workflow(json!({"LoraLoader": {"lora_name": 3}}))));
    }

    #[test]
    fn test_node_in_workflow_attribute_with_values() {
        let condition = TriggerCondition::NodeInWorkflowAttribute {
            node_type: "CheckpointLoader".to_string(),
            attribute_name: "ckpt_name".to_string(),
            attribute_values: Some(strings(&["sdxl", "flux"])),
        };

        assert!(evaluate(
            &condition,
            &in_workflow(json!({"CheckpointLoader": {"ckpt_name": "flux1-dev.safetensors"}}))
        ));
        assert!(!evaluate(
            &condition,
            &in_workflow(json!({"CheckpointLoader": {"ckpt_name": "sd15.ckpt"}}))
        ));
    }

    #[test]
    fn test_node_in_workflow_attribute_non_object_entry() {
        let condition = TriggerCondition::NodeInWorkflowAttribute {
            node_type: "LoraLoader".to_string(),
            attribute_name: "lora_name".to_string(),
            attribute_values: None,
        };

        assert!(!evaluate(&condition, &in_workflow(json!({"LoraLoader": "lora_name"}))));
        assert!(!evaluate(&condition, &in_workflow(json!({"LoraLoader": null}))));
    }

    #[test]
    fn test_workflow_name_substring() {
        let condition = TriggerCondition::WorkflowName {
            workflow_names: strings(&["prod"]),
        };
        let named = |name: &str| MatchContext {
            workflow_name: Some(name.to_string()),
            ..MatchContext::default()
        };

        assert!(evaluate(&condition, &named("my-prod-pipeline")));
        assert!(!evaluate(&condition, &named("staging")));
        assert!(!evaluate(&condition, &MatchContext::default()));
    }

    #[test]
    fn test_unrecognized_never_matches() {
        let condition = TriggerCondition::Unrecognized(json!({"type": "always"}));
        let context = MatchContext {
            selected_node_type: Some("A".to_string()),
            workflow_name: Some("anything".to_string()),
            ..in_workflow(json!({"A": {}}))
        };

        assert!(!evaluate(&condition, &context));
    }

    #[test]
    fn test_display_mode_parse() {
        assert_eq!(DisplayMode::parse("all"), DisplayMode::All);
        assert_eq!(DisplayMode::parse("automatic"), DisplayMode::Automatic);
        assert_eq!(DisplayMode::parse("ALL"), DisplayMode::Automatic);
        assert_eq!(DisplayMode::parse(""), DisplayMode::Automatic);
        assert_eq!(DisplayMode::default(), DisplayMode::All);
    }

    #[test]
    fn test_pinned_notes_always_selected() {
        let notes = vec![
            note("pinned-empty", true, vec![]),
            note(
                "pinned-miss",
                true,
                vec![TriggerCondition::NodeSelected { node_types: strings(&["Z"]) }],
            ),
        ];

        let shown = select(&notes, DisplayMode::Automatic, &MatchContext::default());
        assert_eq!(shown.len(), 2);
    }

    #[test]
    fn test_unconditioned_notes_never_selected_automatically() {
        let notes = vec![note("plain", false, vec![])];
        let context = selected("A", json!({"res": "512"}));

        assert!(select(&notes, DisplayMode::Automatic, &context).is_empty());
    }

    #[test]
    fn test_select_any_condition_in_storage_order() {
        let notes = vec![
            note(
                "first",
                false,
                vec![
                    TriggerCondition::NodeSelected { node_types: strings(&["Z"]) },
                    TriggerCondition::WorkflowName { workflow_names: strings(&["demo"]) },
                ],
            ),
            note("second", false, vec![TriggerCondition::NodeSelected { node_types: strings(&["Z"]) }]),
            note("third", true, vec![]),
            note("fourth", false, vec![TriggerCondition::NodeSelected { node_types: strings(&["A"]) }]),
        ];
        let context = MatchContext {
            workflow_name: Some("demo-flow".to_string()),
            ..selected("A", json!({}))
        };

        let shown: Vec<&str> = select(&notes, DisplayMode::Automatic, &context)
            .into_iter()
            .map(|n| n.uuid.as_str())
            .collect();
        assert_eq!(shown, vec!["first", "third", "fourth"]);
    }

    #[test]
    fn test_select_all_ignores_context() {
        let notes = vec![
            note("a", false, vec![]),
            note("b", false, vec![TriggerCondition::Unrecognized(json!(null))]),
            note("c", true, vec![]),
        ];

        let shown: Vec<&str> = select(&notes, DisplayMode::All, &selected("X", json!({})))
            .into_iter()
            .map(|n| n.uuid.as_str())
            .collect();
        assert_eq!(shown, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_context_deserializes_with_missing_fields() {
        let context: MatchContext =
            serde_json::from_value(json!({"selected_node_type": "KSampler"})).unwrap();
        assert_eq!(context.selected_node_type.as_deref(), Some("KSampler"));
        assert!(context.workflow_nodes.is_none());
    }
}
