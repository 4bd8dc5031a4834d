//! Request and response bodies of the Autonotes HTTP API.
//!
//! Shapes match what the editor front-end already sends and expects, so
//! notes and folders are returned as bare arrays rather than wrapped.

use autonotes_core::{DisplayMode, MatchContext};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_NOTE_NAME: &str = "New Note";
pub const DEFAULT_FOLDER_NAME: &str = "New Folder";

// =====================================================
// Request Types
// =====================================================

/// Query string of `GET /autonotes/notes`.
///
/// `node_attributes` and `workflow_nodes` arrive as JSON text; values that
/// do not parse as a JSON object are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct NotesQuery {
    pub mode: Option<String>,
    pub node_type: Option<String>,
    pub workflow_name: Option<String>,
    pub node_attributes: Option<String>,
    pub workflow_nodes: Option<String>,
}

impl NotesQuery {
    /// Defaults to [`DisplayMode::All`] when no mode is given.
    pub fn display_mode(&self) -> DisplayMode {
        self.mode
            .as_deref()
            .map_or(DisplayMode::All, DisplayMode::parse)
    }

    pub fn context(&self) -> MatchContext {
        MatchContext {
            selected_node_type: self.node_type.clone(),
            selected_node_attributes: parse_object(self.node_attributes.as_deref()),
            workflow_name: self.workflow_name.clone(),
            workflow_nodes: parse_object(self.workflow_nodes.as_deref()),
        }
    }
}

fn parse_object(raw: Option<&str>) -> Option<Map<String, Value>> {
    match serde_json::from_str(raw?) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) | Err(_) => {
            log::debug!("Ignoring query value that is not a JSON object");
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub folder_uuid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateFolderRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_uuid: Option<String>,
}

// =====================================================
// Response Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub uuid: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SuccessResponse {
    pub fn ok(success: bool) -> Self {
        Self {
            success,
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Service health status
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub version: String,
    pub uptime_secs: u64,
}
