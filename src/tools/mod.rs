//! Function tools exposed to the agent runtime.
//!
//! Each tool takes JSON input and returns JSON output or a [`ToolError`].
//! Definitions (name, description, JSON Schema) are returned by
//! [`tool_definitions`] so the runtime can advertise them to the model.

pub mod preferences;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::session::PreferenceStore;

pub use preferences::{MERGE_PREFERENCES_TOOL, UPDATE_PREFERENCES_TOOL};

/// Errors returned by tool execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No tool is registered under this name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// The tool input did not match its schema.
    #[error("invalid tool input: {0}")]
    InvalidInput(String),
    /// The tool failed while running.
    #[error("tool execution failed: {0}")]
    ExecutionFailed(String),
}

/// JSON Schema definition for a tool the LLM can call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match [`execute_tool`] dispatch).
    pub name: String,
    /// Description shown to the LLM.
    pub description: String,
    /// JSON Schema object for the tool's parameters.
    pub input_schema: serde_json::Value,
}

/// Every tool this crate provides.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    preferences::preference_tool_definitions()
}

/// Run the tool called `name` with `input`.
///
/// # Errors
///
/// Returns [`ToolError::UnknownTool`] for unregistered names, otherwise
/// whatever the tool itself returns.
pub fn execute_tool(
    store: &PreferenceStore,
    name: &str,
    input: &serde_json::Value,
) -> Result<serde_json::Value, ToolError> {
    debug!(tool = name, "executing tool");
    match name {
        UPDATE_PREFERENCES_TOOL => preferences::update_preferences(store, input),
        MERGE_PREFERENCES_TOOL => preferences::merge_preferences(input),
        other => Err(ToolError::UnknownTool(other.to_owned())),
    }
}
