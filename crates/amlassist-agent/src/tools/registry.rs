//! Tool Registry — stores the tools available to one request and dispatches
//! model tool calls by name.

use std::collections::HashMap;
use std::sync::Arc;

use amlassist_core::types::{ToolCall, ToolDefinition};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::base::{Tool, ERROR_MARKER};

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Stores tools keyed by name and dispatches calls.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Overwrites any previous tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        info!(tool = tool.name(), "registered tool");
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Check if a tool is registered.
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Names of all registered tools, sorted for determinism.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// LLM-facing definitions for all registered tools, sorted by name.
    pub fn get_definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.to_definition()).collect();
        defs.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        defs
    }

    /// Execute a tool by name. The model always gets a `String` back.
    pub async fn execute(&self, name: &str, params: HashMap<String, Value>) -> String {
        let Some(tool) = self.tools.get(name) else {
            warn!(tool = name, "tool not found");
            return format!("{ERROR_MARKER} Tool '{name}' not found");
        };

        debug!(tool = name, params = params.len(), "executing tool");
        tool.execute(params).await
    }

    /// Execute a model-issued call, parsing its JSON argument string first.
    ///
    /// An empty argument string means no parameters.
    pub async fn execute_call(&self, call: &ToolCall) -> String {
        let name = call.function.name.as_str();
        let raw = call.function.arguments.trim();
        if raw.is_empty() {
            return self.execute(name, HashMap::new()).await;
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => self.execute(name, map.into_iter().collect()).await,
            Ok(_) => format!("{ERROR_MARKER} arguments for '{name}' must be a JSON object"),
            Err(e) => {
                warn!(tool = name, error = %e, "unparseable tool arguments");
                format!("{ERROR_MARKER} invalid JSON arguments for '{name}': {e}")
            }
        }
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
