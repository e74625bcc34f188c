//! The command catalog: an immutable registry built once at startup and
//! handed to callers. Duplicate names would overwrite at registration
//! time, so catalog uniqueness is a construction-time concern, not a
//! runtime one.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use webbridge_core::{Config, ContentBlock, Error, Result};

use crate::diagnostics::{GetConsoleLogsTool, GetNetworkLogsTool, ScreenshotTool};
use crate::interaction::{ClickTool, DragTool, HoverTool, SelectOptionTool, TypeTool};
use crate::navigation::{GoBackTool, GoForwardTool, NavigateTool, PressKeyTool, WaitTool};
use crate::snapshot::SnapshotTool;
use crate::{Tool, ToolContext};

#[derive(Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Build the fixed catalog. `config.tools.snapshot` decides whether
    /// mutating commands append an accessibility capture.
    pub fn with_defaults(config: &Config) -> Self {
        let snapshot = config.tools.snapshot;
        let mut registry = Self::new();

        // Navigation and timing
        registry.register(Arc::new(NavigateTool::new(snapshot)));
        registry.register(Arc::new(GoBackTool::new(snapshot)));
        registry.register(Arc::new(GoForwardTool::new(snapshot)));
        registry.register(Arc::new(WaitTool));
        registry.register(Arc::new(PressKeyTool));

        // Element interaction
        registry.register(Arc::new(ClickTool::new(snapshot)));
        registry.register(Arc::new(HoverTool::new(snapshot)));
        registry.register(Arc::new(TypeTool::new(snapshot)));
        registry.register(Arc::new(DragTool::new(snapshot)));
        registry.register(Arc::new(SelectOptionTool::new(snapshot)));

        // Page state
        registry.register(Arc::new(SnapshotTool));
        registry.register(Arc::new(ScreenshotTool));
        registry.register(Arc::new(GetConsoleLogsTool));
        registry.register(Arc::new(GetNetworkLogsTool));

        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        debug!(name = schema.name, "Registering tool");
        self.tools.insert(schema.name.to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Project the catalog as schema documents for tool discovery.
    pub fn get_tool_schemas(&self) -> Vec<Value> {
        let mut schemas: Vec<Value> = self
            .tools
            .values()
            .map(|tool| {
                let schema = tool.schema();
                json!({
                    "name": schema.name,
                    "description": schema.description,
                    "inputSchema": schema.parameters,
                })
            })
            .collect();
        schemas.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
        schemas
    }

    /// Check arguments against a command's schema without executing it.
    pub fn validate(&self, name: &str, params: &Value) -> Result<()> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::Tool(format!("Unknown tool: {}", name)))?;
        tool.validate(params)
    }

    /// Dispatch one invocation. Tools validate their own arguments and
    /// wrap every failure with their command-specific prefix.
    pub async fn execute(
        &self,
        name: &str,
        ctx: ToolContext,
        params: Value,
    ) -> Result<Vec<ContentBlock>> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::Tool(format!("Unknown tool: {}", name)))?;
        debug!(tool = name, "Executing tool");
        tool.execute(ctx, params).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_defaults(&Config::default())
    }
}
