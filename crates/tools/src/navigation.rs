//! History and timing commands: navigate, go_back, go_forward, wait,
//! press_key.
//!
//! Navigation commands are mutating and append an accessibility capture
//! when snapshot mode is on; wait and press_key only echo the completed
//! action.

use async_trait::async_trait;
use serde_json::{json, Value};

use webbridge_core::{ContentBlock, Result};

use crate::params::{self, FieldSpec};
use crate::snapshot::capture_snapshot;
use crate::{Tool, ToolContext, ToolSchema};

const NO_PARAMS_USAGE: &str = "No parameters are required.";

// ============ navigate ============

const NAVIGATE_FIELDS: &[FieldSpec] = &[FieldSpec::string("url", "URL to navigate to")];
const NAVIGATE_USAGE: &str =
    "Please provide an object with a \"url\" property containing the URL to navigate to.";

pub struct NavigateTool {
    snapshot: bool,
}

impl NavigateTool {
    pub fn new(snapshot: bool) -> Self {
        Self { snapshot }
    }

    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        let url = params["url"].as_str().unwrap_or_default().to_string();
        ctx.send("browser_navigate", json!({"url": url.clone()})).await?;
        let mut content = vec![ContentBlock::text(format!("Navigated to {}", url))];
        if self.snapshot {
            content.extend(capture_snapshot(&ctx).await?);
        }
        Ok(content)
    }
}

#[async_trait]
impl Tool for NavigateTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "navigate",
            wire_type: "browser_navigate",
            description: "Navigate to a URL in the browser",
            parameters: params::object_schema(NAVIGATE_FIELDS),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, NAVIGATE_FIELDS, NAVIGATE_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to navigate"))
    }
}

// ============ go_back / go_forward ============

pub struct GoBackTool {
    snapshot: bool,
}

impl GoBackTool {
    pub fn new(snapshot: bool) -> Self {
        Self { snapshot }
    }

    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        ctx.send("browser_go_back", json!({})).await?;
        let mut content = vec![ContentBlock::text("Navigated back")];
        if self.snapshot {
            content.extend(capture_snapshot(&ctx).await?);
        }
        Ok(content)
    }
}

#[async_trait]
impl Tool for GoBackTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "go_back",
            wire_type: "browser_go_back",
            description: "Navigate back in browser history",
            parameters: params::object_schema(&[]),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, &[], NO_PARAMS_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to go back"))
    }
}

pub struct GoForwardTool {
    snapshot: bool,
}

impl GoForwardTool {
    pub fn new(snapshot: bool) -> Self {
        Self { snapshot }
    }

    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        ctx.send("browser_go_forward", json!({})).await?;
        let mut content = vec![ContentBlock::text("Navigated forward")];
        if self.snapshot {
            content.extend(capture_snapshot(&ctx).await?);
        }
        Ok(content)
    }
}

#[async_trait]
impl Tool for GoForwardTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "go_forward",
            wire_type: "browser_go_forward",
            description: "Navigate forward in browser history",
            parameters: params::object_schema(&[]),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, &[], NO_PARAMS_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to go forward"))
    }
}

// ============ wait ============

const WAIT_FIELDS: &[FieldSpec] = &[FieldSpec::number("time", "Time to wait in seconds")];
const WAIT_USAGE: &str =
    "Please provide an object with a \"time\" property containing the number of seconds to wait.";

pub struct WaitTool;

impl WaitTool {
    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        let time = params["time"].clone();
        ctx.send("browser_wait", json!({"time": time.clone()})).await?;
        Ok(vec![ContentBlock::text(format!(
            "Waited for {} seconds",
            time
        ))])
    }
}

#[async_trait]
impl Tool for WaitTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "wait",
            wire_type: "browser_wait",
            description: "Wait for specified time",
            parameters: params::object_schema(WAIT_FIELDS),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, WAIT_FIELDS, WAIT_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to wait"))
    }
}

// ============ press_key ============

const PRESS_KEY_FIELDS: &[FieldSpec] = &[FieldSpec::string("key", "Key to press")];
const PRESS_KEY_USAGE: &str =
    "Please provide an object with a \"key\" property containing the key to press.";

pub struct PressKeyTool;

impl PressKeyTool {
    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        let key = params["key"].as_str().unwrap_or_default().to_string();
        ctx.send("browser_press_key", json!({"key": key.clone()})).await?;
        Ok(vec![ContentBlock::text(format!("Pressed key {}", key))])
    }
}

#[async_trait]
impl Tool for PressKeyTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "press_key",
            wire_type: "browser_press_key",
            description: "Press a key",
            parameters: params::object_schema(PRESS_KEY_FIELDS),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, PRESS_KEY_FIELDS, PRESS_KEY_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to press key"))
    }
}
