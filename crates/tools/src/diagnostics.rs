//! Pure query commands: console logs, network logs, screenshot.

use async_trait::async_trait;
use serde_json::{json, Value};

use webbridge_core::{ContentBlock, Error, Result};

use crate::params;
use crate::{Tool, ToolContext, ToolSchema};

const NO_PARAMS_USAGE: &str = "No parameters are required.";

// ============ get_console_logs ============

pub struct GetConsoleLogsTool;

impl GetConsoleLogsTool {
    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        let reply = ctx.send("browser_get_console_logs", json!({})).await?;
        let entries = reply
            .as_array()
            .ok_or_else(|| Error::Decode("expected an array of log entries".to_string()))?;
        let text = entries
            .iter()
            .map(|entry| entry.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(vec![ContentBlock::text(text)])
    }
}

#[async_trait]
impl Tool for GetConsoleLogsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_console_logs",
            wire_type: "browser_get_console_logs",
            description: "Get browser console logs",
            parameters: params::object_schema(&[]),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, &[], NO_PARAMS_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to get console logs"))
    }
}

// ============ get_network_logs ============

pub struct GetNetworkLogsTool;

impl GetNetworkLogsTool {
    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        let reply = ctx.send("browser_get_network_logs", json!({})).await?;
        let entries = reply
            .as_array()
            .ok_or_else(|| Error::Decode("expected an array of log entries".to_string()))?;
        // Network entries are bulky; pretty-print and double-space them.
        let rendered: Vec<String> = entries
            .iter()
            .map(serde_json::to_string_pretty)
            .collect::<std::result::Result<_, _>>()?;
        Ok(vec![ContentBlock::text(rendered.join("\n\n"))])
    }
}

#[async_trait]
impl Tool for GetNetworkLogsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_network_logs",
            wire_type: "browser_get_network_logs",
            description: "Get network requests and responses from the browser's network tab",
            parameters: params::object_schema(&[]),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, &[], NO_PARAMS_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to get network logs"))
    }
}

// ============ screenshot ============

pub struct ScreenshotTool;

impl ScreenshotTool {
    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        let reply = ctx.send("browser_screenshot", json!({})).await?;
        let data = reply
            .as_str()
            .ok_or_else(|| Error::Decode("expected base64 image data".to_string()))?;
        Ok(vec![ContentBlock::image(data, "image/png")])
    }
}

#[async_trait]
impl Tool for ScreenshotTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "screenshot",
            wire_type: "browser_screenshot",
            description: "Take a screenshot of the current page",
            parameters: params::object_schema(&[]),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, &[], NO_PARAMS_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to take screenshot"))
    }
}
