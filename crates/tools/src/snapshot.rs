//! Accessibility-tree capture and the standalone `snapshot` tool.
//!
//! Capture is the external collaborator mutating commands invoke after
//! their reply arrives: it asks the executor for the page URL, title and
//! ARIA snapshot, and shapes them into one text block.

use async_trait::async_trait;
use serde_json::{json, Value};

use webbridge_core::{ContentBlock, Result};

use crate::{params, Tool, ToolContext, ToolSchema};

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Query the executor for the current page state. Any failure here fails
/// the whole calling command; there is no partial result.
pub async fn capture_snapshot(ctx: &ToolContext) -> Result<Vec<ContentBlock>> {
    let url = ctx.send("getUrl", json!({})).await?;
    let title = ctx.send("getTitle", json!({})).await?;
    let snapshot = ctx.send("browser_snapshot", json!({})).await?;
    let text = format!(
        "- Page URL: {}\n- Page Title: {}\n- Page Snapshot\n```yaml\n{}\n```",
        as_text(&url),
        as_text(&title),
        as_text(&snapshot)
    );
    Ok(vec![ContentBlock::text(text)])
}

pub struct SnapshotTool;

#[async_trait]
impl Tool for SnapshotTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "snapshot",
            wire_type: "browser_snapshot",
            description: "Capture ARIA snapshot of the current page",
            parameters: params::object_schema(&[]),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, &[], "No parameters are required.")
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        let run = async {
            self.validate(&params)?;
            capture_snapshot(&ctx).await
        };
        run.await.map_err(|e| e.context("Failed to capture snapshot"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ctx, MockChannel};
    use webbridge_core::Error;

    #[tokio::test]
    async fn test_capture_shapes_page_state() {
        let channel = MockChannel::new(vec![
            Ok(json!("https://example.com")),
            Ok(json!("Example Domain")),
            Ok(json!("- heading \"Example Domain\"")),
        ]);
        let blocks = capture_snapshot(&ctx(channel.clone(), true)).await.unwrap();

        assert_eq!(channel.sent_types(), vec!["getUrl", "getTitle", "browser_snapshot"]);
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            ContentBlock::Text { text } => {
                assert!(text.starts_with("- Page URL: https://example.com\n"));
                assert!(text.contains("- Page Title: Example Domain\n"));
                assert!(text.contains("```yaml\n- heading \"Example Domain\"\n```"));
            }
            other => panic!("expected text block, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_snapshot_tool_wraps_failures() {
        let channel = MockChannel::new(vec![Err(Error::Timeout("no reply".to_string()))]);
        let err = SnapshotTool
            .execute(ctx(channel, true), json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
        assert!(err.to_string().contains("Failed to capture snapshot"), "{}", err);
    }
}
