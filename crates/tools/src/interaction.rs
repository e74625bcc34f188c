//! Element interaction commands: click, hover, type, drag, select_option.
//!
//! All five are mutating: the confirmation text block always comes first,
//! and in snapshot mode the post-action capture blocks follow it.

use async_trait::async_trait;
use serde_json::{json, Value};

use webbridge_core::{ContentBlock, Result};

use crate::params::{self, FieldSpec};
use crate::snapshot::capture_snapshot;
use crate::{Tool, ToolContext, ToolSchema};

// ============ click ============

const CLICK_FIELDS: &[FieldSpec] =
    &[FieldSpec::string("element", "Element name or selector to click")];
const CLICK_USAGE: &str = "Please provide an object with an \"element\" property containing the \
                           element name or selector to click.";

pub struct ClickTool {
    snapshot: bool,
}

impl ClickTool {
    pub fn new(snapshot: bool) -> Self {
        Self { snapshot }
    }

    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        let element = params["element"].as_str().unwrap_or_default().to_string();
        ctx.send("browser_click", json!({"element": element.clone()})).await?;
        let mut content = vec![ContentBlock::text(format!("Clicked \"{}\"", element))];
        if self.snapshot {
            content.extend(capture_snapshot(&ctx).await?);
        }
        Ok(content)
    }
}

#[async_trait]
impl Tool for ClickTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "click",
            wire_type: "browser_click",
            description: "Click an element on the page",
            parameters: params::object_schema(CLICK_FIELDS),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, CLICK_FIELDS, CLICK_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to click element"))
    }
}

// ============ hover ============

const HOVER_FIELDS: &[FieldSpec] =
    &[FieldSpec::string("element", "Element name or selector to hover")];
const HOVER_USAGE: &str = "Please provide an object with an \"element\" property containing the \
                           element name or selector to hover.";

pub struct HoverTool {
    snapshot: bool,
}

impl HoverTool {
    pub fn new(snapshot: bool) -> Self {
        Self { snapshot }
    }

    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        let element = params["element"].as_str().unwrap_or_default().to_string();
        ctx.send("browser_hover", json!({"element": element.clone()})).await?;
        let mut content = vec![ContentBlock::text(format!("Hovered over \"{}\"", element))];
        if self.snapshot {
            content.extend(capture_snapshot(&ctx).await?);
        }
        Ok(content)
    }
}

#[async_trait]
impl Tool for HoverTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "hover",
            wire_type: "browser_hover",
            description: "Hover over an element on the page",
            parameters: params::object_schema(HOVER_FIELDS),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, HOVER_FIELDS, HOVER_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to hover element"))
    }
}

// ============ type ============

const TYPE_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("element", "Element name or selector"),
    FieldSpec::string("text", "Text to type"),
];
const TYPE_USAGE: &str = "Please provide an object with \"element\" and \"text\" properties.";

pub struct TypeTool {
    snapshot: bool,
}

impl TypeTool {
    pub fn new(snapshot: bool) -> Self {
        Self { snapshot }
    }

    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        let element = params["element"].as_str().unwrap_or_default().to_string();
        let text = params["text"].as_str().unwrap_or_default().to_string();
        ctx.send("browser_type", json!({"element": element.clone(), "text": text.clone()}))
            .await?;
        let mut content = vec![ContentBlock::text(format!(
            "Typed \"{}\" into \"{}\"",
            text, element
        ))];
        if self.snapshot {
            content.extend(capture_snapshot(&ctx).await?);
        }
        Ok(content)
    }
}

#[async_trait]
impl Tool for TypeTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "type",
            wire_type: "browser_type",
            description: "Type text into an element",
            parameters: params::object_schema(TYPE_FIELDS),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, TYPE_FIELDS, TYPE_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to type text"))
    }
}

// ============ drag ============

const DRAG_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("startElement", "Element to drag from"),
    FieldSpec::string("endElement", "Element to drag to"),
];
const DRAG_USAGE: &str =
    "Please provide an object with \"startElement\" and \"endElement\" properties.";

pub struct DragTool {
    snapshot: bool,
}

impl DragTool {
    pub fn new(snapshot: bool) -> Self {
        Self { snapshot }
    }

    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        let start = params["startElement"].as_str().unwrap_or_default().to_string();
        let end = params["endElement"].as_str().unwrap_or_default().to_string();
        ctx.send(
            "browser_drag",
            json!({"startElement": start.clone(), "endElement": end.clone()}),
        )
        .await?;
        let mut content = vec![ContentBlock::text(format!(
            "Dragged \"{}\" to \"{}\"",
            start, end
        ))];
        if self.snapshot {
            content.extend(capture_snapshot(&ctx).await?);
        }
        Ok(content)
    }
}

#[async_trait]
impl Tool for DragTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "drag",
            wire_type: "browser_drag",
            description: "Drag element from start to end position",
            parameters: params::object_schema(DRAG_FIELDS),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, DRAG_FIELDS, DRAG_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to drag element"))
    }
}

// ============ select_option ============

const SELECT_FIELDS: &[FieldSpec] = &[FieldSpec::string("element", "Element name or selector")];
const SELECT_USAGE: &str = "Please provide an object with an \"element\" property containing the \
                            element name or selector.";

pub struct SelectOptionTool {
    snapshot: bool,
}

impl SelectOptionTool {
    pub fn new(snapshot: bool) -> Self {
        Self { snapshot }
    }

    async fn run(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.validate(&params)?;
        let element = params["element"].as_str().unwrap_or_default().to_string();
        ctx.send("browser_select_option", json!({"element": element.clone()}))
            .await?;
        let mut content = vec![ContentBlock::text(format!(
            "Selected option in \"{}\"",
            element
        ))];
        if self.snapshot {
            content.extend(capture_snapshot(&ctx).await?);
        }
        Ok(content)
    }
}

#[async_trait]
impl Tool for SelectOptionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "select_option",
            wire_type: "browser_select_option",
            description: "Select an option from a dropdown",
            parameters: params::object_schema(SELECT_FIELDS),
        }
    }

    fn validate(&self, params: &Value) -> Result<()> {
        params::validate_object(params, SELECT_FIELDS, SELECT_USAGE)
    }

    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>> {
        self.run(ctx, params)
            .await
            .map_err(|e| e.context("Failed to select option"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ctx, MockChannel};
    use webbridge_core::Error;

    fn snapshot_replies(action_reply: Value) -> Vec<Result<Value>> {
        vec![
            Ok(action_reply),
            Ok(json!("https://example.com")),
            Ok(json!("Example")),
            Ok(json!("- button \"Submit\"")),
        ]
    }

    #[tokio::test]
    async fn test_click_snapshot_order_is_text_first() {
        let channel = MockChannel::new(snapshot_replies(Value::Null));
        let blocks = ClickTool::new(true)
            .execute(ctx(channel.clone(), true), json!({"element": "Submit"}))
            .await
            .unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], ContentBlock::text("Clicked \"Submit\""));
        match &blocks[1] {
            ContentBlock::Text { text } => assert!(text.contains("- Page URL:")),
            other => panic!("expected snapshot text block, got {:?}", other),
        }
        assert_eq!(channel.sent_types()[0], "browser_click");
    }

    #[tokio::test]
    async fn test_click_without_snapshot_keeps_confirmation() {
        let channel = MockChannel::new(vec![Ok(Value::Null)]);
        let blocks = ClickTool::new(false)
            .execute(ctx(channel, false), json!({"element": "Submit"}))
            .await
            .unwrap();
        assert_eq!(blocks, vec![ContentBlock::text("Clicked \"Submit\"")]);
    }

    #[tokio::test]
    async fn test_click_missing_element_message() {
        let channel = MockChannel::new(vec![]);
        let err = ClickTool::new(true)
            .execute(ctx(channel, true), json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation error: Failed to click element: Invalid parameters: element: Required. \
             Please provide an object with an \"element\" property containing the element name \
             or selector to click."
        );
    }

    #[tokio::test]
    async fn test_click_snapshot_failure_fails_whole_call() {
        // Action succeeds, capture times out: no partial content.
        let channel = MockChannel::new(vec![
            Ok(Value::Null),
            Err(Error::Timeout("no reply".to_string())),
        ]);
        let err = ClickTool::new(true)
            .execute(ctx(channel, true), json!({"element": "Submit"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
        assert!(err.to_string().contains("Failed to click element"), "{}", err);
    }

    #[tokio::test]
    async fn test_hover_confirmation() {
        let channel = MockChannel::new(vec![Ok(Value::Null)]);
        let blocks = HoverTool::new(false)
            .execute(ctx(channel, false), json!({"element": "Menu"}))
            .await
            .unwrap();
        assert_eq!(blocks, vec![ContentBlock::text("Hovered over \"Menu\"")]);
    }

    #[tokio::test]
    async fn test_type_confirmation_and_payload() {
        let channel = MockChannel::new(vec![Ok(Value::Null)]);
        let blocks = TypeTool::new(false)
            .execute(
                ctx(channel.clone(), false),
                json!({"element": "Search box", "text": "hello"}),
            )
            .await
            .unwrap();
        assert_eq!(
            blocks,
            vec![ContentBlock::text("Typed \"hello\" into \"Search box\"")]
        );
        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent[0].1, json!({"element": "Search box", "text": "hello"}));
    }

    #[tokio::test]
    async fn test_drag_missing_both_fields_aggregated() {
        let channel = MockChannel::new(vec![]);
        let err = DragTool::new(false)
            .execute(ctx(channel, false), json!({}))
            .await
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("startElement: Required, endElement: Required"),
            "{}",
            err
        );
    }

    #[tokio::test]
    async fn test_drag_confirmation() {
        let channel = MockChannel::new(vec![Ok(Value::Null)]);
        let blocks = DragTool::new(false)
            .execute(
                ctx(channel, false),
                json!({"startElement": "Card A", "endElement": "Column B"}),
            )
            .await
            .unwrap();
        assert_eq!(
            blocks,
            vec![ContentBlock::text("Dragged \"Card A\" to \"Column B\"")]
        );
    }

    #[tokio::test]
    async fn test_select_option_confirmation() {
        let channel = MockChannel::new(vec![Ok(Value::Null)]);
        let blocks = SelectOptionTool::new(false)
            .execute(ctx(channel, false), json!({"element": "Country"}))
            .await
            .unwrap();
        assert_eq!(
            blocks,
            vec![ContentBlock::text("Selected option in \"Country\"")]
        );
    }
}
