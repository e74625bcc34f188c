use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unit sent to the executor over the socket.
///
/// The `type` field doubles as the command's wire name (e.g.
/// `browser_click`); `payload` carries the validated arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(rename = "type")]
    pub frame_type: String,
    pub payload: Value,
}

impl Frame {
    pub fn new(frame_type: impl Into<String>, payload: Value) -> Self {
        Self {
            frame_type: frame_type.into(),
            payload,
        }
    }
}

/// One unit of a shaped tool result. Order within a result is significant:
/// an action's confirmation text always precedes its snapshot blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        ContentBlock::Image {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }
}
