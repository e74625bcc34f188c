pub mod diagnostics;
pub mod interaction;
pub mod navigation;
pub mod params;
pub mod registry;
pub mod snapshot;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use webbridge_core::{Config, ContentBlock, MessageChannel, Result};

pub use registry::ToolRegistry;

/// Static description of one command: catalog name, the `browser_`-prefixed
/// frame type it is sent as, and the argument shape projected to the
/// calling agent.
pub struct ToolSchema {
    pub name: &'static str,
    pub wire_type: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// Per-invocation context handed to every tool. The channel is the one
/// persistent extension connection; tools own no state of their own.
#[derive(Clone)]
pub struct ToolContext {
    pub channel: Arc<dyn MessageChannel>,
    pub config: Config,
}

impl ToolContext {
    pub fn new(channel: Arc<dyn MessageChannel>, config: Config) -> Self {
        Self { channel, config }
    }

    /// Send a frame to the executor using the configured reply window.
    pub async fn send(&self, frame_type: &str, payload: Value) -> Result<Value> {
        self.channel
            .send(frame_type, payload, Some(self.config.tools.send_timeout_ms))
            .await
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn schema(&self) -> ToolSchema;
    fn validate(&self, params: &Value) -> Result<()>;
    async fn execute(&self, ctx: ToolContext, params: Value) -> Result<Vec<ContentBlock>>;
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::Value;

    use webbridge_core::{Config, Error, MessageChannel, Result};

    use crate::ToolContext;

    /// Scripted channel: pops one canned reply per send and records the
    /// frames it saw.
    pub struct MockChannel {
        replies: Mutex<VecDeque<Result<Value>>>,
        pub sent: Mutex<Vec<(String, Value)>>,
    }

    impl MockChannel {
        pub fn new(replies: Vec<Result<Value>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                sent: Mutex::new(Vec::new()),
            })
        }

        pub fn sent_types(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
        }
    }

    #[async_trait]
    impl MessageChannel for MockChannel {
        async fn send(
            &self,
            frame_type: &str,
            payload: Value,
            _timeout_ms: Option<u64>,
        ) -> Result<Value> {
            self.sent
                .lock()
                .unwrap()
                .push((frame_type.to_string(), payload));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Transport("no scripted reply".to_string())))
        }
    }

    pub fn ctx(channel: Arc<MockChannel>, snapshot: bool) -> ToolContext {
        let mut config = Config::default();
        config.tools.snapshot = snapshot;
        ToolContext::new(channel, config)
    }
}
