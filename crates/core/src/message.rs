use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Default reply window for a single send.
pub const DEFAULT_SEND_TIMEOUT_MS: u64 = 30_000;

/// Seam between the dispatch layer and the socket transport.
///
/// Tools hold an `Arc<dyn MessageChannel>` so the registry never depends on
/// the concrete WebSocket type, and tests can substitute a scripted channel.
///
/// The protocol carries no correlation id: the reply to a send is whatever
/// frame arrives next on the connection. Implementations are single-flight;
/// callers must not issue a second send before the first resolves.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Send one `{type, payload}` frame and await the single reply.
    ///
    /// `timeout_ms` falls back to [`DEFAULT_SEND_TIMEOUT_MS`] when `None`.
    async fn send(&self, frame_type: &str, payload: Value, timeout_ms: Option<u64>)
        -> Result<Value>;
}
