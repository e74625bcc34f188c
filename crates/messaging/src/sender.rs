//! Single-flight request/reply over one WebSocket connection.
//!
//! The wire protocol carries no correlation id: the reply to a send is the
//! next inbound frame on the connection. `SocketSender` therefore keeps a
//! single pending-reply slot instead of an id-keyed map, and refuses a
//! second send while one is in flight.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, error, warn};

use webbridge_core::{Error, Frame, MessageChannel, Result, DEFAULT_SEND_TIMEOUT_MS};

type ReplySlot = Arc<Mutex<Option<oneshot::Sender<Result<Value>>>>>;

pub struct SocketSender {
    /// Sender to write frames to the WebSocket.
    ws_tx: mpsc::Sender<String>,
    /// The single pending reply. `None` means no request is in flight;
    /// inbound frames that find it empty are dropped as stale.
    pending: ReplySlot,
    /// Handle to the reader task so we can abort on close.
    _reader_handle: tokio::task::JoinHandle<()>,
    /// Handle to the writer task.
    _writer_handle: tokio::task::JoinHandle<()>,
}

impl SocketSender {
    /// Take ownership of an established WebSocket connection.
    pub fn new<S>(stream: WebSocketStream<S>) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        use futures::{SinkExt, StreamExt};

        let (mut ws_sink, mut ws_stream) = stream.split();

        let (ws_tx, mut ws_rx) = mpsc::channel::<String>(16);

        let pending: ReplySlot = Arc::new(Mutex::new(None));
        let pending_reader = pending.clone();

        // Writer task: owns the sink, forwards frames from the channel.
        let writer_handle = tokio::spawn(async move {
            while let Some(msg) = ws_rx.recv().await {
                if let Err(e) = ws_sink.send(Message::Text(msg)).await {
                    error!("WebSocket write error: {}", e);
                    break;
                }
            }
        });

        // Reader task: resolves the pending slot with each inbound frame.
        let reader_handle = tokio::spawn(async move {
            while let Some(msg_result) = ws_stream.next().await {
                let reply = match msg_result {
                    Ok(Message::Text(text)) => serde_json::from_str::<Value>(&text)
                        .map_err(|e| Error::Decode(e.to_string())),
                    // Binary frames pass through unchanged, base64-encoded.
                    Ok(Message::Binary(bytes)) => Ok(Value::String(
                        base64::engine::general_purpose::STANDARD.encode(bytes),
                    )),
                    Ok(Message::Close(_)) => {
                        debug!("WebSocket closed by peer");
                        break;
                    }
                    Ok(_) => continue,
                    Err(e) => {
                        warn!("WebSocket read error: {}", e);
                        break;
                    }
                };
                match pending_reader.lock().await.take() {
                    Some(tx) => {
                        let _ = tx.send(reply);
                    }
                    None => {
                        debug!("Dropping stale frame with no request in flight");
                    }
                }
            }
            // Connection gone: fail any request still waiting.
            if let Some(tx) = pending_reader.lock().await.take() {
                let _ = tx.send(Err(Error::Transport("connection closed".to_string())));
            }
        });

        Self {
            ws_tx,
            pending,
            _reader_handle: reader_handle,
            _writer_handle: writer_handle,
        }
    }

    /// Send one frame and await the single reply, bounded by `timeout_ms`
    /// (default 30000). Exactly one of reply, decode failure or timeout
    /// resolves the call; a reply arriving after the timeout is inert.
    pub async fn send_frame(&self, frame: Frame, timeout_ms: Option<u64>) -> Result<Value> {
        let timeout_ms = timeout_ms.unwrap_or(DEFAULT_SEND_TIMEOUT_MS);

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            if pending.is_some() {
                return Err(Error::Transport(
                    "a request is already in flight on this connection".to_string(),
                ));
            }
            *pending = Some(tx);
        }

        let encoded = serde_json::to_string(&frame)?;
        if self.ws_tx.send(encoded).await.is_err() {
            self.pending.lock().await.take();
            return Err(Error::Transport("connection closed".to_string()));
        }

        match tokio::time::timeout(Duration::from_millis(timeout_ms), rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => Err(Error::Transport("connection closed".to_string())),
            Err(_) => {
                // Timer won the race; clear the slot so the late reply, if
                // it ever arrives, is dropped instead of misattributed.
                self.pending.lock().await.take();
                Err(Error::Timeout(format!(
                    "no reply within {}ms for '{}'",
                    timeout_ms, frame.frame_type
                )))
            }
        }
    }
}

impl Drop for SocketSender {
    fn drop(&mut self) {
        self._reader_handle.abort();
        self._writer_handle.abort();
    }
}

#[async_trait]
impl MessageChannel for SocketSender {
    async fn send(
        &self,
        frame_type: &str,
        payload: Value,
        timeout_ms: Option<u64>,
    ) -> Result<Value> {
        self.send_frame(Frame::new(frame_type, payload), timeout_ms).await
    }
}
