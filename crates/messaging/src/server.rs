//! Listener bootstrap: evict whatever holds the target port, wait for it to
//! free up (bounded), bind, and complete the WebSocket handshake with the
//! browser extension.

use std::time::{Duration, Instant};

use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, info, warn};

use webbridge_core::{Error, Result};

#[derive(Debug, Clone)]
pub struct ListenerOptions {
    /// Kill any process already occupying the port before binding.
    pub evict: bool,
    /// Give up with `Error::Bootstrap` if the port is still occupied after
    /// this long.
    pub max_wait: Duration,
    /// Interval between bind attempts.
    pub poll_interval: Duration,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            evict: true,
            max_wait: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Best-effort kill of any process bound to `port`. All failures are
/// ignored: "no process found" and "already exited" are the expected
/// outcomes, not errors.
pub fn evict_port(port: u16) {
    #[cfg(unix)]
    {
        let _ = std::process::Command::new("sh")
            .arg("-c")
            .arg(format!("lsof -ti:{} | xargs kill -9", port))
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();
    }
    #[cfg(windows)]
    {
        let _ = std::process::Command::new("cmd")
            .arg("/C")
            .arg(format!(
                "FOR /F \"tokens=5\" %a in ('netstat -ano ^| findstr :{}') do taskkill /F /PID %a",
                port
            ))
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();
    }
}

/// Probe port occupancy by attempting a bind and releasing it immediately.
pub async fn is_port_free(host: &str, port: u16) -> bool {
    TcpListener::bind((host, port)).await.is_ok()
}

/// Ensure `port` is free and bind a listener on it.
///
/// Binding itself is the occupancy probe, so a port observed free is never
/// lost to a bind race. Polls every `poll_interval` up to `max_wait`.
pub async fn create_listener(host: &str, port: u16, opts: ListenerOptions) -> Result<TcpListener> {
    if opts.evict && !is_port_free(host, port).await {
        debug!(port, "Port occupied, evicting current owner");
        evict_port(port);
    }

    let start = Instant::now();
    loop {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => {
                info!(host, port, "Listening for extension connection");
                return Ok(listener);
            }
            Err(e) if start.elapsed() < opts.max_wait => {
                debug!(port, error = %e, "Port still in use, retrying");
                tokio::time::sleep(opts.poll_interval).await;
            }
            Err(e) => {
                return Err(Error::Bootstrap(format!(
                    "port {} still in use after {:?}: {}",
                    port, opts.max_wait, e
                )));
            }
        }
    }
}

/// Accept one TCP connection and complete the WebSocket handshake.
pub async fn accept_connection(listener: &TcpListener) -> Result<WebSocketStream<TcpStream>> {
    let (stream, peer) = listener.accept().await?;
    debug!(%peer, "Accepted TCP connection");
    match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => {
            info!(%peer, "Extension connected");
            Ok(ws)
        }
        Err(e) => {
            warn!(%peer, error = %e, "WebSocket handshake failed");
            Err(Error::Transport(format!("WebSocket handshake failed: {}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_evict(max_wait: Duration) -> ListenerOptions {
        ListenerOptions {
            evict: false,
            max_wait,
            poll_interval: Duration::from_millis(50),
        }
    }

    async fn free_port() -> u16 {
        let probe = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        probe.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_create_listener_on_free_port() {
        let port = free_port().await;
        let listener = create_listener("127.0.0.1", port, no_evict(Duration::from_secs(1)))
            .await
            .unwrap();
        assert_eq!(listener.local_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn test_create_listener_bounded_on_occupied_port() {
        let holder = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = holder.local_addr().unwrap().port();

        let err = create_listener("127.0.0.1", port, no_evict(Duration::from_millis(200)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Bootstrap(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_create_listener_waits_for_port_to_free() {
        let holder = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = holder.local_addr().unwrap().port();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            drop(holder);
        });

        let listener = create_listener("127.0.0.1", port, no_evict(Duration::from_secs(2)))
            .await
            .unwrap();
        assert_eq!(listener.local_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn test_is_port_free_releases_probe() {
        let port = free_port().await;
        assert!(is_port_free("127.0.0.1", port).await);
        // Probing must not hold the port.
        assert!(is_port_free("127.0.0.1", port).await);
    }

    #[test]
    fn test_evict_port_on_unused_port_is_silent() {
        // Nothing to kill; must not panic or error.
        evict_port(59999);
    }

    #[tokio::test]
    async fn test_accept_connection_handshake() {
        use futures::SinkExt;
        use tokio_tungstenite::tungstenite::Message;

        let listener = create_listener("127.0.0.1", 0, no_evict(Duration::from_secs(1)))
            .await
            .unwrap();
        let port = listener.local_addr().unwrap().port();

        let client = tokio::spawn(async move {
            let (mut ws, _) =
                tokio_tungstenite::connect_async(format!("ws://127.0.0.1:{}/", port))
                    .await
                    .unwrap();
            ws.send(Message::Text("{}".to_string())).await.unwrap();
        });

        let ws = accept_connection(&listener).await.unwrap();
        drop(ws);
        client.await.unwrap();
    }
}
