//! WebSocket transport for webbridge.
//!
//! `sender` owns the single extension connection and implements the
//! single-flight request/reply protocol; `server` handles port eviction and
//! listener bootstrap before that connection exists.

pub mod sender;
pub mod server;

pub use sender::SocketSender;
pub use server::{accept_connection, create_listener, evict_port, is_port_free, ListenerOptions};
