pub mod config;
pub mod error;
pub mod message;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use message::{MessageChannel, DEFAULT_SEND_TIMEOUT_MS};
pub use types::{ContentBlock, Frame};
