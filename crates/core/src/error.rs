use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Bootstrap error: {0}")]
    Bootstrap(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Prefix the message with invocation context while keeping the error
    /// kind, so callers can still branch on the variant after wrapping.
    pub fn context(self, prefix: &str) -> Error {
        match self {
            Error::Validation(m) => Error::Validation(format!("{}: {}", prefix, m)),
            Error::Timeout(m) => Error::Timeout(format!("{}: {}", prefix, m)),
            Error::Decode(m) => Error::Decode(format!("{}: {}", prefix, m)),
            Error::Transport(m) => Error::Transport(format!("{}: {}", prefix, m)),
            Error::Tool(m) => Error::Tool(format!("{}: {}", prefix, m)),
            Error::Bootstrap(m) => Error::Bootstrap(format!("{}: {}", prefix, m)),
            other => Error::Tool(format!("{}: {}", prefix, other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
