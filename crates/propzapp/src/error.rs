use thiserror::Error;

#[derive(Error, Debug)]
pub enum PropzError {
    #[error("Property not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote error ({status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Identity error: {0}")]
    Identity(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl PropzError {
    /// Failures worth retrying from the UI: the service or the network, not the data.
    pub fn is_transient(&self) -> bool {
        match self {
            PropzError::Http(_) | PropzError::Store(_) => true,
            PropzError::Remote { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PropzError>;
