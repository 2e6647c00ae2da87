use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("network error: {0}")]
    Network(String),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("clock error: {0}")]
    Clock(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("other: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
