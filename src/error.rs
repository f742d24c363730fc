use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("invalid server url: {0}")]
  Url(#[from] url::ParseError),
  #[error("unsupported url scheme {0:?} (expected http or https)")]
  UnsupportedScheme(String),
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("{0}")]
  Server(String),
  #[error("failed to open {0}")]
  Open(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
