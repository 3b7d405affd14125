use std::path::PathBuf;

/// Errors raised by the LegiScan client and the social media resolver.
#[derive(Debug, thiserror::Error)]
pub enum LegiScanError {
  /// The caller omitted a required parameter combination. Raised before any request.
  #[error("{0}")]
  Usage(&'static str),

  /// The upstream server answered with a non-success HTTP status.
  #[error("Request returned {status}: {url}")]
  HttpStatus { status: u16, url: String },

  /// The upstream envelope carried `status: "ERROR"`.
  #[error("{message}")]
  Api { message: String },

  /// The request never produced a response.
  #[error("Request to {url} failed: {message}")]
  Transport { url: String, message: String },

  #[error("Failed to parse response: {0}")]
  Json(#[from] serde_json::Error),

  /// The response envelope lacks the key the operation unwraps.
  #[error("Response is missing the `{0}` field")]
  MissingField(&'static str),

  #[error("Failed to access cache file {}: {source}", path.display())]
  Cache {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl LegiScanError {
  /// True for failures reported by the upstream API, either through the HTTP
  /// status or through the JSON envelope.
  pub fn is_gateway(&self) -> bool {
    matches!(self, Self::HttpStatus { .. } | Self::Api { .. })
  }
}

pub type Result<T> = std::result::Result<T, LegiScanError>;
