use envsig::prelude::EnvelopeError;
use thiserror::Error;

/// Result type for the api client
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Error type for the api client
#[derive(Error, Debug)]
pub enum ClientError {
  /// Missing or inconsistent client configuration
  #[error("Configuration error: {0}")]
  ConfigError(String),

  /// Network failure or other reqwest-level error, propagated unchanged
  #[error("Transport error: {0}")]
  TransportError(#[from] reqwest::Error),

  /// Non-2xx HTTP status, raised before any decode is attempted
  #[error("Server returned status {status} (request-id {request_id}): {body}")]
  StatusError {
    status: u16,
    request_id: String,
    body: String,
  },

  /// Header value cannot be encoded
  #[error("Invalid header value: {0}")]
  InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),

  /// Envelope construction failure on the outbound side
  #[error("EnvelopeError: {0}")]
  EnvelopeError(#[from] EnvelopeError),

  /// Response decode failure, with the request id for server-side correlation
  #[error("Failed to decode response (request-id {request_id}): {source}")]
  DecodeError {
    request_id: String,
    #[source]
    source: EnvelopeError,
  },
}
