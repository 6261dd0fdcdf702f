use thiserror::Error;

/// Result type for envelope operations
pub type EnvelopeResult<T> = std::result::Result<T, EnvelopeError>;

/// Error type for envelope operations
#[derive(Error, Debug)]
pub enum EnvelopeError {
  #[error("Base64 decode error: {0}")]
  Base64DecodeError(#[from] base64::DecodeError),

  /* ----- Configuration errors, fatal at construction ----- */
  /// Unknown sign scheme tag
  #[error("Unsupported sign scheme: {0}")]
  UnsupportedSignScheme(String),
  /// Symmetric key is not usable as a triple-DES key
  #[error("Invalid symmetric key: {0}")]
  InvalidSymmetricKey(String),
  /// RSA scheme selected without a private key
  #[error("Missing private key for the rsa sign scheme")]
  MissingPrivateKey,
  /// RSA scheme selected without the counterparty public key
  #[error("Missing counterparty public key for the rsa sign scheme")]
  MissingPublicKey,
  /// Invalid private key for the RSA scheme
  #[error("Failed to parse private key: {0}")]
  ParsePrivateKeyError(String),
  /// Invalid public key for the RSA scheme
  #[error("Failed to parse public key: {0}")]
  ParsePublicKeyError(String),

  /* ----- Crypto errors ----- */
  /// Payload cannot be represented as UTF-8 JSON
  #[error("Failed to serialize payload: {0}")]
  SerializePayloadError(#[source] serde_json::Error),

  /// Signature generation error
  #[error("Failed to generate signature: {0}")]
  SignatureGenerationError(String),

  /// Signature parse error
  #[error("Failed to parse signature: {0}")]
  ParseSignatureError(String),

  /// Invalid Signature
  #[error("Invalid Signature: {0}")]
  InvalidSignature(String),

  /// Decryption failure, bad padding or truncated ciphertext
  #[error("Failed to decrypt data: {0}")]
  DecryptError(String),

  /* ----- Decode errors ----- */
  /// Outer response JSON is malformed or missing expected fields.
  /// Carries the raw response text for diagnostics.
  #[error("Malformed response ({reason}): {raw}")]
  MalformedResponse { reason: String, raw: String },
}
