use crate::{
  crypto::SignScheme,
  error::{EnvelopeError, EnvelopeResult},
};

/// Triple-DES key length fixed by the wire protocol
const SYMMETRIC_KEY_LEN: usize = 24;

/* -------------------------------- */
/// Everything a client instance is configured with: dealer id, shared app key,
/// the 24-byte symmetric key, and the chosen sign scheme. The RSA scheme
/// additionally carries the local private key (signing) and the counterparty
/// public key (verifying inbound data), both PEM encoded.
///
/// Immutable for the lifetime of a client instance; validated at construction.
#[derive(Clone)]
pub struct Credentials {
  dealer_id: String,
  app_key: String,
  symmetric_key: Vec<u8>,
  scheme: SignScheme,
  private_key_pem: Option<String>,
  public_key_pem: Option<String>,
}

impl Credentials {
  /// General constructor. Missing key material required by the chosen scheme
  /// is a fatal configuration error, raised here and never retried.
  pub fn new(
    dealer_id: &str,
    app_key: &str,
    symmetric_key: &[u8],
    scheme: SignScheme,
    private_key_pem: Option<&str>,
    public_key_pem: Option<&str>,
  ) -> EnvelopeResult<Self> {
    if symmetric_key.len() != SYMMETRIC_KEY_LEN {
      return Err(EnvelopeError::InvalidSymmetricKey(format!(
        "expected {} bytes, got {}",
        SYMMETRIC_KEY_LEN,
        symmetric_key.len()
      )));
    }
    if scheme == SignScheme::Rsa {
      if private_key_pem.is_none() {
        return Err(EnvelopeError::MissingPrivateKey);
      }
      if public_key_pem.is_none() {
        return Err(EnvelopeError::MissingPublicKey);
      }
    }
    Ok(Self {
      dealer_id: dealer_id.to_string(),
      app_key: app_key.to_string(),
      symmetric_key: symmetric_key.to_vec(),
      scheme,
      private_key_pem: private_key_pem.map(str::to_string),
      public_key_pem: public_key_pem.map(str::to_string),
    })
  }

  /// Credentials for the HMAC-SHA256 scheme
  pub fn hmac_sha256(dealer_id: &str, app_key: &str, symmetric_key: &[u8]) -> EnvelopeResult<Self> {
    Self::new(dealer_id, app_key, symmetric_key, SignScheme::HmacSha256, None, None)
  }

  /// Credentials for the RSA scheme
  pub fn rsa(
    dealer_id: &str,
    app_key: &str,
    symmetric_key: &[u8],
    private_key_pem: &str,
    public_key_pem: &str,
  ) -> EnvelopeResult<Self> {
    Self::new(
      dealer_id,
      app_key,
      symmetric_key,
      SignScheme::Rsa,
      Some(private_key_pem),
      Some(public_key_pem),
    )
  }

  pub fn dealer_id(&self) -> &str {
    &self.dealer_id
  }

  pub fn app_key(&self) -> &str {
    &self.app_key
  }

  pub fn symmetric_key(&self) -> &[u8] {
    &self.symmetric_key
  }

  pub fn scheme(&self) -> SignScheme {
    self.scheme
  }

  pub fn private_key_pem(&self) -> Option<&str> {
    self.private_key_pem.as_deref()
  }

  pub fn public_key_pem(&self) -> Option<&str> {
    self.public_key_pem.as_deref()
  }
}

impl std::fmt::Debug for Credentials {
  // key material stays out of logs
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credentials")
      .field("dealer_id", &self.dealer_id)
      .field("scheme", &self.scheme)
      .finish_non_exhaustive()
  }
}
