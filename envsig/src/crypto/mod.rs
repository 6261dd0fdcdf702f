mod asymmetric;
mod cipher;
mod symmetric;

use crate::{
  credentials::Credentials,
  error::{EnvelopeError, EnvelopeResult},
};

pub use asymmetric::{RsaSigner, RsaVerifier};
pub use cipher::PayloadCipher;
pub use symmetric::HmacSigner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Sign scheme tags carried in the envelope `sign_type` field
pub enum SignScheme {
  /// HMAC-SHA256 keyed by the shared app key
  HmacSha256,
  /// RSA PKCS#1 v1.5 over a SHA-256 digest
  Rsa,
}

impl SignScheme {
  pub fn as_str(&self) -> &'static str {
    match self {
      SignScheme::HmacSha256 => "sha256",
      SignScheme::Rsa => "rsa",
    }
  }
}

impl std::fmt::Display for SignScheme {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl core::str::FromStr for SignScheme {
  type Err = EnvelopeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "sha256" => Ok(Self::HmacSha256),
      "rsa" => Ok(Self::Rsa),
      _ => Err(EnvelopeError::UnsupportedSignScheme(s.to_string())),
    }
  }
}

/// EnvelopeSigner trait: payload encryption plus message signing for one scheme
pub trait EnvelopeSigner {
  /// Encrypt serialized payload bytes, returning base64 ciphertext
  fn encrypt(&self, plaintext: &[u8]) -> EnvelopeResult<String>;
  /// Sign the canonical string assembled from the given envelope fields
  fn sign(&self, nonce: &str, timestamp: u64, ciphertext: &str) -> EnvelopeResult<String>;
  /// Scheme tag emitted as `sign_type`
  fn scheme(&self) -> SignScheme;
}

/// EnvelopeVerifier trait: signature verification over canonical-string bytes
pub trait EnvelopeVerifier {
  fn verify(&self, data: &[u8], signature: &str) -> EnvelopeResult<()>;
  fn scheme(&self) -> SignScheme;
}

/* -------------------------------- */
/// Signer strategy selected at construction by the credentials' scheme tag
pub enum SchemeSigner {
  HmacSha256(HmacSigner),
  Rsa(RsaSigner),
}

impl SchemeSigner {
  /// Build the signer the credentials call for. Missing or malformed key
  /// material fails here, before any envelope is built.
  pub fn from_credentials(credentials: &Credentials) -> EnvelopeResult<Self> {
    match credentials.scheme() {
      SignScheme::HmacSha256 => Ok(Self::HmacSha256(HmacSigner::new(
        credentials.app_key(),
        credentials.symmetric_key(),
      )?)),
      SignScheme::Rsa => {
        let pem = credentials.private_key_pem().ok_or(EnvelopeError::MissingPrivateKey)?;
        Ok(Self::Rsa(RsaSigner::from_pem(
          pem,
          credentials.app_key(),
          credentials.symmetric_key(),
        )?))
      }
    }
  }
}

impl EnvelopeSigner for SchemeSigner {
  fn encrypt(&self, plaintext: &[u8]) -> EnvelopeResult<String> {
    match self {
      Self::HmacSha256(signer) => signer.encrypt(plaintext),
      Self::Rsa(signer) => signer.encrypt(plaintext),
    }
  }

  fn sign(&self, nonce: &str, timestamp: u64, ciphertext: &str) -> EnvelopeResult<String> {
    match self {
      Self::HmacSha256(signer) => signer.sign(nonce, timestamp, ciphertext),
      Self::Rsa(signer) => signer.sign(nonce, timestamp, ciphertext),
    }
  }

  fn scheme(&self) -> SignScheme {
    match self {
      Self::HmacSha256(signer) => EnvelopeSigner::scheme(signer),
      Self::Rsa(signer) => signer.scheme(),
    }
  }
}

/* -------------------------------- */
/// Verifier strategy for inbound data, selected the same way as [`SchemeSigner`]
pub enum SchemeVerifier {
  HmacSha256(HmacSigner),
  Rsa(RsaVerifier),
}

impl SchemeVerifier {
  pub fn from_credentials(credentials: &Credentials) -> EnvelopeResult<Self> {
    match credentials.scheme() {
      SignScheme::HmacSha256 => Ok(Self::HmacSha256(HmacSigner::new(
        credentials.app_key(),
        credentials.symmetric_key(),
      )?)),
      SignScheme::Rsa => {
        let pem = credentials.public_key_pem().ok_or(EnvelopeError::MissingPublicKey)?;
        Ok(Self::Rsa(RsaVerifier::from_pem(pem)?))
      }
    }
  }
}

impl EnvelopeVerifier for SchemeVerifier {
  fn verify(&self, data: &[u8], signature: &str) -> EnvelopeResult<()> {
    match self {
      Self::HmacSha256(verifier) => verifier.verify(data, signature),
      Self::Rsa(verifier) => verifier.verify(data, signature),
    }
  }

  fn scheme(&self) -> SignScheme {
    match self {
      Self::HmacSha256(verifier) => EnvelopeVerifier::scheme(verifier),
      Self::Rsa(verifier) => verifier.scheme(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use core::str::FromStr;

  #[test]
  fn test_scheme_tags() {
    assert_eq!(SignScheme::HmacSha256.to_string(), "sha256");
    assert_eq!(SignScheme::Rsa.to_string(), "rsa");
    assert_eq!(SignScheme::from_str("sha256").unwrap(), SignScheme::HmacSha256);
    assert_eq!(SignScheme::from_str("rsa").unwrap(), SignScheme::Rsa);
    assert!(matches!(
      SignScheme::from_str("md5"),
      Err(EnvelopeError::UnsupportedSignScheme(_))
    ));
  }
}
