use super::{cipher::PayloadCipher, EnvelopeSigner, EnvelopeVerifier, SignScheme};
use crate::{canonical::SigningString, error::EnvelopeResult};
use hmac::{Hmac, Mac};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<sha2::Sha256>;

/* -------------------------------- */
/// Symmetric strategy: HMAC-SHA256 keyed by the UTF-8 app key, rendered as
/// lowercase hex. Also carries the shared payload cipher.
pub struct HmacSigner {
  app_key: String,
  cipher: PayloadCipher,
}

impl HmacSigner {
  /// Create a new HMAC signer from the app key and the 24-byte symmetric key
  pub fn new(app_key: &str, symmetric_key: &[u8]) -> EnvelopeResult<Self> {
    Ok(Self {
      app_key: app_key.to_string(),
      cipher: PayloadCipher::new(symmetric_key)?,
    })
  }

  fn mac_hex(&self, data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(self.app_key.as_bytes()).unwrap();
    mac.update(data);
    hex::encode(mac.finalize().into_bytes())
  }
}

impl EnvelopeSigner for HmacSigner {
  /// Encrypt the payload with the shared triple-DES convention
  fn encrypt(&self, plaintext: &[u8]) -> EnvelopeResult<String> {
    Ok(self.cipher.encrypt(plaintext))
  }

  /// Sign the canonical string
  fn sign(&self, nonce: &str, timestamp: u64, ciphertext: &str) -> EnvelopeResult<String> {
    let signing_string = SigningString::new(ciphertext, nonce, timestamp, &self.app_key);
    Ok(self.mac_hex(&signing_string.as_bytes()))
  }

  fn scheme(&self) -> SignScheme {
    SignScheme::HmacSha256
  }
}

impl EnvelopeVerifier for HmacSigner {
  /// Recompute the mac and compare in constant time
  fn verify(&self, data: &[u8], signature: &str) -> EnvelopeResult<()> {
    let expected = self.mac_hex(data);
    if expected.as_bytes().ct_eq(signature.as_bytes()).into() {
      Ok(())
    } else {
      Err(crate::error::EnvelopeError::InvalidSignature("mac mismatch".to_string()))
    }
  }

  fn scheme(&self) -> SignScheme {
    SignScheme::HmacSha256
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SYMMETRIC_KEY: &[u8] = b"0123456789abcdefghijklmn";

  #[test]
  fn test_sign_is_lowercase_hex() {
    let signer = HmacSigner::new("k", SYMMETRIC_KEY).unwrap();
    let sig = signer.sign("a1B2c3D4e5", 1700000000, "QWJjZA==").unwrap();
    assert_eq!(sig.len(), 64);
    assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
  }

  #[test]
  fn test_sign_verify() {
    let signer = HmacSigner::new("app-key", SYMMETRIC_KEY).unwrap();
    let sig = signer.sign("nonce12345", 1700000000, "QWJjZA==").unwrap();
    let data = SigningString::new("QWJjZA==", "nonce12345", 1700000000, "app-key").as_bytes();
    signer.verify(&data, &sig).unwrap();
  }

  #[test]
  fn test_sign_is_deterministic() {
    let signer = HmacSigner::new("app-key", SYMMETRIC_KEY).unwrap();
    let a = signer.sign("nonce12345", 1700000000, "QWJjZA==").unwrap();
    let b = signer.sign("nonce12345", 1700000000, "QWJjZA==").unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn test_tampered_fields_fail() {
    let signer = HmacSigner::new("app-key", SYMMETRIC_KEY).unwrap();
    let sig = signer.sign("nonce12345", 1700000000, "QWJjZA==").unwrap();
    for tampered in [
      SigningString::new("QWJjZB==", "nonce12345", 1700000000, "app-key"),
      SigningString::new("QWJjZA==", "nonce12346", 1700000000, "app-key"),
      SigningString::new("QWJjZA==", "nonce12345", 1700000001, "app-key"),
    ] {
      assert!(signer.verify(&tampered.as_bytes(), &sig).is_err());
    }
  }
}
