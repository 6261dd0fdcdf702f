use crate::error::{EnvelopeError, EnvelopeResult};
use base64::{engine::general_purpose, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

type TdesCbcEnc = cbc::Encryptor<des::TdesEde3>;
type TdesCbcDec = cbc::Decryptor<des::TdesEde3>;

/// Triple-DES key length fixed by the wire protocol
const KEY_LEN: usize = 24;
/// CBC block and IV length for triple-DES
const IV_LEN: usize = 8;

/* -------------------------------- */
/// Payload cipher shared by both sign schemes: triple-DES (EDE3) in CBC mode
/// with PKCS#5/7 padding, base64 on the outside.
///
/// The IV is the first 8 bytes of the 24-byte key. This is a wire-compatibility
/// convention of the counterparty protocol and is confined to this type; a
/// protocol revision changing it would not touch any caller.
#[derive(Clone)]
pub struct PayloadCipher {
  key: [u8; KEY_LEN],
}

impl PayloadCipher {
  /// Create a cipher from the 24-byte symmetric key. Anything but 24 bytes is
  /// a fatal configuration error.
  pub fn new(key: &[u8]) -> EnvelopeResult<Self> {
    let key: [u8; KEY_LEN] = key
      .try_into()
      .map_err(|_| EnvelopeError::InvalidSymmetricKey(format!("expected {} bytes, got {}", KEY_LEN, key.len())))?;
    Ok(Self { key })
  }

  fn iv(&self) -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(&self.key[..IV_LEN]);
    iv
  }

  /// Encrypt plaintext bytes and return the base64 ciphertext
  pub fn encrypt(&self, plaintext: &[u8]) -> String {
    let ciphertext = TdesCbcEnc::new(&self.key.into(), &self.iv().into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    general_purpose::STANDARD.encode(ciphertext)
  }

  /// Decode base64 and decrypt. Bad base64 and bad padding are both fatal.
  pub fn decrypt(&self, ciphertext_b64: &str) -> EnvelopeResult<Vec<u8>> {
    let ciphertext = general_purpose::STANDARD.decode(ciphertext_b64)?;
    TdesCbcDec::new(&self.key.into(), &self.iv().into())
      .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
      .map_err(|e| EnvelopeError::DecryptError(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const KEY: &[u8] = b"0123456789abcdefghijklmn";

  #[test]
  fn test_roundtrip() {
    let cipher = PayloadCipher::new(KEY).unwrap();
    let plaintext = br#"{"amount":100,"to":"acct-1"}"#;
    let ciphertext = cipher.encrypt(plaintext);
    assert_ne!(ciphertext.as_bytes(), plaintext.as_slice());
    let decrypted = cipher.decrypt(&ciphertext).unwrap();
    assert_eq!(decrypted, plaintext);
  }

  #[test]
  fn test_deterministic_iv_convention() {
    // IV is derived from the key, so the same key and plaintext always yield
    // the same ciphertext
    let a = PayloadCipher::new(KEY).unwrap().encrypt(b"hello");
    let b = PayloadCipher::new(KEY).unwrap().encrypt(b"hello");
    assert_eq!(a, b);
  }

  #[test]
  fn test_short_key_rejected() {
    let res = PayloadCipher::new(b"too-short");
    assert!(matches!(res, Err(EnvelopeError::InvalidSymmetricKey(_))));
  }

  #[test]
  fn test_bad_base64_rejected() {
    let cipher = PayloadCipher::new(KEY).unwrap();
    let res = cipher.decrypt("not//valid==base64!!");
    assert!(matches!(res, Err(EnvelopeError::Base64DecodeError(_))));
  }

  #[test]
  fn test_bad_padding_rejected() {
    let cipher = PayloadCipher::new(KEY).unwrap();
    // valid base64, but not a multiple of the block size once decoded
    let res = cipher.decrypt(&general_purpose::STANDARD.encode(b"abc"));
    assert!(matches!(res, Err(EnvelopeError::DecryptError(_))));
  }
}
