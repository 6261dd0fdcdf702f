use crate::{
  credentials::Credentials,
  crypto::{EnvelopeSigner, PayloadCipher, SchemeSigner},
  error::{EnvelopeError, EnvelopeResult},
  trace::*,
  util::{random_nonce, unix_timestamp},
};
use serde::{Deserialize, Serialize};

/* ---------------------------------------- */
/// One outbound wire envelope. Field order matches the form/query encoding:
/// `data`, `mess`, `timestamp`, `sign`, `sign_type`.
///
/// Constructed fresh per call, never persisted or reused.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
  /// base64 ciphertext of the JSON payload
  pub data: String,
  /// 10-char alphanumeric nonce
  pub mess: String,
  /// unix seconds at build time
  pub timestamp: u64,
  /// HMAC hex string or RSA base64 signature
  pub sign: String,
  /// "sha256" or "rsa"
  pub sign_type: String,
}

/* ---------------------------------------- */
/// Whether the originating request asked the server for an encrypted response
/// (`data_type=encryption` on the request side). Decode behavior is driven by
/// this, not by anything in the response itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseDataKind {
  #[default]
  Plain,
  Encrypted,
}

impl ResponseDataKind {
  /// Map the request-side `data_type` value; anything but "encryption" (or
  /// its absence) means the response `data` is already plaintext JSON
  pub fn from_data_type(data_type: Option<&str>) -> Self {
    match data_type {
      Some("encryption") => Self::Encrypted,
      _ => Self::Plain,
    }
  }
}

/// Decoded inbound response with its effective payload
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
  pub code: i64,
  pub message: String,
  pub data: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawResponse {
  code: i64,
  message: String,
  #[serde(default)]
  data: Option<serde_json::Value>,
}

/* ---------------------------------------- */
/// Builds outbound envelopes and decodes inbound responses. Holds only
/// immutable key material; any number of threads may encode/decode
/// concurrently.
pub struct EnvelopeCodec {
  signer: SchemeSigner,
  cipher: PayloadCipher,
}

impl EnvelopeCodec {
  /// Build the codec for the credentials' sign scheme. Key material problems
  /// surface here, before any call is made.
  pub fn new(credentials: &Credentials) -> EnvelopeResult<Self> {
    Ok(Self {
      signer: SchemeSigner::from_credentials(credentials)?,
      cipher: PayloadCipher::new(credentials.symmetric_key())?,
    })
  }

  /// Scheme tag the codec signs with
  pub fn scheme(&self) -> crate::crypto::SignScheme {
    self.signer.scheme()
  }

  /// Wrap a plaintext payload into a signed envelope. An absent payload
  /// produces no envelope at all; the call then carries nothing at that
  /// location. Body and query locations are encoded by independent calls, so
  /// each gets its own nonce, timestamp and signature.
  pub fn encode<T: Serialize>(&self, payload: Option<&T>) -> EnvelopeResult<Option<Envelope>> {
    let Some(payload) = payload else {
      return Ok(None);
    };
    let json = serde_json::to_vec(payload).map_err(EnvelopeError::SerializePayloadError)?;
    let timestamp = unix_timestamp();
    let mess = random_nonce();
    let data = self.signer.encrypt(&json)?;
    let sign = self.signer.sign(&mess, timestamp, &data)?;
    Ok(Some(Envelope {
      data,
      mess,
      timestamp,
      sign,
      sign_type: self.signer.scheme().as_str().to_string(),
    }))
  }

  /// Decode an inbound response body. The outer `{code, message, data}` JSON
  /// must parse; `data` is decrypted only when the originating request asked
  /// for an encrypted response, and passes through untouched otherwise, even
  /// if it superficially resembles base64.
  pub fn decode_response(&self, raw: &str, kind: ResponseDataKind) -> EnvelopeResult<ApiResponse> {
    let outer: RawResponse = serde_json::from_str(raw).map_err(|e| EnvelopeError::MalformedResponse {
      reason: e.to_string(),
      raw: raw.to_string(),
    })?;
    let data = match (kind, outer.data) {
      (ResponseDataKind::Encrypted, Some(serde_json::Value::String(ciphertext))) => {
        debug!("Decrypting response data field");
        let plaintext = self.cipher.decrypt(&ciphertext)?;
        let value = serde_json::from_slice(&plaintext).map_err(|e| EnvelopeError::MalformedResponse {
          reason: format!("decrypted data is not JSON: {e}"),
          raw: raw.to_string(),
        })?;
        Some(value)
      }
      (ResponseDataKind::Encrypted, Some(other)) => {
        return Err(EnvelopeError::MalformedResponse {
          reason: format!("encrypted data field must be a base64 string, got {other}"),
          raw: raw.to_string(),
        })
      }
      (_, data) => data,
    };
    Ok(ApiResponse {
      code: outer.code,
      message: outer.message,
      data,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  const SYMMETRIC_KEY: &[u8] = b"0123456789abcdefghijklmn";

  fn hmac_codec() -> EnvelopeCodec {
    let credentials = Credentials::hmac_sha256("dealer-1", "app-key", SYMMETRIC_KEY).unwrap();
    EnvelopeCodec::new(&credentials).unwrap()
  }

  #[test]
  fn test_absent_payload_produces_no_envelope() {
    let codec = hmac_codec();
    assert!(codec.encode::<serde_json::Value>(None).unwrap().is_none());
  }

  #[test]
  fn test_envelope_wire_fields() {
    let codec = hmac_codec();
    let envelope = codec.encode(Some(&json!({"a": 1}))).unwrap().unwrap();
    let wire = serde_json::to_value(&envelope).unwrap();
    let obj = wire.as_object().unwrap();
    for field in ["data", "mess", "timestamp", "sign", "sign_type"] {
      assert!(obj.contains_key(field), "missing {field}");
    }
    assert_eq!(obj["sign_type"], "sha256");
    assert_eq!(envelope.mess.len(), 10);
  }

  #[test]
  fn test_nonce_freshness() {
    let codec = hmac_codec();
    let payload = json!({"amount": 100});
    let a = codec.encode(Some(&payload)).unwrap().unwrap();
    let b = codec.encode(Some(&payload)).unwrap().unwrap();
    assert_ne!((&a.mess, a.timestamp), (&b.mess, b.timestamp));
  }

  #[test]
  fn test_decode_plain_passthrough() {
    let codec = hmac_codec();
    // looks like base64, but the request never asked for encryption
    let raw = r#"{"code":0,"message":"ok","data":"QWJjZEVmZ2g="}"#;
    let response = codec.decode_response(raw, ResponseDataKind::Plain).unwrap();
    assert_eq!(response.code, 0);
    assert_eq!(response.data, Some(json!("QWJjZEVmZ2g=")));
  }

  #[test]
  fn test_decode_encrypted_roundtrip() {
    let codec = hmac_codec();
    let payload = json!({"balance": 250, "currency": "EUR"});
    let ciphertext = PayloadCipher::new(SYMMETRIC_KEY)
      .unwrap()
      .encrypt(payload.to_string().as_bytes());
    let raw = json!({"code": 0, "message": "ok", "data": ciphertext}).to_string();
    let response = codec.decode_response(&raw, ResponseDataKind::Encrypted).unwrap();
    assert_eq!(response.data, Some(payload));
  }

  #[test]
  fn test_decode_absent_data() {
    let codec = hmac_codec();
    let raw = r#"{"code":1001,"message":"denied"}"#;
    let response = codec.decode_response(raw, ResponseDataKind::Encrypted).unwrap();
    assert_eq!(response.code, 1001);
    assert!(response.data.is_none());
  }

  #[test]
  fn test_malformed_outer_json_carries_raw_text() {
    let codec = hmac_codec();
    let raw = "<html>502 Bad Gateway</html>";
    match codec.decode_response(raw, ResponseDataKind::Plain) {
      Err(EnvelopeError::MalformedResponse { raw: carried, .. }) => assert_eq!(carried, raw),
      other => panic!("expected MalformedResponse, got {other:?}"),
    }
  }

  #[test]
  fn test_encrypted_non_string_data_rejected() {
    let codec = hmac_codec();
    let raw = r#"{"code":0,"message":"ok","data":{"already":"json"}}"#;
    assert!(matches!(
      codec.decode_response(raw, ResponseDataKind::Encrypted),
      Err(EnvelopeError::MalformedResponse { .. })
    ));
  }

  #[test]
  fn test_undecryptable_data_rejected() {
    let codec = hmac_codec();
    let raw = r#"{"code":0,"message":"ok","data":"QWJjZA=="}"#;
    // valid base64 but not a valid ciphertext
    assert!(matches!(
      codec.decode_response(raw, ResponseDataKind::Encrypted),
      Err(EnvelopeError::DecryptError(_))
    ));
  }

  #[test]
  fn test_data_type_mapping() {
    assert_eq!(ResponseDataKind::from_data_type(Some("encryption")), ResponseDataKind::Encrypted);
    assert_eq!(ResponseDataKind::from_data_type(Some("plain")), ResponseDataKind::Plain);
    assert_eq!(ResponseDataKind::from_data_type(None), ResponseDataKind::Plain);
  }
}
