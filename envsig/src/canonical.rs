/// Canonical signing string
/// `data=<base64 ciphertext>&mess=<nonce>&timestamp=<unix seconds>&key=<app key>`
///
/// The field order is fixed by the wire protocol and must be byte-for-byte
/// reproducible on both the signing and the verifying side. This struct is the
/// single place the string is assembled; signers and verifiers never format it
/// themselves.
pub struct SigningString<'a> {
  /// base64 ciphertext of the payload
  data: &'a str,
  /// nonce
  mess: &'a str,
  /// unix seconds at envelope build time
  timestamp: u64,
  /// shared app key
  key: &'a str,
}

impl<'a> SigningString<'a> {
  /// Assemble the canonical string from envelope fields and the app key
  pub fn new(data: &'a str, mess: &'a str, timestamp: u64, key: &'a str) -> Self {
    Self {
      data,
      mess,
      timestamp,
      key,
    }
  }

  /// Returns the canonical string as bytes to be signed
  pub fn as_bytes(&self) -> Vec<u8> {
    self.to_string().into_bytes()
  }
}

impl std::fmt::Display for SigningString<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "data={}&mess={}&timestamp={}&key={}",
      self.data, self.mess, self.timestamp, self.key
    )
  }
}
