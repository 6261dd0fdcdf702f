use envsig_reqwest::{prelude::*, ApiClient, CallOptions};
use serde_json::json;

const SYMMETRIC_KEY: &[u8] = b"0123456789abcdefghijklmn";

#[tokio::main]
async fn main() {
  let credentials = Credentials::hmac_sha256("dealer-42", "app-key", SYMMETRIC_KEY).unwrap();
  let client = ApiClient::builder()
    .base_url("https://openapi.example.com")
    .credentials(credentials)
    .build()
    .unwrap();

  // the payload is enveloped, signed and form-encoded before it leaves the
  // process; ask for an encrypted response so the data field is decrypted on
  // the way back
  let options = CallOptions {
    request_id: Some("order-check-1".to_string()),
    data_kind: ResponseDataKind::Encrypted,
  };
  let payload = json!({"order": "o-1", "amount": 100});
  match client.post("/v1/orders", None::<&()>, Some(&payload), &options).await {
    Ok(response) => println!("code={} message={} data={:?}", response.code, response.message, response.data),
    Err(e) => eprintln!("call failed: {e}"),
  }
}
