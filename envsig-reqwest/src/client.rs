use crate::error::{ClientError, ClientResult};
use crate::trace::*;
use envsig::prelude::{ApiResponse, Credentials, EnvelopeCodec, ResponseDataKind};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Header carrying the dealer id on every call
const DEALER_ID_HEADER: HeaderName = HeaderName::from_static("dealer-id");
/// Header carrying the per-call correlation id
const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("request-id");
/// Envelopes travel form- or query-encoded
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-call options supplied by the business layer
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
  /// Server-side correlation id; defaults to the current unix timestamp.
  /// Not a security control.
  pub request_id: Option<String>,
  /// Whether this call asked the server for an encrypted response; drives
  /// the conditional decrypt on decode
  pub data_kind: ResponseDataKind,
}

/* --------------------------------------- */
/// HTTP client for the dealer open API: builds the protocol headers, attaches
/// envelope-encoded payloads to the query and body locations, and feeds raw
/// responses into the codec.
///
/// Retries, TLS configuration and connection pooling belong to the underlying
/// `reqwest::Client`, not to this type.
pub struct ApiClient {
  inner: reqwest::Client,
  base_url: String,
  dealer_id: String,
  codec: EnvelopeCodec,
  user_agent: String,
}

impl ApiClient {
  pub fn builder() -> ApiClientBuilder {
    ApiClientBuilder::new()
  }

  /// Dispatch a GET carrying the query payload, if any
  pub async fn get<Q>(&self, path: &str, query: Option<&Q>, options: &CallOptions) -> ClientResult<ApiResponse>
  where
    Q: Serialize,
  {
    let request_id = effective_request_id(options);
    let mut request = self
      .inner
      .get(format!("{}{}", self.base_url, path))
      .headers(self.headers(&request_id)?);
    if let Some(envelope) = self.codec.encode(query)? {
      request = request.query(&envelope);
    }
    self.dispatch(request, &request_id, options.data_kind).await
  }

  /// Dispatch a POST. Query and body payloads are enveloped independently:
  /// each location gets its own nonce, timestamp and signature.
  pub async fn post<Q, B>(
    &self,
    path: &str,
    query: Option<&Q>,
    body: Option<&B>,
    options: &CallOptions,
  ) -> ClientResult<ApiResponse>
  where
    Q: Serialize,
    B: Serialize,
  {
    let request_id = effective_request_id(options);
    let mut request = self
      .inner
      .post(format!("{}{}", self.base_url, path))
      .headers(self.headers(&request_id)?);
    if let Some(envelope) = self.codec.encode(query)? {
      request = request.query(&envelope);
    }
    if let Some(envelope) = self.codec.encode(body)? {
      request = request.form(&envelope);
    }
    self.dispatch(request, &request_id, options.data_kind).await
  }

  /// Headers sent on every outbound call
  fn headers(&self, request_id: &str) -> ClientResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(DEALER_ID_HEADER, HeaderValue::from_str(&self.dealer_id)?);
    headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(request_id)?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
    headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
    Ok(headers)
  }

  async fn dispatch(
    &self,
    request: reqwest::RequestBuilder,
    request_id: &str,
    data_kind: ResponseDataKind,
  ) -> ClientResult<ApiResponse> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
      return Err(ClientError::StatusError {
        status: status.as_u16(),
        request_id: request_id.to_string(),
        body,
      });
    }
    debug!("Decoding response for request-id {request_id}");
    self.codec.decode_response(&body, data_kind).map_err(|source| ClientError::DecodeError {
      request_id: request_id.to_string(),
      source,
    })
  }
}

fn effective_request_id(options: &CallOptions) -> String {
  options.request_id.clone().unwrap_or_else(|| {
    SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .unwrap_or_default()
      .as_secs()
      .to_string()
  })
}

fn default_user_agent() -> String {
  format!(
    "envsig/{} ({}; {}) rust/{}",
    env!("CARGO_PKG_VERSION"),
    std::env::consts::OS,
    std::env::consts::ARCH,
    env!("CARGO_PKG_RUST_VERSION")
  )
}

/* --------------------------------------- */
/// Builder for [`ApiClient`]
pub struct ApiClientBuilder {
  base_url: Option<String>,
  credentials: Option<Credentials>,
  timeout: Duration,
  client: Option<reqwest::Client>,
}

impl ApiClientBuilder {
  pub fn new() -> Self {
    Self {
      base_url: None,
      credentials: None,
      timeout: DEFAULT_TIMEOUT,
      client: None,
    }
  }

  /// Set the base URL, e.g. `https://openapi.example.com`
  pub fn base_url(mut self, url: &str) -> Self {
    self.base_url = Some(url.trim_end_matches('/').to_string());
    self
  }

  /// Set the client credentials
  pub fn credentials(mut self, credentials: Credentials) -> Self {
    self.credentials = Some(credentials);
    self
  }

  /// Set the request timeout, 30s if unset
  pub fn timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// Supply a preconfigured `reqwest::Client`; its own timeout settings win
  pub fn client(mut self, client: reqwest::Client) -> Self {
    self.client = Some(client);
    self
  }

  pub fn build(self) -> ClientResult<ApiClient> {
    let base_url = self.base_url.ok_or_else(|| ClientError::ConfigError("base url is required".to_string()))?;
    let credentials = self
      .credentials
      .ok_or_else(|| ClientError::ConfigError("credentials are required".to_string()))?;
    let codec = EnvelopeCodec::new(&credentials)?;
    let inner = match self.client {
      Some(client) => client,
      None => reqwest::Client::builder().timeout(self.timeout).build()?,
    };
    Ok(ApiClient {
      inner,
      base_url,
      dealer_id: credentials.dealer_id().to_string(),
      codec,
      user_agent: default_user_agent(),
    })
  }
}

impl Default for ApiClientBuilder {
  fn default() -> Self {
    Self::new()
  }
}
