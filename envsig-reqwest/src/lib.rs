//! # envsig-reqwest
//!
//! `envsig-reqwest` is the reqwest-based client for the dealer open API
//! envelope protocol. It owns header construction (dealer id, request id,
//! content type, user agent) and GET/POST dispatch, and hands every response
//! body to the `envsig` codec for decoding.
//!
//! Payloads are supplied by the business layer as plain serializable values;
//! callers receive decoded plaintext responses and never see envelope
//! internals unless they explicitly ask for an encrypted response via
//! [`CallOptions`].
//!
//! Asynchronous push notifications do not pass through this client at all;
//! verify them with `envsig`'s `NotificationVerifier` wherever the webhook
//! body arrives.

mod client;
mod error;
mod trace;

pub use client::{ApiClient, ApiClientBuilder, CallOptions};
pub use envsig::prelude;
pub use error::{ClientError, ClientResult};
