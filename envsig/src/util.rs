use rand::{distributions::Alphanumeric, Rng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Nonce length fixed by the wire format
pub(crate) const NONCE_LEN: usize = 10;

/// Generate a fresh random alphanumeric nonce
pub(crate) fn random_nonce() -> String {
  rand::thread_rng()
    .sample_iter(&Alphanumeric)
    .take(NONCE_LEN)
    .map(char::from)
    .collect()
}

/// Current wall clock as unix seconds
pub(crate) fn unix_timestamp() -> u64 {
  SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}
