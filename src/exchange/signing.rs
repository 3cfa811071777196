//! Deterministic order signing
//!
//! Orders are signed with HMAC-SHA256 over the canonical JSON encoding of
//! the order body. `serde_json`'s map type keeps keys sorted, so the same
//! fields always serialize to the same message regardless of insertion
//! order.

use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;

use super::types::ExchangeError;

type HmacSha256 = Hmac<Sha256>;

/// Signs order payloads with the configured signing key
#[derive(Clone)]
pub struct OrderSigner {
    key: String,
}

impl std::fmt::Debug for OrderSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the key
        f.debug_struct("OrderSigner").finish_non_exhaustive()
    }
}

impl OrderSigner {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Hex-encoded HMAC-SHA256 signature over the canonical order body
    pub fn sign(&self, payload: &Map<String, Value>) -> Result<String, ExchangeError> {
        let message = serde_json::to_string(&Value::Object(payload.clone()))
            .map_err(|e| ExchangeError::Session(format!("order encode failed: {e}")))?;

        let mut mac = HmacSha256::new_from_slice(self.key.as_bytes())
            .map_err(|e| ExchangeError::Session(format!("HMAC init failed: {e}")))?;
        mac.update(message.as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}
