use crate::core::errors::ExchangeError;
use base64::engine::general_purpose;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;

/// Result type for signing operations: (headers, extra query params)
///
/// The extra query params are appended, in order, after the query string
/// that was signed.
pub type SignatureResult = Result<(HashMap<String, String>, Vec<(String, String)>), ExchangeError>;

/// Signer trait for request authentication
///
/// Each exchange has its own canonical request layout and encoding; the
/// executor only knows this interface. Implementations must be pure apart
/// from reading the clock when the exchange protocol requires it.
pub trait Signer: Send + Sync {
    /// Sign a request and return headers and extra query parameters
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `endpoint` - API endpoint path
    /// * `query_string` - URL-encoded query string exactly as sent (without leading '?')
    /// * `body` - Raw request body bytes
    /// * `timestamp` - Request timestamp in milliseconds
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult;
}

/// Raw HMAC-SHA256 digest of `payload` keyed with `secret`
pub fn hmac_sha256(secret: &[u8], payload: &[u8]) -> Result<Vec<u8>, ExchangeError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret)
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;

    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Lower-case hex HMAC-SHA256
pub fn hmac_sha256_hex(secret: &str, payload: &[u8]) -> Result<String, ExchangeError> {
    hmac_sha256(secret.as_bytes(), payload).map(hex::encode)
}

/// Standard (padded) base64 HMAC-SHA256
pub fn hmac_sha256_base64(secret: &str, payload: &[u8]) -> Result<String, ExchangeError> {
    hmac_sha256(secret.as_bytes(), payload).map(|d| general_purpose::STANDARD.encode(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_encodings_agree() {
        let raw = hmac_sha256(b"secret", b"payload").unwrap();
        assert_eq!(raw.len(), 32);
        assert_eq!(hmac_sha256_hex("secret", b"payload").unwrap(), hex::encode(&raw));
        assert_eq!(
            hmac_sha256_base64("secret", b"payload").unwrap(),
            general_purpose::STANDARD.encode(&raw)
        );
    }

    #[test]
    fn test_empty_secret_is_accepted() {
        // HMAC accepts any key length, including zero
        assert!(hmac_sha256(b"", b"payload").is_ok());
    }
}
