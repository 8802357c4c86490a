use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{hmac_sha256_hex, SignatureResult, Signer};
use secrecy::{ExposeSecret, Secret, SecretString};
use std::collections::HashMap;

/// Seconds a signed request stays valid
pub const EXPIRY_WINDOW_SECONDS: i64 = 60;

pub struct PhemexSigner {
    api_key: String,
    secret_key: SecretString,
}

impl PhemexSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key: Secret::new(secret_key),
        }
    }

    /// Hex HMAC-SHA256 over `path + query + expiry + body`
    pub fn signature(
        &self,
        path: &str,
        query_string: &str,
        expiry: i64,
        body: &str,
    ) -> Result<String, ExchangeError> {
        let payload = format!(
            "{}{}{}{}",
            path,
            query_string.trim_start_matches('?'),
            expiry,
            body
        );
        hmac_sha256_hex(self.secret_key.expose_secret(), payload.as_bytes())
    }

    /// Expiry for a request signed now, in Unix seconds
    pub fn expiry_from_now() -> i64 {
        chrono::Utc::now().timestamp() + EXPIRY_WINDOW_SECONDS
    }

    fn sign_with_expiry(
        &self,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        expiry: i64,
    ) -> SignatureResult {
        let body_str = std::str::from_utf8(body)
            .map_err(|e| ExchangeError::AuthError(format!("Invalid body encoding: {}", e)))?;

        let signature = self.signature(endpoint, query_string, expiry, body_str)?;

        let mut headers = HashMap::new();
        headers.insert("x-phemex-access-token".to_string(), self.api_key.clone());
        headers.insert("x-phemex-request-signature".to_string(), signature);
        headers.insert("x-phemex-request-expiry".to_string(), expiry.to_string());

        Ok((headers, Vec::new()))
    }
}

impl Signer for PhemexSigner {
    /// Phemex authenticates with an expiry rather than the executor's timestamp
    fn sign_request(
        &self,
        _method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        _timestamp: u64,
    ) -> SignatureResult {
        self.sign_with_expiry(endpoint, query_string, body, Self::expiry_from_now())
    }
}
