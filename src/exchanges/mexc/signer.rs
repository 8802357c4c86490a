use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{hmac_sha256_hex, SignatureResult, Signer};
use secrecy::{ExposeSecret, Secret, SecretString};
use std::collections::HashMap;

/// Query parameter carrying the timestamp on the spot API
pub const SPOT_TIMESTAMP_PARAM: &str = "timestamp";
/// Query parameter carrying the timestamp on the contract API
pub const CONTRACT_TIMESTAMP_PARAM: &str = "req_time";

/// MEXC signs the full query string, timestamp included, and sends the
/// signature back as a query parameter
pub struct MexcSigner {
    api_key: String,
    secret_key: SecretString,
    timestamp_param: &'static str,
}

impl MexcSigner {
    pub fn new(api_key: String, secret_key: String, timestamp_param: &'static str) -> Self {
        Self {
            api_key,
            secret_key: Secret::new(secret_key),
            timestamp_param,
        }
    }

    pub fn spot(api_key: String, secret_key: String) -> Self {
        Self::new(api_key, secret_key, SPOT_TIMESTAMP_PARAM)
    }

    pub fn contract(api_key: String, secret_key: String) -> Self {
        Self::new(api_key, secret_key, CONTRACT_TIMESTAMP_PARAM)
    }

    pub fn timestamp_param(&self) -> &'static str {
        self.timestamp_param
    }

    /// Hex HMAC-SHA256 of `payload`
    pub fn signature(&self, payload: &str) -> Result<String, ExchangeError> {
        hmac_sha256_hex(self.secret_key.expose_secret(), payload.as_bytes())
    }
}

impl Signer for MexcSigner {
    fn sign_request(
        &self,
        _method: &str,
        _endpoint: &str,
        query_string: &str,
        _body: &[u8],
        timestamp: u64,
    ) -> SignatureResult {
        let timestamp_pair = format!("{}={}", self.timestamp_param, timestamp);
        let payload = if query_string.is_empty() {
            timestamp_pair
        } else {
            format!("{}&{}", query_string, timestamp_pair)
        };

        let signature = self.signature(&payload)?;

        let mut headers = HashMap::new();
        headers.insert("X-MEXC-APIKEY".to_string(), self.api_key.clone());

        let params = vec![
            (self.timestamp_param.to_string(), timestamp.to_string()),
            ("signature".to_string(), signature),
        ];

        Ok((headers, params))
    }
}
