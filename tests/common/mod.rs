#![allow(dead_code)]

use base64::engine::general_purpose;
use base64::Engine;
use exvault::core::config::ExchangeConfig;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use wiremock::{Match, Request};

pub const TEST_VAULT_KEY: &str = "Pjk+k4hske5KkKtbaKSVDOgpllRl+0EI6oCAdx88XqI=";

pub fn hmac_sha256(secret: &str, payload: &str) -> Vec<u8> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

fn path_and_query(request: &Request) -> (String, String) {
    (
        request.url.path().to_string(),
        request.url.query().unwrap_or_default().to_string(),
    )
}

/// Config pointing both hosts of an exchange at a mock server
pub fn mock_config(api_key: &str, secret: &str, uri: &str) -> ExchangeConfig {
    ExchangeConfig::new(api_key.to_string(), secret.to_string())
        .base_url(uri.to_string())
        .futures_base_url(uri.to_string())
}

/// Accepts only requests a KuCoin server would authenticate
pub struct KucoinSignature {
    pub secret: &'static str,
    pub passphrase: &'static str,
}

impl Match for KucoinSignature {
    fn matches(&self, request: &Request) -> bool {
        let (Some(timestamp), Some(sign), Some(passphrase)) = (
            header(request, "KC-API-TIMESTAMP"),
            header(request, "KC-API-SIGN"),
            header(request, "KC-API-PASSPHRASE"),
        ) else {
            return false;
        };

        let (path, query) = path_and_query(request);
        let request_path = if query.is_empty() {
            path
        } else {
            format!("{}?{}", path, query)
        };
        let body = String::from_utf8_lossy(&request.body);
        let prehash = format!("{}{}{}{}", timestamp, request.method.as_str(), request_path, body);

        let expected_sign = general_purpose::STANDARD.encode(hmac_sha256(self.secret, &prehash));
        let expected_passphrase =
            general_purpose::STANDARD.encode(hmac_sha256(self.secret, self.passphrase));

        sign == expected_sign && passphrase == expected_passphrase
    }
}

/// Accepts Phemex requests whose expiry is still in the future and whose
/// signature covers it, like the live server
pub struct PhemexFreshExpiry {
    pub secret: &'static str,
}

impl Match for PhemexFreshExpiry {
    fn matches(&self, request: &Request) -> bool {
        let (Some(expiry), Some(signature)) = (
            header(request, "x-phemex-request-expiry"),
            header(request, "x-phemex-request-signature"),
        ) else {
            return false;
        };

        let Ok(expiry_secs) = expiry.parse::<i64>() else {
            return false;
        };
        let now = chrono::Utc::now().timestamp();
        if expiry_secs <= now || expiry_secs > now + 60 {
            return false;
        }

        let (path, query) = path_and_query(request);
        let body = String::from_utf8_lossy(&request.body);
        let payload = format!("{}{}{}{}", path, query, expiry, body);

        signature == hex::encode(hmac_sha256(self.secret, &payload))
    }
}

/// Accepts MEXC requests whose trailing `signature` covers the rest of the query
pub struct MexcSignature {
    pub secret: &'static str,
    pub timestamp_param: &'static str,
}

impl Match for MexcSignature {
    fn matches(&self, request: &Request) -> bool {
        let query = request.url.query().unwrap_or_default();
        let Some((signed, signature)) = query.rsplit_once("&signature=") else {
            return false;
        };

        let has_timestamp = signed
            .split('&')
            .any(|pair| pair.starts_with(&format!("{}=", self.timestamp_param)));

        has_timestamp && signature == hex::encode(hmac_sha256(self.secret, signed))
    }
}
