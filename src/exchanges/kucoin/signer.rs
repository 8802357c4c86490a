use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{hmac_sha256_base64, SignatureResult, Signer};
use crate::core::types::KeyVersion;
use secrecy::{ExposeSecret, Secret, SecretString};
use std::collections::HashMap;

pub struct KucoinSigner {
    api_key: String,
    secret_key: SecretString,
    passphrase: Option<SecretString>,
    key_version: KeyVersion,
    encrypt_passphrase: bool,
}

impl KucoinSigner {
    pub fn new(
        api_key: String,
        secret_key: String,
        passphrase: Option<String>,
        key_version: KeyVersion,
        encrypt_passphrase: bool,
    ) -> Self {
        Self {
            api_key,
            secret_key: Secret::new(secret_key),
            passphrase: passphrase.filter(|p| !p.is_empty()).map(Secret::new),
            key_version,
            encrypt_passphrase,
        }
    }

    /// Base64 HMAC-SHA256 of `payload` under the API secret
    pub fn sign_payload(&self, payload: &str) -> Result<String, ExchangeError> {
        hmac_sha256_base64(self.secret_key.expose_secret(), payload.as_bytes())
    }

    /// Key version 2 keys always need the signed passphrase
    pub fn passphrase_is_signed(&self) -> bool {
        self.encrypt_passphrase || self.key_version == KeyVersion::V2
    }

    fn passphrase_header(&self) -> Result<Option<String>, ExchangeError> {
        let Some(passphrase) = self.passphrase.as_ref() else {
            return Ok(None);
        };

        if self.passphrase_is_signed() {
            self.sign_payload(passphrase.expose_secret()).map(Some)
        } else {
            Ok(Some(passphrase.expose_secret().clone()))
        }
    }
}

impl Signer for KucoinSigner {
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult {
        let request_path = if query_string.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}?{}", endpoint, query_string)
        };

        let body_str = std::str::from_utf8(body)
            .map_err(|e| ExchangeError::AuthError(format!("Invalid body encoding: {}", e)))?;

        let prehash = format!(
            "{}{}{}{}",
            timestamp,
            method.to_uppercase(),
            request_path,
            body_str
        );
        let signature = self.sign_payload(&prehash)?;

        let mut headers = HashMap::new();
        headers.insert("KC-API-KEY".to_string(), self.api_key.clone());
        headers.insert("KC-API-SIGN".to_string(), signature);
        headers.insert("KC-API-TIMESTAMP".to_string(), timestamp.to_string());
        headers.insert(
            "KC-API-KEY-VERSION".to_string(),
            self.key_version.as_str().to_string(),
        );
        if let Some(passphrase) = self.passphrase_header()? {
            headers.insert("KC-API-PASSPHRASE".to_string(), passphrase);
        }

        Ok((headers, Vec::new()))
    }
}
