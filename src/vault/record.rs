use crate::core::config::Credentials;
use crate::core::errors::ExchangeError;
use crate::core::types::KeyVersion;
use crate::vault::{CredentialVault, EncryptedSecret, VaultError};
use serde::{Deserialize, Serialize};

/// Credentials as submitted by a user; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSubmission {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default)]
    pub api_passphrase: Option<String>,
    #[serde(default)]
    pub key_version: Option<KeyVersion>,
}

impl CredentialSubmission {
    pub fn new(api_key: &str, api_secret: &str, api_passphrase: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            api_secret: Some(api_secret.to_string()),
            api_passphrase: Some(api_passphrase.to_string()),
            key_version: None,
        }
    }
}

/// Persisted, encrypted credentials of one user on one exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserExchangeCredential {
    pub exchange: String,
    pub api_key: Option<EncryptedSecret>,
    pub api_secret: Option<EncryptedSecret>,
    pub api_passphrase: Option<EncryptedSecret>,
    #[serde(default)]
    pub key_version: KeyVersion,
}

fn encrypt_field(
    vault: &CredentialVault,
    submitted: Option<&String>,
) -> Result<Option<EncryptedSecret>, VaultError> {
    match submitted.map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(value) => vault.encrypt(value).map(Some),
        None => Ok(None),
    }
}

impl UserExchangeCredential {
    pub fn new(exchange: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            api_key: None,
            api_secret: None,
            api_passphrase: None,
            key_version: KeyVersion::default(),
        }
    }

    /// First submission for an exchange
    pub fn from_submission(
        exchange: impl Into<String>,
        submission: &CredentialSubmission,
        vault: &CredentialVault,
    ) -> Result<Self, VaultError> {
        let mut record = Self::new(exchange);
        record.apply(submission, vault)?;
        Ok(record)
    }

    /// Merge a resubmission into the stored record.
    ///
    /// Fields are trimmed; blank or absent fields keep their stored value.
    /// Nothing is written unless every submitted field encrypts.
    pub fn apply(
        &mut self,
        submission: &CredentialSubmission,
        vault: &CredentialVault,
    ) -> Result<(), VaultError> {
        let api_key = encrypt_field(vault, submission.api_key.as_ref())?;
        let api_secret = encrypt_field(vault, submission.api_secret.as_ref())?;
        let api_passphrase = encrypt_field(vault, submission.api_passphrase.as_ref())?;

        if api_key.is_some() {
            self.api_key = api_key;
        }
        if api_secret.is_some() {
            self.api_secret = api_secret;
        }
        if api_passphrase.is_some() {
            self.api_passphrase = api_passphrase;
        }
        if let Some(version) = submission.key_version {
            self.key_version = version;
        }

        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn has_api_secret(&self) -> bool {
        self.api_secret.is_some()
    }

    pub fn has_api_passphrase(&self) -> bool {
        self.api_passphrase.is_some()
    }

    /// Decrypt into transient [`Credentials`]
    pub fn decrypt(&self, vault: &CredentialVault) -> Result<Credentials, ExchangeError> {
        let (Some(api_key), Some(api_secret)) = (&self.api_key, &self.api_secret) else {
            return Err(ExchangeError::ConfigurationError(format!(
                "stored {} credential is missing its API key or secret",
                self.exchange
            )));
        };

        let passphrase = match &self.api_passphrase {
            Some(p) => Some(vault.decrypt(p)?),
            None => None,
        };

        Ok(Credentials {
            api_key: vault.decrypt(api_key)?,
            api_secret: vault.decrypt(api_secret)?,
            passphrase,
            key_version: self.key_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::generate_key;
    use secrecy::ExposeSecret;

    #[test]
    fn test_first_submission_trims_and_encrypts() {
        let vault = CredentialVault::with_key(generate_key());
        let submission = CredentialSubmission::new("  key1 ", "secret1\n", "");
        let record = UserExchangeCredential::from_submission("kucoin", &submission, &vault).unwrap();

        assert!(record.has_api_key());
        assert!(record.has_api_secret());
        assert!(!record.has_api_passphrase());
        assert_ne!(record.api_key.as_ref().unwrap().as_str(), "key1");

        let creds = record.decrypt(&vault).unwrap();
        assert_eq!(creds.api_key.expose_secret(), "key1");
        assert_eq!(creds.api_secret.expose_secret(), "secret1");
        assert!(creds.passphrase.is_none());
    }

    #[test]
    fn test_blank_fields_leave_stored_values_untouched() {
        let vault = CredentialVault::with_key(generate_key());
        let mut record = UserExchangeCredential::from_submission(
            "kucoin",
            &CredentialSubmission::new("key1", "secret1", "pass1"),
            &vault,
        )
        .unwrap();
        let stored_key = record.api_key.clone();
        let stored_passphrase = record.api_passphrase.clone();

        let update = CredentialSubmission {
            api_key: Some("   ".to_string()),
            api_secret: Some("secret2".to_string()),
            api_passphrase: None,
            key_version: Some(KeyVersion::V3),
        };
        record.apply(&update, &vault).unwrap();

        assert_eq!(record.api_key, stored_key);
        assert_eq!(record.api_passphrase, stored_passphrase);
        assert_eq!(record.key_version, KeyVersion::V3);

        let creds = record.decrypt(&vault).unwrap();
        assert_eq!(creds.api_key.expose_secret(), "key1");
        assert_eq!(creds.api_secret.expose_secret(), "secret2");
        assert_eq!(creds.passphrase.unwrap().expose_secret(), "pass1");
    }

    #[test]
    fn test_missing_secret_is_a_configuration_error() {
        let vault = CredentialVault::with_key(generate_key());
        let submission = CredentialSubmission {
            api_key: Some("key1".to_string()),
            ..CredentialSubmission::default()
        };
        let record = UserExchangeCredential::from_submission("mexc", &submission, &vault).unwrap();

        let err = record.decrypt(&vault).unwrap_err();
        assert_eq!(err.kind(), crate::core::errors::ErrorKind::Configuration);
    }

    #[test]
    fn test_decrypt_with_other_key_is_a_crypto_error() {
        let record = UserExchangeCredential::from_submission(
            "phemex",
            &CredentialSubmission::new("key1", "secret1", ""),
            &CredentialVault::with_key(generate_key()),
        )
        .unwrap();

        let err = record
            .decrypt(&CredentialVault::with_key(generate_key()))
            .unwrap_err();
        assert_eq!(err.kind(), crate::core::errors::ErrorKind::Crypto);
    }

    #[test]
    fn test_submission_deserializes_from_camel_case() {
        let submission: CredentialSubmission =
            serde_json::from_str(r#"{"apiKey":"k","apiSecret":"s","keyVersion":"3"}"#).unwrap();
        assert_eq!(submission.api_key.as_deref(), Some("k"));
        assert_eq!(submission.api_passphrase, None);
        assert_eq!(submission.key_version, Some(KeyVersion::V3));
    }
}
