use crate::core::types::{KeyVersion, ZeroBalancePolicy};
use secrecy::{ExposeSecret, Secret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::fmt;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

/// Decrypted exchange credentials
///
/// Only ever held transiently: produced by the vault or the environment,
/// handed to a connector, then dropped.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: SecretString,
    pub api_secret: SecretString,
    pub passphrase: Option<SecretString>,
    pub key_version: KeyVersion,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            api_secret: Secret::new(api_secret.into()),
            passphrase: None,
            key_version: KeyVersion::default(),
        }
    }

    #[must_use]
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        let passphrase = passphrase.into();
        self.passphrase = if passphrase.is_empty() {
            None
        } else {
            Some(Secret::new(passphrase))
        };
        self
    }

    #[must_use]
    pub const fn with_key_version(mut self, key_version: KeyVersion) -> Self {
        self.key_version = key_version;
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field(
                "passphrase",
                &self.passphrase.as_ref().map(|_| "[REDACTED]"),
            )
            .field("key_version", &self.key_version)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub passphrase: Option<Secret<String>>,
    pub key_version: KeyVersion,
    /// Send the KuCoin passphrase HMAC-signed rather than plain
    pub encrypt_passphrase: bool,
    pub testnet: bool,
    pub base_url: Option<String>,
    pub futures_base_url: Option<String>,
    /// `None` means the exchange default
    pub zero_balance_policy: Option<ZeroBalancePolicy>,
    pub timeout_seconds: u64,
    pub cancellation: Option<CancellationToken>,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 10)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field(
            "passphrase",
            &self.passphrase.as_ref().map(|_| "[REDACTED]"),
        )?;
        state.serialize_field("key_version", &self.key_version)?;
        state.serialize_field("encrypt_passphrase", &self.encrypt_passphrase)?;
        state.serialize_field("testnet", &self.testnet)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("futures_base_url", &self.futures_base_url)?;
        state.serialize_field("zero_balance_policy", &self.zero_balance_policy)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.end()
    }
}

// Custom Deserialize implementation
impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        const fn default_true() -> bool {
            true
        }
        const fn default_timeout() -> u64 {
            DEFAULT_TIMEOUT_SECONDS
        }

        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: String,
            secret_key: String,
            #[serde(default)]
            passphrase: Option<String>,
            #[serde(default)]
            key_version: KeyVersion,
            #[serde(default = "default_true")]
            encrypt_passphrase: bool,
            #[serde(default)]
            testnet: bool,
            #[serde(default)]
            base_url: Option<String>,
            #[serde(default)]
            futures_base_url: Option<String>,
            #[serde(default)]
            zero_balance_policy: Option<ZeroBalancePolicy>,
            #[serde(default = "default_timeout")]
            timeout_seconds: u64,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            passphrase: helper
                .passphrase
                .filter(|p| !p.is_empty())
                .map(Secret::new),
            key_version: helper.key_version,
            encrypt_passphrase: helper.encrypt_passphrase,
            testnet: helper.testnet,
            base_url: helper.base_url,
            futures_base_url: helper.futures_base_url,
            zero_balance_policy: helper.zero_balance_policy,
            timeout_seconds: helper.timeout_seconds,
            cancellation: None,
        })
    }
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: None,
            key_version: KeyVersion::default(),
            encrypt_passphrase: true,
            testnet: false,
            base_url: None,
            futures_base_url: None,
            zero_balance_policy: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            cancellation: None,
        }
    }

    /// Create a configuration from decrypted credentials
    #[must_use]
    pub fn from_credentials(credentials: Credentials) -> Self {
        Self::read_only().with_credentials(credentials)
    }

    /// Replace the credentials, keeping every transport setting
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        let Credentials {
            api_key,
            api_secret,
            passphrase,
            key_version,
        } = credentials;

        self.api_key = api_key;
        self.secret_key = api_secret;
        self.passphrase = passphrase;
        self.key_version = key_version;
        self
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{EXCHANGE}_API_KEY` (e.g., `KUCOIN_API_KEY`)
    /// - `{EXCHANGE}_API_SECRET`
    /// - `{EXCHANGE}_API_PASSPHRASE` (optional)
    /// - `{EXCHANGE}_API_KEY_VERSION` (optional, defaults to 2)
    /// - `{EXCHANGE}_ENCRYPT_PASSPHRASE` (optional, defaults to true)
    /// - `{EXCHANGE}_TESTNET` (optional, defaults to false)
    /// - `{EXCHANGE}_BASE_URL` / `{EXCHANGE}_FUTURES_BASE_URL` (optional)
    pub fn from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let prefix = exchange_prefix.to_uppercase();
        let var = |suffix: &str| format!("{}_{}", prefix, suffix);
        let optional = |suffix: &str| {
            env::var(var(suffix))
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key_var = var("API_KEY");
        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;

        let secret_var = var("API_SECRET");
        let secret_key = env::var(&secret_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_var))?;

        let key_version = match optional("API_KEY_VERSION") {
            Some(raw) => raw.parse::<KeyVersion>().map_err(|e| {
                ConfigError::InvalidConfiguration(format!("{}: {}", var("API_KEY_VERSION"), e))
            })?,
            None => KeyVersion::default(),
        };

        let flag = |suffix: &str, default: bool| -> Result<bool, ConfigError> {
            match optional(suffix) {
                Some(raw) => parse_bool_word(&raw).ok_or_else(|| {
                    ConfigError::InvalidConfiguration(format!(
                        "{}: '{}' is not a boolean",
                        var(suffix),
                        raw
                    ))
                }),
                None => Ok(default),
            }
        };
        let encrypt_passphrase = flag("ENCRYPT_PASSPHRASE", true)?;
        let testnet = flag("TESTNET", false)?;

        Ok(Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: optional("API_PASSPHRASE").map(Secret::new),
            key_version,
            encrypt_passphrase,
            testnet,
            base_url: optional("BASE_URL"),
            futures_base_url: optional("FUTURES_BASE_URL"),
            zero_balance_policy: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            cancellation: None,
        })
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(exchange_prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(exchange_prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(
        exchange_prefix: &str,
        env_file_path: &str,
    ) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // no .env file, fall through to the process environment
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(exchange_prefix)
    }

    /// Configuration for public endpoints only
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Check if this configuration has valid credentials for authenticated operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Set testnet mode
    #[must_use]
    pub const fn testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set custom futures/contract base URL
    #[must_use]
    pub fn futures_base_url(mut self, futures_base_url: String) -> Self {
        self.futures_base_url = Some(futures_base_url);
        self
    }

    #[must_use]
    pub fn passphrase(mut self, passphrase: String) -> Self {
        self.passphrase = if passphrase.is_empty() {
            None
        } else {
            Some(Secret::new(passphrase))
        };
        self
    }

    #[must_use]
    pub const fn key_version(mut self, key_version: KeyVersion) -> Self {
        self.key_version = key_version;
        self
    }

    #[must_use]
    pub const fn encrypt_passphrase(mut self, encrypt: bool) -> Self {
        self.encrypt_passphrase = encrypt;
        self
    }

    #[must_use]
    pub const fn zero_balance_policy(mut self, policy: ZeroBalancePolicy) -> Self {
        self.zero_balance_policy = Some(policy);
        self
    }

    #[must_use]
    pub const fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Abort in-flight requests when `token` is cancelled
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// Get passphrase (use carefully - exposes secret)
    pub fn passphrase_str(&self) -> Option<&str> {
        self.passphrase.as_ref().map(|p| p.expose_secret().as_str())
    }
}

/// Accepts `1/true/yes/y/on` and `0/false/no/n/off`, case-insensitively
pub fn parse_bool_word(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_redacts_secrets() {
        let config = ExchangeConfig::new("key-123".to_string(), "secret-456".to_string())
            .passphrase("hunter2".to_string());
        let json = serde_json::to_string(&config).unwrap();

        assert!(!json.contains("key-123"));
        assert!(!json.contains("secret-456"));
        assert!(!json.contains("hunter2"));
        assert!(json.contains("[REDACTED]"));
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials::new("key-123", "secret-456").with_passphrase("hunter2");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("secret-456"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: ExchangeConfig =
            serde_json::from_str(r#"{"api_key":"k","secret_key":"s"}"#).unwrap();
        assert!(config.encrypt_passphrase);
        assert_eq!(config.key_version, KeyVersion::V2);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert!(config.passphrase.is_none());
    }

    #[test]
    fn test_from_credentials_keeps_passphrase_and_version() {
        let creds = Credentials::new("k", "s")
            .with_passphrase("p")
            .with_key_version(KeyVersion::V3);
        let config = ExchangeConfig::from_credentials(creds);

        assert!(config.has_credentials());
        assert_eq!(config.passphrase_str(), Some("p"));
        assert_eq!(config.key_version, KeyVersion::V3);
    }

    #[test]
    fn test_bool_words() {
        for word in ["1", "TRUE", "yes", "y", "On"] {
            assert_eq!(parse_bool_word(word), Some(true), "{}", word);
        }
        for word in ["0", "false", "NO", "n", "off"] {
            assert_eq!(parse_bool_word(word), Some(false), "{}", word);
        }
        assert_eq!(parse_bool_word("maybe"), None);
    }

    #[test]
    fn test_from_env_reads_prefixed_variables() {
        env::set_var("EXVCFGA_API_KEY", "env-key");
        env::set_var("EXVCFGA_API_SECRET", "env-secret");
        env::set_var("EXVCFGA_API_PASSPHRASE", "env-pass");
        env::set_var("EXVCFGA_API_KEY_VERSION", "3");
        env::set_var("EXVCFGA_ENCRYPT_PASSPHRASE", "off");
        env::set_var("EXVCFGA_TESTNET", "yes");

        let config = ExchangeConfig::from_env("exvcfga").unwrap();
        assert_eq!(config.api_key(), "env-key");
        assert_eq!(config.secret_key(), "env-secret");
        assert_eq!(config.passphrase_str(), Some("env-pass"));
        assert_eq!(config.key_version, KeyVersion::V3);
        assert!(!config.encrypt_passphrase);
        assert!(config.testnet);
    }

    #[test]
    fn test_from_env_rejects_bad_values() {
        env::set_var("EXVCFGB_API_KEY", "k");
        env::set_var("EXVCFGB_API_SECRET", "s");
        env::set_var("EXVCFGB_API_KEY_VERSION", "9");
        assert!(matches!(
            ExchangeConfig::from_env("EXVCFGB"),
            Err(ConfigError::InvalidConfiguration(_))
        ));

        assert!(matches!(
            ExchangeConfig::from_env("EXVCFGC"),
            Err(ConfigError::MissingEnvironmentVariable(var)) if var == "EXVCFGC_API_KEY"
        ));
    }

    #[test]
    fn test_from_env_rejects_unknown_flag_words() {
        env::set_var("EXVCFGD_API_KEY", "k");
        env::set_var("EXVCFGD_API_SECRET", "s");
        env::set_var("EXVCFGD_TESTNET", "sometimes");
        assert!(matches!(
            ExchangeConfig::from_env("EXVCFGD"),
            Err(ConfigError::InvalidConfiguration(msg)) if msg.contains("EXVCFGD_TESTNET")
        ));

        env::set_var("EXVCFGD_TESTNET", "off");
        env::set_var("EXVCFGD_ENCRYPT_PASSPHRASE", "perhaps");
        assert!(matches!(
            ExchangeConfig::from_env("EXVCFGD"),
            Err(ConfigError::InvalidConfiguration(msg)) if msg.contains("EXVCFGD_ENCRYPT_PASSPHRASE")
        ));

        env::remove_var("EXVCFGD_ENCRYPT_PASSPHRASE");
        let config = ExchangeConfig::from_env("EXVCFGD").unwrap();
        assert!(!config.testnet);
        assert!(config.encrypt_passphrase);
    }
}
