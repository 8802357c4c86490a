use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig, Signer};
use crate::core::types::{KeyVersion, ZeroBalancePolicy};
use crate::exchanges::kucoin::{connector::KucoinConnector, signer::KucoinSigner};
use std::sync::Arc;

pub const SPOT_BASE_URL: &str = "https://api.kucoin.com";
pub const FUTURES_BASE_URL: &str = "https://api-futures.kucoin.com";
pub const DEFAULT_ZERO_BALANCE_POLICY: ZeroBalancePolicy = ZeroBalancePolicy::SkipZero;

/// Builder for creating KuCoin connectors
#[derive(Debug)]
pub struct KucoinBuilder {
    config: ExchangeConfig,
}

impl Default for KucoinBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KucoinBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
        }
    }

    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    fn signer(&self) -> Result<Option<Arc<dyn Signer>>, ExchangeError> {
        let config = &self.config;
        if !config.has_credentials() {
            return Ok(None);
        }

        if config.passphrase.is_none() && config.key_version != KeyVersion::V3 {
            return Err(ExchangeError::ConfigurationError(format!(
                "KuCoin passphrase is required for key version {}",
                config.key_version
            )));
        }

        Ok(Some(Arc::new(KucoinSigner::new(
            config.api_key().to_string(),
            config.secret_key().to_string(),
            config.passphrase_str().map(str::to_string),
            config.key_version,
            config.encrypt_passphrase,
        ))))
    }

    fn rest(&self, base_url: String, signer: Option<Arc<dyn Signer>>) -> Result<ReqwestRest, ExchangeError> {
        let rest_config = RestClientConfig::new(base_url, "kucoin".to_string())
            .with_timeout(self.config.timeout_seconds)
            .with_cancellation(self.config.cancellation.clone());

        let mut builder = RestClientBuilder::new(rest_config);
        if let Some(signer) = signer {
            builder = builder.with_signer(signer);
        }
        builder.build()
    }

    pub fn build(self) -> Result<KucoinConnector<ReqwestRest>, ExchangeError> {
        if self.config.testnet && self.config.base_url.is_none() {
            return Err(ExchangeError::ConfigurationError(
                "KuCoin has no public testnet; set base_url explicitly".to_string(),
            ));
        }

        let spot_url = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| SPOT_BASE_URL.to_string());
        let futures_url = self
            .config
            .futures_base_url
            .clone()
            .unwrap_or_else(|| FUTURES_BASE_URL.to_string());

        let signer = self.signer()?;
        let spot = self.rest(spot_url, signer.clone())?;
        let futures = self.rest(futures_url, signer)?;

        let policy = self
            .config
            .zero_balance_policy
            .unwrap_or(DEFAULT_ZERO_BALANCE_POLICY);

        Ok(KucoinConnector::new(spot, futures, policy))
    }
}

/// Create a KuCoin connector from configuration
pub fn build_connector(config: ExchangeConfig) -> Result<KucoinConnector<ReqwestRest>, ExchangeError> {
    KucoinBuilder::new().with_config(config).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_credentials() {
        assert!(build_connector(ExchangeConfig::read_only()).is_ok());
    }

    #[test]
    fn test_missing_passphrase_is_rejected_for_v2() {
        let config = ExchangeConfig::new("key".to_string(), "secret".to_string());
        let err = build_connector(config).err().unwrap();
        assert!(err.to_string().contains("passphrase"));
    }

    #[test]
    fn test_v3_key_without_passphrase_builds() {
        let config = ExchangeConfig::new("key".to_string(), "secret".to_string())
            .key_version(KeyVersion::V3);
        assert!(build_connector(config).is_ok());
    }

    #[test]
    fn test_testnet_requires_explicit_url() {
        let config = ExchangeConfig::read_only().testnet(true);
        assert!(build_connector(config).is_err());

        let config = ExchangeConfig::read_only()
            .testnet(true)
            .base_url("http://127.0.0.1:9".to_string());
        assert!(build_connector(config).is_ok());
    }
}
