use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig, Signer};
use crate::core::types::ZeroBalancePolicy;
use crate::exchanges::mexc::{connector::MexcConnector, signer::MexcSigner};
use std::sync::Arc;

pub const SPOT_BASE_URL: &str = "https://api.mexc.com";
pub const CONTRACT_BASE_URL: &str = "https://contract.mexc.com";
pub const DEFAULT_ZERO_BALANCE_POLICY: ZeroBalancePolicy = ZeroBalancePolicy::SkipZero;

/// Builder for creating MEXC connectors
#[derive(Debug)]
pub struct MexcBuilder {
    config: ExchangeConfig,
}

impl Default for MexcBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MexcBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
        }
    }

    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    fn rest(
        &self,
        base_url: String,
        signer: Option<Arc<dyn Signer>>,
    ) -> Result<ReqwestRest, ExchangeError> {
        let rest_config = RestClientConfig::new(base_url, "mexc".to_string())
            .with_timeout(self.config.timeout_seconds)
            .with_cancellation(self.config.cancellation.clone());

        let mut builder = RestClientBuilder::new(rest_config);
        if let Some(signer) = signer {
            builder = builder.with_signer(signer);
        }
        builder.build()
    }

    pub fn build(self) -> Result<MexcConnector<ReqwestRest>, ExchangeError> {
        if self.config.testnet && self.config.base_url.is_none() {
            return Err(ExchangeError::ConfigurationError(
                "MEXC has no public testnet; set base_url explicitly".to_string(),
            ));
        }

        let spot_url = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| SPOT_BASE_URL.to_string());
        let contract_url = self
            .config
            .futures_base_url
            .clone()
            .unwrap_or_else(|| CONTRACT_BASE_URL.to_string());

        // The two hosts name the timestamp parameter differently
        let (spot_signer, contract_signer): (Option<Arc<dyn Signer>>, Option<Arc<dyn Signer>>) =
            if self.config.has_credentials() {
                let key = self.config.api_key().to_string();
                let secret = self.config.secret_key().to_string();
                (
                    Some(Arc::new(MexcSigner::spot(key.clone(), secret.clone()))),
                    Some(Arc::new(MexcSigner::contract(key, secret))),
                )
            } else {
                (None, None)
            };

        let spot = self.rest(spot_url, spot_signer)?;
        let contract = self.rest(contract_url, contract_signer)?;

        let policy = self
            .config
            .zero_balance_policy
            .unwrap_or(DEFAULT_ZERO_BALANCE_POLICY);

        Ok(MexcConnector::new(spot, contract, policy))
    }
}

/// Create a MEXC connector from configuration
pub fn build_connector(config: ExchangeConfig) -> Result<MexcConnector<ReqwestRest>, ExchangeError> {
    MexcBuilder::new().with_config(config).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_and_without_credentials() {
        assert!(build_connector(ExchangeConfig::read_only()).is_ok());

        let config = ExchangeConfig::new("key".to_string(), "secret".to_string());
        assert!(build_connector(config).is_ok());
    }

    #[test]
    fn test_testnet_requires_explicit_url() {
        let err = build_connector(ExchangeConfig::read_only().testnet(true))
            .err()
            .unwrap();
        assert!(matches!(err, ExchangeError::ConfigurationError(_)));
    }
}
