use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig, Signer};
use crate::core::types::ZeroBalancePolicy;
use crate::exchanges::phemex::{connector::PhemexConnector, signer::PhemexSigner};
use std::sync::Arc;

pub const BASE_URL: &str = "https://api.phemex.com";
pub const TESTNET_BASE_URL: &str = "https://testnet-api.phemex.com";
pub const DEFAULT_ZERO_BALANCE_POLICY: ZeroBalancePolicy = ZeroBalancePolicy::KeepAll;

/// Builder for creating Phemex connectors
#[derive(Debug)]
pub struct PhemexBuilder {
    config: ExchangeConfig,
}

impl Default for PhemexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PhemexBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
        }
    }

    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve the REST host: explicit override, then testnet, then production
    pub fn base_url(&self) -> String {
        self.config.base_url.clone().unwrap_or_else(|| {
            if self.config.testnet {
                TESTNET_BASE_URL.to_string()
            } else {
                BASE_URL.to_string()
            }
        })
    }

    fn signer(&self) -> Option<Arc<dyn Signer>> {
        if !self.config.has_credentials() {
            return None;
        }
        Some(Arc::new(PhemexSigner::new(
            self.config.api_key().to_string(),
            self.config.secret_key().to_string(),
        )))
    }

    pub fn build(self) -> Result<PhemexConnector<ReqwestRest>, ExchangeError> {
        let rest_config = RestClientConfig::new(self.base_url(), "phemex".to_string())
            .with_timeout(self.config.timeout_seconds)
            .with_cancellation(self.config.cancellation.clone());

        let mut rest_builder = RestClientBuilder::new(rest_config);
        if let Some(signer) = self.signer() {
            rest_builder = rest_builder.with_signer(signer);
        }

        let rest = rest_builder.build()?;
        let policy = self
            .config
            .zero_balance_policy
            .unwrap_or(DEFAULT_ZERO_BALANCE_POLICY);

        Ok(PhemexConnector::new(rest, policy))
    }
}

/// Create a Phemex connector from configuration
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<PhemexConnector<ReqwestRest>, ExchangeError> {
    PhemexBuilder::new().with_config(config).build()
}
