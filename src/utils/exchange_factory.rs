use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::traits::ExchangeConnector;
use crate::exchanges::{kucoin, mexc, phemex};
use crate::vault::{CredentialVault, UserExchangeCredential};
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument};

/// Supported exchange types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeType {
    Kucoin,
    Mexc,
    Phemex,
}

impl ExchangeType {
    pub const ALL: [Self; 3] = [Self::Kucoin, Self::Mexc, Self::Phemex];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kucoin => "kucoin",
            Self::Mexc => "mexc",
            Self::Phemex => "phemex",
        }
    }

    /// Prefix of the `<P>_API_KEY` style environment variables
    pub fn env_prefix(self) -> &'static str {
        match self {
            Self::Kucoin => "KUCOIN",
            Self::Mexc => "MEXC",
            Self::Phemex => "PHEMEX",
        }
    }
}

impl std::fmt::Display for ExchangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeType {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kucoin" => Ok(Self::Kucoin),
            "mexc" => Ok(Self::Mexc),
            "phemex" => Ok(Self::Phemex),
            other => Err(ExchangeError::ConfigurationError(format!(
                "Unsupported exchange: {}",
                other
            ))),
        }
    }
}

/// Creates connectors; swap implementations to inject test doubles
pub trait ConnectorFactory: Send + Sync {
    fn create(
        &self,
        exchange: ExchangeType,
        config: ExchangeConfig,
    ) -> Result<Box<dyn ExchangeConnector>, ExchangeError>;
}

/// Builds the real HTTP connectors
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConnectorFactory;

impl ConnectorFactory for DefaultConnectorFactory {
    fn create(
        &self,
        exchange: ExchangeType,
        config: ExchangeConfig,
    ) -> Result<Box<dyn ExchangeConnector>, ExchangeError> {
        match exchange {
            ExchangeType::Kucoin => Ok(Box::new(kucoin::build_connector(config)?)),
            ExchangeType::Mexc => Ok(Box::new(mexc::build_connector(config)?)),
            ExchangeType::Phemex => Ok(Box::new(phemex::build_connector(config)?)),
        }
    }
}

/// Hands out connectors through a replaceable factory.
///
/// Callers hold the registry and pass it where connectors are needed; the
/// factory is only swapped by its owner.
pub struct ConnectorRegistry {
    factory: RwLock<Arc<dyn ConnectorFactory>>,
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorRegistry").finish_non_exhaustive()
    }
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::with_factory(Arc::new(DefaultConnectorFactory))
    }

    pub fn with_factory(factory: Arc<dyn ConnectorFactory>) -> Self {
        Self {
            factory: RwLock::new(factory),
        }
    }

    /// Current factory; the read lock is held only while cloning
    pub fn factory(&self) -> Arc<dyn ConnectorFactory> {
        match self.factory.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the factory, returning the previous one
    pub fn set_factory(&self, factory: Arc<dyn ConnectorFactory>) -> Arc<dyn ConnectorFactory> {
        let mut guard = match self.factory.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, factory)
    }

    #[instrument(skip(self, config), fields(exchange = %exchange))]
    pub fn connect(
        &self,
        exchange: ExchangeType,
        config: ExchangeConfig,
    ) -> Result<Box<dyn ExchangeConnector>, ExchangeError> {
        let factory = self.factory();
        debug!(has_credentials = config.has_credentials(), "Creating connector");
        factory.create(exchange, config)
    }

    /// Resolve the exchange by name, as stored alongside user credentials
    pub fn connect_named(
        &self,
        exchange: &str,
        config: ExchangeConfig,
    ) -> Result<Box<dyn ExchangeConnector>, ExchangeError> {
        self.connect(exchange.parse()?, config)
    }

    /// Decrypt a stored credential record and connect with it.
    ///
    /// `settings` supplies transport options; its credentials are replaced.
    /// The decrypted secrets live only inside the returned connector.
    pub fn connect_stored(
        &self,
        record: &UserExchangeCredential,
        vault: &CredentialVault,
        settings: ExchangeConfig,
    ) -> Result<Box<dyn ExchangeConnector>, ExchangeError> {
        let exchange: ExchangeType = record.exchange.parse()?;
        let credentials = record.decrypt(vault)?;
        self.connect(exchange, settings.with_credentials(credentials))
    }

    /// Connect using `<P>_API_KEY` style environment variables
    pub fn connect_from_env(
        &self,
        exchange: ExchangeType,
    ) -> Result<Box<dyn ExchangeConnector>, ExchangeError> {
        let config = ExchangeConfig::from_env(exchange.env_prefix())?;
        self.connect(exchange, config)
    }
}
