pub mod core;
pub mod exchanges;
pub mod utils;
pub mod vault;

pub use crate::core::{
    config::{Credentials, ExchangeConfig},
    errors::{ErrorKind, ExchangeError},
    traits::{AccountInfo, Connectivity, ExchangeConnector, OrderPlacer},
    types::*,
};
pub use exchanges::kucoin::KucoinConnector;
pub use exchanges::mexc::MexcConnector;
pub use exchanges::phemex::PhemexConnector;
pub use utils::{ConnectorFactory, ConnectorRegistry, DefaultConnectorFactory, ExchangeType};
pub use vault::{CredentialVault, EncryptedSecret, UserExchangeCredential};
