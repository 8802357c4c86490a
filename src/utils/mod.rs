pub mod exchange_factory;

pub use exchange_factory::{
    ConnectorFactory, ConnectorRegistry, DefaultConnectorFactory, ExchangeType,
};
