use crate::core::{errors::ExchangeError, types::Balances};
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
pub trait Connectivity {
    /// Verify that every endpoint family the connector uses is reachable
    async fn test_connection(&self) -> Result<(), ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    /// Balances keyed `<account>_<CURRENCY>`, e.g. `spot_BTC`
    async fn get_account_balances(&self) -> Result<Balances, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Submit an order and return the exchange-assigned id.
    ///
    /// A negative `quantity` sells (or opens short); `order_type` is matched
    /// case-insensitively on "market" / "limit".
    async fn execute_order(
        &self,
        order_type: &str,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<String, ExchangeError>;
}

/// Uniform capability set every exchange connector exposes
pub trait ExchangeConnector: Connectivity + AccountInfo + OrderPlacer + Send + Sync {
    /// Lower-case exchange identifier, e.g. `"kucoin"`
    fn exchange_name(&self) -> &'static str;
}
