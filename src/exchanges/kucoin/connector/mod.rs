use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{AccountInfo, Connectivity, ExchangeConnector, OrderPlacer};
use crate::core::types::{Balances, ZeroBalancePolicy};
use crate::exchanges::kucoin::rest::KucoinRest;
use async_trait::async_trait;
use rust_decimal::Decimal;

pub mod account;
pub mod connection;
pub mod trading;

pub use account::Account;
pub use connection::Connection;
pub use trading::Trading;

/// KuCoin connector that composes all sub-trait implementations
pub struct KucoinConnector<R: RestClient> {
    pub connection: Connection<R>,
    pub account: Account<R>,
    pub trading: Trading<R>,
}

impl<R: RestClient + Clone + Send + Sync> KucoinConnector<R> {
    pub fn new(spot: R, futures: R, zero_balance_policy: ZeroBalancePolicy) -> Self {
        let rest = KucoinRest::new(spot, futures);
        Self {
            connection: Connection::new(&rest),
            account: Account::new(&rest, zero_balance_policy),
            trading: Trading::new(&rest),
        }
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> Connectivity for KucoinConnector<R> {
    async fn test_connection(&self) -> Result<(), ExchangeError> {
        self.connection.test_connection().await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> AccountInfo for KucoinConnector<R> {
    async fn get_account_balances(&self) -> Result<Balances, ExchangeError> {
        self.account.get_account_balances().await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> OrderPlacer for KucoinConnector<R> {
    async fn execute_order(
        &self,
        order_type: &str,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<String, ExchangeError> {
        self.trading
            .execute_order(order_type, symbol, quantity, price)
            .await
    }
}

impl<R: RestClient + Clone + Send + Sync> ExchangeConnector for KucoinConnector<R> {
    fn exchange_name(&self) -> &'static str {
        "kucoin"
    }
}
