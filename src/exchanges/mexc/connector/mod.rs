use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{AccountInfo, Connectivity, ExchangeConnector, OrderPlacer};
use crate::core::types::{Balances, ZeroBalancePolicy};
use crate::exchanges::mexc::rest::MexcRest;
use async_trait::async_trait;
use rust_decimal::Decimal;

pub mod account;
pub mod connection;
pub mod trading;

pub use account::Account;
pub use connection::Connection;
pub use trading::Trading;

pub struct MexcConnector<R: RestClient> {
    pub connection: Connection<R>,
    pub account: Account<R>,
    pub trading: Trading,
}

impl<R: RestClient + Clone + Send + Sync> MexcConnector<R> {
    pub fn new(spot: R, contract: R, zero_balance_policy: ZeroBalancePolicy) -> Self {
        let rest = MexcRest::new(spot, contract);
        Self {
            connection: Connection::new(&rest),
            account: Account::new(&rest, zero_balance_policy),
            trading: Trading::new(),
        }
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> Connectivity for MexcConnector<R> {
    async fn test_connection(&self) -> Result<(), ExchangeError> {
        self.connection.test_connection().await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> AccountInfo for MexcConnector<R> {
    async fn get_account_balances(&self) -> Result<Balances, ExchangeError> {
        self.account.get_account_balances().await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> OrderPlacer for MexcConnector<R> {
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

impl<R: RestClient + Clone + Send + Sync> ExchangeConnector for MexcConnector<R> {
    fn exchange_name(&self) -> &'static str {
        "mexc"
    }
}
