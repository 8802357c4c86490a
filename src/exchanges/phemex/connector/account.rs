use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::core::types::{Balances, ZeroBalancePolicy};
use crate::exchanges::phemex::{conversions, rest::PhemexRest};
use async_trait::async_trait;

pub const SETTLE_CURRENCY: &str = "USDT";

/// Phemex USDT-M contract balances
#[derive(Debug)]
pub struct Account<R: RestClient> {
    rest: PhemexRest<R>,
    zero_balance_policy: ZeroBalancePolicy,
}

impl<R: RestClient + Clone> Account<R> {
    pub fn new(rest: &PhemexRest<R>, zero_balance_policy: ZeroBalancePolicy) -> Self {
        Self {
            rest: rest.clone(),
            zero_balance_policy,
        }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> AccountInfo for Account<R> {
    async fn get_account_balances(&self) -> Result<Balances, ExchangeError> {
        let positions = self.rest.get_account_positions(SETTLE_CURRENCY).await?;
        conversions::convert_accounts(positions.account.into_vec(), self.zero_balance_policy)
    }
}
