use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::core::types::{Balances, ZeroBalancePolicy};
use crate::exchanges::kucoin::{conversions, rest::KucoinRest};
use async_trait::async_trait;

pub const FUTURES_CURRENCY: &str = "USDT";

/// KuCoin account implementation
#[derive(Debug)]
pub struct Account<R: RestClient> {
    rest: KucoinRest<R>,
    zero_balance_policy: ZeroBalancePolicy,
}

impl<R: RestClient + Clone> Account<R> {
    pub fn new(rest: &KucoinRest<R>, zero_balance_policy: ZeroBalancePolicy) -> Self {
        Self {
            rest: rest.clone(),
            zero_balance_policy,
        }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> AccountInfo for Account<R> {
    async fn get_account_balances(&self) -> Result<Balances, ExchangeError> {
        let accounts = self.rest.get_accounts().await?;
        let mut balances = conversions::convert_accounts(accounts, self.zero_balance_policy)?;

        let overview = self.rest.get_futures_overview(FUTURES_CURRENCY).await?;
        let (key, available) =
            conversions::convert_futures_overview(&overview, FUTURES_CURRENCY)?;
        balances.insert(key, available);

        Ok(balances)
    }
}
