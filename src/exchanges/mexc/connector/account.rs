use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::core::types::{Balances, ZeroBalancePolicy};
use crate::exchanges::mexc::{conversions, rest::MexcRest};
use async_trait::async_trait;

pub const CONTRACT_CURRENCY: &str = "USDT";

/// MEXC spot and contract balances
#[derive(Debug)]
pub struct Account<R: RestClient> {
    rest: MexcRest<R>,
    zero_balance_policy: ZeroBalancePolicy,
}

impl<R: RestClient + Clone> Account<R> {
    pub fn new(rest: &MexcRest<R>, zero_balance_policy: ZeroBalancePolicy) -> Self {
        Self {
            rest: rest.clone(),
            zero_balance_policy,
        }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> AccountInfo for Account<R> {
    async fn get_account_balances(&self) -> Result<Balances, ExchangeError> {
        let account = self.rest.get_account().await?;
        let mut balances =
            conversions::convert_spot_balances(account.balances, self.zero_balance_policy)?;

        let asset = self.rest.get_contract_asset(CONTRACT_CURRENCY).await?;
        let (key, available) = conversions::convert_contract_asset(&asset, CONTRACT_CURRENCY)?;
        balances.insert(key, available);

        Ok(balances)
    }
}
