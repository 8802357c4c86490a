use super::types::{MexcBalance, MexcContractAsset};
use crate::core::errors::ExchangeError;
use crate::core::types::{AccountKind, Balances, ZeroBalancePolicy};
use rust_decimal::Decimal;
use tracing::debug;

/// Map spot balances to `spot_<ASSET>` = free; an entry is zero when both
/// free and locked are zero
pub fn convert_spot_balances(
    balances: Vec<MexcBalance>,
    policy: ZeroBalancePolicy,
) -> Result<Balances, ExchangeError> {
    let mut result = Balances::new();

    for balance in balances {
        if balance.asset.is_empty() {
            continue;
        }

        let free = balance.free.decimal_for("free", &balance.asset)?;
        let locked = balance.locked.decimal_for("locked", &balance.asset)?;

        if !policy.keeps(free.is_zero() && locked.is_zero()) {
            debug!(asset = %balance.asset, "Skipping zero balance");
            continue;
        }

        result.insert(AccountKind::Spot.balance_key(&balance.asset), free);
    }

    Ok(result)
}

pub fn convert_contract_asset(
    asset: &MexcContractAsset,
    requested_currency: &str,
) -> Result<(String, Decimal), ExchangeError> {
    let currency = if asset.currency.is_empty() {
        requested_currency
    } else {
        asset.currency.as_str()
    };

    let available = asset
        .available_balance
        .decimal_for("availableBalance", currency)?;
    asset.equity.decimal_for("equity", currency)?;

    Ok((AccountKind::Futures.balance_key(currency), available))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchanges::mexc::types::MexcAccountInfo;
    use rust_decimal_macros::dec;

    fn account(json: &str) -> Vec<MexcBalance> {
        serde_json::from_str::<MexcAccountInfo>(json).unwrap().balances
    }

    #[test]
    fn test_free_is_reported_and_zero_rows_skipped() {
        let rows = account(
            r#"{"balances":[
                {"asset":"BTC","free":"0.25","locked":"0.05"},
                {"asset":"ETH","free":"0","locked":"1"},
                {"asset":"DOGE","free":"0","locked":"0"}
            ]}"#,
        );

        let balances = convert_spot_balances(rows, ZeroBalancePolicy::SkipZero).unwrap();
        assert_eq!(balances.get("spot_BTC"), Some(&dec!(0.25)));
        // locked funds keep the entry even with nothing free
        assert_eq!(balances.get("spot_ETH"), Some(&Decimal::ZERO));
        assert!(!balances.contains_key("spot_DOGE"));
    }

    #[test]
    fn test_keep_all() {
        let rows = account(r#"{"balances":[{"asset":"DOGE","free":"0","locked":"0"}]}"#);
        let balances = convert_spot_balances(rows, ZeroBalancePolicy::KeepAll).unwrap();
        assert_eq!(balances.len(), 1);
    }

    #[test]
    fn test_bad_locked_value_names_asset() {
        let rows = account(r#"{"balances":[{"asset":"SOL","free":"1","locked":"abc"}]}"#);
        let err = convert_spot_balances(rows, ZeroBalancePolicy::SkipZero).unwrap_err();
        assert!(err.to_string().contains("SOL"));
        assert!(err.to_string().contains("locked"));
    }

    #[test]
    fn test_contract_asset_accepts_numbers() {
        let asset: MexcContractAsset = serde_json::from_str(
            r#"{"currency":"USDT","availableBalance":12.5,"equity":13}"#,
        )
        .unwrap();
        let (key, amount) = convert_contract_asset(&asset, "USDT").unwrap();
        assert_eq!(key, "futures_USDT");
        assert_eq!(amount, dec!(12.5));
    }
}
