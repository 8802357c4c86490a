use super::types::{PhemexAccount, PhemexOrderRequest};
use crate::core::errors::ExchangeError;
use crate::core::types::{
    client_order_id, AccountKind, Balances, OrderKind, OrderRequest, OrderSide, ZeroBalancePolicy,
};
use rust_decimal::Decimal;
use tracing::debug;

/// `Ev` integer amounts carry four implied decimals
pub const EV_DIVISOR: u32 = 10_000;

/// Convert an `Ev` amount to its real value
pub fn from_ev(ev: Decimal) -> Decimal {
    (ev / Decimal::from(EV_DIVISOR)).normalize()
}

pub fn convert_accounts(
    accounts: Vec<PhemexAccount>,
    policy: ZeroBalancePolicy,
) -> Result<Balances, ExchangeError> {
    let mut balances = Balances::new();

    for account in accounts {
        if account.currency.is_empty() {
            continue;
        }

        let available_ev = account
            .available_balance_ev
            .decimal_for("availableBalanceEv", &account.currency)?;
        let available = from_ev(available_ev);

        if !policy.keeps(available.is_zero()) {
            debug!(currency = %account.currency, "Skipping zero balance");
            continue;
        }

        balances.insert(AccountKind::Contract.balance_key(&account.currency), available);
    }

    Ok(balances)
}

pub fn convert_order_side(side: OrderSide) -> (&'static str, &'static str) {
    match side {
        OrderSide::Buy => ("Buy", "Long"),
        OrderSide::Sell => ("Sell", "Short"),
    }
}

pub fn convert_order_request(order: &OrderRequest) -> PhemexOrderRequest {
    let (side, pos_side) = convert_order_side(order.side);
    let (ord_type, time_in_force) = match order.kind {
        OrderKind::Market => ("Market", "ImmediateOrCancel"),
        OrderKind::Limit => ("Limit", "GoodTillCancel"),
    };

    PhemexOrderRequest {
        symbol: order.symbol.clone(),
        side: side.to_string(),
        pos_side: pos_side.to_string(),
        ord_type: ord_type.to_string(),
        order_qty_rq: order.quantity.to_string(),
        price_rp: order.price.map(|p| p.to_string()),
        reduce_only: false,
        cl_ord_id: client_order_id(),
        time_in_force: time_in_force.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchanges::phemex::types::PhemexAccountPositions;
    use rust_decimal_macros::dec;

    fn accounts(json: &str) -> Vec<PhemexAccount> {
        serde_json::from_str::<PhemexAccountPositions>(json)
            .unwrap()
            .account
            .into_vec()
    }

    #[test]
    fn test_ev_normalization() {
        assert_eq!(from_ev(dec!(123450000)), dec!(12345));
        assert_eq!(from_ev(dec!(1)), dec!(0.0001));
        assert_eq!(from_ev(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(from_ev(dec!(12.5)), dec!(0.00125));
    }

    #[test]
    fn test_account_object_or_array() {
        let single = accounts(r#"{"account":{"currency":"USDT","availableBalanceEv":123450000}}"#);
        let list = accounts(
            r#"{"account":[{"currency":"USDT","availableBalanceEv":"123450000"},
                           {"currency":"BTC","availableBalanceEv":0}]}"#,
        );
        assert_eq!(single.len(), 1);
        assert_eq!(list.len(), 2);

        let balances = convert_accounts(list, ZeroBalancePolicy::KeepAll).unwrap();
        assert_eq!(balances.get("contract_USDT"), Some(&dec!(12345)));
        assert_eq!(balances.get("contract_BTC"), Some(&Decimal::ZERO));
    }

    #[test]
    fn test_skip_zero_policy() {
        let rows = accounts(r#"{"account":[{"currency":"BTC","availableBalanceEv":0}]}"#);
        assert!(convert_accounts(rows, ZeroBalancePolicy::SkipZero)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_missing_amount_is_an_error() {
        let rows = accounts(r#"{"account":[{"currency":"USDT","availableBalanceEv":""}]}"#);
        let err = convert_accounts(rows, ZeroBalancePolicy::KeepAll).unwrap_err();
        assert!(matches!(err, ExchangeError::DeserializationError(_)));
    }

    #[test]
    fn test_short_market_order_shape() {
        let order = OrderRequest::from_signed("MARKET", "BTCUSDT", dec!(-0.5), Decimal::ZERO).unwrap();
        let request = convert_order_request(&order);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["side"], "Sell");
        assert_eq!(json["posSide"], "Short");
        assert_eq!(json["ordType"], "Market");
        assert_eq!(json["orderQtyRq"], "0.5");
        assert_eq!(json["reduceOnly"], false);
        assert_eq!(json["timeInForce"], "ImmediateOrCancel");
        assert!(json.get("priceRp").is_none());
        assert!(json["clOrdID"].as_str().unwrap().starts_with("exv-"));
    }
}
