use super::types::{KucoinAccount, KucoinFuturesOverview, KucoinOrderRequest};
use crate::core::errors::ExchangeError;
use crate::core::types::{
    client_order_id, AccountKind, Balances, OrderKind, OrderRequest, OrderSide, ZeroBalancePolicy,
};
use rust_decimal::Decimal;
use tracing::debug;

/// Fold `/api/v1/accounts` rows into `spot_*` / `margin_*` balances.
///
/// Every non-margin account type (main, trade, trade_hf, ...) is summed into
/// the spot bucket; the zero policy applies after summing.
pub fn convert_accounts(
    accounts: Vec<KucoinAccount>,
    policy: ZeroBalancePolicy,
) -> Result<Balances, ExchangeError> {
    let mut totals = Balances::new();

    for account in accounts {
        if account.currency.is_empty() {
            continue;
        }

        let available = account.available.decimal_for("available", &account.currency)?;
        account.balance.decimal_for("balance", &account.currency)?;
        account.holds.decimal_for("holds", &account.currency)?;

        let kind = match account.account_type.as_str() {
            "margin" | "isolated" => AccountKind::Margin,
            _ => AccountKind::Spot,
        };

        *totals
            .entry(kind.balance_key(&account.currency))
            .or_insert(Decimal::ZERO) += available;
    }

    Ok(totals
        .into_iter()
        .filter(|(key, amount)| {
            let keep = policy.keeps(amount.is_zero());
            if !keep {
                debug!(balance = %key, "Skipping zero balance");
            }
            keep
        })
        .map(|(key, amount)| (key, amount.normalize()))
        .collect())
}

/// Futures overview is always reported, zero or not
pub fn convert_futures_overview(
    overview: &KucoinFuturesOverview,
    requested_currency: &str,
) -> Result<(String, Decimal), ExchangeError> {
    let currency = if overview.currency.is_empty() {
        requested_currency
    } else {
        overview.currency.as_str()
    };

    let available = overview
        .available_balance
        .decimal_for("availableBalance", currency)?;

    Ok((AccountKind::Futures.balance_key(currency), available))
}

pub fn convert_order_side(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => "buy",
        OrderSide::Sell => "sell",
    }
}

pub fn convert_order_kind(kind: OrderKind) -> &'static str {
    match kind {
        OrderKind::Market => "market",
        OrderKind::Limit => "limit",
    }
}

pub fn convert_order_request(order: &OrderRequest) -> KucoinOrderRequest {
    KucoinOrderRequest {
        client_oid: client_order_id(),
        symbol: order.symbol.clone(),
        side: convert_order_side(order.side).to_string(),
        order_type: convert_order_kind(order.kind).to_string(),
        size: order.quantity.to_string(),
        price: order.price.map(|p| p.to_string()),
    }
}
