use crate::core::errors::ExchangeError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Typed errors for the types subsystem
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("Invalid key version: {0} (expected 1, 2 or 3)")]
    InvalidKeyVersion(String),
    #[error("Invalid order type: {0}")]
    InvalidOrderType(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
}

/// Normalized balances keyed by `<account>_<CURRENCY>`
pub type Balances = BTreeMap<String, Decimal>;

/// KuCoin API key version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyVersion {
    #[serde(rename = "1")]
    V1,
    #[default]
    #[serde(rename = "2")]
    V2,
    #[serde(rename = "3")]
    V3,
}

impl KeyVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1",
            Self::V2 => "2",
            Self::V3 => "3",
        }
    }
}

impl FromStr for KeyVersion {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "2" => Ok(Self::V2),
            "1" => Ok(Self::V1),
            "3" => Ok(Self::V3),
            other => Err(TypesError::InvalidKeyVersion(other.to_string())),
        }
    }
}

impl fmt::Display for KeyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account family a balance belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Spot,
    Margin,
    Futures,
    Contract,
}

impl AccountKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::Margin => "margin",
            Self::Futures => "futures",
            Self::Contract => "contract",
        }
    }

    /// Build the collision-free balance key, e.g. `spot_BTC`
    pub fn balance_key(self, currency: &str) -> String {
        format!("{}_{}", self.prefix(), currency)
    }
}

/// Whether zero entries of account listings are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroBalancePolicy {
    KeepAll,
    SkipZero,
}

impl ZeroBalancePolicy {
    pub fn keeps(self, is_zero: bool) -> bool {
        match self {
            Self::KeepAll => true,
            Self::SkipZero => !is_zero,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Market,
    Limit,
}

impl OrderKind {
    /// Inspect a free-form order type tag such as `"MARKET"` or `"limit_gtc"`
    pub fn from_tag(tag: &str) -> Result<Self, TypesError> {
        let lower = tag.to_ascii_lowercase();
        if lower.contains("market") {
            Ok(Self::Market)
        } else if lower.contains("limit") {
            Ok(Self::Limit)
        } else {
            Err(TypesError::InvalidOrderType(tag.to_string()))
        }
    }
}

/// Validated order derived from the uniform `execute_order` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub kind: OrderKind,
    /// Always positive
    pub quantity: Decimal,
    /// Present for limit orders only
    pub price: Option<Decimal>,
}

impl OrderRequest {
    /// Map a signed quantity (negative = sell/short) onto side and size
    pub fn from_signed(
        order_type: &str,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<Self, TypesError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(TypesError::InvalidSymbol("symbol cannot be empty".to_string()));
        }

        let kind = OrderKind::from_tag(order_type)?;

        if quantity.is_zero() {
            return Err(TypesError::InvalidQuantity(
                "quantity cannot be zero".to_string(),
            ));
        }

        let side = if quantity.is_sign_negative() {
            OrderSide::Sell
        } else {
            OrderSide::Buy
        };

        let price = match kind {
            OrderKind::Market => None,
            OrderKind::Limit => {
                if price <= Decimal::ZERO {
                    return Err(TypesError::InvalidPrice(format!(
                        "limit orders need a positive price, got {}",
                        price
                    )));
                }
                Some(price.normalize())
            }
        };

        Ok(Self {
            symbol: symbol.to_string(),
            side,
            kind,
            quantity: quantity.abs().normalize(),
            price,
        })
    }
}

/// Unique client-side order id, e.g. `exv-1700000000000-3f2a9c1b`
pub fn client_order_id() -> String {
    format!(
        "exv-{}-{:08x}",
        chrono::Utc::now().timestamp_millis(),
        rand::random::<u32>()
    )
}

/// Numeric field that exchanges send either as a JSON string or a JSON number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Text(String),
    Number(serde_json::Number),
}

impl NumericValue {
    /// Parse into a decimal; empty or malformed values are errors, never zero
    pub fn to_decimal(&self) -> Result<Decimal, String> {
        let raw = match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
        };

        if raw.is_empty() {
            return Err("empty numeric value".to_string());
        }

        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|e| format!("'{}' is not a decimal: {}", raw, e))
    }

    /// Parse `field` of the `currency` entry, naming both on failure
    pub fn decimal_for(&self, field: &str, currency: &str) -> Result<Decimal, ExchangeError> {
        self.to_decimal()
            .map(|d| d.normalize())
            .map_err(|e| {
                ExchangeError::DeserializationError(format!(
                    "invalid {} for {}: {}",
                    field, currency, e
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_key_version_parsing() {
        assert_eq!("".parse::<KeyVersion>().unwrap(), KeyVersion::V2);
        assert_eq!("1".parse::<KeyVersion>().unwrap(), KeyVersion::V1);
        assert_eq!(" 3 ".parse::<KeyVersion>().unwrap(), KeyVersion::V3);
        assert!("4".parse::<KeyVersion>().is_err());
    }

    #[test]
    fn test_balance_keys_are_prefixed() {
        assert_eq!(AccountKind::Spot.balance_key("BTC"), "spot_BTC");
        assert_eq!(AccountKind::Futures.balance_key("BTC"), "futures_BTC");
        assert_eq!(AccountKind::Contract.balance_key("USDT"), "contract_USDT");
    }

    #[test]
    fn test_negative_quantity_is_a_sell() {
        let order = OrderRequest::from_signed("MARKET", "BTC-USDT", dec!(-0.5), dec!(0)).unwrap();
        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(order.kind, OrderKind::Market);
        assert_eq!(order.quantity, dec!(0.5));
        assert_eq!(order.price, None);
    }

    #[test]
    fn test_limit_order_requires_price() {
        let err = OrderRequest::from_signed("limit", "BTC-USDT", dec!(1), dec!(0)).unwrap_err();
        assert!(matches!(err, TypesError::InvalidPrice(_)));

        let order = OrderRequest::from_signed("Limit", "BTC-USDT", dec!(1), dec!(42000.50)).unwrap();
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.price, Some(dec!(42000.5)));
    }

    #[test]
    fn test_rejects_zero_quantity_and_unknown_tag() {
        assert!(OrderRequest::from_signed("market", "BTC-USDT", dec!(0), dec!(0)).is_err());
        assert!(OrderRequest::from_signed("stop", "BTC-USDT", dec!(1), dec!(1)).is_err());
    }

    #[test]
    fn test_numeric_value_accepts_strings_and_numbers() {
        let text: NumericValue = serde_json::from_str("\"0.00050000\"").unwrap();
        assert_eq!(text.to_decimal().unwrap(), dec!(0.0005));

        let number: NumericValue = serde_json::from_str("12.5").unwrap();
        assert_eq!(number.to_decimal().unwrap(), dec!(12.5));

        let empty = NumericValue::Text(String::new());
        assert!(empty.to_decimal().is_err());

        let junk = NumericValue::Text("abc".to_string());
        assert!(junk.to_decimal().is_err());
    }

    #[test]
    fn test_decimal_for_names_field_and_currency() {
        let err = NumericValue::Text(String::new())
            .decimal_for("available", "BTC")
            .unwrap_err();
        assert!(matches!(err, ExchangeError::DeserializationError(_)));
        assert!(err.to_string().contains("available"));
        assert!(err.to_string().contains("BTC"));

        let exp: NumericValue = serde_json::from_str("\"1e-4\"").unwrap();
        assert_eq!(exp.decimal_for("free", "ETH").unwrap(), dec!(0.0001));
    }

    #[test]
    fn test_client_order_ids_are_unique() {
        assert_ne!(client_order_id(), client_order_id());
        assert!(client_order_id().starts_with("exv-"));
    }
}
