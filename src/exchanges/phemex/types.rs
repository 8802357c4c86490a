use crate::core::types::NumericValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SUCCESS_CODE: i64 = 0;

/// Envelope wrapping every Phemex REST response
#[derive(Debug, Deserialize)]
pub struct PhemexResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// Field that may hold a single object or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// `GET /accounts/accountPositions` payload
#[derive(Debug, Clone, Deserialize)]
pub struct PhemexAccountPositions {
    pub account: OneOrMany<PhemexAccount>,
}

/// Contract account; `Ev` amounts are scaled by 10^4
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhemexAccount {
    pub currency: String,
    pub available_balance_ev: NumericValue,
    #[serde(default)]
    pub account_balance_ev: Option<NumericValue>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhemexOrderRequest {
    pub symbol: String,
    pub side: String,
    pub pos_side: String,
    pub ord_type: String,
    pub order_qty_rq: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_rp: Option<String>,
    pub reduce_only: bool,
    #[serde(rename = "clOrdID")]
    pub cl_ord_id: String,
    pub time_in_force: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhemexOrderResponse {
    #[serde(rename = "orderID")]
    pub order_id: String,
}
