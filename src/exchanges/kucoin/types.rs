use crate::core::types::NumericValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SUCCESS_CODE: &str = "200000";

/// Envelope wrapping every KuCoin REST response
#[derive(Debug, Deserialize)]
pub struct KucoinResponse {
    pub code: String,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// One row of `GET /api/v1/accounts`
#[derive(Debug, Clone, Deserialize)]
pub struct KucoinAccount {
    pub currency: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub balance: NumericValue,
    pub available: NumericValue,
    pub holds: NumericValue,
}

/// `GET /api/v1/account-overview` on the futures API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KucoinFuturesOverview {
    pub currency: String,
    pub account_equity: NumericValue,
    pub available_balance: NumericValue,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KucoinOrderRequest {
    pub client_oid: String,
    pub symbol: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KucoinOrderResponse {
    pub order_id: String,
}
