use crate::core::types::NumericValue;
use serde::Deserialize;
use serde_json::Value;

/// `GET /api/v3/account`
#[derive(Debug, Clone, Deserialize)]
pub struct MexcAccountInfo {
    #[serde(default)]
    pub balances: Vec<MexcBalance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MexcBalance {
    pub asset: String,
    pub free: NumericValue,
    pub locked: NumericValue,
}

/// Envelope of the contract API
#[derive(Debug, Deserialize)]
pub struct MexcContractResponse {
    #[serde(default)]
    pub success: bool,
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// `GET /api/v1/private/account/asset` payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MexcContractAsset {
    pub currency: String,
    pub available_balance: NumericValue,
    pub equity: NumericValue,
}
