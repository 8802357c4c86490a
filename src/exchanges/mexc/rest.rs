use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::mexc::types::{MexcAccountInfo, MexcContractAsset, MexcContractResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

/// MEXC REST API client over the spot and contract hosts
#[derive(Debug, Clone)]
pub struct MexcRest<R: RestClient> {
    spot: R,
    contract: R,
}

impl<R: RestClient> MexcRest<R> {
    pub fn new(spot: R, contract: R) -> Self {
        Self { spot, contract }
    }

    /// Contract responses report failures inside a 200 envelope
    fn handle_contract_response<T>(&self, response_value: Value) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let response: MexcContractResponse =
            serde_json::from_value(response_value).map_err(|e| {
                ExchangeError::DeserializationError(format!(
                    "Failed to parse MEXC contract envelope: {}",
                    e
                ))
            })?;

        if !response.success || response.code != 0 {
            return Err(ExchangeError::api(
                "mexc",
                response.code,
                response.message.unwrap_or_default(),
            ));
        }

        serde_json::from_value(response.data).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to parse MEXC payload: {}", e))
        })
    }

    #[instrument(skip(self), fields(exchange = "mexc"))]
    pub async fn ping_spot(&self) -> Result<(), ExchangeError> {
        self.spot.get("/api/v3/ping", &[], false).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(exchange = "mexc"))]
    pub async fn ping_contract(&self) -> Result<u64, ExchangeError> {
        let value = self.contract.get("/api/v1/contract/ping", &[], false).await?;
        self.handle_contract_response(value)
    }

    #[instrument(skip(self), fields(exchange = "mexc"))]
    pub async fn get_account(&self) -> Result<MexcAccountInfo, ExchangeError> {
        self.spot.get_json("/api/v3/account", &[], true).await
    }

    #[instrument(skip(self), fields(exchange = "mexc", currency = %currency))]
    pub async fn get_contract_asset(
        &self,
        currency: &str,
    ) -> Result<MexcContractAsset, ExchangeError> {
        let value = self
            .contract
            .get(
                "/api/v1/private/account/asset",
                &[("currency", currency)],
                true,
            )
            .await?;
        self.handle_contract_response(value)
    }
}
