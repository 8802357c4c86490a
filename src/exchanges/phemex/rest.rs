use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::phemex::types::{
    PhemexAccountPositions, PhemexOrderRequest, PhemexOrderResponse, PhemexResponse, SUCCESS_CODE,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

/// Phemex REST API client
#[derive(Debug, Clone)]
pub struct PhemexRest<R: RestClient> {
    client: R,
}

impl<R: RestClient> PhemexRest<R> {
    pub fn new(client: R) -> Self {
        Self { client }
    }

    fn handle_response<T>(&self, response_value: Value) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let response: PhemexResponse = serde_json::from_value(response_value).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to parse Phemex envelope: {}", e))
        })?;

        if response.code != SUCCESS_CODE {
            return Err(ExchangeError::api(
                "phemex",
                response.code,
                response.msg.unwrap_or_default(),
            ));
        }

        serde_json::from_value(response.data).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to parse Phemex payload: {}", e))
        })
    }

    #[instrument(skip(self), fields(exchange = "phemex"))]
    pub async fn get_server_time(&self) -> Result<Value, ExchangeError> {
        let value = self.client.get("/public/time", &[], false).await?;
        self.handle_response(value)
    }

    #[instrument(skip(self), fields(exchange = "phemex", currency = %currency))]
    pub async fn get_account_positions(
        &self,
        currency: &str,
    ) -> Result<PhemexAccountPositions, ExchangeError> {
        let value = self
            .client
            .get(
                "/accounts/accountPositions",
                &[("currency", currency)],
                true,
            )
            .await?;
        self.handle_response(value)
    }

    #[instrument(skip(self, order), fields(exchange = "phemex", symbol = %order.symbol))]
    pub async fn place_order(
        &self,
        order: &PhemexOrderRequest,
    ) -> Result<PhemexOrderResponse, ExchangeError> {
        let body = serde_json::to_value(order).map_err(|e| {
            ExchangeError::SerializationError(format!("Failed to serialize order: {}", e))
        })?;

        let value = self.client.post("/g-orders", &body, true).await?;
        self.handle_response(value)
    }
}
