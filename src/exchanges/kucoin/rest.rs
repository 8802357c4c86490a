use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::kucoin::types::{
    KucoinAccount, KucoinFuturesOverview, KucoinOrderRequest, KucoinOrderResponse, KucoinResponse,
    SUCCESS_CODE,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

/// KuCoin REST API client over the spot and futures hosts
#[derive(Debug, Clone)]
pub struct KucoinRest<R: RestClient> {
    spot: R,
    futures: R,
}

impl<R: RestClient> KucoinRest<R> {
    pub fn new(spot: R, futures: R) -> Self {
        Self { spot, futures }
    }

    /// Check the envelope first, then decode the payload
    fn handle_response<T>(&self, response_value: Value) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned,
    {
        let response: KucoinResponse = serde_json::from_value(response_value).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to parse KuCoin envelope: {}", e))
        })?;

        if response.code != SUCCESS_CODE {
            return Err(ExchangeError::api(
                "kucoin",
                response.code.parse().unwrap_or(-1),
                response.msg.unwrap_or_default(),
            ));
        }

        serde_json::from_value(response.data).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to parse KuCoin payload: {}", e))
        })
    }

    #[instrument(skip(self), fields(exchange = "kucoin"))]
    pub async fn ping_spot(&self) -> Result<u64, ExchangeError> {
        let value = self.spot.get("/api/v1/timestamp", &[], false).await?;
        self.handle_response(value)
    }

    #[instrument(skip(self), fields(exchange = "kucoin"))]
    pub async fn ping_futures(&self) -> Result<u64, ExchangeError> {
        let value = self.futures.get("/api/v1/timestamp", &[], false).await?;
        self.handle_response(value)
    }

    #[instrument(skip(self), fields(exchange = "kucoin"))]
    pub async fn get_accounts(&self) -> Result<Vec<KucoinAccount>, ExchangeError> {
        let value = self.spot.get("/api/v1/accounts", &[], true).await?;
        self.handle_response(value)
    }

    #[instrument(skip(self), fields(exchange = "kucoin", currency = %currency))]
    pub async fn get_futures_overview(
        &self,
        currency: &str,
    ) -> Result<KucoinFuturesOverview, ExchangeError> {
        let value = self
            .futures
            .get("/api/v1/account-overview", &[("currency", currency)], true)
            .await?;
        self.handle_response(value)
    }

    #[instrument(skip(self, order), fields(exchange = "kucoin", symbol = %order.symbol))]
    pub async fn place_order(
        &self,
        order: &KucoinOrderRequest,
    ) -> Result<KucoinOrderResponse, ExchangeError> {
        let body = serde_json::to_value(order).map_err(|e| {
            ExchangeError::SerializationError(format!("Failed to serialize order: {}", e))
        })?;

        let value = self.spot.post("/api/v1/orders", &body, true).await?;
        self.handle_response(value)
    }
}
