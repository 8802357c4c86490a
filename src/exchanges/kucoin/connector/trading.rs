use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::OrderPlacer;
use crate::core::types::OrderRequest;
use crate::exchanges::kucoin::{conversions, rest::KucoinRest};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

/// KuCoin spot trading implementation
#[derive(Debug)]
pub struct Trading<R: RestClient> {
    rest: KucoinRest<R>,
}

impl<R: RestClient + Clone> Trading<R> {
    pub fn new(rest: &KucoinRest<R>) -> Self {
        Self { rest: rest.clone() }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> OrderPlacer for Trading<R> {
    async fn execute_order(
        &self,
        order_type: &str,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<String, ExchangeError> {
        let order = OrderRequest::from_signed(order_type, symbol, quantity, price)?;
        let request = conversions::convert_order_request(&order);

        let response = self.rest.place_order(&request).await?;
        info!(
            symbol = %order.symbol,
            side = ?order.side,
            client_oid = %request.client_oid,
            order_id = %response.order_id,
            "KuCoin order accepted"
        );

        Ok(response.order_id)
    }
}
