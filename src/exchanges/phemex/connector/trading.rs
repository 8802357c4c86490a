use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::OrderPlacer;
use crate::core::types::OrderRequest;
use crate::exchanges::phemex::{conversions, rest::PhemexRest};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

/// Hedged USDT-M contract orders
#[derive(Debug)]
pub struct Trading<R: RestClient> {
    rest: PhemexRest<R>,
}

impl<R: RestClient + Clone> Trading<R> {
    pub fn new(rest: &PhemexRest<R>) -> Self {
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
            side = %request.side,
            pos_side = %request.pos_side,
            cl_ord_id = %request.cl_ord_id,
            order_id = %response.order_id,
            "Phemex order accepted"
        );

        Ok(response.order_id)
    }
}
