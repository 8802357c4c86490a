use crate::core::errors::ExchangeError;
use crate::core::traits::OrderPlacer;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Order placement is not wired for MEXC
#[derive(Debug, Default)]
pub struct Trading;

impl Trading {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OrderPlacer for Trading {
    async fn execute_order(
        &self,
        order_type: &str,
        symbol: &str,
        _quantity: Decimal,
        _price: Decimal,
    ) -> Result<String, ExchangeError> {
        Err(ExchangeError::NotImplemented(format!(
            "MEXC order placement ({} {})",
            order_type, symbol
        )))
    }
}
