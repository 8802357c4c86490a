use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::Connectivity;
use crate::exchanges::kucoin::rest::KucoinRest;
use async_trait::async_trait;
use tracing::debug;

/// KuCoin reachability checks
#[derive(Debug)]
pub struct Connection<R: RestClient> {
    rest: KucoinRest<R>,
}

impl<R: RestClient + Clone> Connection<R> {
    pub fn new(rest: &KucoinRest<R>) -> Self {
        Self { rest: rest.clone() }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> Connectivity for Connection<R> {
    async fn test_connection(&self) -> Result<(), ExchangeError> {
        let spot_time = self.rest.ping_spot().await?;
        let futures_time = self.rest.ping_futures().await?;
        debug!(spot_time, futures_time, "KuCoin spot and futures reachable");
        Ok(())
    }
}
