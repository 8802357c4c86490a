use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::Connectivity;
use crate::exchanges::mexc::rest::MexcRest;
use async_trait::async_trait;
use tracing::debug;

#[derive(Debug)]
pub struct Connection<R: RestClient> {
    rest: MexcRest<R>,
}

impl<R: RestClient + Clone> Connection<R> {
    pub fn new(rest: &MexcRest<R>) -> Self {
        Self { rest: rest.clone() }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> Connectivity for Connection<R> {
    async fn test_connection(&self) -> Result<(), ExchangeError> {
        self.rest.ping_spot().await?;
        let contract_time = self.rest.ping_contract().await?;
        debug!(contract_time, "MEXC spot and contract reachable");
        Ok(())
    }
}
