use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::Connectivity;
use crate::exchanges::phemex::rest::PhemexRest;
use async_trait::async_trait;

#[derive(Debug)]
pub struct Connection<R: RestClient> {
    rest: PhemexRest<R>,
}

impl<R: RestClient + Clone> Connection<R> {
    pub fn new(rest: &PhemexRest<R>) -> Self {
        Self { rest: rest.clone() }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> Connectivity for Connection<R> {
    async fn test_connection(&self) -> Result<(), ExchangeError> {
        self.rest.get_server_time().await.map(|_| ())
    }
}
