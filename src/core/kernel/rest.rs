use crate::core::config::DEFAULT_TIMEOUT_SECONDS;
use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::Signer;
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

/// REST client trait for making HTTP requests
///
/// This trait provides a unified interface for HTTP operations across different exchanges.
/// Each call is a single attempt: failures are returned to the caller, never retried.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Make a GET request
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path
    /// * `query_params` - Query parameters, sent in the given order
    /// * `authenticated` - Whether to sign the request
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError>;

    /// Make a GET request with strongly-typed response
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError>;

    /// Make a POST request with a JSON body
    async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<Value, ExchangeError>;

    /// Make a POST request with strongly-typed response
    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<T, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
    /// Cancels in-flight requests when triggered
    pub cancellation: Option<CancellationToken>,
}

impl RestClientConfig {
    /// Create a new configuration
    ///
    /// # Arguments
    /// * `base_url` - Base URL for the API
    /// * `exchange_name` - Name of the exchange
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            exchange_name,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: concat!("exvault/", env!("CARGO_PKG_VERSION")).to_string(),
            cancellation: None,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Abort requests once `token` is cancelled
    pub fn with_cancellation(mut self, token: Option<CancellationToken>) -> Self {
        self.cancellation = token;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl RestClientBuilder {
    /// Create a new builder with the given configuration
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    /// Set the signer for authenticated requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build the REST client
    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer: self.signer,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    /// Get the current timestamp in milliseconds
    fn get_timestamp() -> Result<u64, ExchangeError> {
        u64::try_from(chrono::Utc::now().timestamp_millis()).map_err(|e| {
            ExchangeError::ConfigurationError(format!("System clock before Unix epoch: {}", e))
        })
    }

    /// Create a URL-encoded query string, keeping parameter order
    pub fn create_query_string<K: AsRef<str>, V: AsRef<str>>(params: &[(K, V)]) -> String {
        params
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    urlencoding::encode(k.as_ref()),
                    urlencoding::encode(v.as_ref())
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    fn build_url(&self, endpoint: &str, query_string: &str) -> String {
        if query_string.is_empty() {
            format!("{}{}", self.config.base_url, endpoint)
        } else {
            format!("{}{}?{}", self.config.base_url, endpoint, query_string)
        }
    }

    /// Read the whole body, then map status and payload
    #[instrument(skip(self, response), fields(exchange = %self.config.exchange_name, status = %response.status()))]
    async fn handle_response(&self, response: Response) -> Result<Value, ExchangeError> {
        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        trace!("Response body: {}", response_text);

        if status.is_success() {
            serde_json::from_str(&response_text).map_err(|e| {
                ExchangeError::DeserializationError(format!("Failed to parse JSON response: {}", e))
            })
        } else {
            let (code, message) = extract_error(&response_text);
            debug!(exchange_code = ?code, "Request rejected");
            Err(ExchangeError::api(
                &self.config.exchange_name,
                code.unwrap_or_else(|| i64::from(status.as_u16())),
                message,
            ))
        }
    }

    #[instrument(skip(self, body), fields(exchange = %self.config.exchange_name, method = %method, endpoint = %endpoint))]
    async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: &[u8],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        let mut query_string = Self::create_query_string(query_params);
        let mut headers = Vec::new();

        if authenticated {
            let signer = self
                .signer
                .as_ref()
                .ok_or(ExchangeError::AuthenticationRequired)?;
            let timestamp = Self::get_timestamp()?;
            let (signed_headers, extra_params) = signer.sign_request(
                method.as_str(),
                endpoint,
                &query_string,
                body,
                timestamp,
            )?;

            headers.extend(signed_headers);

            if !extra_params.is_empty() {
                let extra = Self::create_query_string(&extra_params);
                if query_string.is_empty() {
                    query_string = extra;
                } else {
                    query_string = format!("{}&{}", query_string, extra);
                }
            }
        }

        let url = self.build_url(endpoint, &query_string);
        let context = format!("{} {} {}", self.config.exchange_name, method, endpoint);
        let mut request = self.client.request(method, &url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        if !body.is_empty() {
            request = request
                .header("Content-Type", "application/json")
                .body(body.to_vec());
        }

        debug!(authenticated, "Dispatching request");

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| ExchangeError::NetworkError(format!("{}: {}", context, e)))?;
            self.handle_response(response).await
        };

        match &self.config.cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => Err(ExchangeError::Cancelled(context.clone())),
                    result = exchange => result,
                }
            }
            None => exchange.await,
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ExchangeError> {
    serde_json::from_value(value).map_err(|e| {
        ExchangeError::DeserializationError(format!("Failed to deserialize JSON: {}", e))
    })
}

/// Pull the exchange's `code` and `msg`/`message` out of an error body.
///
/// The code may be a JSON number or a numeric string. Without a readable
/// message the raw text is returned.
fn extract_error(body: &str) -> (Option<i64>, String) {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return (None, body.to_string());
    };

    let code = match value.get("code") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    let message = value
        .get("msg")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .map_or_else(|| body.to_string(), str::to_string);

    (code, message)
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, query_params), fields(exchange = %self.config.exchange_name, endpoint = %endpoint, param_count = query_params.len()))]
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        self.make_request(Method::GET, endpoint, query_params, &[], authenticated)
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        self.get(endpoint, query_params, authenticated)
            .await
            .and_then(decode)
    }

    #[instrument(skip(self, body), fields(exchange = %self.config.exchange_name, endpoint = %endpoint))]
    async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        let body_bytes = serde_json::to_vec(body).map_err(|e| {
            ExchangeError::SerializationError(format!("Failed to serialize request body: {}", e))
        })?;

        self.make_request(Method::POST, endpoint, &[], &body_bytes, authenticated)
            .await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        self.post(endpoint, body, authenticated)
            .await
            .and_then(decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_keeps_order_and_encodes() {
        let qs = ReqwestRest::create_query_string(&[("currency", "USDT"), ("note", "a b&c")]);
        assert_eq!(qs, "currency=USDT&note=a%20b%26c");

        let empty: [(&str, &str); 0] = [];
        assert_eq!(ReqwestRest::create_query_string(&empty), "");
    }

    #[test]
    fn test_error_extraction_keeps_exchange_code() {
        assert_eq!(
            extract_error(r#"{"code":"400005","msg":"Invalid KC-API-SIGN"}"#),
            (Some(400_005), "Invalid KC-API-SIGN".to_string())
        );
        assert_eq!(
            extract_error(r#"{"code":700002,"message":"Signature for this request is not valid."}"#),
            (Some(700_002), "Signature for this request is not valid.".to_string())
        );
        assert_eq!(
            extract_error(r#"{"msg":"rate limited"}"#),
            (None, "rate limited".to_string())
        );
        assert_eq!(extract_error("Bad Gateway"), (None, "Bad Gateway".to_string()));
    }

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = RestClientConfig::new("https://api.kucoin.com/".to_string(), "kucoin".to_string());
        assert_eq!(config.base_url, "https://api.kucoin.com");
        assert_eq!(config.timeout_seconds, 15);
    }
}
