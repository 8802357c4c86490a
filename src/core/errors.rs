use crate::core::types::TypesError;
use crate::vault::VaultError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Credential vault error: {0}")]
    VaultError(#[from] VaultError),

    #[error("Authentication required but no credentials were configured")]
    AuthenticationRequired,

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error from {exchange}: {code} - {message}")]
    ApiError {
        exchange: String,
        code: i64,
        message: String,
    },

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Request cancelled: {0}")]
    Cancelled(String),
}

/// Coarse classification of an [`ExchangeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Crypto,
    Signing,
    Network,
    ExchangeApi,
    Decode,
    InvalidRequest,
    NotImplemented,
    Cancelled,
}

impl ExchangeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigError(_) | Self::ConfigurationError(_) | Self::AuthenticationRequired => {
                ErrorKind::Configuration
            }
            Self::VaultError(e) if e.is_key_error() => ErrorKind::Configuration,
            Self::VaultError(_) => ErrorKind::Crypto,
            Self::AuthError(_) => ErrorKind::Signing,
            Self::NetworkError(_) => ErrorKind::Network,
            Self::ApiError { .. } => ErrorKind::ExchangeApi,
            Self::DeserializationError(_) => ErrorKind::Decode,
            Self::SerializationError(_) | Self::InvalidParameters(_) => ErrorKind::InvalidRequest,
            Self::NotImplemented(_) => ErrorKind::NotImplemented,
            Self::Cancelled(_) => ErrorKind::Cancelled,
        }
    }

    pub(crate) fn api(exchange: &str, code: i64, message: impl Into<String>) -> Self {
        Self::ApiError {
            exchange: exchange.to_string(),
            code,
            message: message.into(),
        }
    }
}

impl From<TypesError> for ExchangeError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::InvalidKeyVersion(_) => Self::ConfigurationError(e.to_string()),
            _ => Self::InvalidParameters(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_errors_split_between_config_and_crypto() {
        let key_err = ExchangeError::from(VaultError::InvalidKeyLength(7));
        assert_eq!(key_err.kind(), ErrorKind::Configuration);

        let tag_err = ExchangeError::from(VaultError::AuthenticationFailed);
        assert_eq!(tag_err.kind(), ErrorKind::Crypto);
    }

    #[test]
    fn test_api_error_keeps_exchange_message() {
        let err = ExchangeError::api("kucoin", 400_100, "Invalid KC-API-PASSPHRASE");
        assert_eq!(err.kind(), ErrorKind::ExchangeApi);
        assert!(err.to_string().contains("Invalid KC-API-PASSPHRASE"));
        assert!(err.to_string().contains("kucoin"));
    }

    #[test]
    fn test_order_validation_maps_to_invalid_request() {
        let err = ExchangeError::from(TypesError::InvalidQuantity("zero".to_string()));
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);

        let err = ExchangeError::from(TypesError::InvalidKeyVersion("9".to_string()));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
