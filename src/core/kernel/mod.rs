/// Transport kernel shared by every exchange connector
///
/// The kernel holds only exchange-agnostic plumbing:
///
/// - `RestClient`: request executor interface, implemented by `ReqwestRest`
/// - `Signer`: pluggable request authentication, one implementation per exchange
///
/// Exchange modules combine the two: a `ReqwestRest` bound to the exchange base
/// URL and carrying that exchange's signer.
///
/// ```rust,no_run
/// use exvault::core::kernel::*;
/// use exvault::exchanges::kucoin::signer::KucoinSigner;
/// use exvault::core::types::KeyVersion;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = Arc::new(KucoinSigner::new(
///     "api_key".to_string(),
///     "api_secret".to_string(),
///     Some("passphrase".to_string()),
///     KeyVersion::V2,
///     true,
/// ));
/// let rest = RestClientBuilder::new(RestClientConfig::new(
///     "https://api.kucoin.com".to_string(),
///     "kucoin".to_string(),
/// ))
/// .with_signer(signer)
/// .build()?;
///
/// let accounts = rest.get("/api/v1/accounts", &[], true).await?;
/// # Ok(())
/// # }
/// ```
pub mod rest;
pub mod signer;

pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{hmac_sha256, hmac_sha256_base64, hmac_sha256_hex, SignatureResult, Signer};
