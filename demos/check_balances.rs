//! Stores credentials from the environment in the vault, then connects
//! with the decrypted record the way a request handler would.
//!
//! ```text
//! EXCHANGE_CREDENTIALS_KEY=... KUCOIN_API_KEY=... KUCOIN_API_SECRET=... \
//!     KUCOIN_API_PASSPHRASE=... cargo run --example check_balances -- kucoin
//! ```

use exvault::core::config::ExchangeConfig;
use exvault::vault::{CredentialSubmission, CredentialVault, UserExchangeCredential};
use exvault::{ConnectorRegistry, ExchangeType};
use tracing_subscriber::EnvFilter;

fn env_var(exchange: ExchangeType, suffix: &str) -> Option<String> {
    std::env::var(format!("{}_{}", exchange.env_prefix(), suffix)).ok()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    #[cfg(feature = "env-file")]
    let _ = dotenv::dotenv();

    let exchange: ExchangeType = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "kucoin".to_string())
        .parse()?;

    let vault = CredentialVault::from_env();

    let submission = CredentialSubmission {
        api_key: env_var(exchange, "API_KEY"),
        api_secret: env_var(exchange, "API_SECRET"),
        api_passphrase: env_var(exchange, "API_PASSPHRASE"),
        key_version: env_var(exchange, "API_KEY_VERSION")
            .map(|v| v.parse())
            .transpose()?,
    };

    let record = UserExchangeCredential::from_submission(exchange.as_str(), &submission, &vault)?;
    println!("Stored record: {}", serde_json::to_string_pretty(&record)?);

    let registry = ConnectorRegistry::new();
    let connector = registry.connect_stored(&record, &vault, ExchangeConfig::read_only())?;

    connector.test_connection().await?;
    println!("{} reachable", connector.exchange_name());

    let balances = connector.get_account_balances().await?;
    if balances.is_empty() {
        println!("No balances reported");
    }
    for (key, amount) in &balances {
        println!("{:<20} {}", key, amount);
    }

    Ok(())
}
