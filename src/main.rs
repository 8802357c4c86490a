use anyhow::Context;
use exvault::core::config::ExchangeConfig;
use exvault::vault::generate_key;
use exvault::{ConnectorRegistry, ExchangeType};
use tracing_subscriber::EnvFilter;

fn load_config(exchange: ExchangeType) -> anyhow::Result<ExchangeConfig> {
    #[cfg(feature = "env-file")]
    let config = ExchangeConfig::from_env_file(exchange.env_prefix());
    #[cfg(not(feature = "env-file"))]
    let config = ExchangeConfig::from_env(exchange.env_prefix());

    config.with_context(|| format!("loading {} credentials", exchange))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let arg = std::env::args().nth(1);

    if arg.as_deref() == Some("generate-key") {
        println!("{}", generate_key());
        return Ok(());
    }

    let exchanges = match arg {
        Some(name) => vec![name.parse::<ExchangeType>()?],
        None => ExchangeType::ALL.to_vec(),
    };

    let registry = ConnectorRegistry::new();

    for exchange in exchanges {
        let config = match load_config(exchange) {
            Ok(config) => config,
            Err(e) => {
                println!("{}: skipped ({:#})", exchange, e);
                continue;
            }
        };

        let connector = registry.connect(exchange, config)?;

        match connector.test_connection().await {
            Ok(()) => println!("{}: reachable", exchange),
            Err(e) => {
                println!("{}: unreachable ({})", exchange, e);
                continue;
            }
        }

        match connector.get_account_balances().await {
            Ok(balances) => {
                for (key, amount) in &balances {
                    println!("  {:<20} {}", key, amount);
                }
            }
            Err(e) => println!("  balances failed: {}", e),
        }
    }

    Ok(())
}
