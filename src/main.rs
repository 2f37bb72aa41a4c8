use asaas_checkout::utils::{logger, validation::Validate};
use anyhow::{Context, Result};
use asaas_checkout::{AsaasClient, CheckoutOrchestrator, CliConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting asaas-checkout CLI");
    let config = cli.checkout_config();
    if cli.verbose {
        tracing::debug!("Checkout config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.client_message());
        std::process::exit(1);
    }

    let body = cli
        .read_payload()
        .with_context(|| format!("Failed to read checkout payload from {}", cli.payload))?;
    let client = AsaasClient::from_config(&config).context("Failed to build Asaas client")?;
    let orchestrator = CheckoutOrchestrator::new(config, client);

    let response = orchestrator.handle(&cli.method, Some(&body)).await;
    println!("{}", response.body);

    if response.is_success() {
        tracing::info!("✅ Checkout completed with HTTP {}", response.status_code);
    } else {
        eprintln!("❌ Checkout failed with HTTP {}", response.status_code);
        std::process::exit(2);
    }

    Ok(())
}
