use crate::config::{
    AsaasEnvironment, CheckoutConfig, CustomerStrategy, DEFAULT_PLACEHOLDER_PHONE,
    DEFAULT_REFERENCE_PREFIX,
};
use crate::utils::error::Result;
use clap::Parser;
use std::io::Read;

#[derive(Clone, Parser)]
#[command(name = "asaas-checkout")]
#[command(about = "Submit a storefront checkout payload to Asaas and print the function response")]
pub struct CliConfig {
    #[arg(long, default_value = "-", help = "Checkout JSON file, or - for stdin")]
    pub payload: String,

    #[arg(long, default_value = "POST", help = "Transport method to simulate")]
    pub method: String,

    #[arg(long, env = "ASAAS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "ASAAS_ENVIRONMENT", value_enum, default_value_t = AsaasEnvironment::Sandbox)]
    pub environment: AsaasEnvironment,

    #[arg(long, env = "ASAAS_API_URL", help = "Override the environment's base URL")]
    pub api_url: Option<String>,

    #[arg(long, env = "CHECKOUT_CUSTOMER_STRATEGY", value_enum, default_value_t = CustomerStrategy::SearchOrCreate)]
    pub strategy: CustomerStrategy,

    #[arg(long, env = "CHECKOUT_PLACEHOLDER_PHONE", default_value = DEFAULT_PLACEHOLDER_PHONE)]
    pub placeholder_phone: String,

    #[arg(long, env = "CHECKOUT_REFERENCE_PREFIX", default_value = DEFAULT_REFERENCE_PREFIX)]
    pub reference_prefix: String,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn checkout_config(&self) -> CheckoutConfig {
        let mut config = CheckoutConfig::new(self.api_key.clone(), self.environment)
            .with_customer_strategy(self.strategy);

        if let Some(url) = &self.api_url {
            config = config.with_base_url(url.clone());
        }
        config.placeholder_phone = self.placeholder_phone.clone();
        config.reference_prefix = self.reference_prefix.clone();
        config
    }

    pub fn read_payload(&self) -> Result<String> {
        if self.payload == "-" {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            Ok(body)
        } else {
            Ok(std::fs::read_to_string(&self.payload)?)
        }
    }
}
