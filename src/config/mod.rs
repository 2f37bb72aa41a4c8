#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{CheckoutError, Result};
use crate::utils::validation::{
    validate_digits, validate_non_empty_string, validate_required_field, validate_url, Validate,
};
use std::fmt;
use std::str::FromStr;

pub const API_KEY_VAR: &str = "ASAAS_API_KEY";
pub const SANDBOX_API_URL: &str = "https://sandbox.asaas.com/api/v3";
pub const PRODUCTION_API_URL: &str = "https://api.asaas.com/v3";
pub const DEFAULT_PLACEHOLDER_PHONE: &str = "11999999999";
pub const DEFAULT_REFERENCE_PREFIX: &str = "SLAP-CHECKOUT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum AsaasEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl AsaasEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            AsaasEnvironment::Sandbox => SANDBOX_API_URL,
            AsaasEnvironment::Production => PRODUCTION_API_URL,
        }
    }
}

impl FromStr for AsaasEnvironment {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" | "test" => Ok(AsaasEnvironment::Sandbox),
            "production" | "prod" | "live" => Ok(AsaasEnvironment::Production),
            other => Err(CheckoutError::InvalidConfigValueError {
                field: "ASAAS_ENVIRONMENT".to_string(),
                value: other.to_string(),
                reason: "expected sandbox or production".to_string(),
            }),
        }
    }
}

impl fmt::Display for AsaasEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsaasEnvironment::Sandbox => f.write_str("sandbox"),
            AsaasEnvironment::Production => f.write_str("production"),
        }
    }
}

/// How the charge references its customer.
///
/// The two policies never mix: a failed search-or-create does not fall back to
/// a name reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CustomerStrategy {
    /// Look the customer up by CPF/CNPJ, create it when absent, charge by id.
    #[default]
    SearchOrCreate,
    /// Skip resolution and send the display name as the customer reference.
    DirectName,
}

impl FromStr for CustomerStrategy {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "search-or-create" => Ok(CustomerStrategy::SearchOrCreate),
            "direct-name" => Ok(CustomerStrategy::DirectName),
            other => Err(CheckoutError::InvalidConfigValueError {
                field: "CHECKOUT_CUSTOMER_STRATEGY".to_string(),
                value: other.to_string(),
                reason: "expected search-or-create or direct-name".to_string(),
            }),
        }
    }
}

impl fmt::Display for CustomerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerStrategy::SearchOrCreate => f.write_str("search-or-create"),
            CustomerStrategy::DirectName => f.write_str("direct-name"),
        }
    }
}

/// Process-wide settings, loaded once and shared read-only by every request.
///
/// A missing API key is not a load error: it is reported per request by
/// [`CheckoutConfig::api_key`] so the function still answers with a 500.
#[derive(Clone)]
pub struct CheckoutConfig {
    pub api_key: Option<String>,
    pub environment: AsaasEnvironment,
    pub base_url: String,
    pub customer_strategy: CustomerStrategy,
    pub placeholder_phone: String,
    pub reference_prefix: String,
}

impl CheckoutConfig {
    pub fn new(api_key: Option<String>, environment: AsaasEnvironment) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            environment,
            base_url: environment.base_url().to_string(),
            customer_strategy: CustomerStrategy::default(),
            placeholder_phone: DEFAULT_PLACEHOLDER_PHONE.to_string(),
            reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("ASAAS_ENVIRONMENT") {
            Some(value) => value.parse()?,
            None => AsaasEnvironment::default(),
        };

        let mut config = Self::new(lookup(API_KEY_VAR), environment);

        if let Some(url) = lookup("ASAAS_API_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(strategy) = lookup("CHECKOUT_CUSTOMER_STRATEGY") {
            config.customer_strategy = strategy.parse()?;
        }
        if let Some(phone) = lookup("CHECKOUT_PLACEHOLDER_PHONE") {
            config.placeholder_phone = phone;
        }
        if let Some(prefix) = lookup("CHECKOUT_REFERENCE_PREFIX") {
            config.reference_prefix = prefix;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_customer_strategy(mut self, strategy: CustomerStrategy) -> Self {
        self.customer_strategy = strategy;
        self
    }

    pub fn api_key(&self) -> Result<&str> {
        validate_required_field(API_KEY_VAR, &self.api_key).map(String::as_str)
    }

    /// Base URL without a trailing slash, ready for path joins.
    pub fn api_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl fmt::Debug for CheckoutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("customer_strategy", &self.customer_strategy)
            .field("placeholder_phone", &self.placeholder_phone)
            .field("reference_prefix", &self.reference_prefix)
            .finish()
    }
}

impl Validate for CheckoutConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_digits("placeholder_phone", &self.placeholder_phone)?;
        validate_non_empty_string("reference_prefix", &self.reference_prefix)?;

        if self.api_key.is_none() {
            tracing::warn!(
                "{} is not set; every checkout will be refused with a configuration error",
                API_KEY_VAR
            );
        }

        tracing::info!("✅ Checkout configuration validation passed");
        Ok(())
    }
}
