pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::asaas::AsaasClient;
pub use crate::config::{AsaasEnvironment, CheckoutConfig, CustomerStrategy};
pub use crate::core::{
    function::{FunctionEvent, FunctionResponse},
    orchestrator::CheckoutOrchestrator,
};
pub use crate::domain::model::{CheckoutRequest, CheckoutResponse};
pub use crate::utils::error::{CheckoutError, Result};
