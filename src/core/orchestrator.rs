use crate::config::{CheckoutConfig, CustomerStrategy};
use crate::core::charge::{build_charge_payload, external_reference, ChargeSubmitter};
use crate::core::customer::{CustomerReference, CustomerResolver};
use crate::core::function::{FunctionEvent, FunctionResponse};
use crate::core::validator::validate_request;
use crate::domain::model::{CheckoutResponse, CheckoutRequest};
use crate::domain::ports::PaymentProvider;
use crate::utils::error::{CheckoutError, ErrorCategory};
use chrono::Utc;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Validating,
    ResolvingCustomer,
    SubmittingCharge,
    Responding,
}

impl CheckoutStage {
    fn failed(self, error: CheckoutError) -> StageFailure {
        StageFailure { stage: self, error }
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStage::Validating => "validating",
            CheckoutStage::ResolvingCustomer => "resolving customer",
            CheckoutStage::SubmittingCharge => "submitting charge",
            CheckoutStage::Responding => "responding",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
struct StageFailure {
    stage: CheckoutStage,
    error: CheckoutError,
}

/// Runs one checkout per call: validate, resolve the customer, submit the
/// charge, answer.
///
/// Any failure ends the request at the stage where it happened; nothing done
/// by earlier stages is undone.
pub struct CheckoutOrchestrator<P: PaymentProvider> {
    config: CheckoutConfig,
    provider: P,
}

impl<P: PaymentProvider> CheckoutOrchestrator<P> {
    pub fn new(config: CheckoutConfig, provider: P) -> Self {
        Self { config, provider }
    }

    pub async fn handle_event(&self, event: FunctionEvent) -> FunctionResponse {
        self.handle(&event.http_method, event.body.as_deref()).await
    }

    pub async fn handle(&self, method: &str, body: Option<&str>) -> FunctionResponse {
        match self.run(method, body).await {
            Ok(response) => {
                tracing::info!("Checkout stage: {}", CheckoutStage::Responding);
                FunctionResponse::json(200, &response)
            }
            Err(StageFailure { stage, error }) => {
                let status = error.status_code();
                match error.category() {
                    ErrorCategory::Request => {
                        tracing::warn!("Checkout refused while {}: {} (HTTP {})", stage, error, status)
                    }
                    _ => tracing::error!("❌ Checkout failed while {}: {} (HTTP {})", stage, error, status),
                }
                FunctionResponse::json(status, &CheckoutResponse::failure(error.client_message()))
            }
        }
    }

    async fn run(
        &self,
        method: &str,
        body: Option<&str>,
    ) -> std::result::Result<CheckoutResponse, StageFailure> {
        tracing::debug!("Checkout stage: {}", CheckoutStage::Validating);
        let request = validate_request(method, body, &self.config)
            .map_err(|e| CheckoutStage::Validating.failed(e))?;

        let reference = self.customer_reference(&request).await?;

        tracing::info!("Checkout stage: {}", CheckoutStage::SubmittingCharge);
        let tag = external_reference(
            &self.config.reference_prefix,
            &request.customer.normalized_tax_id(),
            Utc::now(),
        );
        let payload = build_charge_payload(&reference, &request, tag);

        ChargeSubmitter::new(&self.provider)
            .submit(&payload)
            .await
            .map_err(|e| CheckoutStage::SubmittingCharge.failed(e))
    }

    async fn customer_reference(
        &self,
        request: &CheckoutRequest,
    ) -> std::result::Result<CustomerReference, StageFailure> {
        match self.config.customer_strategy {
            CustomerStrategy::SearchOrCreate => {
                tracing::info!("Checkout stage: {}", CheckoutStage::ResolvingCustomer);
                let resolver = CustomerResolver::new(&self.provider, &self.config.placeholder_phone);
                let id = resolver
                    .resolve(&request.customer)
                    .await
                    .map_err(|e| CheckoutStage::ResolvingCustomer.failed(e))?;
                Ok(CustomerReference::Id(id))
            }
            CustomerStrategy::DirectName => Ok(CustomerReference::Name(request.customer.name.clone())),
        }
    }
}
