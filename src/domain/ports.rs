use crate::domain::provider::{ChargePayload, NewCustomer, ProviderCharge, ProviderCustomer};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Outbound calls the checkout makes against the payment provider.
///
/// Every call is one network round trip. Implementations report explicit
/// provider refusals as `CheckoutError::ProviderRejection`.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn find_customers(&self, tax_id: &str) -> Result<Vec<ProviderCustomer>>;
    async fn create_customer(&self, customer: &NewCustomer) -> Result<ProviderCustomer>;
    async fn create_charge(&self, charge: &ChargePayload) -> Result<ProviderCharge>;
}
