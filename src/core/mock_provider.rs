use crate::domain::ports::PaymentProvider;
use crate::domain::provider::{
    ChargePayload, NewCustomer, ProviderCharge, ProviderCustomer, ProviderErrorDetail,
    ProviderOperation,
};
use crate::utils::error::{CheckoutError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const INVOICE_URL: &str = "https://sandbox.asaas.com/i/pay_000001";

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    FindCustomers(String),
    CreateCustomer(NewCustomer),
    CreateCharge(ChargePayload),
}

/// In-memory provider that records every call it receives.
#[derive(Clone, Default)]
pub struct MockProvider {
    customers: Vec<ProviderCustomer>,
    customer_errors: Option<Vec<ProviderErrorDetail>>,
    charge_rejection: Option<(u16, Vec<ProviderErrorDetail>)>,
    calls: Arc<Mutex<Vec<ProviderCall>>>,
}

fn details(descriptions: &[&str]) -> Vec<ProviderErrorDetail> {
    descriptions
        .iter()
        .map(|d| ProviderErrorDetail {
            code: Some("invalid_action".to_string()),
            description: d.to_string(),
        })
        .collect()
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customer(mut self, id: &str) -> Self {
        self.customers.push(ProviderCustomer {
            id: id.to_string(),
            name: Some("Ana".to_string()),
            email: None,
            cpf_cnpj: Some("12345678900".to_string()),
        });
        self
    }

    pub fn rejecting_customer(mut self, description: &str) -> Self {
        self.customer_errors = Some(details(&[description]));
        self
    }

    pub fn rejecting_charge(mut self, status: u16, descriptions: &[&str]) -> Self {
        self.charge_rejection = Some((status, details(descriptions)));
        self
    }

    pub async fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().await.clone()
    }

    pub async fn created_customers(&self) -> Vec<NewCustomer> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                ProviderCall::CreateCustomer(customer) => Some(customer.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn charges(&self) -> Vec<ChargePayload> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                ProviderCall::CreateCharge(charge) => Some(charge.clone()),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, call: ProviderCall) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait::async_trait]
impl PaymentProvider for MockProvider {
    async fn find_customers(&self, tax_id: &str) -> Result<Vec<ProviderCustomer>> {
        self.record(ProviderCall::FindCustomers(tax_id.to_string()))
            .await;
        Ok(self.customers.clone())
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<ProviderCustomer> {
        self.record(ProviderCall::CreateCustomer(customer.clone()))
            .await;

        if let Some(errors) = &self.customer_errors {
            return Err(CheckoutError::ProviderRejection {
                operation: ProviderOperation::CreateCustomer,
                status: 400,
                errors: errors.clone(),
            });
        }

        Ok(ProviderCustomer {
            id: "cus_created".to_string(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            cpf_cnpj: Some(customer.cpf_cnpj.clone()),
        })
    }

    async fn create_charge(&self, charge: &ChargePayload) -> Result<ProviderCharge> {
        self.record(ProviderCall::CreateCharge(charge.clone())).await;

        if let Some((status, errors)) = &self.charge_rejection {
            return Err(CheckoutError::ProviderRejection {
                operation: ProviderOperation::CreateCharge,
                status: *status,
                errors: errors.clone(),
            });
        }

        Ok(ProviderCharge {
            id: Some("pay_000001".to_string()),
            status: Some("PENDING".to_string()),
            billing_type: charge.billing_type.as_ref().map(ToString::to_string),
            value: Some(charge.value),
            invoice_url: Some(INVOICE_URL.to_string()),
        })
    }
}
