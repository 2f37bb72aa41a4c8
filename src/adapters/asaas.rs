use crate::config::CheckoutConfig;
use crate::domain::ports::PaymentProvider;
use crate::domain::provider::{
    ChargePayload, CustomerPage, NewCustomer, ProviderCharge, ProviderCustomer,
    ProviderErrorBody, ProviderOperation,
};
use crate::utils::error::{join_descriptions, CheckoutError, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Asaas REST client.
///
/// Calls carry no timeout or retry of their own; a hung call lasts as long as
/// the transport lets it.
#[derive(Debug, Clone)]
pub struct AsaasClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AsaasClient {
    pub fn from_config(config: &CheckoutConfig) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &CheckoutConfig) -> Self {
        Self {
            client,
            base_url: config.api_url().to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CheckoutError::MissingConfigError {
                field: crate::config::API_KEY_VAR.to_string(),
            })?;

        Ok(request
            .header("access_token", key)
            .header("Accept", "application/json"))
    }
}

/// Decodes a provider reply, turning refusals into `ProviderRejection`.
///
/// A reply is a refusal when its status is not 2xx or when it carries a
/// non-empty `errors` list, whatever its status.
async fn read_reply<T: DeserializeOwned>(
    operation: ProviderOperation,
    response: Response,
) -> Result<T> {
    let status = response.status();
    let bytes = response.bytes().await?;
    tracing::debug!("{} answered HTTP {} ({} bytes)", operation, status, bytes.len());

    let envelope: ProviderErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
    if !status.is_success() || !envelope.errors.is_empty() {
        tracing::error!(
            "❌ Asaas refused {} (HTTP {}): {}",
            operation,
            status.as_u16(),
            join_descriptions(&envelope.errors)
        );
        return Err(CheckoutError::ProviderRejection {
            operation,
            status: status.as_u16(),
            errors: envelope.errors,
        });
    }

    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait::async_trait]
impl PaymentProvider for AsaasClient {
    async fn find_customers(&self, tax_id: &str) -> Result<Vec<ProviderCustomer>> {
        let request = self
            .client
            .get(self.url("customers"))
            .query(&[("cpfCnpj", tax_id)]);

        let response = self.authorize(request)?.send().await?;
        let page: CustomerPage = read_reply(ProviderOperation::SearchCustomer, response).await?;

        tracing::debug!(
            "Customer search matched {} record(s)",
            page.total_count.unwrap_or(page.data.len() as u64)
        );
        Ok(page.data)
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<ProviderCustomer> {
        let request = self.client.post(self.url("customers")).json(customer);
        let response = self.authorize(request)?.send().await?;
        read_reply(ProviderOperation::CreateCustomer, response).await
    }

    async fn create_charge(&self, charge: &ChargePayload) -> Result<ProviderCharge> {
        let request = self.client.post(self.url("payments")).json(charge);
        let response = self.authorize(request)?.send().await?;
        read_reply(ProviderOperation::CreateCharge, response).await
    }
}
