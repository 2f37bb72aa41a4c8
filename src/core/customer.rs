use crate::domain::model::{mask_tax_id, CustomerData};
use crate::domain::ports::PaymentProvider;
use crate::domain::provider::NewCustomer;
use crate::utils::error::Result;

/// What the charge puts in its `customer` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerReference {
    /// Provider-issued id from search-or-create.
    Id(String),
    /// Display name, left for the provider to resolve.
    Name(Option<String>),
}

impl CustomerReference {
    pub fn as_field(&self) -> Option<String> {
        match self {
            CustomerReference::Id(id) => Some(id.clone()),
            CustomerReference::Name(name) => name.clone(),
        }
    }

    pub fn is_by_name(&self) -> bool {
        matches!(self, CustomerReference::Name(_))
    }
}

pub struct CustomerResolver<'a, P: PaymentProvider> {
    provider: &'a P,
    placeholder_phone: &'a str,
}

impl<'a, P: PaymentProvider> CustomerResolver<'a, P> {
    pub fn new(provider: &'a P, placeholder_phone: &'a str) -> Self {
        Self {
            provider,
            placeholder_phone,
        }
    }

    /// Returns the provider id for `customer`, reusing the first record that
    /// matches its CPF/CNPJ and creating one only when nothing matches.
    pub async fn resolve(&self, customer: &CustomerData) -> Result<String> {
        let tax_id = customer.normalized_tax_id();

        // An empty cpfCnpj filter would list every customer on the account.
        if tax_id.is_empty() {
            tracing::warn!("Checkout has no CPF/CNPJ, skipping customer search");
        } else {
            tracing::debug!("Searching customer by CPF/CNPJ {}", mask_tax_id(&tax_id));
            let matches = self.provider.find_customers(&tax_id).await?;

            if let Some(existing) = matches.into_iter().next() {
                tracing::info!("Reusing existing customer {}", existing.id);
                return Ok(existing.id);
            }
        }

        let new_customer = build_new_customer(customer, tax_id, self.placeholder_phone);
        let created = self.provider.create_customer(&new_customer).await?;

        tracing::info!("Created customer {}", created.id);
        Ok(created.id)
    }
}

pub fn build_new_customer(
    customer: &CustomerData,
    tax_id: String,
    placeholder_phone: &str,
) -> NewCustomer {
    let mobile_phone = customer
        .mobile_phone
        .as_deref()
        .map(|phone| phone.chars().filter(char::is_ascii_digit).collect::<String>())
        .filter(|phone| !phone.is_empty())
        .unwrap_or_else(|| placeholder_phone.to_string());

    NewCustomer {
        name: customer.name.clone(),
        email: customer.email.clone(),
        cpf_cnpj: tax_id,
        date_of_birth: customer.date_of_birth.clone(),
        mobile_phone,
    }
}
