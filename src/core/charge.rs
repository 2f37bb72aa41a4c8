use crate::core::customer::CustomerReference;
use crate::domain::model::{mask_tax_id, CheckoutRequest, CheckoutResponse};
use crate::domain::ports::PaymentProvider;
use crate::domain::provider::ChargePayload;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

pub struct ChargeSubmitter<'a, P: PaymentProvider> {
    provider: &'a P,
}

impl<'a, P: PaymentProvider> ChargeSubmitter<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Sends one charge-creation call. No retry.
    pub async fn submit(&self, payload: &ChargePayload) -> Result<CheckoutResponse> {
        if let Ok(json) = serde_json::to_string(&masked(payload)) {
            tracing::debug!("Charge payload sent to Asaas: {}", json);
        }

        let charge = self.provider.create_charge(payload).await?;

        tracing::info!(
            "✅ Charge {} created with status {}",
            charge.id.as_deref().unwrap_or("<no id>"),
            charge.status.as_deref().unwrap_or("<unknown>")
        );
        Ok(CheckoutResponse::from_charge(&charge))
    }
}

/// Builds the charge body.
///
/// The value is never below the provider minimum, and installment fields are
/// only sent for installment-capable billing types.
pub fn build_charge_payload(
    reference: &CustomerReference,
    request: &CheckoutRequest,
    external_reference: String,
) -> ChargePayload {
    let payment = &request.payment;
    let customer = &request.customer;

    let (installment_count, installment_value) = if payment.is_installment_capable() {
        (payment.installment_count, payment.installment_value)
    } else {
        (None, None)
    };

    let mut payload = ChargePayload {
        customer: reference.as_field(),
        billing_type: payment.billing_type.clone(),
        value: payment.effective_value(),
        due_date: payment.due_date.clone(),
        description: payment.description.clone(),
        external_reference,
        installment_count,
        installment_value,
        name: None,
        email: None,
        cpf_cnpj: None,
        date_of_birth: None,
    };

    // Without a provider id the identity travels on the charge itself.
    if reference.is_by_name() {
        payload.name = customer.name.clone();
        payload.email = customer.email.clone();
        payload.cpf_cnpj = Some(customer.normalized_tax_id());
        payload.date_of_birth = customer.date_of_birth.clone();
    }

    payload
}

/// `<prefix>-<UTC yyyymmddHHMMSSmmm>-<last 4 tax id digits>`.
///
/// Checkouts without a tax id use `0000` as the suffix.
pub fn external_reference(prefix: &str, tax_id: &str, now: DateTime<Utc>) -> String {
    let suffix = tax_id
        .len()
        .checked_sub(4)
        .and_then(|start| tax_id.get(start..))
        .unwrap_or("0000");

    format!("{}-{}-{}", prefix, now.format("%Y%m%d%H%M%S%3f"), suffix)
}

fn masked(payload: &ChargePayload) -> ChargePayload {
    let mut copy = payload.clone();
    copy.cpf_cnpj = copy.cpf_cnpj.as_deref().map(mask_tax_id);
    copy
}
