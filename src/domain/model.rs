use crate::domain::provider::ProviderCharge;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest amount the provider accepts for a charge.
pub const MIN_CHARGE_VALUE: Decimal = dec!(0.01);

pub const SUCCESS_MESSAGE: &str = "Cobrança criada com sucesso.";

/// Checkout body posted by the storefront.
///
/// Both objects must be present; every field inside them is optional and is
/// forwarded to the provider as-is, which does the business validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer: CustomerData,
    pub payment: PaymentData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "cpfCnpj")]
    pub tax_id: Option<String>,
    pub date_of_birth: Option<String>,
    #[serde(alias = "phone")]
    pub mobile_phone: Option<String>,
}

impl CustomerData {
    /// CPF/CNPJ with every non-digit stripped; empty when not supplied.
    pub fn normalized_tax_id(&self) -> String {
        self.tax_id.as_deref().map(normalize_tax_id).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub billing_type: Option<BillingType>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub value: Option<Decimal>,
    pub due_date: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "installment_count")]
    pub installment_count: Option<u32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub installment_value: Option<Decimal>,
}

impl PaymentData {
    pub fn effective_value(&self) -> Decimal {
        effective_value(self.value)
    }

    pub fn is_installment_capable(&self) -> bool {
        self.billing_type
            .as_ref()
            .is_some_and(BillingType::is_installment_capable)
    }
}

/// Storefronts send the count as `3`, `3.0` or `"3"`.
fn installment_count<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Number(f64),
        Text(String),
    }

    let number = match Option::<RawCount>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawCount::Number(n)) => n,
        Some(RawCount::Text(text)) if text.trim().is_empty() => return Ok(None),
        Some(RawCount::Text(text)) => text.trim().parse::<f64>().map_err(|_| {
            de::Error::custom(format!("installmentCount is not a number: {:?}", text))
        })?,
    };

    if number.fract() != 0.0 || number < 1.0 || number > f64::from(u32::MAX) {
        return Err(de::Error::custom(format!(
            "installmentCount must be a positive integer, got {}",
            number
        )));
    }
    Ok(Some(number as u32))
}

/// Payment method category understood by the provider.
///
/// Unknown values are kept verbatim so the provider can reject them itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillingType {
    Boleto,
    CreditCard,
    DebitCard,
    Pix,
    Undefined,
    Other(String),
}

impl BillingType {
    pub fn as_str(&self) -> &str {
        match self {
            BillingType::Boleto => "BOLETO",
            BillingType::CreditCard => "CREDIT_CARD",
            BillingType::DebitCard => "DEBIT_CARD",
            BillingType::Pix => "PIX",
            BillingType::Undefined => "UNDEFINED",
            BillingType::Other(raw) => raw,
        }
    }

    /// Only credit card charges may be split into installments.
    pub fn is_installment_capable(&self) -> bool {
        matches!(self, BillingType::CreditCard)
    }
}

impl From<String> for BillingType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BOLETO" => BillingType::Boleto,
            "CREDIT_CARD" => BillingType::CreditCard,
            "DEBIT_CARD" => BillingType::DebitCard,
            "PIX" => BillingType::Pix,
            "UNDEFINED" => BillingType::Undefined,
            _ => BillingType::Other(raw),
        }
    }
}

impl From<BillingType> for String {
    fn from(billing_type: BillingType) -> Self {
        billing_type.as_str().to_string()
    }
}

impl fmt::Display for BillingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body returned to the storefront, for success and failure alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_url: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub amount: Option<Decimal>,
}

impl CheckoutResponse {
    pub fn from_charge(charge: &ProviderCharge) -> Self {
        Self {
            success: true,
            message: Some(SUCCESS_MESSAGE.to_string()),
            payment_method: charge.billing_type.clone(),
            invoice_url: charge.invoice_url.clone(),
            amount: charge.value,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            payment_method: None,
            invoice_url: None,
            amount: None,
        }
    }
}

pub fn normalize_tax_id(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Supplied value when strictly positive, otherwise [`MIN_CHARGE_VALUE`].
pub fn effective_value(value: Option<Decimal>) -> Decimal {
    match value {
        Some(v) if v > Decimal::ZERO => v,
        _ => MIN_CHARGE_VALUE,
    }
}

/// Tax id safe for logs: only the last two digits survive.
pub fn mask_tax_id(digits: &str) -> String {
    let visible = digits.len().saturating_sub(2);
    digits
        .chars()
        .enumerate()
        .map(|(i, c)| if i < visible { '*' } else { c })
        .collect()
}
