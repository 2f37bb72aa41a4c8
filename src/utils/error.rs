use crate::domain::provider::{ProviderErrorDetail, ProviderOperation};
use thiserror::Error;

pub const FALLBACK_PROVIDER_MESSAGE: &str = "Erro desconhecido na API do Asaas.";

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Method not allowed: {method}")]
    MethodNotAllowed { method: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("{operation} rejected by provider (HTTP {status}): {}", join_descriptions(.errors))]
    ProviderRejection {
        operation: ProviderOperation,
        status: u16,
        errors: Vec<ProviderErrorDetail>,
    },

    #[error("API request failed: {0}")]
    ApiError(reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Request URLs carry the customer's CPF/CNPJ as a query parameter.
impl From<reqwest::Error> for CheckoutError {
    fn from(error: reqwest::Error) -> Self {
        CheckoutError::ApiError(error.without_url())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Request,
    Configuration,
    Provider,
    Transport,
    Internal,
}

impl CheckoutError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckoutError::MethodNotAllowed { .. } | CheckoutError::MalformedRequest { .. } => {
                ErrorCategory::Request
            }
            CheckoutError::MissingConfigError { .. }
            | CheckoutError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CheckoutError::ProviderRejection { .. } => ErrorCategory::Provider,
            CheckoutError::ApiError(_) => ErrorCategory::Transport,
            CheckoutError::SerializationError(_) | CheckoutError::IoError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// HTTP status returned to the storefront for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::MethodNotAllowed { .. } => 405,
            CheckoutError::MalformedRequest { .. } => 400,
            CheckoutError::ProviderRejection {
                operation: ProviderOperation::CreateCharge,
                status,
                ..
            } => {
                // A 2xx carrying an error list is not something the caller can act on as success.
                if (200..300).contains(status) {
                    502
                } else {
                    *status
                }
            }
            _ => 500,
        }
    }

    /// Message placed in the `message` field of the failure body.
    pub fn client_message(&self) -> String {
        match self {
            CheckoutError::MethodNotAllowed { .. } => "Método não permitido.".to_string(),
            CheckoutError::MissingConfigError { .. } => {
                "Erro de configuração do servidor: Chave Asaas não encontrada.".to_string()
            }
            CheckoutError::InvalidConfigValueError { .. } => {
                format!("Erro de configuração do servidor: {}", self)
            }
            CheckoutError::MalformedRequest { .. } => {
                "JSON inválido no corpo da requisição.".to_string()
            }
            CheckoutError::ProviderRejection {
                operation, errors, ..
            } => match operation {
                ProviderOperation::SearchCustomer => {
                    format!("Erro ao consultar cliente: {}", describe_or_fallback(errors))
                }
                ProviderOperation::CreateCustomer => {
                    let first = errors
                        .first()
                        .map(|e| e.description.as_str())
                        .filter(|d| !d.is_empty())
                        .unwrap_or(FALLBACK_PROVIDER_MESSAGE);
                    format!("Erro ao criar cliente: {}", first)
                }
                ProviderOperation::CreateCharge => {
                    format!("Erro ao gerar cobrança: {}", describe_or_fallback(errors))
                }
            },
            CheckoutError::ApiError(e) => format!("Erro interno do servidor: {}", e),
            CheckoutError::SerializationError(e) => format!("Erro interno do servidor: {}", e),
            CheckoutError::IoError(e) => format!("Erro interno do servidor: {}", e),
        }
    }
}

/// Joins provider error descriptions with ` | `.
pub fn join_descriptions(errors: &[ProviderErrorDetail]) -> String {
    errors
        .iter()
        .map(|e| e.description.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn describe_or_fallback(errors: &[ProviderErrorDetail]) -> String {
    if errors.is_empty() {
        FALLBACK_PROVIDER_MESSAGE.to_string()
    } else {
        join_descriptions(errors)
    }
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
