use crate::domain::model::CheckoutResponse;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const FALLBACK_BODY: &str = r#"{"success":false,"message":"Erro interno do servidor."}"#;

/// Proxy-style invocation as delivered by Netlify Functions or API Gateway.
///
/// Only the method and the raw body are read; every other field is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl FunctionEvent {
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            http_method: "POST".to_string(),
            body: Some(body.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl FunctionResponse {
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        let body = serde_json::to_string(body).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize response body: {}", e);
            FALLBACK_BODY.to_string()
        });

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            status_code,
            headers,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn checkout_response(&self) -> Result<CheckoutResponse> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
