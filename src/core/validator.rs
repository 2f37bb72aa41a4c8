use crate::config::CheckoutConfig;
use crate::domain::model::CheckoutRequest;
use crate::utils::error::{CheckoutError, Result};

pub const ACCEPTED_METHOD: &str = "POST";

/// First stage of a checkout: method, then credential, then body.
///
/// The order matters. A wrong method is refused before anything else is
/// looked at, and a missing key is reported whatever the body holds.
pub fn validate_request(
    method: &str,
    body: Option<&str>,
    config: &CheckoutConfig,
) -> Result<CheckoutRequest> {
    ensure_method(method)?;
    config.api_key()?;
    parse_body(body)
}

pub fn ensure_method(method: &str) -> Result<()> {
    if method.eq_ignore_ascii_case(ACCEPTED_METHOD) {
        Ok(())
    } else {
        Err(CheckoutError::MethodNotAllowed {
            method: method.to_string(),
        })
    }
}

pub fn parse_body(body: Option<&str>) -> Result<CheckoutRequest> {
    let body = body.ok_or_else(|| CheckoutError::MalformedRequest {
        message: "request body is empty".to_string(),
    })?;

    serde_json::from_str(body).map_err(|e| CheckoutError::MalformedRequest {
        message: e.to_string(),
    })
}
