use anyhow::Result;
use asaas_checkout::{
    AsaasClient, AsaasEnvironment, CheckoutConfig, CheckoutOrchestrator, CheckoutResponse,
    CustomerStrategy, FunctionEvent,
};
use httpmock::prelude::*;
use serde_json::json;

const INVOICE_URL: &str = "https://sandbox.asaas.com/i/pay_abc123";

fn checkout_body(billing_type: &str, value: f64) -> String {
    json!({
        "customer": {
            "name": "Ana",
            "email": "a@x.com",
            "taxId": "123.456.789-00",
            "dateOfBirth": "1990-01-01"
        },
        "payment": {
            "billingType": billing_type,
            "value": value,
            "dueDate": "2024-01-10",
            "description": "order 1",
            "installmentCount": 2,
            "installmentValue": 25.0
        }
    })
    .to_string()
}

fn orchestrator_for(server: &MockServer, key: Option<&str>) -> Result<CheckoutOrchestrator<AsaasClient>> {
    let config = CheckoutConfig::new(key.map(str::to_string), AsaasEnvironment::Sandbox)
        .with_base_url(server.base_url());
    let client = AsaasClient::from_config(&config)?;
    Ok(CheckoutOrchestrator::new(config, client))
}

/// Existing customer, PIX charge: one search, no creation, one charge.
#[tokio::test]
async fn test_pix_checkout_reuses_existing_customer() -> Result<()> {
    let server = MockServer::start();

    let search = server.mock(|when, then| {
        when.method(GET)
            .path("/customers")
            .query_param("cpfCnpj", "12345678900")
            .header("access_token", "test-key");
        then.status(200).json_body(json!({
            "object": "list",
            "totalCount": 2,
            "data": [{ "id": "cus_first" }, { "id": "cus_second" }]
        }));
    });
    let create_customer = server.mock(|when, then| {
        when.method(POST).path("/customers");
        then.status(200).json_body(json!({ "id": "cus_duplicate" }));
    });
    let charge = server.mock(|when, then| {
        when.method(POST)
            .path("/payments")
            .header("access_token", "test-key")
            .json_body_partial(r#"{"customer": "cus_first", "billingType": "PIX", "value": 50.0}"#);
        then.status(200).json_body(json!({
            "id": "pay_abc123",
            "status": "PENDING",
            "billingType": "PIX",
            "value": 50.0,
            "invoiceUrl": INVOICE_URL
        }));
    });

    let orchestrator = orchestrator_for(&server, Some("test-key"))?;
    let response = orchestrator
        .handle_event(FunctionEvent::post(checkout_body("PIX", 50.0)))
        .await;

    search.assert();
    create_customer.assert_hits(0);
    charge.assert();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.headers.get("Content-Type").map(String::as_str), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(&response.body)?;
    assert_eq!(body["success"], true);
    assert_eq!(body["paymentMethod"], "PIX");
    assert_eq!(body["invoiceUrl"], INVOICE_URL);
    assert_eq!(body["amount"], 50.0);
    Ok(())
}

#[tokio::test]
async fn test_zero_value_is_submitted_as_minimum() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/customers");
        then.status(200).json_body(json!({ "data": [{ "id": "cus_first" }] }));
    });
    let charge = server.mock(|when, then| {
        when.method(POST)
            .path("/payments")
            .json_body_partial(r#"{"value": 0.01}"#);
        then.status(200).json_body(json!({
            "billingType": "PIX",
            "value": 0.01,
            "invoiceUrl": INVOICE_URL
        }));
    });

    let orchestrator = orchestrator_for(&server, Some("test-key"))?;
    let response = orchestrator.handle("POST", Some(&checkout_body("PIX", 0.0))).await;

    charge.assert();
    assert_eq!(response.status_code, 200);
    Ok(())
}

#[tokio::test]
async fn test_new_customer_is_created_before_credit_card_charge() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/customers");
        then.status(200).json_body(json!({ "object": "list", "totalCount": 0, "data": [] }));
    });
    let create_customer = server.mock(|when, then| {
        when.method(POST).path("/customers").json_body_partial(
            r#"{"name": "Ana", "cpfCnpj": "12345678900", "mobilePhone": "11999999999"}"#,
        );
        then.status(200).json_body(json!({ "id": "cus_new", "name": "Ana" }));
    });
    let charge = server.mock(|when, then| {
        when.method(POST).path("/payments").json_body_partial(
            r#"{"customer": "cus_new", "billingType": "CREDIT_CARD", "installmentCount": 2, "installmentValue": 25.0}"#,
        );
        then.status(201).json_body(json!({
            "billingType": "CREDIT_CARD",
            "value": 50.0,
            "invoiceUrl": INVOICE_URL
        }));
    });

    let orchestrator = orchestrator_for(&server, Some("test-key"))?;
    let response = orchestrator.handle("POST", Some(&checkout_body("CREDIT_CARD", 50.0))).await;

    create_customer.assert();
    charge.assert();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.checkout_response()?.payment_method.as_deref(), Some("CREDIT_CARD"));
    Ok(())
}

#[tokio::test]
async fn test_customer_creation_error_stops_before_charge() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/customers");
        then.status(200).json_body(json!({ "data": [] }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/customers");
        then.status(400).json_body(json!({
            "errors": [
                { "code": "invalid_cpfCnpj", "description": "O CPF/CNPJ informado é inválido." },
                { "code": "invalid_email", "description": "O email informado é inválido." }
            ]
        }));
    });
    let charge = server.mock(|when, then| {
        when.method(POST).path("/payments");
        then.status(200).json_body(json!({}));
    });

    let orchestrator = orchestrator_for(&server, Some("test-key"))?;
    let response = orchestrator.handle("POST", Some(&checkout_body("PIX", 50.0))).await;

    charge.assert_hits(0);
    assert_eq!(response.status_code, 500);
    let body: serde_json::Value = serde_json::from_str(&response.body)?;
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Erro ao criar cliente: O CPF/CNPJ informado é inválido."
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_charge_rejection_keeps_status_and_joins_errors() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/customers");
        then.status(200).json_body(json!({ "data": [{ "id": "cus_first" }] }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/payments");
        then.status(400).json_body(json!({
            "errors": [
                { "code": "invalid_dueDate", "description": "Data de vencimento inválida." },
                { "code": "invalid_value", "description": "Valor inválido." }
            ]
        }));
    });

    let orchestrator = orchestrator_for(&server, Some("test-key"))?;
    let response = orchestrator.handle("POST", Some(&checkout_body("BOLETO", 50.0))).await;

    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.checkout_response()?.message.as_deref(),
        Some("Erro ao gerar cobrança: Data de vencimento inválida. | Valor inválido.")
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_key_never_reaches_provider() -> Result<()> {
    let server = MockServer::start();
    let any_call = server.mock(|when, then| {
        when.path_contains("/");
        then.status(200).json_body(json!({ "data": [] }));
    });

    let orchestrator = orchestrator_for(&server, None)?;
    let response = orchestrator.handle("POST", Some(&checkout_body("PIX", 50.0))).await;

    any_call.assert_hits(0);
    assert_eq!(response.status_code, 500);
    Ok(())
}

#[tokio::test]
async fn test_get_request_is_not_allowed() -> Result<()> {
    let server = MockServer::start();
    let any_call = server.mock(|when, then| {
        when.path_contains("/");
        then.status(200);
    });

    let orchestrator = orchestrator_for(&server, Some("test-key"))?;
    let event: FunctionEvent = serde_json::from_value(json!({ "httpMethod": "GET" }))?;
    let response = orchestrator.handle_event(event).await;

    any_call.assert_hits(0);
    assert_eq!(response.status_code, 405);
    assert_eq!(
        response.checkout_response()?.message.as_deref(),
        Some("Método não permitido.")
    );
    Ok(())
}

#[tokio::test]
async fn test_direct_name_strategy_sends_identity_on_charge() -> Result<()> {
    let server = MockServer::start();

    let search = server.mock(|when, then| {
        when.method(GET).path("/customers");
        then.status(200).json_body(json!({ "data": [] }));
    });
    let charge = server.mock(|when, then| {
        when.method(POST).path("/payments").json_body_partial(
            r#"{"customer": "Ana", "name": "Ana", "email": "a@x.com", "cpfCnpj": "12345678900", "dateOfBirth": "1990-01-01"}"#,
        );
        then.status(200).json_body(json!({
            "billingType": "BOLETO",
            "invoiceUrl": INVOICE_URL
        }));
    });

    let config = CheckoutConfig::new(Some("test-key".to_string()), AsaasEnvironment::Sandbox)
        .with_base_url(server.base_url())
        .with_customer_strategy(CustomerStrategy::DirectName);
    let client = AsaasClient::from_config(&config)?;
    let orchestrator = CheckoutOrchestrator::new(config, client);

    let response = orchestrator.handle("POST", Some(&checkout_body("BOLETO", 50.0))).await;

    search.assert_hits(0);
    charge.assert();
    assert_eq!(response.status_code, 200);
    Ok(())
}

#[tokio::test]
async fn test_customer_search_failure_is_reported_as_lookup_error() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/customers");
        then.status(401).json_body(json!({
            "errors": [{ "code": "invalid_access_token", "description": "chave invalida" }]
        }));
    });
    let create_customer = server.mock(|when, then| {
        when.method(POST).path("/customers");
        then.status(200).json_body(json!({ "id": "cus_new" }));
    });
    let charge = server.mock(|when, then| {
        when.method(POST).path("/payments");
        then.status(200).json_body(json!({}));
    });

    let orchestrator = orchestrator_for(&server, Some("test-key"))?;
    let response = orchestrator.handle("POST", Some(&checkout_body("PIX", 50.0))).await;

    create_customer.assert_hits(0);
    charge.assert_hits(0);
    assert_eq!(response.status_code, 500);
    assert_eq!(
        response.checkout_response()?.message.as_deref(),
        Some("Erro ao consultar cliente: chave invalida")
    );
    Ok(())
}

#[tokio::test]
async fn test_charge_errors_on_success_status_become_bad_gateway() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/customers");
        then.status(200).json_body(json!({ "data": [{ "id": "cus_first" }] }));
    });
    let charge = server.mock(|when, then| {
        when.method(POST).path("/payments");
        then.status(200).json_body(json!({
            "errors": [{ "code": "invalid_customer", "description": "Cliente inválido." }]
        }));
    });

    let orchestrator = orchestrator_for(&server, Some("test-key"))?;
    let response = orchestrator.handle("POST", Some(&checkout_body("PIX", 50.0))).await;

    charge.assert();
    assert_eq!(response.status_code, 502);
    assert_eq!(
        response.checkout_response()?,
        CheckoutResponse::failure("Erro ao gerar cobrança: Cliente inválido.")
    );
    Ok(())
}

#[tokio::test]
async fn test_unreachable_provider_is_an_internal_error_without_tax_id() -> Result<()> {
    // Nothing listens on port 1.
    let config = CheckoutConfig::new(Some("test-key".to_string()), AsaasEnvironment::Sandbox)
        .with_base_url("http://127.0.0.1:1");
    let client = AsaasClient::from_config(&config)?;
    let orchestrator = CheckoutOrchestrator::new(config, client);

    let response = orchestrator.handle("POST", Some(&checkout_body("PIX", 50.0))).await;

    assert_eq!(response.status_code, 500);
    let message = response.checkout_response()?.message.unwrap_or_default();
    assert!(message.starts_with("Erro interno do servidor: "), "{message}");
    assert!(!message.contains("12345678900"), "{message}");
    assert!(!message.contains("cpfCnpj"), "{message}");
    Ok(())
}

#[tokio::test]
async fn test_installment_count_sent_as_text_reaches_provider() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/customers");
        then.status(200).json_body(json!({ "data": [{ "id": "cus_first" }] }));
    });
    let charge = server.mock(|when, then| {
        when.method(POST).path("/payments").json_body_partial(
            r#"{"customer": "cus_first", "billingType": "CREDIT_CARD", "installmentCount": 3}"#,
        );
        then.status(200).json_body(json!({
            "billingType": "CREDIT_CARD",
            "value": 50.0,
            "invoiceUrl": INVOICE_URL
        }));
    });

    let body = json!({
        "customer": { "name": "Ana", "taxId": "123.456.789-00" },
        "payment": { "billingType": "CREDIT_CARD", "value": 50, "installmentCount": "3" }
    })
    .to_string();

    let orchestrator = orchestrator_for(&server, Some("test-key"))?;
    let response = orchestrator.handle("POST", Some(&body)).await;

    charge.assert();
    assert_eq!(response.status_code, 200);
    Ok(())
}
