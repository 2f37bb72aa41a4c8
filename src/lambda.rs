use asaas_checkout::utils::{logger, validation::Validate};
use asaas_checkout::{AsaasClient, CheckoutConfig, CheckoutOrchestrator, FunctionEvent, FunctionResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

async fn function_handler(
    orchestrator: &CheckoutOrchestrator<AsaasClient>,
    event: LambdaEvent<FunctionEvent>,
) -> Result<FunctionResponse, Error> {
    tracing::info!("Checkout invocation {}", event.context.request_id);
    Ok(orchestrator.handle_event(event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // Loaded once per cold start and shared read-only by every invocation.
    let config = CheckoutConfig::from_env()?;
    config.validate()?;
    tracing::info!(
        "Checkout function ready ({} at {}, {})",
        config.environment,
        config.api_url(),
        config.customer_strategy
    );

    let client = AsaasClient::from_config(&config)?;
    let orchestrator = CheckoutOrchestrator::new(config, client);
    let orchestrator = &orchestrator;

    run(service_fn(move |event: LambdaEvent<FunctionEvent>| async move {
        function_handler(orchestrator, event).await
    }))
    .await
}
