//! Bizflow API server entry point.

use std::sync::Arc;

use bizflow_agents::application::config::load_agent_definitions;
use bizflow_agents::application::default_agents::default_agents;
use bizflow_agents::infrastructure::openai::OpenAiCompletionClient;
use bizflow_agents::infrastructure::unconfigured::UnconfiguredCompletionService;
use bizflow_api::config::AppConfig;
use bizflow_api::error::AppError;
use bizflow_api::state::AppState;
use bizflow_api::{app, telemetry};
use bizflow_core::clock::SystemClock;
use bizflow_core::completion::CompletionService;
use bizflow_core::mutation::MutationSink;
use bizflow_propagation::application::mutations::LoggingMutationSink;
use bizflow_runtime::ReactiveCore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting bizflow API server");

    let completion: Arc<dyn CompletionService> = match &config.llm_api_key {
        Some(api_key) => Arc::new(OpenAiCompletionClient::new(
            config.llm_base_url.clone(),
            api_key.clone(),
            config.llm_timeout,
        )?),
        None => {
            tracing::warn!("LLM_API_KEY not set; agent invocations will fail");
            Arc::new(UnconfiguredCompletionService)
        }
    };
    let agents = match &config.agents_config {
        Some(path) => load_agent_definitions(path)?,
        None => default_agents(),
    };
    let mutations: Arc<dyn MutationSink> = Arc::new(LoggingMutationSink);

    let core = Arc::new(ReactiveCore::start_with_agents(
        &config.core,
        Arc::new(SystemClock),
        completion,
        &mutations,
        agents,
    ));

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let router = app(AppState::new(Arc::clone(&core)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    core.shutdown();
    telemetry.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
