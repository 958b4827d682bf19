//! HTTP API: the chat entry point (exposed on two equivalent paths) and
//! the health endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::agent::Agent;
use crate::config::Config;
use crate::error::AgentError;
use crate::graph::{GraphSchema, GraphStore, Neo4jHttpStore};
use crate::llm::OpenRouterClient;
use crate::tools::{Calculator, GraphQueryTool, ToolRegistry};

mod types;

pub use types::{AgentAction, ChatRequest, ChatResponse, HealthResponse, TraceStep};

/// Shared read-only state: the agent and the store handle used by the
/// health probe. Each request owns its own trace.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<Agent>,
    pub store: Arc<dyn GraphStore>,
}

/// Build the router. `/chat` and `/api/generate-query` expose the same
/// contract.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/api/generate-query", post(chat))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire up the collaborators from config and serve the API.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let llm = Arc::new(OpenRouterClient::new(
        config.api_key.clone(),
        config.model.clone(),
        config.llm_timeout,
        config.llm_max_concurrency,
    )?);
    let store: Arc<dyn GraphStore> = Arc::new(Neo4jHttpStore::new(&config.store)?);
    let schema = Arc::new(GraphSchema::nba());

    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(GraphQueryTool::new(
        llm.clone(),
        store.clone(),
        schema.clone(),
    )));
    tools.register(Arc::new(Calculator));

    let agent = Arc::new(Agent::new(llm, tools, schema, config.max_iterations));
    let state = AppState { agent, store };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let request_id = Uuid::new_v4();
    info!(%request_id, question = %request.question, "answering question");

    match state.agent.answer(&request.question).await {
        Ok(outcome) => Ok(Json(outcome.into())),
        Err(AgentError::Upstream(message)) => {
            error!(%request_id, %message, "request aborted");
            Err((StatusCode::BAD_GATEWAY, message))
        }
    }
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                store: "connected".to_string(),
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded".to_string(),
                store: e.to_string(),
            }),
        ),
    }
}
