//! REST API endpoints.

use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kgrag_core::GraphReader;
use kgrag_rag::{BuildReport, EngineStats, RagError, Strategy};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::error;

/// Query request body.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    3
}

/// Query response.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub answers: Vec<String>,
    /// Wall-clock seconds spent answering.
    pub time_taken: f64,
}

/// Rebuild response.
#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    pub generation: u64,
    pub indexed: usize,
    pub report: BuildReport,
    pub time_taken: f64,
}

/// Reload response.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub nodes_merged: usize,
    pub edges_merged: usize,
    pub entities_skipped: usize,
    pub edges_skipped: usize,
    pub generation: u64,
}

/// Stats response.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub engine: EngineStats,
    pub graph_nodes: usize,
    pub graph_edges: usize,
}

/// Error body: `{"error": "..."}` with a status derived from the cause.
#[derive(Debug)]
pub struct ApiError(RagError);

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            RagError::IndexNotReady => StatusCode::SERVICE_UNAVAILABLE,
            RagError::Embedding(_) | RagError::Generation(_) | RagError::GenerationTimeout(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

async fn answer(state: &AppState, req: QueryRequest, strategy: Strategy) -> Result<Json<QueryResponse>, ApiError> {
    let started = Instant::now();
    let answers = state.engine.query(&req.question, req.top_k, strategy).await?;
    Ok(Json(QueryResponse {
        answers,
        time_taken: started.elapsed().as_secs_f64(),
    }))
}

/// Answer from the precomputed index.
pub async fn lazy_rag(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    answer(&state, req, Strategy::Precomputed).await
}

/// Answer by re-embedding the graph for this request.
pub async fn naive_rag(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    answer(&state, req, Strategy::Naive).await
}

/// Rebuild the index from the current graph.
pub async fn rebuild(State(state): State<AppState>) -> Result<Json<RebuildResponse>, ApiError> {
    let started = Instant::now();
    let snapshot = state.engine.rebuild().await?;
    Ok(Json(RebuildResponse {
        generation: snapshot.generation,
        indexed: snapshot.catalog.len(),
        report: snapshot.catalog.report(),
        time_taken: started.elapsed().as_secs_f64(),
    }))
}

/// Re-read the records file into a cleared graph, then rebuild.
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let (report, generation) = state.reload().await?;
    Ok(Json(ReloadResponse {
        nodes_merged: report.nodes_merged,
        edges_merged: report.edges_merged,
        entities_skipped: report.entities_skipped,
        edges_skipped: report.edges_skipped,
        generation,
    }))
}

/// Engine and graph statistics.
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let graph_nodes = state.graph.node_count().map_err(RagError::from)?;
    let graph_edges = state.graph.edge_count().map_err(RagError::from)?;
    Ok(Json(StatsResponse {
        engine: state.engine.stats(),
        graph_nodes,
        graph_edges,
    }))
}
