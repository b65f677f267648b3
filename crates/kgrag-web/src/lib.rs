//! # kgrag Web
//!
//! HTTP front end for a [`RetrievalEngine`](kgrag_rag::RetrievalEngine).
//!
//! ## API Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/lazy_rag` | Answer from the precomputed index |
//! | POST | `/naive_rag` | Answer after re-embedding the whole graph |
//! | POST | `/api/rebuild` | Rebuild the index from the current graph |
//! | POST | `/api/reload` | Re-read the records file, reload the graph, rebuild |
//! | GET | `/api/stats` | Engine and graph statistics |
//!
//! Query bodies are `{"question": "...", "top_k": 3}`; responses are
//! `{"answers": [...], "time_taken": <seconds>}`.

pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;

use tracing::info;

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Serving retrieval API");
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
