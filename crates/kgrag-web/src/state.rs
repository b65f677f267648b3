//! Application state for the web server.

use kgrag_core::{GraphError, InMemoryGraph, LoadReport, StructuredData};
use kgrag_rag::{RagError, RetrievalEngine};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RetrievalEngine>,
    /// The store the engine reads from; written only by reload.
    pub graph: Arc<InMemoryGraph>,
    /// Records file used by `/api/reload`.
    pub data_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(engine: Arc<RetrievalEngine>, graph: Arc<InMemoryGraph>) -> Self {
        Self {
            engine,
            graph,
            data_path: None,
        }
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Replace the graph with the records file's contents and rebuild.
    pub async fn reload(&self) -> Result<(LoadReport, u64), RagError> {
        let path = self
            .data_path
            .clone()
            .ok_or_else(|| GraphError::InvalidFormat("no records file configured".to_string()))?;

        let graph = Arc::clone(&self.graph);
        let report = tokio::task::spawn_blocking(move || {
            let data = StructuredData::from_json_file(&path)?;
            graph.clear()?;
            graph.load(&data)
        })
        .await??;

        let snapshot = self.engine.rebuild().await?;
        info!(
            nodes = report.nodes_merged,
            edges = report.edges_merged,
            generation = snapshot.generation,
            "Graph reloaded"
        );
        Ok((report, snapshot.generation))
    }
}
