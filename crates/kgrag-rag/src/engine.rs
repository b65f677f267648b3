//! Retrieval engine: index lifecycle and the query pipeline.
//!
//! The engine owns the current [`IndexSnapshot`] behind a reader/writer lock.
//! A build runs entirely outside that lock and only takes the write side to
//! swap the finished snapshot in, so queries never wait on a rebuild and
//! never see a half-built catalog. Each query clones the snapshot `Arc` once
//! and works against that generation until it returns.

use crate::catalog::{BuildReport, IndexCatalog, RankedNode};
use crate::context::NeighborhoodContextBuilder;
use crate::error::{RagError, RagResult};
use crate::generator::AnswerGenerator;
use futures::stream::{self, StreamExt};
use kgrag_core::GraphReader;
use kgrag_embeddings::Embedder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Returned as the sole answer when no candidate produced one.
pub const NO_RELEVANT_INFORMATION: &str = "No relevant information found.";

/// How candidates are ranked for a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Search the prebuilt index. Requires a completed build.
    #[default]
    #[serde(alias = "lazy")]
    Precomputed,
    /// Embed every node again for this query and search the throwaway result.
    Naive,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Precomputed => f.write_str("precomputed"),
            Strategy::Naive => f.write_str("naive"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "precomputed" | "lazy" => Ok(Strategy::Precomputed),
            "naive" => Ok(Strategy::Naive),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

/// Whether the engine can serve precomputed queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Uninitialized,
    Ready,
}

/// Engine tuning.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Candidates per query when the caller does not say.
    pub top_k: usize,
    /// Strategy used by [`RetrievalEngine::query_default`].
    pub strategy: Strategy,
    /// Candidate pipelines in flight at once.
    pub concurrency: usize,
    /// Upper bound on a single generation call.
    pub generation_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            strategy: Strategy::Precomputed,
            concurrency: 4,
            generation_timeout: Duration::from_secs(60),
        }
    }
}

impl EngineConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }
}

/// One completed build: the catalog plus its generation number.
#[derive(Debug)]
pub struct IndexSnapshot {
    pub catalog: IndexCatalog,
    /// 1 for the first build, incremented by every rebuild.
    pub generation: u64,
    pub build_time: Duration,
}

/// Point-in-time engine statistics.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub state: EngineState,
    pub generation: u64,
    pub indexed: usize,
    pub dimension: usize,
    pub model: String,
    pub last_build: Option<BuildReport>,
    pub last_build_ms: Option<u64>,
}

/// Answers questions against a knowledge graph.
pub struct RetrievalEngine {
    embedder: Arc<dyn Embedder>,
    reader: Arc<dyn GraphReader>,
    generator: Arc<dyn AnswerGenerator>,
    contexts: NeighborhoodContextBuilder,
    config: EngineConfig,
    snapshot: RwLock<Option<Arc<IndexSnapshot>>>,
    build_lock: Mutex<()>,
}

impl RetrievalEngine {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        reader: Arc<dyn GraphReader>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self::with_config(embedder, reader, generator, EngineConfig::default())
    }

    pub fn with_config(
        embedder: Arc<dyn Embedder>,
        reader: Arc<dyn GraphReader>,
        generator: Arc<dyn AnswerGenerator>,
        config: EngineConfig,
    ) -> Self {
        Self {
            embedder,
            reader,
            generator,
            contexts: NeighborhoodContextBuilder::new(),
            config,
            snapshot: RwLock::new(None),
            build_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current snapshot, if a build has completed.
    pub fn snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn state(&self) -> EngineState {
        match self.snapshot() {
            Some(_) => EngineState::Ready,
            None => EngineState::Uninitialized,
        }
    }

    /// Number of completed builds; 0 before the first.
    pub fn generation(&self) -> u64 {
        self.snapshot().map_or(0, |s| s.generation)
    }

    pub fn stats(&self) -> EngineStats {
        match self.snapshot() {
            Some(s) => EngineStats {
                state: EngineState::Ready,
                generation: s.generation,
                indexed: s.catalog.len(),
                dimension: s.catalog.dimension(),
                model: s.catalog.model().to_string(),
                last_build: Some(s.catalog.report()),
                last_build_ms: Some(s.build_time.as_millis() as u64),
            },
            None => EngineStats {
                state: EngineState::Uninitialized,
                generation: 0,
                indexed: 0,
                dimension: self.embedder.dimension(),
                model: self.embedder.model_name().to_string(),
                last_build: None,
                last_build_ms: None,
            },
        }
    }

    /// Build the index and make it the current snapshot.
    ///
    /// Builds are serialised. A failed build leaves the previous snapshot
    /// in place.
    pub async fn build_index(&self) -> RagResult<Arc<IndexSnapshot>> {
        let _guard = self.build_lock.lock().await;
        let started = Instant::now();

        let catalog = self.build_catalog().await?;
        let generation = self.generation() + 1;
        let snapshot = Arc::new(IndexSnapshot {
            catalog,
            generation,
            build_time: started.elapsed(),
        });

        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));

        info!(
            generation,
            indexed = snapshot.catalog.len(),
            elapsed_ms = snapshot.build_time.as_millis() as u64,
            "Index ready"
        );
        Ok(snapshot)
    }

    /// Replace the current index with a fresh build from the graph.
    pub async fn rebuild(&self) -> RagResult<Arc<IndexSnapshot>> {
        self.build_index().await
    }

    /// Answer `question` from up to `k` retrieved nodes.
    ///
    /// Answers are in ascending distance order. A candidate is skipped when
    /// its node has vanished, its neighbourhood read fails, or its
    /// generation fails or times out. When nothing survives the result is
    /// `[NO_RELEVANT_INFORMATION]`.
    ///
    /// Only structural errors ([`RagError::is_structural`]) are returned.
    /// A question the embedder rejects or cannot reach yields no candidates.
    pub async fn query(&self, question: &str, k: usize, strategy: Strategy) -> RagResult<Vec<String>> {
        let started = Instant::now();

        let candidates = match self.rank(question, k, strategy).await {
            Ok(candidates) => candidates,
            Err(e) if e.is_structural() => return Err(e),
            Err(e) => {
                warn!(%strategy, error = %e, "Retrieval failed, no candidates");
                Vec::new()
            }
        };
        debug!(%strategy, k, candidates = candidates.len(), "Ranked candidates");

        let answers: Vec<String> = stream::iter(candidates)
            .map(|candidate| self.answer_candidate(question, candidate))
            .buffered(self.config.concurrency.max(1))
            .filter_map(|answer| async move { answer })
            .collect()
            .await;

        info!(
            %strategy,
            answers = answers.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Query complete"
        );

        if answers.is_empty() {
            return Ok(vec![NO_RELEVANT_INFORMATION.to_string()]);
        }
        Ok(answers)
    }

    async fn rank(&self, question: &str, k: usize, strategy: Strategy) -> RagResult<Vec<RankedNode>> {
        match strategy {
            Strategy::Precomputed => {
                let snapshot = self.snapshot().ok_or(RagError::IndexNotReady)?;
                let query_vector = self.embed_question(question).await?;
                snapshot.catalog.search(&query_vector, k)
            }
            Strategy::Naive => {
                let query_vector = self.embed_question(question).await?;
                let catalog = self.build_catalog().await?;
                catalog.search(&query_vector, k)
            }
        }
    }

    /// [`query`](Self::query) with the configured `top_k` and strategy.
    pub async fn query_default(&self, question: &str) -> RagResult<Vec<String>> {
        self.query(question, self.config.top_k, self.config.strategy)
            .await
    }

    async fn build_catalog(&self) -> RagResult<IndexCatalog> {
        let reader = Arc::clone(&self.reader);
        let embedder = Arc::clone(&self.embedder);
        tokio::task::spawn_blocking(move || IndexCatalog::build(reader.as_ref(), embedder.as_ref()))
            .await?
    }

    async fn embed_question(&self, question: &str) -> RagResult<Vec<f32>> {
        let embedder = Arc::clone(&self.embedder);
        let question = question.to_string();
        let vector = tokio::task::spawn_blocking(move || {
            let vector = embedder.embed(&question)?;
            embedder.check_dimension(&vector)?;
            Ok::<_, kgrag_embeddings::EmbeddingError>(vector)
        })
        .await??;
        Ok(vector)
    }

    async fn answer_candidate(&self, question: &str, candidate: RankedNode) -> Option<String> {
        match self.try_answer(question, &candidate).await {
            Ok(Some(answer)) => Some(answer),
            Ok(None) => {
                warn!(node = %candidate.node_id, "Node no longer in graph, skipping");
                None
            }
            Err(e) => {
                warn!(node = %candidate.node_id, error = %e, "Skipping candidate");
                None
            }
        }
    }

    async fn try_answer(&self, question: &str, candidate: &RankedNode) -> RagResult<Option<String>> {
        let reader = Arc::clone(&self.reader);
        let contexts = self.contexts;
        let node_id = candidate.node_id.clone();
        let context =
            tokio::task::spawn_blocking(move || contexts.build(&node_id, reader.as_ref())).await??;

        let Some(context) = context else {
            return Ok(None);
        };

        let rendered = context.render();
        let limit = self.config.generation_timeout;
        let answer = tokio::time::timeout(limit, self.generator.generate(question, &rendered))
            .await
            .map_err(|_| RagError::GenerationTimeout(limit.as_secs()))??;

        debug!(node = %candidate.node_id, distance = candidate.distance, "Generated answer");
        Ok(Some(answer))
    }
}
