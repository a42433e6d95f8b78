//! The in-memory retrieval index.
//!
//! Owns one immutable snapshot of documents and their embedding vectors.
//! `rebuild()` replaces the snapshot wholesale; `query()` ranks the stored
//! vectors against a query embedding by dot product. At the scale this serves
//! (tens to low thousands of rows) a full scan is adequate.

use crate::embeddings::{EmbeddingProvider, EmbeddingTask};
use crate::source::DataSource;
use crate::types::{Document, ScoredDocument};
use std::sync::{Arc, RwLock};
use zenith_core::{AppError, AppResult};

/// One generation of index state: a same-length pairing of documents and
/// their vectors, where `vectors[i]` embeds `documents[i].content`. Never
/// mutated after publication, only replaced as a whole.
#[derive(Debug, Default)]
struct IndexSnapshot {
    documents: Vec<Document>,
    vectors: Vec<Vec<f32>>,
}

impl IndexSnapshot {
    fn len(&self) -> usize {
        self.documents.len()
    }

    fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// The retrieval engine.
///
/// The embedding provider and the data source are injected capabilities; the
/// index owns neither. A `None` provider means embeddings are not configured,
/// in which case `rebuild()` is a logged no-op.
pub struct RetrievalIndex {
    snapshot: RwLock<Arc<IndexSnapshot>>,
    provider: Option<Arc<dyn EmbeddingProvider>>,
    source: Arc<dyn DataSource>,
    default_top_k: usize,
}

impl RetrievalIndex {
    /// Create an index with an empty snapshot. Call [`rebuild`](Self::rebuild)
    /// to populate it.
    pub fn new(
        provider: Option<Arc<dyn EmbeddingProvider>>,
        source: Arc<dyn DataSource>,
        default_top_k: usize,
    ) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(IndexSnapshot::default())),
            provider,
            source,
            default_top_k,
        }
    }

    /// Number of documents in the current snapshot.
    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// Fetch all source rows, re-embed them, and atomically replace the
    /// snapshot. Returns the number of documents in the index after the call.
    ///
    /// Failure policy: a data source or provider error propagates to the
    /// caller and leaves the previous snapshot intact. An empty fetch is a
    /// no-op rather than an index wipe, so a transient empty read never
    /// destroys a usable index. A missing provider configuration is absorbed
    /// with a log line.
    pub async fn rebuild(&self) -> AppResult<usize> {
        let Some(provider) = &self.provider else {
            tracing::warn!("Skipping indexing: embedding provider not configured");
            return Ok(self.len());
        };

        tracing::info!("Fetching data for indexing");
        let rows = self.source.fetch_rows().await?;

        if rows.is_empty() {
            tracing::info!("No data to index; keeping existing snapshot");
            return Ok(self.len());
        }

        let documents = rows.into_documents();
        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();

        tracing::info!(
            "Indexing {} documents with provider '{}' (model: {})",
            documents.len(),
            provider.provider_name(),
            provider.model_name()
        );

        let vectors = provider.embed_batch(&texts, EmbeddingTask::Document).await?;

        if vectors.len() != documents.len() {
            return Err(AppError::Embedding(format!(
                "Provider returned {} vectors for {} documents",
                vectors.len(),
                documents.len()
            )));
        }

        let next = Arc::new(IndexSnapshot { documents, vectors });
        let indexed = next.len();

        // Single atomic replacement: concurrent queries observe either the
        // previous complete snapshot or this one, never a mix.
        *self.snapshot.write().unwrap() = next;

        tracing::info!("Indexing complete ({} documents)", indexed);
        Ok(indexed)
    }

    /// Rank indexed documents against `text` and return the top
    /// `min(k, len)` by descending dot-product score, ties broken by
    /// original index order.
    ///
    /// An empty index returns an empty Vec without calling the provider.
    pub async fn query(&self, text: &str, k: usize) -> AppResult<Vec<ScoredDocument>> {
        let snapshot = self.current();
        if snapshot.is_empty() {
            return Ok(Vec::new());
        }

        let provider = self.provider.as_ref().ok_or_else(|| {
            AppError::Config("Embedding provider not configured".to_string())
        })?;

        let query_vector = provider.embed_query(text).await?;

        let mut ranked: Vec<(usize, f32)> = snapshot
            .vectors
            .iter()
            .map(|vector| dot(&query_vector, vector))
            .enumerate()
            .collect();

        // Stable ordering: score descending, then original index ascending
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);

        tracing::debug!(
            "Query matched {} of {} documents (k={})",
            ranked.len(),
            snapshot.len(),
            k
        );

        Ok(ranked
            .into_iter()
            .map(|(i, score)| ScoredDocument {
                document: snapshot.documents[i].clone(),
                score,
            })
            .collect())
    }

    /// [`query`](Self::query) with the configured default `k`.
    pub async fn query_default(&self, text: &str) -> AppResult<Vec<ScoredDocument>> {
        self.query(text, self.default_top_k).await
    }

    /// Clone the current snapshot handle. The read lock is held only for the
    /// Arc clone; scoring happens against the immutable snapshot outside it.
    fn current(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&self.snapshot.read().unwrap())
    }
}

/// Dot product of two vectors. Valid as a similarity ranking because the
/// provider contract guarantees unit-normalized vectors; a provider that does
/// not normalize would need cosine similarity here instead.
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
