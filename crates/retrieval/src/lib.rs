//! In-memory retrieval engine for the Zenith AI backend.
//!
//! Builds text representations of inventory and order rows, embeds them via a
//! hosted provider, and serves nearest-neighbor lookups against a query
//! embedding. Index state lives in a single atomic snapshot: built at startup,
//! rebuilt on demand, queried concurrently with rebuilds.

pub mod embeddings;
pub mod index;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use embeddings::{create_provider, EmbeddingProvider, EmbeddingTask};
pub use index::RetrievalIndex;
pub use source::{DataSource, OrderRow, SourceRows, StockItemRow};
pub use types::{Document, DocumentKind, ScoredDocument};
