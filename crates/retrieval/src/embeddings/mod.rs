//! Embedding generation for the retrieval index.
//!
//! Provider-agnostic: the index consumes the [`EmbeddingProvider`] trait and
//! never constructs a concrete provider itself.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider, EmbeddingTask};
