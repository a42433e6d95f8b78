//! Embedding provider trait and factory.

use std::sync::Arc;
use zenith_core::config::EmbeddingSettings;
use zenith_core::{AppError, AppResult};

/// Embedding task mode. Retrieval-tuned models produce different vectors for
/// the indexed side and the query side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingTask {
    /// Text being indexed
    Document,
    /// Text being searched for
    Query,
}

/// Trait for embedding providers.
///
/// Contract: `embed_batch` returns exactly one vector per input text, in input
/// order, each of `dimensions()` length. Vectors are unit-normalized, which is
/// what lets the index rank by raw dot product.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "gemini", "mock")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a single provider call.
    async fn embed_batch(&self, texts: &[String], task: EmbeddingTask)
        -> AppResult<Vec<Vec<f32>>>;

    /// Generate the embedding for one query text (convenience method).
    async fn embed_query(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self
            .embed_batch(&[text.to_string()], EmbeddingTask::Query)
            .await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on configuration.
///
/// A missing credential for a provider that requires one is a configuration
/// error; callers should skip indexing entirely rather than retry.
pub fn create_provider(
    settings: &EmbeddingSettings,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match settings.provider.as_str() {
        "gemini" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config(
                    "Gemini provider requires an API key (GOOGLE_API_KEY)".to_string(),
                )
            })?;
            let provider = super::providers::gemini::GeminiProvider::new(
                api_key,
                &settings.model,
                settings.dimensions,
                settings.endpoint.as_deref(),
            );
            Ok(Arc::new(provider))
        }

        "mock" => {
            let provider = super::providers::mock::MockProvider::new(settings.dimensions);
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: gemini, mock",
            settings.provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: &str) -> EmbeddingSettings {
        EmbeddingSettings {
            provider: provider.to_string(),
            model: "text-embedding-004".to_string(),
            dimensions: 768,
            endpoint: None,
        }
    }

    #[test]
    fn test_create_gemini_provider() {
        let provider = create_provider(&settings("gemini"), Some("key")).unwrap();
        assert_eq!(provider.provider_name(), "gemini");
        assert_eq!(provider.model_name(), "text-embedding-004");
        assert_eq!(provider.dimensions(), 768);
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let err = create_provider(&settings("gemini"), None).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_create_mock_provider() {
        let provider = create_provider(&settings("mock"), None).unwrap();
        assert_eq!(provider.provider_name(), "mock");
    }

    #[test]
    fn test_create_unknown_provider() {
        let err = create_provider(&settings("unknown"), None).unwrap_err();
        assert!(err.to_string().contains("Unknown embedding provider"));
    }

    #[tokio::test]
    async fn test_embed_query_default_impl() {
        let provider = create_provider(&settings("mock"), None).unwrap();
        let embedding = provider.embed_query("rice stock").await.unwrap();
        assert_eq!(embedding.len(), 768);
    }
}
