//! Gemini embedding provider.
//!
//! Uses the `batchEmbedContents` endpoint of the Generative Language API:
//! https://ai.google.dev/api/embeddings
//!
//! The reference model (`text-embedding-004`) returns unit-normalized vectors,
//! which the retrieval index relies on for dot-product ranking.

use crate::embeddings::provider::{EmbeddingProvider, EmbeddingTask};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use zenith_core::{AppError, AppResult};

const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// One entry of a batchEmbedContents request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    model: String,
    content: Content,
    task_type: &'static str,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

impl EmbeddingTask {
    fn as_gemini_task_type(self) -> &'static str {
        match self {
            EmbeddingTask::Document => "RETRIEVAL_DOCUMENT",
            EmbeddingTask::Query => "RETRIEVAL_QUERY",
        }
    }
}

/// Gemini embedding provider using the hosted API.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// `endpoint` overrides the API base URL (used in tests).
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
        endpoint: Option<&str>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: endpoint.unwrap_or(DEFAULT_GEMINI_URL).to_string(),
            api_key: api_key.into(),
            model: model.into(),
            dimensions,
        }
    }

    fn batch_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:batchEmbedContents",
            self.base_url, self.model
        )
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for GeminiProvider {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        task: EmbeddingTask,
    ) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(
            "Embedding {} texts with Gemini (model: {}, task: {:?})",
            texts.len(),
            self.model,
            task
        );

        let body = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: format!("models/{}", self.model),
                    content: Content {
                        parts: vec![Part { text: text.clone() }],
                    },
                    task_type: task.as_gemini_task_type(),
                })
                .collect(),
        };

        let response = self
            .client
            .post(self.batch_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to send request to Gemini: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Embedding(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let batch: BatchEmbedResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("Failed to parse Gemini response: {}", e)))?;

        if batch.embeddings.len() != texts.len() {
            return Err(AppError::Embedding(format!(
                "Gemini returned {} embeddings for {} inputs",
                batch.embeddings.len(),
                texts.len()
            )));
        }

        let mut vectors = Vec::with_capacity(batch.embeddings.len());
        for embedding in batch.embeddings {
            if embedding.values.len() != self.dimensions {
                return Err(AppError::Embedding(format!(
                    "Unexpected embedding dimensions: got {}, expected {}",
                    embedding.values.len(),
                    self.dimensions
                )));
            }
            vectors.push(embedding.values);
        }

        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server_uri: &str, dimensions: usize) -> GeminiProvider {
        GeminiProvider::new("test-key", "text-embedding-004", dimensions, Some(server_uri))
    }

    #[tokio::test]
    async fn test_embed_batch_preserves_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/text-embedding-004:batchEmbedContents"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "requests": [
                    {"taskType": "RETRIEVAL_DOCUMENT"},
                    {"taskType": "RETRIEVAL_DOCUMENT"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": [
                    {"values": [1.0, 0.0]},
                    {"values": [0.0, 1.0]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server.uri(), 2);
        let texts = vec!["first".to_string(), "second".to_string()];
        let vectors = provider
            .embed_batch(&texts, EmbeddingTask::Document)
            .await
            .unwrap();

        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn test_embed_query_uses_query_task_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/text-embedding-004:batchEmbedContents"))
            .and(body_partial_json(serde_json::json!({
                "requests": [{"taskType": "RETRIEVAL_QUERY"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": [{"values": [0.6, 0.8]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server.uri(), 2);
        let embedding = provider.embed_query("rice stock level").await.unwrap();
        assert_eq!(embedding, vec![0.6, 0.8]);
    }

    #[tokio::test]
    async fn test_embed_batch_rejects_count_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": [{"values": [1.0, 0.0]}]
            })))
            .mount(&server)
            .await;

        let provider = provider(&server.uri(), 2);
        let texts = vec!["a".to_string(), "b".to_string()];
        let err = provider
            .embed_batch(&texts, EmbeddingTask::Document)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("1 embeddings for 2 inputs"));
    }

    #[tokio::test]
    async fn test_embed_batch_rejects_dimension_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": [{"values": [1.0, 0.0, 0.0]}]
            })))
            .mount(&server)
            .await;

        let provider = provider(&server.uri(), 2);
        let texts = vec!["a".to_string()];
        let err = provider
            .embed_batch(&texts, EmbeddingTask::Document)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[tokio::test]
    async fn test_embed_batch_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let provider = provider(&server.uri(), 2);
        let err = provider
            .embed_batch(&["a".to_string()], EmbeddingTask::Document)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("403"));
        assert!(!err.is_configuration());
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_call() {
        let server = MockServer::start().await;
        // No mocks mounted: any request would 404 and fail the parse below.
        let provider = provider(&server.uri(), 2);
        let vectors = provider
            .embed_batch(&[], EmbeddingTask::Document)
            .await
            .unwrap();
        assert!(vectors.is_empty());
    }
}
