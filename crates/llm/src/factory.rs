//! Chat completion provider factory.
//!
//! Resolves a provider identifier plus credentials into a client instance.
//! A missing credential is a configuration error, not a transient failure:
//! callers treat it as "chat disabled" rather than retrying.

use crate::client::LlmClient;
use crate::providers::GroqClient;
use std::sync::Arc;
use zenith_core::{AppError, AppResult};

/// Create a chat completion client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("groq")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key for providers that require one
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "groq" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("Groq provider requires an API key (GROQ_API_KEY)".to_string())
            })?;
            let client = match endpoint {
                Some(endpoint) => GroqClient::with_base_url(api_key, endpoint),
                None => GroqClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        _ => Err(AppError::Config(format!(
            "Unknown chat provider: {}. Supported: groq",
            provider
        ))),
    }
}
