//! Chat completion crate for the Zenith AI backend.
//!
//! This crate provides a provider-agnostic abstraction for hosted chat
//! completion APIs through a unified trait-based interface.
//!
//! # Providers
//! - **Groq**: hosted OpenAI-compatible completion API (default)
//!
//! # Example
//! ```no_run
//! use zenith_llm::{ChatMessage, ChatRequest, LlmClient, providers::GroqClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GroqClient::new("api-key");
//! let request = ChatRequest::new("openai/gpt-oss-120b")
//!     .with_system("You are a helpful assistant.")
//!     .with_user("Hello!");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{ChatMessage, ChatRequest, ChatResponse, ChatRole, ChatUsage, LlmClient};
pub use factory::create_client;
pub use providers::GroqClient;
