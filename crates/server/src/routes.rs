//! HTTP routes for the Zenith AI backend.
//!
//! The routing layer is thin plumbing: retrieval, completion, and the task
//! side effect all live behind capability traits on [`AppState`], so handlers
//! are testable with in-memory fakes.

use crate::{intent, prompt, store::TaskStore};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use zenith_core::config::ChatSettings;
use zenith_core::AppError;
use zenith_llm::{ChatRequest, LlmClient};
use zenith_retrieval::RetrievalIndex;

/// Shared state for all request handlers.
pub struct AppState {
    pub index: Arc<RetrievalIndex>,
    /// None when the chat provider credential is missing
    pub llm: Option<Arc<dyn LlmClient>>,
    pub tasks: Arc<dyn TaskStore>,
    pub chat: ChatSettings,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    pub message: String,

    /// Optional client-side context object; accepted for API compatibility
    /// but unused by the backend.
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponseBody {
    pub response: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IndexBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

type HandlerError = (StatusCode, Json<ErrorBody>);

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/ai/chat", post(chat))
        .route("/api/ai/index", post(reindex))
        .with_state(state)
}

/// Liveness probe.
async fn root() -> Json<StatusBody> {
    Json(StatusBody {
        status: "online",
        message: "Zenith AI backend is running",
    })
}

/// One chat turn: retrieve context, check for an action intent, otherwise
/// synthesize an answer with the completion provider.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, HandlerError> {
    let context_docs = state
        .index
        .query_default(&request.message)
        .await
        .map_err(into_handler_error)?;

    let llm = state.llm.as_ref().ok_or_else(|| {
        into_handler_error(AppError::Config("Groq API key not configured".to_string()))
    })?;

    if let Some(title) = intent::parse_task_intent(&request.message) {
        match state
            .tasks
            .create_task(&title, "HIGH", "Created by AI Agent")
            .await
        {
            Ok(_id) => {
                return Ok(Json(ChatResponseBody {
                    response: format!(
                        "I've created a new HIGH priority task: '{}'. You can view it in the Tasks panel.",
                        title
                    ),
                    sources: vec!["action:create_task".to_string()],
                }));
            }
            // Intent-action failures fall through to the normal RAG path
            Err(err) => tracing::warn!("Task creation failed: {}", err),
        }
    }

    let llm_request = ChatRequest::new(&state.chat.model)
        .with_system(prompt::build_system_prompt(&context_docs))
        .with_user(&request.message)
        .with_temperature(state.chat.temperature);

    let completion = llm
        .complete(&llm_request)
        .await
        .map_err(into_handler_error)?;

    Ok(Json(ChatResponseBody {
        response: completion.content,
        sources: context_docs
            .iter()
            .map(|d| d.document.id.clone())
            .collect(),
    }))
}

/// Trigger a re-index of the database into the vector store.
pub async fn reindex(
    State(state): State<Arc<AppState>>,
) -> Result<Json<IndexBody>, HandlerError> {
    let indexed = state.index.rebuild().await.map_err(into_handler_error)?;

    Ok(Json(IndexBody {
        message: format!("Indexing triggered successfully ({} documents)", indexed),
    }))
}

fn into_handler_error(err: AppError) -> HandlerError {
    let status = if err.is_configuration() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    tracing::error!("Request failed: {}", err);
    (
        status,
        Json(ErrorBody {
            detail: err.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use zenith_core::AppResult;
    use zenith_llm::{ChatResponse, ChatUsage};
    use zenith_retrieval::{
        create_provider, DataSource, OrderRow, SourceRows, StockItemRow,
    };
    use zenith_core::config::EmbeddingSettings;

    #[derive(Debug)]
    struct FakeLlm {
        reply: String,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl LlmClient for FakeLlm {
        fn provider_name(&self) -> &str {
            "fake"
        }

        async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(!request.messages.is_empty());
            Ok(ChatResponse {
                content: self.reply.clone(),
                model: request.model.clone(),
                usage: ChatUsage::default(),
            })
        }
    }

    struct FakeTaskStore {
        created: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl TaskStore for FakeTaskStore {
        async fn create_task(
            &self,
            title: &str,
            priority: &str,
            _description: &str,
        ) -> AppResult<String> {
            if self.fail {
                return Err(AppError::Store("insert failed".to_string()));
            }
            self.created
                .lock()
                .unwrap()
                .push((title.to_string(), priority.to_string()));
            Ok("task-1".to_string())
        }
    }

    struct MemorySource {
        rows: SourceRows,
    }

    #[async_trait::async_trait]
    impl DataSource for MemorySource {
        async fn fetch_rows(&self) -> AppResult<SourceRows> {
            Ok(self.rows.clone())
        }
    }

    fn sample_rows() -> SourceRows {
        SourceRows {
            stock_items: vec![StockItemRow {
                id: "s1".to_string(),
                name: "Basmati Rice".to_string(),
                category: "Grains".to_string(),
                current_stock: 40,
                unit: "kg".to_string(),
                expiry_date: None,
            }],
            orders: vec![OrderRow {
                id: "o1".to_string(),
                customer_name: "Acme Traders".to_string(),
                status: "PENDING".to_string(),
                priority: "HIGH".to_string(),
            }],
        }
    }

    async fn state_with(
        llm: Option<Arc<FakeLlm>>,
        tasks: Arc<FakeTaskStore>,
        rebuild: bool,
    ) -> Arc<AppState> {
        let settings = EmbeddingSettings {
            provider: "mock".to_string(),
            model: "hash-v1".to_string(),
            dimensions: 64,
            endpoint: None,
        };
        let provider = create_provider(&settings, None).unwrap();
        let source = Arc::new(MemorySource {
            rows: sample_rows(),
        });
        let index = Arc::new(RetrievalIndex::new(Some(provider), source, 3));
        if rebuild {
            index.rebuild().await.unwrap();
        }

        Arc::new(AppState {
            index,
            llm: llm.map(|l| l as Arc<dyn LlmClient>),
            tasks,
            chat: ChatSettings::default(),
        })
    }

    fn fake_llm(reply: &str) -> Arc<FakeLlm> {
        Arc::new(FakeLlm {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    fn fake_tasks(fail: bool) -> Arc<FakeTaskStore> {
        Arc::new(FakeTaskStore {
            created: Mutex::new(Vec::new()),
            fail,
        })
    }

    #[tokio::test]
    async fn test_chat_returns_answer_and_sources() {
        let llm = fake_llm("Rice stock is at 40 kg.");
        let state = state_with(Some(llm.clone()), fake_tasks(false), true).await;

        let response = chat(
            State(state),
            Json(ChatRequestBody {
                message: "How much rice do we have?".to_string(),
                context: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.0.response, "Rice stock is at 40 kg.");
        assert_eq!(response.0.sources.len(), 2);
        assert!(response.0.sources.contains(&"s1".to_string()));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chat_without_provider_is_bad_request() {
        let state = state_with(None, fake_tasks(false), true).await;

        let err = chat(
            State(state),
            Json(ChatRequestBody {
                message: "hello".to_string(),
                context: None,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_task_intent_creates_task() {
        let llm = fake_llm("unused");
        let tasks = fake_tasks(false);
        let state = state_with(Some(llm.clone()), tasks.clone(), true).await;

        let response = chat(
            State(state),
            Json(ChatRequestBody {
                message: "create task restock flour".to_string(),
                context: None,
            }),
        )
        .await
        .unwrap();

        assert!(response.0.response.contains("Restock flour"));
        assert_eq!(response.0.sources, vec!["action:create_task".to_string()]);

        let created = tasks.created.lock().unwrap();
        assert_eq!(created.as_slice(), &[("Restock flour".to_string(), "HIGH".to_string())]);
        // The completion provider is bypassed on an action turn
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_chat_task_failure_falls_back_to_rag() {
        let llm = fake_llm("Could not create the task, but here is the data.");
        let state = state_with(Some(llm.clone()), fake_tasks(true), true).await;

        let response = chat(
            State(state),
            Json(ChatRequestBody {
                message: "create task restock flour".to_string(),
                context: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
        assert_ne!(response.0.sources, vec!["action:create_task".to_string()]);
    }

    #[tokio::test]
    async fn test_chat_on_empty_index_has_no_sources() {
        let llm = fake_llm("I could not find that in the data.");
        let state = state_with(Some(llm), fake_tasks(false), false).await;

        let response = chat(
            State(state),
            Json(ChatRequestBody {
                message: "How much rice do we have?".to_string(),
                context: None,
            }),
        )
        .await
        .unwrap();

        assert!(response.0.sources.is_empty());
    }

    #[tokio::test]
    async fn test_reindex_reports_document_count() {
        let state = state_with(None, fake_tasks(false), false).await;

        let response = reindex(State(state.clone())).await.unwrap();
        assert!(response.0.message.contains("2 documents"));
        assert_eq!(state.index.len(), 2);
    }
}
