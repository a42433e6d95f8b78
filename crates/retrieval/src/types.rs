//! Retrieval document types.

use serde::{Deserialize, Serialize};

/// Origin row type of a document. Informational only, never used in ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    StockItem,
    Order,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StockItem => "stock_item",
            Self::Order => "order",
        }
    }
}

/// One retrievable unit: the text rendering of a source row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Origin row primary key, unique within one index snapshot
    pub id: String,

    /// Human-readable rendering of the origin row
    pub content: String,

    /// Origin row type
    pub kind: DocumentKind,
}

/// A document paired with its similarity score for one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}
