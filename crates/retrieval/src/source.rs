//! Data source capability and row rendering.
//!
//! The retrieval engine never talks to the database directly; it consumes a
//! `DataSource` that returns the current full set of source rows, grouped by
//! category. Each row is rendered with a fixed template into one `Document`.

use crate::types::{Document, DocumentKind};
use chrono::NaiveDate;
use zenith_core::AppResult;

/// One row from the stock item table.
#[derive(Debug, Clone)]
pub struct StockItemRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub current_stock: i64,
    pub unit: String,
    pub expiry_date: Option<NaiveDate>,
}

/// One row from the order table.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: String,
    pub customer_name: String,
    pub status: String,
    pub priority: String,
}

/// The full current set of source rows, grouped by category.
#[derive(Debug, Clone, Default)]
pub struct SourceRows {
    pub stock_items: Vec<StockItemRow>,
    pub orders: Vec<OrderRow>,
}

impl SourceRows {
    pub fn is_empty(&self) -> bool {
        self.stock_items.is_empty() && self.orders.is_empty()
    }

    /// Render every row into a document, stock items first.
    pub fn into_documents(self) -> Vec<Document> {
        let mut documents = Vec::with_capacity(self.stock_items.len() + self.orders.len());

        for item in self.stock_items {
            documents.push(render_stock_item(&item));
        }
        for order in self.orders {
            documents.push(render_order(&order));
        }

        documents
    }
}

/// Trait for the row-fetch collaborator.
///
/// A failed fetch must not partially apply: implementations return either the
/// complete current row set or an error.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_rows(&self) -> AppResult<SourceRows>;
}

fn render_stock_item(item: &StockItemRow) -> Document {
    let expiry = item
        .expiry_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    Document {
        id: item.id.clone(),
        content: format!(
            "Stock Item: {} | Category: {} | Level: {} {} | Expiry: {}",
            item.name, item.category, item.current_stock, item.unit, expiry
        ),
        kind: DocumentKind::StockItem,
    }
}

fn render_order(order: &OrderRow) -> Document {
    Document {
        id: order.id.clone(),
        content: format!(
            "Order for {} | Status: {} | Priority: {}",
            order.customer_name, order.status, order.priority
        ),
        kind: DocumentKind::Order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_stock_item() {
        let item = StockItemRow {
            id: "s1".to_string(),
            name: "Basmati Rice".to_string(),
            category: "Grains".to_string(),
            current_stock: 40,
            unit: "kg".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2026, 3, 15),
        };

        let doc = render_stock_item(&item);
        assert_eq!(doc.id, "s1");
        assert_eq!(doc.kind, DocumentKind::StockItem);
        assert_eq!(
            doc.content,
            "Stock Item: Basmati Rice | Category: Grains | Level: 40 kg | Expiry: 2026-03-15"
        );
    }

    #[test]
    fn test_render_stock_item_without_expiry() {
        let item = StockItemRow {
            id: "s2".to_string(),
            name: "Steel Bolts".to_string(),
            category: "Hardware".to_string(),
            current_stock: 1200,
            unit: "pcs".to_string(),
            expiry_date: None,
        };

        let doc = render_stock_item(&item);
        assert!(doc.content.ends_with("Expiry: N/A"));
    }

    #[test]
    fn test_render_order() {
        let order = OrderRow {
            id: "o1".to_string(),
            customer_name: "Acme Traders".to_string(),
            status: "PENDING".to_string(),
            priority: "HIGH".to_string(),
        };

        let doc = render_order(&order);
        assert_eq!(doc.kind, DocumentKind::Order);
        assert_eq!(
            doc.content,
            "Order for Acme Traders | Status: PENDING | Priority: HIGH"
        );
    }

    #[test]
    fn test_into_documents_orders_after_stock() {
        let rows = SourceRows {
            stock_items: vec![StockItemRow {
                id: "s1".to_string(),
                name: "Rice".to_string(),
                category: "Grains".to_string(),
                current_stock: 1,
                unit: "kg".to_string(),
                expiry_date: None,
            }],
            orders: vec![OrderRow {
                id: "o1".to_string(),
                customer_name: "Acme".to_string(),
                status: "PENDING".to_string(),
                priority: "LOW".to_string(),
            }],
        };

        let docs = rows.into_documents();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].kind, DocumentKind::StockItem);
        assert_eq!(docs[1].kind, DocumentKind::Order);
    }

    #[test]
    fn test_is_empty() {
        assert!(SourceRows::default().is_empty());
    }
}
