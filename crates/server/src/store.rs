//! Postgres implementations of the data capabilities.
//!
//! `PgDataSource` feeds the retrieval index from the `StockItem` and `Order`
//! tables; `PgTaskStore` carries the agentic task-creation side effect.
//! Enum columns are cast to text in SQL so no Postgres enum type mapping is
//! needed on the Rust side.

use sqlx::postgres::PgPool;
use sqlx::Row;
use zenith_core::{AppError, AppResult};
use zenith_retrieval::{DataSource, OrderRow, SourceRows, StockItemRow};

/// Capability for the task-creation side effect. A collaborator of the chat
/// handler, not of the retrieval engine.
#[async_trait::async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new pending task and return its id.
    async fn create_task(&self, title: &str, priority: &str, description: &str)
        -> AppResult<String>;
}

/// Data source backed by the Postgres operations database.
pub struct PgDataSource {
    pool: PgPool,
}

impl PgDataSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DataSource for PgDataSource {
    async fn fetch_rows(&self) -> AppResult<SourceRows> {
        let stock_rows = sqlx::query(
            r#"SELECT id, name, category, "currentStock", unit, "expiryDate" FROM "StockItem""#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        let stock_items = stock_rows
            .into_iter()
            .map(|row| -> Result<StockItemRow, sqlx::Error> {
                Ok(StockItemRow {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    category: row.try_get("category")?,
                    current_stock: i64::from(row.try_get::<i32, _>("currentStock")?),
                    unit: row.try_get("unit")?,
                    expiry_date: row
                        .try_get::<Option<chrono::NaiveDateTime>, _>("expiryDate")?
                        .map(|dt| dt.date()),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_err)?;

        let order_rows = sqlx::query(
            r#"SELECT id, "customerName", status::text AS status, priority::text AS priority FROM "Order""#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        let orders = order_rows
            .into_iter()
            .map(|row| -> Result<OrderRow, sqlx::Error> {
                Ok(OrderRow {
                    id: row.try_get("id")?,
                    customer_name: row.try_get("customerName")?,
                    status: row.try_get("status")?,
                    priority: row.try_get("priority")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_err)?;

        tracing::debug!(
            "Fetched {} stock items and {} orders",
            stock_items.len(),
            orders.len()
        );

        Ok(SourceRows {
            stock_items,
            orders,
        })
    }
}

/// Task store backed by the Postgres operations database.
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TaskStore for PgTaskStore {
    async fn create_task(
        &self,
        title: &str,
        priority: &str,
        description: &str,
    ) -> AppResult<String> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO "Task" (id, title, description, priority, status, "updatedAt")
            VALUES ($1, $2, $3, $4::"Priority", 'PENDING', NOW())
            "#,
        )
        .bind(&id)
        .bind(title)
        .bind(description)
        .bind(priority.to_uppercase())
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        tracing::info!("Created task '{}' ({})", title, id);
        Ok(id)
    }
}

fn store_err(err: sqlx::Error) -> AppError {
    AppError::Store(err.to_string())
}
