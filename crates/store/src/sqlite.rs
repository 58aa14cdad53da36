//! Relational backend (SQLite via sqlx).
//!
//! One wide `products` table holds both kinds, with nullable columns for the
//! kind-specific fields and a `kind` discriminator; the unused column stays
//! NULL. Each CRUD call is one parameterized statement, auto-committed.
//!
//! Connecting is a startup precondition: the caller is expected to treat a
//! connect failure as fatal rather than retry per-operation.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use stockroom_catalog::{Product, ProductKind, ProductPatch};
use stockroom_core::ProductId;

use crate::{AddOutcome, DeleteOutcome, ProductStore, StoreError, UpdateOutcome};

/// Idempotent DDL, run on every startup.
const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id              VARCHAR(36) PRIMARY KEY,
    name            TEXT NOT NULL,
    price           DECIMAL(10, 2) NOT NULL,
    stock_quantity  INTEGER NOT NULL,
    warranty        VARCHAR(50),
    expiration_date VARCHAR(10),
    kind            VARCHAR(50) NOT NULL
)
"#;

/// Relational product store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to the database at `url` and ensure the table exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        // The store is owned by a single process instance; one connection is
        // enough, and for in-memory databases it is required (every sqlite
        // `:memory:` connection is its own database).
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .connect(url)
            .await?;
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        tracing::info!(%url, "connected to product database");
        Ok(Self { pool })
    }

    /// Close the connection pool. Called once, at normal program exit.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            "SELECT id, name, price, stock_quantity, warranty, expiration_date, kind \
             FROM products WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| decode_row(&r)).transpose()
    }
}

fn decode_row(row: &SqliteRow) -> Result<Product, StoreError> {
    let id: String = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let price: f64 = row.try_get("price")?;
    let stock_quantity: i64 = row.try_get("stock_quantity")?;
    let warranty: Option<String> = row.try_get("warranty")?;
    let expiration_date: Option<String> = row.try_get("expiration_date")?;
    let kind: String = row.try_get("kind")?;

    let id: ProductId = id
        .parse()
        .map_err(|e| StoreError::Corrupt(format!("bad id for {name:?}: {e}")))?;
    let stock_quantity = u32::try_from(stock_quantity)
        .map_err(|_| StoreError::Corrupt(format!("negative stock for {name:?}")))?;
    let kind = match kind.as_str() {
        "hardware" => ProductKind::Hardware {
            warranty: warranty
                .ok_or_else(|| StoreError::Corrupt(format!("hardware row {name:?} has no warranty")))?,
        },
        "software" => ProductKind::Software {
            expiration_date: expiration_date.ok_or_else(|| {
                StoreError::Corrupt(format!("software row {name:?} has no expiration date"))
            })?,
        },
        other => {
            return Err(StoreError::Corrupt(format!(
                "unknown kind {other:?} for {name:?}"
            )));
        }
    };

    Product::from_parts(id, name, price, stock_quantity, kind)
        .map_err(|e| StoreError::Corrupt(e.to_string()))
}

#[async_trait]
impl ProductStore for SqliteStore {
    async fn add(&mut self, product: Product) -> Result<AddOutcome, StoreError> {
        if self.fetch_by_name(product.name()).await?.is_some() {
            return Ok(AddOutcome::AlreadyExists);
        }
        sqlx::query(
            "INSERT INTO products (id, name, price, stock_quantity, warranty, expiration_date, kind) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(product.id().to_string())
        .bind(product.name())
        .bind(product.price())
        .bind(i64::from(product.stock_quantity()))
        .bind(product.warranty())
        .bind(product.expiration_date())
        .bind(product.kind().label())
        .execute(&self.pool)
        .await?;
        Ok(AddOutcome::Added)
    }

    async fn get(&self, name: &str) -> Result<Option<Product>, StoreError> {
        self.fetch_by_name(name).await
    }

    async fn update(
        &mut self,
        name: &str,
        patch: &ProductPatch,
    ) -> Result<UpdateOutcome, StoreError> {
        let Some(mut product) = self.fetch_by_name(name).await? else {
            return Ok(UpdateOutcome::NotFound);
        };
        if let Some(new_name) = &patch.name {
            if new_name != name && self.fetch_by_name(new_name).await?.is_some() {
                return Ok(UpdateOutcome::NameTaken);
            }
        }
        product.apply(patch)?;

        // The whole row is rewritten in one statement.
        sqlx::query(
            "UPDATE products \
             SET name = ?, price = ?, stock_quantity = ?, warranty = ?, expiration_date = ? \
             WHERE name = ?",
        )
        .bind(product.name())
        .bind(product.price())
        .bind(i64::from(product.stock_quantity()))
        .bind(product.warranty())
        .bind(product.expiration_date())
        .bind(name)
        .execute(&self.pool)
        .await?;
        Ok(UpdateOutcome::Updated)
    }

    async fn delete(&mut self, name: &str) -> Result<DeleteOutcome, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, price, stock_quantity, warranty, expiration_date, kind FROM products",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(decode_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    fn mouse() -> Product {
        Product::hardware("Mouse", 19.99, 10, "1").unwrap()
    }

    #[tokio::test]
    async fn ddl_is_idempotent() {
        let store = memory_store().await;
        // Re-running the startup DDL on the live pool must not fail.
        sqlx::query(CREATE_TABLE).execute(&store.pool).await.unwrap();
    }

    #[tokio::test]
    async fn add_then_get_round_trips_every_field() {
        let mut store = memory_store().await;
        let product = mouse();
        assert_eq!(store.add(product.clone()).await.unwrap(), AddOutcome::Added);

        let fetched = store.get("Mouse").await.unwrap().unwrap();
        assert_eq!(fetched, product);
    }

    #[tokio::test]
    async fn software_rows_round_trip_too() {
        let mut store = memory_store().await;
        let product = Product::software("Editor", 49.0, 3, "31/12/2999").unwrap();
        store.add(product.clone()).await.unwrap();
        assert_eq!(store.get("Editor").await.unwrap().unwrap(), product);
    }

    #[tokio::test]
    async fn duplicate_add_is_a_reported_no_op() {
        let mut store = memory_store().await;
        store.add(mouse()).await.unwrap();
        let outcome = store
            .add(Product::hardware("Mouse", 5.0, 1, "0").unwrap())
            .await
            .unwrap();
        assert_eq!(outcome, AddOutcome::AlreadyExists);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
        // The original row is untouched.
        assert_eq!(store.get("Mouse").await.unwrap().unwrap().price(), 19.99);
    }

    #[tokio::test]
    async fn delete_reports_not_found_for_unknown_names() {
        let mut store = memory_store().await;
        assert_eq!(
            store.delete("Mouse").await.unwrap(),
            DeleteOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn quantity_only_update_leaves_the_rest_of_the_row() {
        let mut store = memory_store().await;
        store.add(mouse()).await.unwrap();

        let patch = ProductPatch {
            stock_quantity: Some(5),
            ..Default::default()
        };
        assert_eq!(
            store.update("Mouse", &patch).await.unwrap(),
            UpdateOutcome::Updated
        );

        let product = store.get("Mouse").await.unwrap().unwrap();
        assert_eq!(product.stock_quantity(), 5);
        assert_eq!(product.price(), 19.99);
        assert_eq!(product.warranty(), Some("1"));
    }

    #[tokio::test]
    async fn update_of_unknown_name_reports_not_found() {
        let mut store = memory_store().await;
        let patch = ProductPatch {
            price: Some(1.0),
            ..Default::default()
        };
        assert_eq!(
            store.update("Mouse", &patch).await.unwrap(),
            UpdateOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn rename_collisions_are_refused() {
        let mut store = memory_store().await;
        store.add(mouse()).await.unwrap();
        store
            .add(Product::hardware("Keyboard", 29.99, 4, "2").unwrap())
            .await
            .unwrap();

        let patch = ProductPatch {
            name: Some("Mouse".to_string()),
            ..Default::default()
        };
        assert_eq!(
            store.update("Keyboard", &patch).await.unwrap(),
            UpdateOutcome::NameTaken
        );
    }

    #[tokio::test]
    async fn malformed_date_update_writes_nothing() {
        let mut store = memory_store().await;
        store
            .add(Product::software("Editor", 49.0, 3, "31/12/2999").unwrap())
            .await
            .unwrap();

        let patch = ProductPatch {
            price: Some(1.0),
            expiration_date: Some("31/31/2024".to_string()),
            ..Default::default()
        };
        store.update("Editor", &patch).await.unwrap_err();

        let product = store.get("Editor").await.unwrap().unwrap();
        assert_eq!(product.price(), 49.0);
        assert_eq!(product.expiration_date(), Some("31/12/2999"));
    }

    #[tokio::test]
    async fn unknown_kind_rows_surface_as_corrupt() {
        let store = memory_store().await;
        sqlx::query(
            "INSERT INTO products (id, name, price, stock_quantity, warranty, expiration_date, kind) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(ProductId::new().to_string())
        .bind("Gadget")
        .bind(1.0_f64)
        .bind(1_i64)
        .bind(Option::<String>::None)
        .bind(Option::<String>::None)
        .bind("firmware")
        .execute(&store.pool)
        .await
        .unwrap();

        let err = store.get("Gadget").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
