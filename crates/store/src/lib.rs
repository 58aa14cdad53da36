//! Persistence layer: the repository contract and its two backends.
//!
//! The contract is identical regardless of backend: a flat JSON document
//! ([`JsonStore`]) and a relational table ([`SqliteStore`]) are
//! interchangeable behind the [`ProductStore`] trait. "Already exists" and
//! "not found" are reported as outcome values, not errors, so callers can
//! tell an operation that was refused from one that crashed.

use async_trait::async_trait;
use thiserror::Error;

use stockroom_catalog::{Product, ProductPatch};
use stockroom_core::DomainError;

pub mod json;
pub mod sqlite;

pub use json::JsonStore;
pub use sqlite::SqliteStore;

/// Storage-layer error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A supplied value failed domain validation; nothing was persisted.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Filesystem failure while writing the JSON document.
    #[error("inventory file io: {0}")]
    Io(#[from] std::io::Error),

    /// The in-memory collection could not be serialized.
    #[error("inventory file encode: {0}")]
    Encode(#[from] serde_json::Error),

    /// Database round-trip failure.
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted record could not be mapped back to a product.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Outcome of [`ProductStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// A product with the same name already exists; the add was a no-op.
    AlreadyExists,
}

/// Outcome of [`ProductStore::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
    /// The patch renames the product to a name that is already taken.
    NameTaken,
}

/// Outcome of [`ProductStore::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Repository contract shared by both backends.
///
/// Every mutating operation persists before returning; there is no batching
/// and no in-memory-only mode. Lookups are exact and case-sensitive on the
/// product name.
#[async_trait]
pub trait ProductStore: Send {
    /// Persist a new product, unless its name is already taken.
    async fn add(&mut self, product: Product) -> Result<AddOutcome, StoreError>;

    /// Fetch a product by name.
    async fn get(&self, name: &str) -> Result<Option<Product>, StoreError>;

    /// Apply a partial update to the named product.
    ///
    /// A validation failure (e.g. a malformed expiration date) aborts the
    /// whole update; nothing is written.
    async fn update(&mut self, name: &str, patch: &ProductPatch)
        -> Result<UpdateOutcome, StoreError>;

    /// Remove the named product.
    async fn delete(&mut self, name: &str) -> Result<DeleteOutcome, StoreError>;

    /// Every product in storage, in backend-defined order.
    async fn list_all(&self) -> Result<Vec<Product>, StoreError>;
}
