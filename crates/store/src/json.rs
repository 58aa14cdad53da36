//! Flat-file JSON backend.
//!
//! The whole collection lives in one pretty-printed JSON document and is
//! loaded eagerly at construction. Every mutation serializes the full
//! in-memory collection and atomically replaces the file (write to a sibling
//! temp file, then rename), so a crash mid-write never truncates the
//! document.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use stockroom_catalog::{Product, ProductPatch};
use stockroom_core::DomainResult;

use crate::{AddOutcome, DeleteOutcome, ProductStore, StoreError, UpdateOutcome};

/// JSON-document-backed product store.
pub struct JsonStore {
    path: PathBuf,
    products: Vec<Product>,
}

impl JsonStore {
    /// Open the store, loading the collection from `path`.
    ///
    /// A missing file starts an empty collection (the first save creates
    /// it). An unreadable or undecodable file also starts empty, with a
    /// warning; note that the next save then overwrites whatever was there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let products = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<Product>>(&raw) {
                Ok(records) => match revalidate(records) {
                    Ok(products) => {
                        tracing::info!(path = %path.display(), count = products.len(), "loaded inventory");
                        products
                    }
                    Err(error) => {
                        tracing::warn!(path = %path.display(), %error, "inventory file holds an invalid record; starting empty");
                        Vec::new()
                    }
                },
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "inventory file is not valid JSON; starting empty");
                    Vec::new()
                }
            },
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "inventory file not found; it will be created on first save");
                Vec::new()
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "inventory file unreadable; starting empty");
                Vec::new()
            }
        };
        Self { path, products }
    }

    /// Rewrite the whole document from the in-memory collection.
    fn save(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(&self.products)?;
        // Temp file in the same directory so the rename stays on one
        // filesystem.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.products.iter().position(|p| p.name() == name)
    }
}

/// Rebuild every loaded record through the validating constructor.
///
/// Deserialization alone does not enforce the entity invariants, so a
/// hand-edited document could otherwise smuggle in a negative price or a
/// blank name.
fn revalidate(records: Vec<Product>) -> DomainResult<Vec<Product>> {
    records
        .into_iter()
        .map(|p| {
            Product::from_parts(
                p.id(),
                p.name().to_string(),
                p.price(),
                p.stock_quantity(),
                p.kind().clone(),
            )
        })
        .collect()
}

#[async_trait]
impl ProductStore for JsonStore {
    async fn add(&mut self, product: Product) -> Result<AddOutcome, StoreError> {
        if self.position(product.name()).is_some() {
            return Ok(AddOutcome::AlreadyExists);
        }
        self.products.push(product);
        if let Err(e) = self.save() {
            // Keep the in-memory collection consistent with the file.
            self.products.pop();
            return Err(e);
        }
        Ok(AddOutcome::Added)
    }

    async fn get(&self, name: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.position(name).map(|idx| self.products[idx].clone()))
    }

    async fn update(
        &mut self,
        name: &str,
        patch: &ProductPatch,
    ) -> Result<UpdateOutcome, StoreError> {
        let Some(idx) = self.position(name) else {
            return Ok(UpdateOutcome::NotFound);
        };
        if let Some(new_name) = &patch.name {
            if new_name != name && self.position(new_name).is_some() {
                return Ok(UpdateOutcome::NameTaken);
            }
        }
        let mut updated = self.products[idx].clone();
        updated.apply(patch)?;
        let previous = std::mem::replace(&mut self.products[idx], updated);
        if let Err(e) = self.save() {
            self.products[idx] = previous;
            return Err(e);
        }
        Ok(UpdateOutcome::Updated)
    }

    async fn delete(&mut self, name: &str) -> Result<DeleteOutcome, StoreError> {
        let Some(idx) = self.position(name) else {
            return Ok(DeleteOutcome::NotFound);
        };
        let removed = self.products.remove(idx);
        if let Err(e) = self.save() {
            self.products.insert(idx, removed);
            return Err(e);
        }
        Ok(DeleteOutcome::Deleted)
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        // Insertion order, as read from the file.
        Ok(self.products.clone())
    }
}
