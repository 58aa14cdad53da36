//! Catalog domain module.
//!
//! This crate contains the product entity and its business rules, implemented
//! purely as deterministic domain logic (no IO, no storage).

pub mod product;
pub mod validate;

pub use product::{Product, ProductKind, ProductPatch};
pub use validate::{is_valid_date, is_valid_kind, parse_price, parse_quantity};
