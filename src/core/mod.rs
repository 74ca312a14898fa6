//! Core business logic - framework-agnostic catalog, supplier ledger and database-view operations.
//!
//! Everything in here works on in-memory state only. Network calls live in
//! [`crate::sync`] and are orchestrated by [`crate::app`].

/// Pending shopping list and the completed-purchase database
pub mod catalog;
/// Time-based identifier allocation
pub mod ids;
/// File-to-data-URL encoding for product photos
pub mod image;
/// Suppliers, their purchase history and running debt
pub mod ledger;
/// Filtering, sorting and day-grouping of completed purchases
pub mod search;

pub use catalog::{Catalog, CatalogSummary};
pub use ledger::SupplierLedger;
pub use search::{DatabaseQuery, SortMode};
