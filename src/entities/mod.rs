//! Entity module - SeaORM entity definitions for the endpoint's tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod product;
pub mod supplier;

// Re-export specific types to avoid conflicts
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use supplier::{Column as SupplierColumn, Entity as Supplier, Model as SupplierModel};
