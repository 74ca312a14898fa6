//! Product entity - One row of the endpoint's product table.
//!
//! Pending and completed products share the table; `is_completed` tells them apart.
//! `supplier_id` is not a foreign key: deleting a supplier leaves
//! products pointing at an id that no longer exists.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Hex bolt M8")
    pub name: String,
    /// Article / SKU code printed on the shelf tag
    pub article: String,
    /// Inline `data:` URL of the product photo
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,
    /// Where to find the product in the shop
    #[sea_orm(column_type = "Text", nullable)]
    pub hint: Option<String>,
    pub sale_price: Option<f64>,
    pub purchase_price: Option<f64>,
    /// Units bought, 1 unless stated otherwise
    pub quantity: Option<i64>,
    /// Supplier this product is bought from, if any
    pub supplier_id: Option<i64>,
    /// When the product was put on the list
    pub date_added: DateTime,
    /// Set once purchase price and quantity are filled in and confirmed
    pub is_completed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
