//! Supplier entity - A counterparty goods are bought from on credit.
//!
//! Only the running debt is stored; the per-purchase history lives on the client.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    /// Unique identifier for the supplier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the supplier
    pub name: String,
    /// Outstanding debt in the shop's currency
    pub total_debt: f64,
    /// When the supplier was registered
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
