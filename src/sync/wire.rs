//! JSON shapes exchanged with the action endpoint.
//!
//! Field names follow the endpoint (`image_url`, `is_completed`, ...). Conversions into
//! the local [`Product`] and [`Supplier`] records live here so nothing else has to know
//! about the remote naming.

use crate::{
    errors::{Error, Result},
    models::{Product, ProductDraft, Supplier},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `GET ?action=get_products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductList {
    pub products: Vec<RemoteProduct>,
}

/// Body of `GET ?action=get_suppliers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierList {
    pub suppliers: Vec<RemoteSupplier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteProduct {
    pub id: i64,
    pub name: String,
    pub article: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub supplier_id: Option<i64>,
    /// Filled by the endpoint's supplier join; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub date_added: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

impl RemoteProduct {
    /// Maps to a local record. A missing `date_added` is taken as "now".
    ///
    /// # Errors
    /// Returns [`Error::Timestamp`] if `date_added` is present but unparseable.
    pub fn into_product(self) -> Result<Product> {
        let date_added = match self.date_added.as_deref() {
            Some(raw) => parse_timestamp(raw)?,
            None => Utc::now(),
        };
        Ok(Product {
            id: self.id,
            name: self.name,
            article: self.article,
            image: self.image_url,
            hint: self.hint,
            sale_price: self.sale_price,
            purchase_price: self.purchase_price,
            quantity: self.quantity.and_then(|q| u32::try_from(q).ok()),
            supplier_id: self.supplier_id,
            date_added,
            is_completed: self.is_completed,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSupplier {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub total_debt: f64,
}

impl RemoteSupplier {
    /// Purchase history is not stored remotely, so it always starts empty.
    #[must_use]
    pub fn into_supplier(self) -> Supplier {
        Supplier {
            id: self.id,
            name: self.name,
            total_debt: self.total_debt,
            products: Vec::new(),
        }
    }
}

/// Fields of `POST {action: "add_product", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub article: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub supplier_id: Option<i64>,
}

impl From<&ProductDraft> for NewProduct {
    fn from(draft: &ProductDraft) -> Self {
        Self {
            name: draft.name.clone(),
            article: draft.article.clone(),
            image_url: draft.image.clone(),
            hint: draft.hint_value(),
            sale_price: draft.sale_price,
            purchase_price: None,
            quantity: Some(draft.effective_quantity()),
            supplier_id: draft.supplier_id,
        }
    }
}

/// Fields of `POST {action: "add_supplier", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    #[serde(default)]
    pub total_debt: f64,
}

/// Every `POST` body, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PostAction {
    AddProduct(NewProduct),
    AddSupplier(NewSupplier),
}

/// Body of `PUT`: the purchase fields of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseUpdate {
    pub id: i64,
    #[serde(default)]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub is_completed: bool,
}

impl From<&Product> for PurchaseUpdate {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            purchase_price: product.purchase_price,
            quantity: product.quantity,
            is_completed: product.is_completed,
        }
    }
}

/// Acknowledgement returned by mutating calls. `id` is set for inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub success: bool,
}

impl Ack {
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            id: None,
            success: true,
        }
    }

    #[must_use]
    pub const fn created(id: i64) -> Self {
        Self {
            id: Some(id),
            success: true,
        }
    }
}

/// Error body, `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Accepts RFC 3339 as well as the zone-less ISO form the endpoint stores,
/// which is taken to be UTC.
///
/// # Errors
/// Returns [`Error::Timestamp`] when neither form matches.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::Timestamp {
            value: raw.to_string(),
        })
}

/// Zone-less ISO form with microseconds, as the endpoint emits it.
#[must_use]
pub fn format_timestamp(naive: NaiveDateTime) -> String {
    naive.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
