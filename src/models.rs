//! Plain domain records shared by the catalog, the supplier ledger and the sync layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An item on the shopping list, or (once sent) in the purchase database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, assigned by the endpoint when it returns one
    pub id: i64,
    /// Display name (e.g., "Hex bolt M8")
    pub name: String,
    /// Article / SKU code
    pub article: String,
    /// Inline `data:` URL, never a separate asset reference.
    pub image: Option<String>,
    /// Free text telling the buyer where to find the item.
    pub hint: Option<String>,
    /// Price the shop sells at
    pub sale_price: Option<f64>,
    /// Price paid per unit
    pub purchase_price: Option<f64>,
    /// Units bought
    pub quantity: Option<u32>,
    /// Weak reference. Deleting the supplier leaves this id dangling.
    pub supplier_id: Option<i64>,
    /// When the product was put on the list
    pub date_added: DateTime<Utc>,
    /// Set once purchase data is filled in and confirmed
    pub is_completed: bool,
}

impl Product {
    /// Purchase price and quantity are both present and non-zero.
    #[must_use]
    pub fn has_purchase_data(&self) -> bool {
        is_set_price(self.purchase_price) && self.quantity.is_some_and(|q| q > 0)
    }

    /// `purchase_price * quantity`, treating missing values as zero.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.purchase_price.unwrap_or(0.0) * f64::from(self.quantity.unwrap_or(0))
    }
}

/// A price counts as filled in when it is present, non-zero and not NaN.
pub(crate) fn is_set_price(price: Option<f64>) -> bool {
    price.is_some_and(|p| p.abs() > 0.0)
}

/// One line in a supplier's purchase history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseEntry {
    /// Product the entry was posted for
    pub product_id: i64,
    /// Product name at posting time
    pub name: String,
    /// Product article at posting time
    pub article: String,
    /// Price paid per unit
    pub purchase_price: f64,
    /// Units bought
    pub quantity: u32,
    /// When the purchase was posted
    pub date: DateTime<Utc>,
}

impl PurchaseEntry {
    /// `purchase_price * quantity`
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.purchase_price * f64::from(self.quantity)
    }
}

/// A counterparty that goods are bought from on credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique identifier
    pub id: i64,
    /// Trimmed display name
    pub name: String,
    /// Outstanding amount owed
    pub total_debt: f64,
    /// Purchase history. Append-only.
    pub products: Vec<PurchaseEntry>,
}

/// State of the "add product" form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    /// Display name, required
    pub name: String,
    /// Article code, required
    pub article: String,
    /// Location hint; empty means none
    pub hint: String,
    /// Confirmed inline image
    pub image: Option<String>,
    /// Image picked but not yet confirmed.
    pub image_preview: Option<String>,
    /// Price the shop sells at
    pub sale_price: Option<f64>,
    /// Units to buy, 1 when absent or zero
    pub quantity: Option<u32>,
    /// Supplier to buy from
    pub supplier_id: Option<i64>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            article: String::new(),
            hint: String::new(),
            image: None,
            image_preview: None,
            sale_price: None,
            quantity: Some(1),
            supplier_id: None,
        }
    }
}

impl ProductDraft {
    /// Empty form with the given name and article.
    pub fn new(name: impl Into<String>, article: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            article: article.into(),
            ..Self::default()
        }
    }

    /// Stages an encoded image for confirmation.
    pub fn preview_image(&mut self, data_url: String) {
        self.image_preview = Some(data_url);
    }

    /// Attaches the staged image. The preview stays visible until the draft is submitted.
    pub fn confirm_image(&mut self) -> bool {
        match &self.image_preview {
            Some(preview) => {
                self.image = Some(preview.clone());
                true
            }
            None => false,
        }
    }

    /// Drops the staged image.
    pub fn cancel_image(&mut self) {
        self.image_preview = None;
    }

    /// Quantity to record on the product: the draft value, or 1 when absent or zero.
    #[must_use]
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.filter(|q| *q > 0).unwrap_or(1)
    }

    pub(crate) fn hint_value(&self) -> Option<String> {
        if self.hint.is_empty() {
            None
        } else {
            Some(self.hint.clone())
        }
    }
}

/// Partial update of a pending product. `Some` overwrites, `None` keeps the current value.
///
/// The completion flag can only be set through [`crate::core::Catalog::complete_product`],
/// which checks the purchase data first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    /// New display name
    pub name: Option<String>,
    /// New article code
    pub article: Option<String>,
    /// New inline image
    pub image: Option<String>,
    /// New location hint
    pub hint: Option<String>,
    /// New sale price
    pub sale_price: Option<f64>,
    /// Price paid per unit
    pub purchase_price: Option<f64>,
    /// Units bought
    pub quantity: Option<u32>,
    /// Supplier the product is bought from
    pub supplier_id: Option<i64>,
    pub(crate) is_completed: Option<bool>,
}

impl ProductPatch {
    /// Fills in the purchase price and quantity.
    #[must_use]
    pub fn purchase(purchase_price: f64, quantity: u32) -> Self {
        Self {
            purchase_price: Some(purchase_price),
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    #[must_use]
    pub(crate) fn completed() -> Self {
        Self {
            is_completed: Some(true),
            ..Self::default()
        }
    }

    /// Overwrites every field given in the patch.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(article) = self.article {
            product.article = article;
        }
        if let Some(image) = self.image {
            product.image = Some(image);
        }
        if let Some(hint) = self.hint {
            product.hint = Some(hint);
        }
        if let Some(price) = self.sale_price {
            product.sale_price = Some(price);
        }
        if let Some(price) = self.purchase_price {
            product.purchase_price = Some(price);
        }
        if let Some(quantity) = self.quantity {
            product.quantity = Some(quantity);
        }
        if let Some(supplier_id) = self.supplier_id {
            product.supplier_id = Some(supplier_id);
        }
        if let Some(done) = self.is_completed {
            product.is_completed = done;
        }
    }
}
