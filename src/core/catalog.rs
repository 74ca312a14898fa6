//! Catalog business logic - the pending shopping list and the completed-purchase database.
//!
//! A product is added to the pending list, has its purchase price and quantity filled
//! in, is marked completed, and is finally sent to the database. Sending moves every
//! completed product into the completed list and posts linked purchases to the
//! [`SupplierLedger`].

use crate::{
    core::{ids::IdSequence, ledger::SupplierLedger},
    errors::{Error, Result},
    models::{Product, ProductDraft, ProductPatch},
};
use chrono::Utc;

/// Totals shown over the completed-purchase database.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CatalogSummary {
    /// Sum of quantities.
    pub total_quantity: u64,
    /// Sum of `purchase_price * quantity`.
    pub total_purchases: f64,
}

/// Pending and completed products.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    pending: Vec<Product>,
    completed: Vec<Product>,
    ids: IdSequence,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Products still on the shopping list, in insertion order.
    #[must_use]
    pub fn pending(&self) -> &[Product] {
        &self.pending
    }

    /// Products already sent to the database.
    #[must_use]
    pub fn completed(&self) -> &[Product] {
        &self.completed
    }

    #[must_use]
    pub fn get(&self, product_id: i64) -> Option<&Product> {
        self.pending.iter().find(|p| p.id == product_id)
    }

    /// Index of a pending product in the shopping list.
    #[must_use]
    pub fn position(&self, product_id: i64) -> Option<usize> {
        self.pending.iter().position(|p| p.id == product_id)
    }

    /// Creates a pending product from the draft and resets the draft.
    ///
    /// # Errors
    /// Returns a validation error if the name or article is blank, or
    /// [`Error::InvalidAmount`] for a negative or non-finite sale price.
    /// The draft is left untouched on error.
    pub fn add_product(&mut self, draft: &mut ProductDraft) -> Result<&Product> {
        self.insert_from_draft(None, draft)
    }

    /// Same as [`Catalog::add_product`], optionally under an id assigned elsewhere.
    pub(crate) fn insert_from_draft(
        &mut self,
        id: Option<i64>,
        draft: &mut ProductDraft,
    ) -> Result<&Product> {
        validate_draft(draft)?;
        let id = match id {
            Some(id) => {
                self.ids.observe(id);
                id
            }
            None => self.ids.next_id()?,
        };

        let product = Product {
            id,
            name: draft.name.clone(),
            article: draft.article.clone(),
            image: draft.image.clone(),
            hint: draft.hint_value(),
            sale_price: draft.sale_price,
            purchase_price: None,
            quantity: Some(draft.effective_quantity()),
            supplier_id: draft.supplier_id,
            date_added: Utc::now(),
            is_completed: false,
        };
        self.pending.push(product);
        *draft = ProductDraft::default();

        Ok(&self.pending[self.pending.len() - 1])
    }

    /// Merges the patch into a pending product. Only existence is checked.
    ///
    /// # Errors
    /// Returns [`Error::ProductNotFound`] if no pending product has this id.
    pub fn update_product(&mut self, product_id: i64, patch: ProductPatch) -> Result<&Product> {
        let product = self
            .pending
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(Error::ProductNotFound { id: product_id })?;
        patch.apply(product);
        Ok(product)
    }

    /// Removes a pending product.
    ///
    /// # Errors
    /// Returns [`Error::ProductNotFound`] if no pending product has this id.
    pub fn delete_product(&mut self, product_id: i64) -> Result<Product> {
        let index = self
            .position(product_id)
            .ok_or(Error::ProductNotFound { id: product_id })?;
        Ok(self.pending.remove(index))
    }

    /// Marks a pending product as bought.
    ///
    /// # Errors
    /// Returns [`Error::ProductNotFound`] for an unknown id, or a validation error
    /// if the purchase price or quantity is missing or zero.
    pub fn complete_product(&mut self, product_id: i64) -> Result<&Product> {
        let product = self
            .get(product_id)
            .ok_or(Error::ProductNotFound { id: product_id })?;
        if !product.has_purchase_data() {
            return Err(Error::validation(
                "Purchase price and quantity are required to complete a product",
            ));
        }
        self.update_product(product_id, ProductPatch::completed())
    }

    /// Number of pending products ready to be sent.
    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.pending.iter().filter(|p| p.is_completed).count()
    }

    /// Moves every completed pending product into the database and posts
    /// supplier-linked purchases to the ledger. Returns how many products moved.
    ///
    /// # Errors
    /// Returns a validation error if no pending product is completed.
    pub fn send_to_database(&mut self, ledger: &mut SupplierLedger) -> Result<usize> {
        if self.ready_count() == 0 {
            return Err(Error::validation("No completed products to send"));
        }

        let (done, still_pending): (Vec<Product>, Vec<Product>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|p| p.is_completed);
        self.pending = still_pending;

        for product in &done {
            ledger.post_purchase(product);
        }
        let moved = done.len();
        self.completed.extend(done);
        Ok(moved)
    }

    /// Totals over the completed list.
    #[must_use]
    pub fn summary(&self) -> CatalogSummary {
        self.completed
            .iter()
            .fold(CatalogSummary::default(), |acc, p| CatalogSummary {
                total_quantity: acc.total_quantity + u64::from(p.quantity.unwrap_or(0)),
                total_purchases: acc.total_purchases + p.line_total(),
            })
    }

    /// Replaces both lists, as done after a full reload.
    pub fn replace(&mut self, pending: Vec<Product>, completed: Vec<Product>) {
        for product in pending.iter().chain(&completed) {
            self.ids.observe(product.id);
        }
        self.pending = pending;
        self.completed = completed;
    }

    /// Puts a pending product back exactly as it was, e.g. after a failed sync.
    /// A product that was removed is reinserted at `position`.
    pub(crate) fn restore(&mut self, snapshot: Product, position: usize) {
        match self.pending.iter_mut().find(|p| p.id == snapshot.id) {
            Some(product) => *product = snapshot,
            None => {
                let position = position.min(self.pending.len());
                self.pending.insert(position, snapshot);
            }
        }
    }
}

pub(crate) fn validate_draft(draft: &ProductDraft) -> Result<()> {
    if draft.name.trim().is_empty() || draft.article.trim().is_empty() {
        return Err(Error::validation("Product name and article are required"));
    }
    if let Some(price) = draft.sale_price {
        if price < 0.0 || !price.is_finite() {
            return Err(Error::InvalidAmount { amount: price });
        }
    }
    Ok(())
}
