//! Supplier ledger business logic - suppliers, their purchase history and running debt.
//!
//! Debt only ever grows through [`SupplierLedger::post_purchase`] and is cleared by an
//! explicit [`SupplierLedger::reset_supplier_debt`]. History entries are never removed.
//! Products reference suppliers by id only, so nothing here touches the catalog.

use crate::{
    core::ids::IdSequence,
    errors::{Error, Result},
    models::{Product, PurchaseEntry, Supplier},
};
use chrono::Utc;

/// In-memory collection of suppliers in creation order.
#[derive(Debug, Default, Clone)]
pub struct SupplierLedger {
    suppliers: Vec<Supplier>,
    ids: IdSequence,
}

impl SupplierLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    #[must_use]
    pub fn get(&self, supplier_id: i64) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == supplier_id)
    }

    /// Creates a supplier with zero debt and an empty history.
    ///
    /// # Errors
    /// Returns a validation error if the name is empty or whitespace-only.
    pub fn add_supplier(&mut self, name: &str) -> Result<&Supplier> {
        self.insert_supplier(None, name)
    }

    /// Same as [`SupplierLedger::add_supplier`], optionally under an id chosen by the endpoint.
    pub(crate) fn insert_supplier(&mut self, id: Option<i64>, name: &str) -> Result<&Supplier> {
        validate_supplier_name(name)?;
        let id = match id {
            Some(id) => {
                self.ids.observe(id);
                id
            }
            None => self.ids.next_id()?,
        };
        self.suppliers.push(Supplier {
            id,
            name: name.trim().to_string(),
            total_debt: 0.0,
            products: Vec::new(),
        });
        Ok(&self.suppliers[self.suppliers.len() - 1])
    }

    /// Removes a supplier. Products that reference it keep their `supplier_id`.
    ///
    /// # Errors
    /// Returns [`Error::SupplierNotFound`] if no supplier has this id.
    pub fn delete_supplier(&mut self, supplier_id: i64) -> Result<Supplier> {
        let index = self
            .suppliers
            .iter()
            .position(|s| s.id == supplier_id)
            .ok_or(Error::SupplierNotFound { id: supplier_id })?;
        Ok(self.suppliers.remove(index))
    }

    /// Clears the debt. The purchase history is kept.
    ///
    /// # Errors
    /// Returns [`Error::SupplierNotFound`] if no supplier has this id.
    pub fn reset_supplier_debt(&mut self, supplier_id: i64) -> Result<&Supplier> {
        let supplier = self
            .suppliers
            .iter_mut()
            .find(|s| s.id == supplier_id)
            .ok_or(Error::SupplierNotFound { id: supplier_id })?;
        supplier.total_debt = 0.0;
        Ok(supplier)
    }

    /// Records a bought product against its supplier.
    ///
    /// Returns `false` without changing anything when the product has no supplier,
    /// lacks purchase data, or points at a supplier that no longer exists.
    pub fn post_purchase(&mut self, product: &Product) -> bool {
        let (Some(supplier_id), Some(price), Some(quantity)) =
            (product.supplier_id, product.purchase_price, product.quantity)
        else {
            return false;
        };
        if !product.has_purchase_data() {
            return false;
        }
        let Some(supplier) = self.suppliers.iter_mut().find(|s| s.id == supplier_id) else {
            return false;
        };

        let entry = PurchaseEntry {
            product_id: product.id,
            name: product.name.clone(),
            article: product.article.clone(),
            purchase_price: price,
            quantity,
            date: Utc::now(),
        };
        supplier.total_debt += entry.amount();
        supplier.products.push(entry);
        true
    }

    /// Sum of outstanding debt across all suppliers.
    #[must_use]
    pub fn total_debt(&self) -> f64 {
        self.suppliers.iter().map(|s| s.total_debt).sum()
    }

    /// Replaces every supplier, as done after a full reload.
    pub fn replace(&mut self, suppliers: Vec<Supplier>) {
        for supplier in &suppliers {
            self.ids.observe(supplier.id);
        }
        self.suppliers = suppliers;
    }
}

pub(crate) fn validate_supplier_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Supplier name cannot be empty"));
    }
    Ok(())
}
