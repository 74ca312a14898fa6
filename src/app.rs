//! Coordinator - single owner of the catalog, the supplier ledger and the draft form.
//!
//! [`Inventory`] is the offline variant: every operation is a synchronous in-memory
//! mutation. [`SyncedInventory`] wraps it with a [`RemoteStore`]:
//!
//! * inserts are remote-confirmed: the local record only appears once the endpoint
//!   accepted it, under the endpoint's id when one is returned;
//! * updates, completion and deletion are applied locally first and undone for that
//!   one product if the endpoint call fails;
//! * supplier deletion, debt reset and sending to the database stay local.
//!
//! Transport failures are logged here and returned to the caller unchanged.

use crate::{
    core::{
        Catalog, CatalogSummary, DatabaseQuery, SupplierLedger,
        catalog::validate_draft,
        ledger::validate_supplier_name,
        search::DayGroup,
    },
    errors::{Error, Result},
    models::{Product, ProductDraft, ProductPatch, Supplier},
    sync::{
        RemoteStore, Snapshot, load_snapshot,
        wire::{NewProduct, NewSupplier, PurchaseUpdate},
    },
};
use tracing::{error, info};

/// All client-side state of the shopping list.
#[derive(Debug, Default, Clone)]
pub struct Inventory {
    /// The "add product" form.
    pub draft: ProductDraft,
    catalog: Catalog,
    ledger: SupplierLedger,
}

impl Inventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn ledger(&self) -> &SupplierLedger {
        &self.ledger
    }

    /// Adds the current draft to the shopping list and clears the form.
    pub fn add_product(&mut self) -> Result<&Product> {
        self.catalog.add_product(&mut self.draft)
    }

    pub fn update_product(&mut self, product_id: i64, patch: ProductPatch) -> Result<&Product> {
        self.catalog.update_product(product_id, patch)
    }

    pub fn delete_product(&mut self, product_id: i64) -> Result<Product> {
        self.catalog.delete_product(product_id)
    }

    /// Marks a product bought; requires purchase price and quantity.
    pub fn complete_product(&mut self, product_id: i64) -> Result<&Product> {
        self.catalog.complete_product(product_id)
    }

    /// Moves completed products into the database and posts supplier debt.
    pub fn send_to_database(&mut self) -> Result<usize> {
        let moved = self.catalog.send_to_database(&mut self.ledger)?;
        info!(moved, "Sent completed products to the database");
        Ok(moved)
    }

    pub fn add_supplier(&mut self, name: &str) -> Result<&Supplier> {
        self.ledger.add_supplier(name)
    }

    /// Products referencing the supplier keep their now dangling `supplier_id`.
    pub fn delete_supplier(&mut self, supplier_id: i64) -> Result<Supplier> {
        self.ledger.delete_supplier(supplier_id)
    }

    pub fn reset_supplier_debt(&mut self, supplier_id: i64) -> Result<&Supplier> {
        self.ledger.reset_supplier_debt(supplier_id)
    }

    /// The database tab: completed products filtered, sorted and grouped by day.
    #[must_use]
    pub fn database_view(&self, query: &DatabaseQuery) -> Vec<DayGroup<'_>> {
        query.grouped(self.catalog.completed())
    }

    #[must_use]
    pub fn summary(&self) -> CatalogSummary {
        self.catalog.summary()
    }

    /// Replaces everything except the draft.
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.catalog.replace(snapshot.pending, snapshot.completed);
        self.ledger.replace(snapshot.suppliers);
    }
}

/// [`Inventory`] persisted through a [`RemoteStore`].
#[derive(Debug)]
pub struct SyncedInventory<R> {
    state: Inventory,
    remote: R,
}

impl<R: RemoteStore> SyncedInventory<R> {
    pub fn new(remote: R) -> Self {
        Self {
            state: Inventory::new(),
            remote,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &Inventory {
        &self.state
    }

    /// The "add product" form.
    pub const fn draft_mut(&mut self) -> &mut ProductDraft {
        &mut self.state.draft
    }

    #[must_use]
    pub const fn remote(&self) -> &R {
        &self.remote
    }

    /// Full reload. On any failure local state is left exactly as it was.
    pub async fn load_data(&mut self) -> Result<()> {
        let snapshot = load_snapshot(&self.remote)
            .await
            .inspect_err(|e| error!("Failed to load data: {}", e))?;
        self.state.replace(snapshot);
        Ok(())
    }

    /// Posts the draft, then adds it locally under the endpoint's id.
    pub async fn add_product(&mut self) -> Result<&Product> {
        validate_draft(&self.state.draft)?;
        let ack = self
            .remote
            .add_product(&NewProduct::from(&self.state.draft))
            .await
            .inspect_err(|e| error!("Failed to add product: {}", e))?;
        self.state
            .catalog
            .insert_from_draft(ack.id, &mut self.state.draft)
    }

    /// Posts a new supplier, then adds it locally under the endpoint's id.
    pub async fn add_supplier(&mut self, name: &str) -> Result<&Supplier> {
        validate_supplier_name(name)?;
        let request = NewSupplier {
            name: name.trim().to_string(),
            total_debt: 0.0,
        };
        let ack = self
            .remote
            .add_supplier(&request)
            .await
            .inspect_err(|e| error!("Failed to add supplier: {}", e))?;
        self.state.ledger.insert_supplier(ack.id, name)
    }

    /// Applies the patch locally, then pushes the purchase fields.
    pub async fn update_product(&mut self, product_id: i64, patch: ProductPatch) -> Result<&Product> {
        let before = self.snapshot_of(product_id)?;
        self.state.catalog.update_product(product_id, patch)?;
        self.push_purchase(product_id, before).await
    }

    /// Completes locally (purchase data required), then pushes the flag.
    pub async fn complete_product(&mut self, product_id: i64) -> Result<&Product> {
        let before = self.snapshot_of(product_id)?;
        self.state.catalog.complete_product(product_id)?;
        self.push_purchase(product_id, before).await
    }

    /// Removes locally, then asks the endpoint to take it off the list.
    pub async fn delete_product(&mut self, product_id: i64) -> Result<Product> {
        let position = self
            .state
            .catalog
            .position(product_id)
            .ok_or(Error::ProductNotFound { id: product_id })?;
        let removed = self.state.catalog.delete_product(product_id)?;

        if let Err(e) = self.remote.delete_product(product_id).await {
            error!(product_id, "Failed to delete product, restoring it: {}", e);
            self.state.catalog.restore(removed, position);
            return Err(e);
        }
        Ok(removed)
    }

    /// Local only; the endpoint already holds the completion flags.
    pub fn send_to_database(&mut self) -> Result<usize> {
        self.state.send_to_database()
    }

    /// Local only; the endpoint has no supplier deletion.
    pub fn delete_supplier(&mut self, supplier_id: i64) -> Result<Supplier> {
        self.state.delete_supplier(supplier_id)
    }

    /// Local only; the endpoint has no debt reset.
    pub fn reset_supplier_debt(&mut self, supplier_id: i64) -> Result<&Supplier> {
        self.state.reset_supplier_debt(supplier_id)
    }

    fn snapshot_of(&self, product_id: i64) -> Result<(usize, Product)> {
        let catalog = &self.state.catalog;
        let position = catalog
            .position(product_id)
            .ok_or(Error::ProductNotFound { id: product_id })?;
        Ok((position, catalog.pending()[position].clone()))
    }

    /// Sends the product's purchase fields; on failure puts `before` back.
    async fn push_purchase(&mut self, product_id: i64, before: (usize, Product)) -> Result<&Product> {
        let update = self
            .state
            .catalog
            .get(product_id)
            .map(PurchaseUpdate::from)
            .ok_or(Error::ProductNotFound { id: product_id })?;

        if let Err(e) = self.remote.update_product(&update).await {
            error!(product_id, "Failed to sync product, rolling back: {}", e);
            let (position, snapshot) = before;
            self.state.catalog.restore(snapshot, position);
            return Err(e);
        }
        self.state
            .catalog
            .get(product_id)
            .ok_or(Error::ProductNotFound { id: product_id })
    }
}
