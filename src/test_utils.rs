//! Shared test utilities for `purchase-buddy`.
//!
//! This module provides record builders with sensible defaults, an in-memory
//! `SQLite` setup for the endpoint storage, and an in-memory [`RemoteStore`].

#![allow(clippy::expect_used)]

use crate::{
    entities,
    errors::{Error, Result},
    models::Product,
    server::store,
    sync::{
        RemoteStore,
        wire::{
            Ack, NewProduct, NewSupplier, PurchaseUpdate, RemoteProduct, RemoteSupplier,
            format_timestamp,
        },
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Mutex;

/// A pending product with no purchase data, added "now".
///
/// # Defaults
/// * `quantity`: None
/// * `supplier_id`: None
pub fn sample_product(id: i64, name: &str, article: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        article: article.to_string(),
        image: None,
        hint: None,
        sale_price: None,
        purchase_price: None,
        quantity: None,
        supplier_id: None,
        date_added: Utc::now(),
        is_completed: false,
    }
}

/// A product that passed completion with the given purchase data.
pub fn completed_product(
    id: i64,
    name: &str,
    article: &str,
    purchase_price: f64,
    quantity: u32,
    supplier_id: Option<i64>,
) -> Product {
    Product {
        purchase_price: Some(purchase_price),
        quantity: Some(quantity),
        supplier_id,
        is_completed: true,
        ..sample_product(id, name, article)
    }
}

/// Noon local time on the given day, as UTC. Noon keeps the local date stable
/// across every real-world offset.
pub fn local_noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid test date");
    Local
        .from_local_datetime(&naive)
        .earliest()
        .expect("noon exists in the local zone")
        .with_timezone(&Utc)
}

/// A remote product row as the endpoint would list it.
pub fn remote_product(id: i64, name: &str, is_completed: bool) -> RemoteProduct {
    RemoteProduct {
        id,
        name: name.to_string(),
        article: format!("ART-{id}"),
        image_url: None,
        hint: None,
        sale_price: None,
        purchase_price: is_completed.then_some(10.0),
        quantity: Some(1),
        supplier_id: None,
        supplier_name: None,
        date_added: Some(format_timestamp(Utc::now().naive_utc())),
        is_completed,
    }
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Stores a supplier with zero debt.
pub async fn create_test_supplier(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::supplier::Model> {
    store::create_supplier(
        db,
        NewSupplier {
            name: name.to_string(),
            total_debt: 0.0,
        },
    )
    .await
}

/// Stores a product with quantity 1 and no prices.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    supplier_id: Option<i64>,
) -> Result<entities::product::Model> {
    store::create_product(
        db,
        NewProduct {
            name: name.to_string(),
            article: format!("{name}-ART"),
            image_url: None,
            hint: None,
            sale_price: None,
            purchase_price: None,
            quantity: Some(1),
            supplier_id,
        },
    )
    .await
}

#[derive(Debug, Default)]
struct MockState {
    products: Vec<RemoteProduct>,
    suppliers: Vec<RemoteSupplier>,
    next_id: i64,
    failing: Vec<String>,
    calls: Vec<String>,
}

/// In-memory [`RemoteStore`] that records calls and fails on request.
#[derive(Debug, Default)]
pub struct MockRemote {
    state: Mutex<MockState>,
}

impl MockRemote {
    pub fn new() -> Self {
        let remote = Self::default();
        remote.with_state(|s| s.next_id = 1000);
        remote
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut guard = self.state.lock().expect("mock state lock");
        f(&mut guard)
    }

    /// Records the call and returns an error if it was scheduled to fail.
    fn enter(&self, op: &str) -> Result<()> {
        self.with_state(|s| {
            s.calls.push(op.to_string());
            match s.failing.iter().position(|f| f == op) {
                Some(index) => {
                    s.failing.remove(index);
                    Err(Error::Remote {
                        status: 500,
                        message: format!("injected {op} failure"),
                    })
                }
                None => Ok(()),
            }
        })
    }

    /// Makes the next call of `op` (a `RemoteStore` method name) fail.
    pub fn fail_next(&self, op: &str) {
        self.with_state(|s| s.failing.push(op.to_string()));
    }

    pub fn seed_product(&self, product: RemoteProduct) {
        self.with_state(|s| s.products.push(product));
    }

    pub fn seed_supplier(&self, id: i64, name: &str, total_debt: f64) {
        self.with_state(|s| {
            s.suppliers.push(RemoteSupplier {
                id,
                name: name.to_string(),
                total_debt,
            });
        });
    }

    pub fn products(&self) -> Vec<RemoteProduct> {
        self.with_state(|s| s.products.clone())
    }

    pub fn suppliers(&self) -> Vec<RemoteSupplier> {
        self.with_state(|s| s.suppliers.clone())
    }

    pub fn calls(&self) -> Vec<String> {
        self.with_state(|s| s.calls.clone())
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn fetch_products(&self) -> Result<Vec<RemoteProduct>> {
        self.enter("fetch_products")?;
        Ok(self.products())
    }

    async fn fetch_suppliers(&self) -> Result<Vec<RemoteSupplier>> {
        self.enter("fetch_suppliers")?;
        Ok(self.suppliers())
    }

    async fn add_product(&self, product: &NewProduct) -> Result<Ack> {
        self.enter("add_product")?;
        let id = self.with_state(|s| {
            s.next_id += 1;
            let id = s.next_id;
            s.products.push(RemoteProduct {
                id,
                name: product.name.clone(),
                article: product.article.clone(),
                image_url: product.image_url.clone(),
                hint: product.hint.clone(),
                sale_price: product.sale_price,
                purchase_price: product.purchase_price,
                quantity: product.quantity.map(i64::from),
                supplier_id: product.supplier_id,
                supplier_name: None,
                date_added: Some(format_timestamp(Utc::now().naive_utc())),
                is_completed: false,
            });
            id
        });
        Ok(Ack::created(id))
    }

    async fn add_supplier(&self, supplier: &NewSupplier) -> Result<Ack> {
        self.enter("add_supplier")?;
        let id = self.with_state(|s| {
            s.next_id += 1;
            let id = s.next_id;
            s.suppliers.push(RemoteSupplier {
                id,
                name: supplier.name.clone(),
                total_debt: supplier.total_debt,
            });
            id
        });
        Ok(Ack::created(id))
    }

    async fn update_product(&self, update: &PurchaseUpdate) -> Result<()> {
        self.enter("update_product")?;
        self.with_state(|s| {
            if let Some(product) = s.products.iter_mut().find(|p| p.id == update.id) {
                product.purchase_price = update.purchase_price;
                product.quantity = update.quantity.map(i64::from);
                product.is_completed = update.is_completed;
            }
        });
        Ok(())
    }

    async fn delete_product(&self, product_id: i64) -> Result<()> {
        self.enter("delete_product")?;
        self.with_state(|s| s.products.retain(|p| p.id != product_id));
        Ok(())
    }
}
