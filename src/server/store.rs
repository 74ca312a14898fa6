//! Endpoint storage - product and supplier rows behind the action endpoint.
//!
//! All functions are async, take any `SeaORM` connection and return the stored models.

use crate::{
    entities::{Product, Supplier, product, supplier},
    errors::{Error, Result},
    sync::wire::{NewProduct, NewSupplier, PurchaseUpdate},
};
use sea_orm::{QueryFilter, QueryOrder, Set, prelude::*, sea_query::Expr};

/// Every product, newest first.
pub async fn list_products<C: ConnectionTrait>(db: &C) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_desc(product::Column::DateAdded)
        .order_by_desc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every supplier, alphabetically.
pub async fn list_suppliers<C: ConnectionTrait>(db: &C) -> Result<Vec<supplier::Model>> {
    Supplier::find()
        .order_by_asc(supplier::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Inserts a pending product. Quantity defaults to 1.
///
/// # Errors
/// Returns a validation error if the name or article is blank, or
/// [`Error::InvalidAmount`] for a negative or non-finite price.
pub async fn create_product<C: ConnectionTrait>(
    db: &C,
    new_product: NewProduct,
) -> Result<product::Model> {
    if new_product.name.trim().is_empty() || new_product.article.trim().is_empty() {
        return Err(Error::validation("Product name and article are required"));
    }
    for price in [new_product.sale_price, new_product.purchase_price]
        .into_iter()
        .flatten()
    {
        if price < 0.0 || !price.is_finite() {
            return Err(Error::InvalidAmount { amount: price });
        }
    }

    let product = product::ActiveModel {
        name: Set(new_product.name),
        article: Set(new_product.article),
        image_url: Set(new_product.image_url),
        hint: Set(new_product.hint),
        sale_price: Set(new_product.sale_price),
        purchase_price: Set(new_product.purchase_price),
        quantity: Set(Some(i64::from(
            new_product.quantity.filter(|&q| q > 0).unwrap_or(1),
        ))),
        supplier_id: Set(new_product.supplier_id),
        date_added: Set(chrono::Utc::now().naive_utc()),
        is_completed: Set(false),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Inserts a supplier.
///
/// # Errors
/// Returns a validation error for a blank name.
pub async fn create_supplier<C: ConnectionTrait>(
    db: &C,
    new_supplier: NewSupplier,
) -> Result<supplier::Model> {
    if new_supplier.name.trim().is_empty() {
        return Err(Error::validation("Supplier name cannot be empty"));
    }
    if !new_supplier.total_debt.is_finite() {
        return Err(Error::InvalidAmount {
            amount: new_supplier.total_debt,
        });
    }

    let supplier = supplier::ActiveModel {
        name: Set(new_supplier.name.trim().to_string()),
        total_debt: Set(new_supplier.total_debt),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    supplier.insert(db).await.map_err(Into::into)
}

/// Overwrites purchase price, quantity and completion flag. Absent values are stored as NULL.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product does not exist.
pub async fn update_purchase<C: ConnectionTrait>(
    db: &C,
    update: PurchaseUpdate,
) -> Result<product::Model> {
    let mut product: product::ActiveModel = Product::find_by_id(update.id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: update.id })?
        .into();

    product.purchase_price = Set(update.purchase_price);
    product.quantity = Set(update.quantity.map(i64::from));
    product.is_completed = Set(update.is_completed);

    product.update(db).await.map_err(Into::into)
}

/// Handles `DELETE`: the row is kept and flagged as completed, so it drops off the
/// shopping list but stays in the purchase database.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if no row has this id.
pub async fn delete_product<C: ConnectionTrait>(db: &C, product_id: i64) -> Result<()> {
    let result = Product::update_many()
        .col_expr(product::Column::IsCompleted, Expr::value(true))
        .filter(product::Column::Id.eq(product_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::ProductNotFound { id: product_id });
    }
    Ok(())
}
