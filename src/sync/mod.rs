//! Remote sync - the action endpoint client and full-reload reconciliation.

/// `RemoteStore` trait and its `reqwest` implementation
pub mod remote;
/// Request and response bodies of the action endpoint
pub mod wire;

pub use remote::{HttpRemote, RemoteStore};

use crate::{
    errors::Result,
    models::{Product, Supplier},
};
use tracing::info;

/// Local state rebuilt from one full reload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub pending: Vec<Product>,
    pub completed: Vec<Product>,
    pub suppliers: Vec<Supplier>,
}

/// Fetches products and suppliers concurrently and maps them to local records.
///
/// Nothing is returned unless both fetches and every conversion succeed.
///
/// # Errors
/// Propagates the first transport or decoding failure.
pub async fn load_snapshot<R>(remote: &R) -> Result<Snapshot>
where
    R: RemoteStore + ?Sized,
{
    let (products, suppliers) =
        tokio::try_join!(remote.fetch_products(), remote.fetch_suppliers())?;

    let mut snapshot = Snapshot {
        suppliers: suppliers
            .into_iter()
            .map(wire::RemoteSupplier::into_supplier)
            .collect(),
        ..Snapshot::default()
    };
    for remote_product in products {
        let product = remote_product.into_product()?;
        if product.is_completed {
            snapshot.completed.push(product);
        } else {
            snapshot.pending.push(product);
        }
    }

    info!(
        pending = snapshot.pending.len(),
        completed = snapshot.completed.len(),
        suppliers = snapshot.suppliers.len(),
        "Reloaded remote state"
    );
    Ok(snapshot)
}
