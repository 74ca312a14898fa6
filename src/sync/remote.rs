//! The remote store seam and its HTTP implementation.

use crate::{
    config::AppConfig,
    errors::{Error, Result},
    sync::wire::{
        Ack, ErrorBody, NewProduct, NewSupplier, PostAction, ProductList, PurchaseUpdate,
        RemoteProduct, RemoteSupplier, SupplierList,
    },
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, instrument};

/// Persistence behind the shopping list. Calls are independent; nothing is batched.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Every stored product, pending and completed.
    async fn fetch_products(&self) -> Result<Vec<RemoteProduct>>;

    /// Every stored supplier.
    async fn fetch_suppliers(&self) -> Result<Vec<RemoteSupplier>>;

    /// Inserts a product and returns the endpoint's acknowledgement (with the new id
    /// when the endpoint reports one).
    async fn add_product(&self, product: &NewProduct) -> Result<Ack>;

    /// Inserts a supplier with the given opening debt.
    async fn add_supplier(&self, supplier: &NewSupplier) -> Result<Ack>;

    /// Writes purchase price, quantity and completion flag of one product.
    async fn update_product(&self, update: &PurchaseUpdate) -> Result<()>;

    /// Takes a product off the shopping list.
    async fn delete_product(&self, product_id: i64) -> Result<()>;
}

/// [`RemoteStore`] over the single action-dispatched URL.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
}

impl HttpRemote {
    /// Builds a client for `base_url` with the given per-request timeout.
    ///
    /// # Errors
    /// Returns [`Error::Config`] for an empty URL, or [`Error::Http`] if the
    /// underlying client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(Error::Config {
                message: "Remote endpoint URL cannot be empty".to_string(),
            });
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Builds a client from the configured `api_url` and request timeout.
    ///
    /// # Errors
    /// Same as [`HttpRemote::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config.api_url.clone(), config.request_timeout())
    }

    /// The endpoint every request goes to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, action: &PostAction) -> Result<Ack> {
        let response = self.client.post(&self.base_url).json(action).send().await?;
        let ack: Ack = checked(response).await?.json().await?;
        if !ack.success {
            return Err(Error::Remote {
                status: 200,
                message: "endpoint did not confirm the insert".to_string(),
            });
        }
        Ok(ack)
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn fetch_products(&self) -> Result<Vec<RemoteProduct>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("action", "get_products")])
            .send()
            .await?;
        let list: ProductList = checked(response).await?.json().await?;
        debug!(count = list.products.len(), "Fetched products");
        Ok(list.products)
    }

    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn fetch_suppliers(&self) -> Result<Vec<RemoteSupplier>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("action", "get_suppliers")])
            .send()
            .await?;
        let list: SupplierList = checked(response).await?.json().await?;
        debug!(count = list.suppliers.len(), "Fetched suppliers");
        Ok(list.suppliers)
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn add_product(&self, product: &NewProduct) -> Result<Ack> {
        self.post(&PostAction::AddProduct(product.clone())).await
    }

    #[instrument(skip(self, supplier), fields(name = %supplier.name))]
    async fn add_supplier(&self, supplier: &NewSupplier) -> Result<Ack> {
        self.post(&PostAction::AddSupplier(supplier.clone())).await
    }

    #[instrument(skip(self, update), fields(id = update.id))]
    async fn update_product(&self, update: &PurchaseUpdate) -> Result<()> {
        let response = self.client.put(&self.base_url).json(update).send().await?;
        checked(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, product_id: i64) -> Result<()> {
        let response = self
            .client
            .delete(&self.base_url)
            .query(&[("id", product_id)])
            .send()
            .await?;
        checked(response).await?;
        Ok(())
    }
}

/// Turns a non-2xx response into [`Error::Remote`], using the `{"error"}` body when present.
async fn checked(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(Error::Remote {
        status: status.as_u16(),
        message,
    })
}
