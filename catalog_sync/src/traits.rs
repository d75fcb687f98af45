//! The two catalogs, as seen by the sync.
//!
//! [`StorefrontCatalog`] is implemented by [`ShopifyApi`] and [`InventoryCatalog`] by [`LightspeedApi`]. The
//! [`CatalogSync`](crate::sync::CatalogSync) orchestrator only talks to these traits, which keeps the create-or-update
//! policy testable without a network.
use lightspeed_tools::{Item, ItemBatch, ItemFilter, LightspeedApi, LightspeedApiError, NewItem, TokenPair};
use shopify_tools::{NewProduct, ShopifyApi, ShopifyApiError, ShopifyProduct};

#[allow(async_fn_in_trait)]
pub trait StorefrontCatalog {
    /// Products whose title and vendor both match. The result may be empty.
    async fn search_products(&self, title: &str, vendor: &str) -> Result<Vec<ShopifyProduct>, ShopifyApiError>;
    async fn fetch_products(&self) -> Result<Vec<ShopifyProduct>, ShopifyApiError>;
    async fn create_product(&self, product: &NewProduct) -> Result<ShopifyProduct, ShopifyApiError>;
    async fn update_product(&self, id: i64, product: &NewProduct) -> Result<ShopifyProduct, ShopifyApiError>;
}

#[allow(async_fn_in_trait)]
pub trait InventoryCatalog {
    /// Obtain a fresh access token. Must succeed before any other call in a sync cycle.
    async fn refresh_access_token(&self) -> Result<TokenPair, LightspeedApiError>;
    async fn fetch_items(&self, filter: &ItemFilter) -> Result<ItemBatch, LightspeedApiError>;
    async fn create_item(&self, item: &NewItem) -> Result<Item, LightspeedApiError>;
}

impl StorefrontCatalog for ShopifyApi {
    async fn search_products(&self, title: &str, vendor: &str) -> Result<Vec<ShopifyProduct>, ShopifyApiError> {
        ShopifyApi::search_products(self, title, vendor).await
    }

    async fn fetch_products(&self) -> Result<Vec<ShopifyProduct>, ShopifyApiError> {
        ShopifyApi::fetch_products(self).await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<ShopifyProduct, ShopifyApiError> {
        ShopifyApi::create_product(self, product).await
    }

    async fn update_product(&self, id: i64, product: &NewProduct) -> Result<ShopifyProduct, ShopifyApiError> {
        ShopifyApi::update_product(self, id, product).await
    }
}

impl InventoryCatalog for LightspeedApi {
    async fn refresh_access_token(&self) -> Result<TokenPair, LightspeedApiError> {
        LightspeedApi::refresh_access_token(self).await
    }

    async fn fetch_items(&self, filter: &ItemFilter) -> Result<ItemBatch, LightspeedApiError> {
        LightspeedApi::fetch_items(self, filter).await
    }

    async fn create_item(&self, item: &NewItem) -> Result<Item, LightspeedApiError> {
        LightspeedApi::create_item(self, item).await
    }
}
