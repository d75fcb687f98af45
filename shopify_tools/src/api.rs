use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::ShopifyConfig,
    shopify_product::{NewProduct, ShopifyProduct},
    ShopifyApiError,
};

#[derive(Clone)]
pub struct ShopifyApi {
    config: ShopifyConfig,
    client: Arc<Client>,
}

#[derive(Serialize)]
struct ProductInput<'a> {
    product: &'a NewProduct,
}

#[derive(Deserialize)]
struct ProductResponse {
    product: ShopifyProduct,
}

#[derive(Deserialize)]
struct ProductsResponse {
    #[serde(default)]
    products: Vec<ShopifyProduct>,
}

impl ShopifyApi {
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.access_token.reveal().as_str())
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        headers.insert("X-Shopify-Access-Token", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, ShopifyApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if !self.config.api_key.is_empty() {
            req = req.basic_auth(&self.config.api_key, Some(self.config.password.reveal()));
        }
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
            Err(ShopifyApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("https://{}/admin/api/{}{path}", self.config.shop, self.config.api_version)
    }

    /// Looks up products by exact title and vendor. Shopify applies both filters server-side, so an empty result
    /// means no product carries this title/vendor pair.
    pub async fn search_products(&self, title: &str, vendor: &str) -> Result<Vec<ShopifyProduct>, ShopifyApiError> {
        debug!("🛍️ Searching for products with title '{title}' and vendor '{vendor}'");
        let params = [("title", title), ("vendor", vendor)];
        let result = self.rest_query::<ProductsResponse, ()>(Method::GET, "/products.json", &params, None).await?;
        debug!("🛍️ {} products match '{title}'", result.products.len());
        Ok(result.products)
    }

    /// Fetches the first page of products in the store, without any filters.
    pub async fn fetch_products(&self) -> Result<Vec<ShopifyProduct>, ShopifyApiError> {
        debug!("🛍️ Fetching products");
        let result = self.rest_query::<ProductsResponse, ()>(Method::GET, "/products.json", &[], None).await?;
        info!("🛍️ Fetched {} products", result.products.len());
        Ok(result.products)
    }

    pub async fn create_product(&self, product: &NewProduct) -> Result<ShopifyProduct, ShopifyApiError> {
        let input = ProductInput { product };
        debug!("🛍️ Creating product: {}", serde_json::to_string(&input).unwrap_or_default());
        let result =
            self.rest_query::<ProductResponse, ProductInput>(Method::POST, "/products.json", &[], Some(input)).await?;
        info!("🛍️ Created product #{} ({})", result.product.id, result.product.title);
        Ok(result.product)
    }

    pub async fn update_product(&self, id: i64, product: &NewProduct) -> Result<ShopifyProduct, ShopifyApiError> {
        let input = ProductInput { product };
        let path = format!("/products/{id}.json");
        debug!("🛍️ Updating product #{id}: {}", serde_json::to_string(&input).unwrap_or_default());
        let result = self.rest_query::<ProductResponse, ProductInput>(Method::PUT, &path, &[], Some(input)).await?;
        info!("🛍️ Updated product #{id} ({})", result.product.title);
        Ok(result.product)
    }
}

#[cfg(test)]
mod test {
    use sync_common::Secret;

    use super::*;

    fn config() -> ShopifyConfig {
        ShopifyConfig {
            shop: "styles.myshopify.com".into(),
            api_key: "key".into(),
            password: Secret::from("password"),
            access_token: Secret::from("shpat_abc"),
            api_version: "2024-10".into(),
        }
    }

    #[test]
    fn builds_admin_urls() {
        let api = ShopifyApi::new(config()).unwrap();
        assert_eq!(api.url("/products.json"), "https://styles.myshopify.com/admin/api/2024-10/products.json");
        assert_eq!(api.url("/products/42.json"), "https://styles.myshopify.com/admin/api/2024-10/products/42.json");
    }

    #[test]
    fn invalid_access_token_fails_initialization() {
        let mut config = config();
        config.access_token = Secret::from("bad\ntoken");
        let err = ShopifyApi::new(config).err().unwrap();
        assert!(matches!(err, ShopifyApiError::Initialization(_)));
    }

    #[test]
    fn product_body_is_wrapped() {
        let product = NewProduct { title: "Lamp".into(), vendor: "V1".into(), ..Default::default() };
        let value = serde_json::to_value(ProductInput { product: &product }).unwrap();
        assert_eq!(value["product"]["title"], "Lamp");
        assert_eq!(value["product"]["vendor"], "V1");
    }

    #[test]
    fn products_response_tolerates_missing_list() {
        let result: ProductsResponse = serde_json::from_str("{}").unwrap();
        assert!(result.products.is_empty());
    }
}
