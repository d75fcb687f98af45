use log::*;
use sync_common::{env_or_default, Secret};

pub const DEFAULT_SHOPIFY_API_VERSION: &str = "2024-10";

#[derive(Debug, Clone, Default)]
pub struct ShopifyConfig {
    /// The store domain, e.g. "my-shop.myshopify.com"
    pub shop: String,
    /// Private app API key. Sent as the basic auth user name.
    pub api_key: String,
    /// Private app password. Sent as the basic auth password.
    pub password: Secret<String>,
    pub access_token: Secret<String>,
    pub api_version: String,
}

impl ShopifyConfig {
    pub fn new_from_env_or_default() -> Self {
        let shop = std::env::var("SHOPIFY_STORE").unwrap_or_else(|_| {
            warn!("🛍️ SHOPIFY_STORE not set, using (probably useless) default");
            "example.myshopify.com".to_string()
        });
        let api_version = env_or_default("SHOPIFY_API_VERSION", DEFAULT_SHOPIFY_API_VERSION);
        let api_key = std::env::var("SHOPIFY_API_KEY").unwrap_or_else(|_| {
            warn!("🛍️ SHOPIFY_API_KEY not set. Requests will be sent without basic auth credentials.");
            String::default()
        });
        let password = Secret::new(std::env::var("SHOPIFY_PASSWORD").unwrap_or_else(|_| {
            warn!("🛍️ SHOPIFY_PASSWORD not set, using an empty password");
            String::default()
        }));
        let access_token = Secret::new(std::env::var("SHOPIFY_ACCESS_TOKEN").unwrap_or_else(|_| {
            warn!("🛍️ SHOPIFY_ACCESS_TOKEN not set, using (probably useless) default");
            "shpat_00000000000000".to_string()
        }));
        Self { shop, api_key, password, access_token, api_version }
    }
}
