mod api;
mod config;
mod error;
mod shopify_product;

pub use api::ShopifyApi;
pub use config::ShopifyConfig;
pub use error::ShopifyApiError;
pub use shopify_product::{NewImage, NewProduct, NewVariant, ProductImage, ProductOption, ShopifyProduct, Variant};
