use serde::{Deserialize, Serialize};

/// A product as returned by the Shopify REST Admin API. Only the fields the sync touches are required; everything
/// else is defaulted so that partial responses still deserialize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopifyProduct {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Variant {
    pub id: i64,
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub title: String,
    pub price: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub inventory_quantity: i64,
    #[serde(default)]
    pub inventory_item_id: Option<i64>,
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: i64,
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub alt: Option<String>,
    pub src: String,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
}

/// The payload used to create or update a product. Shopify accepts the same shape for `POST /products.json` and
/// `PUT /products/{id}.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub body_html: String,
    pub product_type: String,
    pub tags: String,
    pub variants: Vec<NewVariant>,
    pub options: Vec<ProductOption>,
    pub images: Vec<NewImage>,
    pub vendor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewVariant {
    pub price: String,
    pub sku: String,
    pub inventory_quantity: i64,
    pub old_inventory_quantity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewImage {
    pub alt: String,
    pub src: String,
}
