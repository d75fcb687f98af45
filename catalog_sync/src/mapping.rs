//! Field mapping between the two catalogs.
//!
//! Both functions are total: any field missing from the source record is replaced by a fixed default, so a sparse
//! record still produces a complete payload.
//!
//! Some of the rules below are positional or lossy (the third price tier, the first stock location, the first vendor
//! number). The storefront catalog already holds data produced by these rules, so they must stay as they are.
use lightspeed_tools::{Image, Item, NewItem};
use shopify_tools::{NewImage, NewProduct, NewVariant, ShopifyProduct};

/// Every synced product is filed under this product type.
pub const DEFAULT_PRODUCT_TYPE: &str = "Furniture";
/// Alt text used when an image has no description.
pub const MISSING_ALT_TEXT: &str = "undefined";
/// Position of the price tier that is published to the storefront.
pub const STOREFRONT_PRICE_TIER: usize = 2;
pub const DEFAULT_PRICE: &str = "0";

/// Maps an inventory item onto the payload used to create or update a storefront product.
pub fn product_from_item(item: &Item) -> NewProduct {
    let title = item.description.clone().unwrap_or_default();
    let body_html = format!("<p>{title}</p>");
    let quantity = quantity_on_hand(item);
    let variant = NewVariant {
        price: storefront_price(item),
        sku: sku(item),
        inventory_quantity: quantity,
        old_inventory_quantity: quantity,
    };
    NewProduct {
        title,
        body_html,
        product_type: DEFAULT_PRODUCT_TYPE.to_string(),
        tags: tags(item),
        variants: vec![variant],
        options: Vec::new(),
        images: images(item),
        vendor: vendor(item),
    }
}

/// Maps a storefront product onto an inventory item. Only the first variant is carried over.
pub fn item_from_product(product: &ShopifyProduct) -> NewItem {
    let variant = product.variants.first();
    let price = variant.map(|v| v.price.clone()).unwrap_or_else(|| DEFAULT_PRICE.to_string());
    let sku = variant.and_then(|v| v.sku.clone()).unwrap_or_default();
    NewItem::new(product.title.clone(), price, sku)
}

/// The category path, with `/` separators turned into tag separators.
pub fn tags(item: &Item) -> String {
    item.category
        .as_ref()
        .and_then(|c| c.full_path_name.as_deref())
        .map(|path| path.replace('/', ","))
        .unwrap_or_default()
}

pub fn storefront_price(item: &Item) -> String {
    item.prices
        .as_ref()
        .and_then(|p| p.item_price.get(STOREFRONT_PRICE_TIER))
        .map(|p| p.amount.clone())
        .filter(|amount| !amount.is_empty())
        .unwrap_or_else(|| DEFAULT_PRICE.to_string())
}

/// The custom SKU if there is one, then the system SKU.
pub fn sku(item: &Item) -> String {
    [&item.custom_sku, &item.system_sku]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_default()
}

/// Stock at the first listed location. Quantities at other locations are not added.
pub fn quantity_on_hand(item: &Item) -> i64 {
    item.item_shops.as_ref().and_then(|s| s.item_shop.first()).map(|shop| shop.qoh).unwrap_or(0)
}

pub fn vendor(item: &Item) -> String {
    item.item_vendor_nums
        .as_ref()
        .and_then(|v| v.item_vendor_num.first())
        .map(|v| v.value.clone())
        .unwrap_or_default()
}

pub fn images(item: &Item) -> Vec<NewImage> {
    item.images.as_ref().map(|i| i.image.iter().map(image).collect()).unwrap_or_default()
}

fn image(image: &Image) -> NewImage {
    let alt = image
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(MISSING_ALT_TEXT)
        .to_string();
    let src = format!("{}{}.{}", image.base_image_url, image.public_id, file_extension(&image.filename));
    NewImage { alt, src }
}

/// Everything after the last dot. A name without a dot is its own extension.
fn file_extension(filename: &str) -> &str {
    filename.rsplit('.').next().unwrap_or(filename)
}
