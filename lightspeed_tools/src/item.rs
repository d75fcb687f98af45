use serde::{de, Deserialize, Deserializer, Serialize};

/// Lightspeed collapses single-element collections into a bare object, so any relation that can hold several records
/// (shops, images, vendor numbers, prices) may arrive in either shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Many(v) => v.as_slice(),
            Self::One(t) => std::slice::from_ref(t),
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(v) => v,
            Self::One(t) => vec![t],
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(value: Vec<T>) -> Self {
        Self::Many(value)
    }
}

//--------------------------------------     Lenient numbers     ------------------------------------------------------
// The API serializes every number as a string ("qoh": "7"), but hand-written payloads and older endpoints use bare
// JSON numbers. Accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Lenient::deserialize(deserializer)? {
        Lenient::Int(v) => Ok(v),
        #[allow(clippy::cast_possible_truncation)]
        Lenient::Float(v) => Ok(v as i64),
        Lenient::Text(s) if s.trim().is_empty() => Ok(0),
        Lenient::Text(s) => s
            .trim()
            .parse::<i64>()
            .or_else(|_| s.trim().parse::<f64>().map(|f| f as i64))
            .map_err(|e| de::Error::custom(format!("'{s}' is not a number. {e}"))),
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let v = lenient_i64(deserializer)?;
    u64::try_from(v).map_err(|_| de::Error::custom(format!("{v} is negative")))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Lenient::deserialize(deserializer)? {
        Lenient::Int(v) => Ok(v.to_string()),
        Lenient::Float(v) => Ok(v.to_string()),
        Lenient::Text(s) => Ok(s),
    }
}

//--------------------------------------     Item     -----------------------------------------------------------------
/// An inventory item, as returned by `GET /Item.json?load_relations=all`. Every relation is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "itemID", default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "systemSku", default)]
    pub system_sku: Option<String>,
    #[serde(rename = "customSku", default)]
    pub custom_sku: Option<String>,
    #[serde(rename = "manufacturerSku", default)]
    pub manufacturer_sku: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<Category>,
    #[serde(rename = "Prices", default)]
    pub prices: Option<ItemPrices>,
    #[serde(rename = "ItemShops", default)]
    pub item_shops: Option<ItemShops>,
    #[serde(rename = "ItemVendorNums", default)]
    pub item_vendor_nums: Option<ItemVendorNums>,
    #[serde(rename = "Images", default)]
    pub images: Option<Images>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "categoryID", default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Slash-separated path, e.g. "Furniture/Chairs/Dining"
    #[serde(rename = "fullPathName", default)]
    pub full_path_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPrices {
    #[serde(rename = "ItemPrice", default)]
    pub item_price: OneOrMany<ItemPrice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPrice {
    #[serde(deserialize_with = "lenient_string", default)]
    pub amount: String,
    #[serde(rename = "useType", default, skip_serializing_if = "Option::is_none")]
    pub use_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemShops {
    #[serde(rename = "ItemShop", default)]
    pub item_shop: OneOrMany<ItemShop>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemShop {
    #[serde(deserialize_with = "lenient_i64", default)]
    pub qoh: i64,
    #[serde(rename = "shopID", default)]
    pub shop_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemVendorNums {
    #[serde(rename = "ItemVendorNum", default)]
    pub item_vendor_num: OneOrMany<ItemVendorNum>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemVendorNum {
    #[serde(deserialize_with = "lenient_string", default)]
    pub value: String,
    #[serde(rename = "vendorID", default)]
    pub vendor_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Images {
    #[serde(rename = "Image", default)]
    pub image: OneOrMany<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(rename = "baseImageURL", default)]
    pub base_image_url: String,
    #[serde(rename = "publicID", default)]
    pub public_id: String,
}

//--------------------------------------     ItemBatch     ------------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchAttributes {
    #[serde(deserialize_with = "lenient_u64", default)]
    pub count: u64,
}

/// The envelope of a list response. `count` is the total number of matches, which is what decides whether `Item`
/// holds one record or an array of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemBatch {
    #[serde(rename = "@attributes", default)]
    pub attributes: BatchAttributes,
    #[serde(rename = "Item", default)]
    pub items: Option<OneOrMany<Item>>,
}

impl ItemBatch {
    pub fn count(&self) -> u64 {
        self.attributes.count
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items.map(OneOrMany::into_vec).unwrap_or_default()
    }
}

//--------------------------------------     ItemFilter     -----------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub manufacturer_sku: Option<String>,
}

impl ItemFilter {
    pub fn by_manufacturer_sku<S: Into<String>>(sku: S) -> Self {
        Self { manufacturer_sku: Some(sku.into()) }
    }

    /// Query parameters for the item search. Relations are always loaded, since the sync needs prices, stock and
    /// images in a single round trip.
    pub fn params(&self) -> Vec<(&str, &str)> {
        let mut params = Vec::with_capacity(2);
        if let Some(sku) = &self.manufacturer_sku {
            params.push(("manufacturerSku", sku.as_str()));
        }
        params.push(("load_relations", "all"));
        params
    }
}

//--------------------------------------     NewItem     --------------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub description: String,
    #[serde(rename = "Prices")]
    pub prices: ItemPrices,
    #[serde(rename = "customSku")]
    pub custom_sku: String,
}

impl NewItem {
    /// An item with a single "Default" price tier.
    pub fn new(description: String, price: String, custom_sku: String) -> Self {
        let prices = ItemPrices {
            item_price: OneOrMany::Many(vec![ItemPrice { amount: price, use_type: Some("Default".to_string()) }]),
        };
        Self { description, prices, custom_sku }
    }
}
