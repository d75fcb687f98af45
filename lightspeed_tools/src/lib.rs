//! A small client for the Lightspeed Retail (R-Series) API.
//!
//! Only the calls the catalog sync needs are provided: listing items with a filter, creating an item, and the OAuth2
//! code and refresh-token exchanges that keep the access token alive.
mod api;
mod config;
mod error;
mod item;
mod token;

pub use api::LightspeedApi;
pub use config::LightspeedConfig;
pub use error::LightspeedApiError;
pub use item::{
    BatchAttributes,
    Category,
    Image,
    Images,
    Item,
    ItemBatch,
    ItemFilter,
    ItemPrice,
    ItemPrices,
    ItemShop,
    ItemShops,
    ItemVendorNum,
    ItemVendorNums,
    NewItem,
    OneOrMany,
};
pub use token::{TokenManager, TokenPair};
