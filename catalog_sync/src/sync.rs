use std::{fmt::Display, str::FromStr};

use futures::future::try_join_all;
use lightspeed_tools::{Item, ItemFilter};
use log::*;
use shopify_tools::ShopifyProduct;

use crate::{
    errors::SyncError,
    mapping::{item_from_product, product_from_item},
    traits::{InventoryCatalog, StorefrontCatalog},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncDirection {
    /// Lightspeed items are created or updated in Shopify
    #[default]
    InventoryToStorefront,
    /// Shopify products are created in Lightspeed. There is no existence check in this direction.
    StorefrontToInventory,
}

impl Display for SyncDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InventoryToStorefront => f.write_str("inventory-to-storefront"),
            Self::StorefrontToInventory => f.write_str("storefront-to-inventory"),
        }
    }
}

impl FromStr for SyncDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inventory-to-storefront" | "lightspeed-to-shopify" | "ls2shopify" => Ok(Self::InventoryToStorefront),
            "storefront-to-inventory" | "shopify-to-lightspeed" | "shopify2ls" => Ok(Self::StorefrontToInventory),
            _ => Err(format!(
                "'{s}' is not a sync direction. Use 'inventory-to-storefront' or 'storefront-to-inventory'."
            )),
        }
    }
}

/// What happened to a single inventory item on the storefront side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Created(i64),
    Updated(i64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
}

impl SyncSummary {
    pub fn total(&self) -> usize {
        self.created + self.updated
    }

    fn from_actions(actions: &[SyncAction]) -> Self {
        actions.iter().fold(Self::default(), |mut summary, action| {
            match action {
                SyncAction::Created(_) => summary.created += 1,
                SyncAction::Updated(_) => summary.updated += 1,
            }
            summary
        })
    }
}

impl Display for SyncSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} created, {} updated", self.created, self.updated)
    }
}

/// Copies records from one catalog to the other. Every call is a one-shot procedure: nothing is remembered between
/// cycles, and records are matched across platforms by title and vendor alone.
pub struct CatalogSync<S, I> {
    storefront: S,
    inventory: I,
    filter: ItemFilter,
}

impl<S, I> CatalogSync<S, I>
where
    S: StorefrontCatalog,
    I: InventoryCatalog,
{
    pub fn new(storefront: S, inventory: I, filter: ItemFilter) -> Self {
        Self { storefront, inventory, filter }
    }

    pub fn storefront(&self) -> &S {
        &self.storefront
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    /// Runs one cycle in the given direction. This is where errors stop: a failed cycle is logged and `None` is
    /// returned. The next cycle starts from scratch.
    pub async fn run_cycle(&self, direction: SyncDirection) -> Option<SyncSummary> {
        info!("🔄️ Starting {direction} sync");
        let result = match direction {
            SyncDirection::InventoryToStorefront => self.sync_inventory_to_storefront().await,
            SyncDirection::StorefrontToInventory => self.sync_storefront_to_inventory().await,
        };
        match result {
            Ok(summary) => {
                info!("🔄️ Products synced successfully ({direction}). {summary}");
                Some(summary)
            },
            Err(e) if e.is_auth_error() => {
                error!(
                    "🔄️ Error syncing products ({direction}). The refresh token was rejected, so a new authorization \
                     code is needed. {e}"
                );
                None
            },
            Err(e) => {
                error!("🔄️ Error syncing products ({direction}). {e}");
                None
            },
        }
    }

    /// Pushes the filtered inventory items to the storefront. When the batch holds more than one item they are all
    /// pushed concurrently, and the first failure fails the whole batch.
    pub async fn sync_inventory_to_storefront(&self) -> Result<SyncSummary, SyncError> {
        self.inventory.refresh_access_token().await?;
        let batch = self.inventory.fetch_items(&self.filter).await?;
        let count = batch.count();
        let items = batch.into_items();
        debug!("🔄️ Inventory reported {count} matching items");
        let actions = if count > 1 {
            try_join_all(items.iter().map(|item| self.push_item_to_storefront(item))).await?
        } else {
            match items.first() {
                Some(item) => vec![self.push_item_to_storefront(item).await?],
                None => {
                    info!("🔄️ No inventory items matched {:?}. Nothing to sync.", self.filter);
                    vec![]
                },
            }
        };
        Ok(SyncSummary::from_actions(&actions))
    }

    /// Search-then-create-or-update for a single item. If several storefront products match, only the first is
    /// updated and the others are left alone.
    pub async fn push_item_to_storefront(&self, item: &Item) -> Result<SyncAction, SyncError> {
        let product = product_from_item(item);
        let matches = self.storefront.search_products(&product.title, &product.vendor).await?;
        match matches.first() {
            None => {
                debug!("🔄️ '{}' is not in the storefront yet. Creating it.", product.title);
                let created = self.storefront.create_product(&product).await?;
                Ok(SyncAction::Created(created.id))
            },
            Some(existing) => {
                if matches.len() > 1 {
                    warn!(
                        "🔄️ {} storefront products match '{}' ({}). Only #{} will be updated.",
                        matches.len(),
                        product.title,
                        product.vendor,
                        existing.id
                    );
                }
                let updated = self.storefront.update_product(existing.id, &product).await?;
                Ok(SyncAction::Updated(updated.id))
            },
        }
    }

    /// Creates an inventory item for every storefront product. Nothing checks whether the item already exists, so
    /// every run creates a fresh set of items.
    pub async fn sync_storefront_to_inventory(&self) -> Result<SyncSummary, SyncError> {
        self.inventory.refresh_access_token().await?;
        let products = self.storefront.fetch_products().await?;
        let created = if products.len() > 1 {
            try_join_all(products.iter().map(|product| self.push_product_to_inventory(product))).await?.len()
        } else {
            match products.first() {
                Some(product) => {
                    self.push_product_to_inventory(product).await?;
                    1
                },
                None => 0,
            }
        };
        Ok(SyncSummary { created, updated: 0 })
    }

    pub async fn push_product_to_inventory(&self, product: &ShopifyProduct) -> Result<Item, SyncError> {
        let item = item_from_product(product);
        let created = self.inventory.create_item(&item).await?;
        debug!("🔄️ Storefront product #{} copied to inventory as '{}'", product.id, item.description);
        Ok(created)
    }
}
