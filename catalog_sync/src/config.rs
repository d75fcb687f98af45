use std::{env, time::Duration};

use lightspeed_tools::{ItemFilter, LightspeedConfig};
use log::*;
use shopify_tools::ShopifyConfig;
use sync_common::parse_boolean_flag;

use crate::sync::SyncDirection;

const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(200);
/// Only items with this manufacturer SKU are pulled from the inventory unless configured otherwise.
pub const DEFAULT_MANUFACTURER_SKU: &str = "RNS057";

#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub shopify: ShopifyConfig,
    pub lightspeed: LightspeedConfig,
    /// The time between the start of two consecutive sync cycles.
    pub interval: Duration,
    pub direction: SyncDirection,
    /// The manufacturer SKU used to select inventory items. An empty value removes the filter.
    pub manufacturer_sku: String,
    /// If true, the first cycle runs as soon as the worker starts, rather than one interval later.
    pub run_on_start: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            shopify: ShopifyConfig::default(),
            lightspeed: LightspeedConfig::default(),
            interval: DEFAULT_SYNC_INTERVAL,
            direction: SyncDirection::default(),
            manufacturer_sku: DEFAULT_MANUFACTURER_SKU.to_string(),
            run_on_start: true,
        }
    }
}

impl SyncConfig {
    pub fn from_env_or_default() -> Self {
        let shopify = ShopifyConfig::new_from_env_or_default();
        let lightspeed = LightspeedConfig::new_from_env_or_default();
        let interval = env::var("CATALOG_SYNC_INTERVAL")
            .map_err(|_| {
                info!(
                    "🪛️ CATALOG_SYNC_INTERVAL is not set. Using the default value of {}s.",
                    DEFAULT_SYNC_INTERVAL.as_secs()
                )
            })
            .and_then(|s| {
                parse_interval(&s).map_err(|e| warn!("🪛️ Invalid configuration value for CATALOG_SYNC_INTERVAL. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_SYNC_INTERVAL);
        let direction = env::var("CATALOG_SYNC_DIRECTION")
            .ok()
            .and_then(|s| {
                s.parse::<SyncDirection>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for CATALOG_SYNC_DIRECTION. {e}"))
                    .ok()
            })
            .unwrap_or_else(|| {
                let direction = SyncDirection::default();
                info!("🪛️ Using the {direction} sync direction");
                direction
            });
        let manufacturer_sku = env::var("CATALOG_SYNC_MANUFACTURER_SKU").unwrap_or_else(|_| {
            info!(
                "🪛️ CATALOG_SYNC_MANUFACTURER_SKU is not set. Only items with manufacturer SKU \
                 {DEFAULT_MANUFACTURER_SKU} will be synced."
            );
            DEFAULT_MANUFACTURER_SKU.to_string()
        });
        let run_on_start = parse_boolean_flag(env::var("CATALOG_SYNC_RUN_ON_START").ok(), true);
        Self { shopify, lightspeed, interval, direction, manufacturer_sku, run_on_start }
    }

    pub fn item_filter(&self) -> ItemFilter {
        let sku = self.manufacturer_sku.trim();
        if sku.is_empty() {
            warn!("🪛️ No manufacturer SKU filter is set. Every inventory item will be fetched.");
            ItemFilter::default()
        } else {
            ItemFilter::by_manufacturer_sku(sku)
        }
    }
}

fn parse_interval(s: &str) -> Result<Duration, String> {
    let secs = s.trim().parse::<u64>().map_err(|e| format!("'{s}' is not a whole number of seconds. {e}"))?;
    if secs == 0 {
        return Err("The interval must be at least one second".to_string());
    }
    Ok(Duration::from_secs(secs))
}
