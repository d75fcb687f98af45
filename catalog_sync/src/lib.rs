//! # Catalog sync
//! Copies product records between a Lightspeed Retail inventory and a Shopify storefront on a fixed timer.
//!
//! * [`mapping`] translates records from one platform's shape into the other's.
//! * [`sync`] holds the [`CatalogSync`](sync::CatalogSync) orchestrator, which fetches a batch from one platform and
//!   creates (or updates) the matching records on the other.
//! * [`sync_worker`] drives the orchestrator from a timer.
//!
//! ## Configuration
//! Everything is configured via environment variables. See [config](config/index.html) for more information.
pub mod cli;
pub mod config;
pub mod errors;
pub mod mapping;
pub mod sync;
pub mod sync_worker;
pub mod traits;

#[cfg(test)]
mod test;
