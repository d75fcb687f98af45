use lightspeed_tools::{
    BatchAttributes,
    Item,
    ItemBatch,
    ItemFilter,
    ItemVendorNum,
    ItemVendorNums,
    LightspeedApiError,
    NewItem,
    OneOrMany,
};
use mockall::predicate::eq;
use shopify_tools::{ShopifyApiError, Variant};

use super::mocks::{inventory_returning, product, MockInventory, MockStorefront};
use crate::sync::{CatalogSync, SyncAction, SyncDirection, SyncSummary};

fn item(description: &str, vendor: &str) -> Item {
    Item {
        description: Some(description.to_string()),
        item_vendor_nums: Some(ItemVendorNums {
            item_vendor_num: OneOrMany::One(ItemVendorNum { value: vendor.to_string(), vendor_id: None }),
        }),
        ..Default::default()
    }
}

fn batch(items: Vec<Item>) -> ItemBatch {
    let count = items.len() as u64;
    let items = match items.len() {
        0 => None,
        1 => items.into_iter().next().map(OneOrMany::One),
        _ => Some(OneOrMany::Many(items)),
    };
    ItemBatch { attributes: BatchAttributes { count }, items }
}

fn filter() -> ItemFilter {
    ItemFilter::by_manufacturer_sku("RNS057")
}

#[tokio::test]
async fn creates_when_nothing_matches() {
    let _ = env_logger::try_init();
    let mut storefront = MockStorefront::new();
    storefront
        .expect_search_products()
        .withf(|title, vendor| title == "Oak Chair" && vendor == "V-1")
        .times(1)
        .returning(|_, _| Ok(vec![]));
    storefront
        .expect_create_product()
        .withf(|p| p.title == "Oak Chair" && p.body_html == "<p>Oak Chair</p>")
        .times(1)
        .returning(|p| Ok(product(501, &p.title)));
    storefront.expect_update_product().never();
    let sync = CatalogSync::new(storefront, MockInventory::new(), filter());
    let action = sync.push_item_to_storefront(&item("Oak Chair", "V-1")).await.unwrap();
    assert_eq!(action, SyncAction::Created(501));
}

#[tokio::test]
async fn updates_the_first_match_only() {
    let _ = env_logger::try_init();
    let mut storefront = MockStorefront::new();
    storefront
        .expect_search_products()
        .times(1)
        .returning(|title, _| Ok(vec![product(11, title), product(12, title), product(13, title)]));
    storefront.expect_create_product().never();
    storefront
        .expect_update_product()
        .with(eq(11), mockall::predicate::always())
        .times(1)
        .returning(|id, p| Ok(product(id, &p.title)));
    let sync = CatalogSync::new(storefront, MockInventory::new(), filter());
    let action = sync.push_item_to_storefront(&item("Oak Chair", "V-1")).await.unwrap();
    assert_eq!(action, SyncAction::Updated(11));
}

#[tokio::test]
async fn sparse_items_search_with_empty_title_and_vendor() {
    let mut storefront = MockStorefront::new();
    storefront
        .expect_search_products()
        .withf(|title, vendor| title.is_empty() && vendor.is_empty())
        .times(1)
        .returning(|_, _| Ok(vec![product(7, "")]));
    storefront.expect_update_product().times(1).returning(|id, _| Ok(product(id, "")));
    let sync = CatalogSync::new(storefront, MockInventory::new(), filter());
    let action = sync.push_item_to_storefront(&Item::default()).await.unwrap();
    assert_eq!(action, SyncAction::Updated(7));
}

#[tokio::test]
async fn batch_processes_every_item() {
    let _ = env_logger::try_init();
    let items = vec![item("Chair", "V-1"), item("Table", "V-2"), item("Lamp", "V-3")];
    let mut inventory = MockInventory::new();
    inventory.expect_refresh_access_token().times(1).returning(|| Ok(Default::default()));
    inventory.expect_fetch_items().with(eq(filter())).times(1).returning(move |_| Ok(batch(items.clone())));
    let mut storefront = MockStorefront::new();
    storefront.expect_search_products().times(3).returning(|title, _| {
        if title == "Table" {
            Ok(vec![product(2, title)])
        } else {
            Ok(vec![])
        }
    });
    storefront.expect_create_product().times(2).returning(|p| Ok(product(100, &p.title)));
    storefront.expect_update_product().with(eq(2), mockall::predicate::always()).times(1).returning(|id, p| {
        Ok(product(id, &p.title))
    });
    let sync = CatalogSync::new(storefront, inventory, filter());
    let summary = sync.sync_inventory_to_storefront().await.unwrap();
    assert_eq!(summary, SyncSummary { created: 2, updated: 1 });
}

#[tokio::test]
async fn one_failure_fails_the_batch() {
    let _ = env_logger::try_init();
    let inventory = inventory_returning(batch(vec![item("Chair", "V-1"), item("Broken", "V-2")]));
    let mut storefront = MockStorefront::new();
    storefront.expect_search_products().returning(|title, _| {
        if title == "Broken" {
            Err(ShopifyApiError::QueryError { status: 500, message: "Internal Server Error".into() })
        } else {
            Ok(vec![])
        }
    });
    storefront.expect_create_product().returning(|p| Ok(product(1, &p.title)));
    let sync = CatalogSync::new(storefront, inventory, filter());
    let err = sync.sync_inventory_to_storefront().await.unwrap_err();
    assert!(err.to_string().contains("500"));
    assert!(sync.run_cycle(SyncDirection::InventoryToStorefront).await.is_none());
}

#[tokio::test]
async fn single_item_batch() {
    let inventory = inventory_returning(batch(vec![item("Desk", "V-9")]));
    let mut storefront = MockStorefront::new();
    storefront.expect_search_products().times(1).returning(|_, _| Ok(vec![]));
    storefront.expect_create_product().times(1).returning(|p| Ok(product(3, &p.title)));
    let sync = CatalogSync::new(storefront, inventory, filter());
    let summary = sync.run_cycle(SyncDirection::InventoryToStorefront).await.unwrap();
    assert_eq!(summary, SyncSummary { created: 1, updated: 0 });
}

#[tokio::test]
async fn empty_batch_touches_nothing() {
    let inventory = inventory_returning(batch(vec![]));
    let mut storefront = MockStorefront::new();
    storefront.expect_search_products().never();
    storefront.expect_create_product().never();
    storefront.expect_update_product().never();
    let sync = CatalogSync::new(storefront, inventory, filter());
    let summary = sync.sync_inventory_to_storefront().await.unwrap();
    assert_eq!(summary.total(), 0);
}

#[tokio::test]
async fn rejected_refresh_stops_the_cycle() {
    let _ = env_logger::try_init();
    let mut inventory = MockInventory::new();
    inventory
        .expect_refresh_access_token()
        .times(1)
        .returning(|| Err(LightspeedApiError::AuthError { status: 400, message: "invalid_grant".into() }));
    inventory.expect_fetch_items().never();
    let mut storefront = MockStorefront::new();
    storefront.expect_search_products().never();
    let sync = CatalogSync::new(storefront, inventory, filter());
    let err = sync.sync_inventory_to_storefront().await.unwrap_err();
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn failed_cycle_does_not_prevent_the_next() {
    let mut inventory = MockInventory::new();
    let mut attempt = 0;
    inventory.expect_refresh_access_token().times(2).returning(move || {
        attempt += 1;
        if attempt == 1 {
            Err(LightspeedApiError::RestResponseError("connection reset".into()))
        } else {
            Ok(Default::default())
        }
    });
    inventory.expect_fetch_items().times(1).returning(|_| Ok(batch(vec![])));
    let sync = CatalogSync::new(MockStorefront::new(), inventory, filter());
    assert!(sync.run_cycle(SyncDirection::InventoryToStorefront).await.is_none());
    assert!(sync.run_cycle(SyncDirection::InventoryToStorefront).await.is_some());
}

#[tokio::test]
async fn storefront_to_inventory_is_not_idempotent() {
    let _ = env_logger::try_init();
    let mut storefront = MockStorefront::new();
    storefront.expect_fetch_products().times(2).returning(|| {
        let mut sofa = product(1, "Sofa");
        sofa.variants = vec![Variant { id: 10, price: "899.00".into(), sku: Some("SF-1".into()), ..Default::default() }];
        Ok(vec![sofa, product(2, "Ottoman")])
    });
    storefront.expect_search_products().never();
    let mut inventory = MockInventory::new();
    inventory.expect_refresh_access_token().times(2).returning(|| Ok(Default::default()));
    inventory
        .expect_create_item()
        .with(eq(NewItem::new("Sofa".into(), "899.00".into(), "SF-1".into())))
        .times(2)
        .returning(|_| Ok(Item::default()));
    inventory
        .expect_create_item()
        .with(eq(NewItem::new("Ottoman".into(), "0".into(), String::new())))
        .times(2)
        .returning(|_| Ok(Item::default()));
    let sync = CatalogSync::new(storefront, inventory, filter());
    let first = sync.run_cycle(SyncDirection::StorefrontToInventory).await.unwrap();
    let second = sync.run_cycle(SyncDirection::StorefrontToInventory).await.unwrap();
    assert_eq!(first, SyncSummary { created: 2, updated: 0 });
    assert_eq!(second, first);
}

#[tokio::test]
async fn storefront_to_inventory_single_product() {
    let mut storefront = MockStorefront::new();
    storefront.expect_fetch_products().times(1).returning(|| Ok(vec![product(5, "Bench")]));
    let mut inventory = MockInventory::new();
    inventory.expect_refresh_access_token().times(1).returning(|| Ok(Default::default()));
    inventory.expect_create_item().times(1).returning(|_| Ok(Item::default()));
    let sync = CatalogSync::new(storefront, inventory, filter());
    let summary = sync.sync_storefront_to_inventory().await.unwrap();
    assert_eq!(summary.created, 1);
}

#[tokio::test]
async fn inventory_create_failure_propagates() {
    let mut storefront = MockStorefront::new();
    storefront.expect_fetch_products().returning(|| Ok(vec![product(5, "Bench"), product(6, "Stool")]));
    let mut inventory = MockInventory::new();
    inventory.expect_refresh_access_token().returning(|| Ok(Default::default()));
    inventory
        .expect_create_item()
        .returning(|_| Err(LightspeedApiError::QueryError { status: 422, message: "Unprocessable".into() }));
    let sync = CatalogSync::new(storefront, inventory, filter());
    let err = sync.sync_storefront_to_inventory().await.unwrap_err();
    assert!(!err.is_auth_error());
    assert!(err.to_string().contains("422"));
}
