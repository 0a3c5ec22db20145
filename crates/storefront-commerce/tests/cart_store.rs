//! Cart store behaviour against real storage backends.

use std::sync::Arc;

use storefront_cache::{Cache, FileStore, KvStore, MemoryStore};
use storefront_commerce::catalog::fixtures::sample_catalog;
use storefront_commerce::prelude::*;

fn product(id: &str, cents: i64) -> CartProduct {
    CartProduct::new(id, format!("Product {id}"), Money::usd(cents))
}

fn shared_store() -> (Arc<MemoryStore>, CartStore<Arc<MemoryStore>>) {
    let backing = Arc::new(MemoryStore::new());
    let store = CartStore::open(Cache::new(Arc::clone(&backing)));
    (backing, store)
}

#[test]
fn test_adding_absent_product_creates_line() {
    let (_, mut store) = shared_store();
    store.add_item(product("a", 5000), 2);

    let id = ProductId::new("a");
    assert!(store.is_in_cart(&id));
    assert_eq!(store.line(&id).map(|l| l.quantity), Some(2));
    assert_eq!(store.lines().len(), 1);
}

#[test]
fn test_adding_present_product_increments_quantity() {
    let (_, mut store) = shared_store();
    store.add_item(product("a", 5000), 2);
    store.add_item(product("a", 5000), 3);

    assert_eq!(store.lines().len(), 1);
    assert_eq!(store.item_count(), 5);
}

#[test]
fn test_removing_absent_product_changes_nothing() {
    let (backing, mut store) = shared_store();
    store.add_item(product("a", 5000), 1);
    let persisted = backing.get("cart").unwrap();
    let before = store.snapshot();

    store.remove_item(&ProductId::new("zzz"));

    assert_eq!(store.snapshot(), before);
    assert_eq!(backing.get("cart").unwrap(), persisted);
}

#[test]
fn test_total_reflects_every_mutation() {
    let (_, mut store) = shared_store();
    store.add_item(product("a", 5000), 1);
    assert_eq!(store.total_price(), Money::usd(5000));

    store.add_item(product("b", 10000).with_sale_price(Money::usd(8000)), 2);
    assert_eq!(store.total_price(), Money::usd(21000));

    store.update_quantity(&ProductId::new("a"), 4);
    assert_eq!(store.total_price(), Money::usd(36000));

    store.remove_item(&ProductId::new("b"));
    assert_eq!(store.total_price(), Money::usd(20000));
}

#[test]
fn test_clear_empties_cart_and_storage() {
    let (backing, mut store) = shared_store();
    store.add_item(product("a", 5000), 3);
    store.clear();

    assert_eq!(store.item_count(), 0);
    assert!(store.total_price().is_zero());
    assert_eq!(backing.get("cart").unwrap(), Some(b"[]".to_vec()));

    let reloaded = CartStore::open(Cache::new(Arc::clone(&backing)));
    assert!(reloaded.is_empty());
}

#[test]
fn test_fresh_store_reloads_persisted_lines() {
    let (backing, mut store) = shared_store();
    store.add_item(product("a", 5000), 1);
    store.add_item(
        product("b", 10000)
            .with_sale_price(Money::usd(8000))
            .with_image("https://example.com/b.jpg")
            .with_stock(4),
        2,
    );

    let reloaded = CartStore::open(Cache::new(Arc::clone(&backing)));
    assert_eq!(reloaded.lines(), store.lines());
    assert_eq!(reloaded.total_price(), store.total_price());
}

#[test]
fn test_scenario_repeat_add_and_sale_price() {
    let (_, mut store) = shared_store();
    store.add_item(product("a", 5000), 1);
    store.add_item(product("a", 5000), 2);

    assert_eq!(store.lines().len(), 1);
    assert_eq!(store.line(&ProductId::new("a")).map(|l| l.quantity), Some(3));
    assert_eq!(store.total_price(), Money::usd(15000));

    store.add_item(product("b", 10000).with_sale_price(Money::usd(8000)), 1);
    assert_eq!(store.total_price(), Money::usd(23000));
}

#[test]
fn test_malformed_blob_loads_as_empty_cart() {
    let backing = Arc::new(MemoryStore::new());
    backing.set("cart", b"{not json").unwrap();

    let mut store = CartStore::open(Cache::new(Arc::clone(&backing)));
    assert!(store.is_empty());
    assert_eq!(store.item_count(), 0);

    store.add_item(product("a", 100), 1);
    let reloaded = CartStore::open(Cache::new(backing));
    assert_eq!(reloaded.item_count(), 1);
}

#[test]
fn test_wrong_shape_loads_as_empty_cart() {
    let backing = Arc::new(MemoryStore::new());
    backing.set("cart", br#"{"items":[]}"#).unwrap();

    let store = CartStore::open(Cache::new(backing));
    assert!(store.is_empty());
}

#[test]
fn test_integer_ids_in_persisted_cart_load() {
    let backing = Arc::new(MemoryStore::new());
    let json = r#"[
        {"id": 7, "name": "Lamp", "price": {"amount_cents": 1299, "currency": "USD"}, "quantity": 2},
        {"id": "p1", "name": "Vase", "price": {"amount_cents": 4999, "currency": "USD"}, "quantity": 1}
    ]"#;
    backing.set("cart", json.as_bytes()).unwrap();

    let store = CartStore::open(Cache::new(backing));
    assert!(store.is_in_cart(&ProductId::from(7)));
    assert!(store.is_in_cart(&ProductId::new("7")));
    assert_eq!(store.total_price(), Money::usd(7597));
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = sample_catalog();
    let rug = catalog.get_by_slug("handwoven-wool-rug").unwrap();

    {
        let files = FileStore::open(dir.path()).unwrap();
        let mut store = CartStore::new(Cache::new(files)).with_key("cart:guest");
        store.hydrate();
        store.add_item(&rug, 2);
    }

    let files = FileStore::open(dir.path()).unwrap();
    let mut store = CartStore::new(Cache::new(files)).with_key("cart:guest");
    assert!(store.is_empty());
    assert_eq!(store.hydrate(), 1);

    let line = store.line(&rug.id).unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.slug, "handwoven-wool-rug");
    assert_eq!(store.total_price(), Money::usd(31998));
    assert_eq!(store.summary().tax, Money::usd(3200));
}

#[test]
fn test_loaded_event_reports_line_count() {
    let (backing, mut store) = shared_store();
    store.add_item(product("a", 100), 1);
    store.add_item(product("b", 100), 1);

    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut fresh = CartStore::new(Cache::new(backing));
    fresh.subscribe(move |e| sink.lock().unwrap().push(e.clone()));
    fresh.hydrate();

    assert_eq!(*seen.lock().unwrap(), vec![CartEvent::Loaded { lines: 2 }]);
}
