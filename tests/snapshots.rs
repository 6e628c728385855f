//! File-backed snapshot persistence across sessions.

use std::fs;

use tempfile::tempdir;
use testresult::TestResult;

use boutique::{
    clock::FixedClock,
    config::snapshots::SnapshotConfig,
    fixtures::Fixture,
    pricing::PricingPolicy,
    session::Session,
    snapshots::{FileSnapshotStore, SnapshotStore, USER_KEY, save},
    users::UserProfile,
};

fn shopper() -> UserProfile {
    UserProfile {
        id: "user-42".into(),
        email: "nila@example.com".to_string(),
        display_name: Some("Nila".to_string()),
    }
}

#[test]
fn cart_written_by_one_session_is_found_by_the_next() -> TestResult {
    let dir = tempdir()?;
    let fixture = Fixture::from_set("apparel")?;
    let (product, variant) = fixture.variant_by_sku("KURTA-IND-L")?;

    let mut first = Session::open(
        PricingPolicy::default(),
        FixedClock::default(),
        FileSnapshotStore::new(dir.path())?,
    );
    first.add_to_cart(product, variant, 2);
    let written = first.state().cart().clone();

    assert!(dir.path().join("cart.json").exists());

    let second = Session::open(
        PricingPolicy::default(),
        FixedClock::default(),
        FileSnapshotStore::new(dir.path())?,
    );

    assert_eq!(second.saved_cart(), Some(&written));
    assert!(second.state().cart().is_empty());

    Ok(())
}

#[test]
fn corrupt_cart_file_is_discarded_and_user_survives() -> TestResult {
    let dir = tempdir()?;
    let mut store = FileSnapshotStore::new(dir.path())?;

    save(&mut store, USER_KEY, &shopper())?;
    fs::write(dir.path().join("cart.json"), "{\"items\": [")?;

    let session = Session::open(PricingPolicy::default(), FixedClock::default(), store);

    assert_eq!(session.saved_cart(), None);
    assert_eq!(session.state().user(), Some(&shopper()));
    assert!(!dir.path().join("cart.json").exists());

    Ok(())
}

#[test]
fn hand_edited_cart_file_is_discarded() -> TestResult {
    let dir = tempdir()?;
    let fixture = Fixture::from_set("apparel")?;
    let (product, variant) = fixture.variant_by_sku("KURTA-IND-M")?;

    let mut first = Session::open(
        PricingPolicy::default(),
        FixedClock::default(),
        FileSnapshotStore::new(dir.path())?,
    );
    first.add_to_cart(product, variant, 2);

    let path = dir.path().join("cart.json");
    let mut json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    *json
        .pointer_mut("/items/0/quantity")
        .ok_or("expected a quantity")? = 5.into();
    fs::write(&path, json.to_string())?;

    let second = Session::open(
        PricingPolicy::default(),
        FixedClock::default(),
        FileSnapshotStore::new(dir.path())?,
    );

    assert_eq!(second.saved_cart(), None);
    assert!(!path.exists());

    Ok(())
}

#[test]
fn wishlist_entries_carry_the_restored_user() -> TestResult {
    let dir = tempdir()?;
    let fixture = Fixture::from_set("apparel")?;
    let mut store = FileSnapshotStore::new(dir.path())?;

    save(&mut store, USER_KEY, &shopper())?;

    let mut session = Session::open(PricingPolicy::default(), FixedClock::default(), store);
    let product = fixture.product("block-print-tee")?;
    let state = session.add_to_wishlist(product);

    let entry = state
        .wishlist()
        .entry(&product.id)
        .ok_or("expected a wishlist entry")?;

    assert_eq!(entry.user_id(), Some(&shopper().id));

    Ok(())
}

#[test]
fn configured_directory_is_created_and_used() -> TestResult {
    let dir = tempdir()?;
    let nested = dir.path().join("state").join("carts");

    let config = SnapshotConfig {
        snapshot_dir: Some(nested.clone()),
    };
    let mut store = config.open_store()?;

    store.set("scratch", "{}".to_string())?;

    assert_eq!(fs::read_to_string(nested.join("scratch.json"))?, "{}");
    assert_eq!(store.get("missing")?, None);

    store.remove("scratch")?;
    store.remove("scratch")?;

    assert!(!nested.join("scratch.json").exists());

    Ok(())
}
