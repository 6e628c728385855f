//! Snapshots
//!
//! The persistence boundary. Carts and the signed-in user are saved as JSON
//! strings under fixed keys in a [`SnapshotStore`]. Reading a snapshot never
//! fails loudly: anything missing, unreadable or corrupt is treated as absent.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::Cart,
    pricing::PricingPolicy,
    store::{State, StoreObserver, Transition},
    users::UserProfile,
};

/// Key the cart snapshot is saved under
pub const CART_KEY: &str = "cart";

/// Key the signed-in user is saved under
pub const USER_KEY: &str = "user";

/// Snapshot read/write errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem error
    #[error("snapshot storage failed: {0}")]
    Io(#[from] io::Error),

    /// Snapshot could not be encoded or decoded
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage for snapshots.
pub trait SnapshotStore {
    /// Read the value saved under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SnapshotError>;

    /// Save `value` under `key`, replacing anything already there.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: String) -> Result<(), SnapshotError>;

    /// Delete the value under `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the backing storage cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), SnapshotError>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SnapshotError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), SnapshotError> {
        (**self).remove(key)
    }
}

/// Snapshots held in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    values: FxHashMap<String, String>,
}

impl MemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SnapshotError> {
        self.values.insert(key.to_string(), value);

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SnapshotError> {
        self.values.remove(key);

        Ok(())
    }
}

/// Snapshots saved as `<key>.json` files in a directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Use `dir` for snapshot files, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        let dir = dir.into();

        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    /// Directory holding the snapshot files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SnapshotError> {
        fs::write(self.path(key), value)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SnapshotError> {
        match fs::remove_file(self.path(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// What was found in a snapshot store at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Restored {
    /// Signed-in user, if one was saved
    pub user: Option<UserProfile>,

    /// Cart saved by an earlier session
    pub cart: Option<Cart>,
}

/// Read the user and cart snapshots.
///
/// Entries that cannot be read or parsed are logged, removed from the store
/// and reported as absent. So is a cart whose totals are not the ones
/// `policy` gives for its line items, whether it was edited by hand or saved
/// under different pricing.
pub fn restore<S: SnapshotStore + ?Sized>(store: &mut S, policy: &PricingPolicy) -> Restored {
    let user = load(store, USER_KEY);
    let cart = load::<_, Cart>(store, CART_KEY).and_then(|cart| {
        if cart.is_priced_by(policy) {
            Some(cart)
        } else {
            warn!(
                key = CART_KEY,
                currency = cart.currency().iso_alpha_code,
                "discarding cart snapshot whose totals do not match its items"
            );
            discard(store, CART_KEY);

            None
        }
    });

    Restored { user, cart }
}

/// Save a value as JSON under `key`.
///
/// # Errors
///
/// Returns a [`SnapshotError`] if the value cannot be encoded or the store
/// cannot be written.
pub fn save<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), SnapshotError>
where
    S: SnapshotStore + ?Sized,
    T: Serialize,
{
    store.set(key, serde_json::to_string(value)?)
}

fn load<S, T>(store: &mut S, key: &str) -> Option<T>
where
    S: SnapshotStore + ?Sized,
    T: DeserializeOwned,
{
    let result = store.get(key).and_then(|raw| match raw {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(SnapshotError::from),
        None => Ok(None),
    });

    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "discarding unreadable snapshot");
            discard(store, key);

            None
        }
    }
}

fn discard<S: SnapshotStore + ?Sized>(store: &mut S, key: &str) {
    if let Err(err) = store.remove(key) {
        warn!(key, error = %err, "failed to remove discarded snapshot");
    }
}

/// Store observer that saves the cart after every transition.
#[derive(Debug)]
pub struct SnapshotWriter<S> {
    store: S,
}

impl<S: SnapshotStore> SnapshotWriter<S> {
    /// Write cart snapshots into `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: SnapshotStore> StoreObserver for SnapshotWriter<S> {
    fn on_transition(&mut self, transition: &Transition, state: &State) {
        match save(&mut self.store, CART_KEY, state.cart()) {
            Ok(()) => debug!(transition = transition.name(), "saved cart snapshot"),
            Err(err) => warn!(
                transition = transition.name(),
                error = %err,
                "failed to save cart snapshot"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rusty_money::{
        Money,
        iso::{GBP, INR},
    };
    use testresult::TestResult;

    use crate::products::test_support::product_with_variant;

    use super::*;

    #[test]
    fn restore_from_empty_store_finds_nothing() {
        let mut store = MemorySnapshotStore::new();

        assert_eq!(
            restore(&mut store, &PricingPolicy::default()),
            Restored::default()
        );
    }

    #[test]
    fn restore_reads_saved_user_and_cart() -> TestResult {
        let mut store = MemorySnapshotStore::new();
        let user = UserProfile {
            id: "user-7".into(),
            email: "asha@example.com".to_string(),
            display_name: Some("Asha".to_string()),
        };
        let (product, variant) = product_with_variant("kurta", 2499);
        let state = State::new(None, INR, Timestamp::UNIX_EPOCH).apply(
            &Transition::add_to_cart(&product, &variant, 2),
            &PricingPolicy::default(),
            Timestamp::UNIX_EPOCH,
        );

        save(&mut store, USER_KEY, &user)?;
        save(&mut store, CART_KEY, state.cart())?;

        let restored = restore(&mut store, &PricingPolicy::default());

        assert_eq!(restored.user, Some(user));
        assert_eq!(restored.cart.as_ref(), Some(state.cart()));

        Ok(())
    }

    #[test]
    fn corrupt_entries_are_discarded() -> TestResult {
        let mut store = MemorySnapshotStore::new();
        store.set(CART_KEY, "{not json".to_string())?;
        store.set(USER_KEY, r#"{"email": 42}"#.to_string())?;

        assert_eq!(
            restore(&mut store, &PricingPolicy::default()),
            Restored::default()
        );
        assert_eq!(store.get(CART_KEY)?, None);
        assert_eq!(store.get(USER_KEY)?, None);

        Ok(())
    }

    fn saved_cart(store: &mut MemorySnapshotStore, quantity: u32) -> TestResult {
        let (product, variant) = product_with_variant("kurta", 7500);
        let state = State::new(None, INR, Timestamp::UNIX_EPOCH).apply(
            &Transition::add_to_cart(&product, &variant, quantity),
            &PricingPolicy::default(),
            Timestamp::UNIX_EPOCH,
        );

        save(store, CART_KEY, state.cart())?;

        Ok(())
    }

    #[test]
    fn cart_with_totals_out_of_step_with_items_is_discarded() -> TestResult {
        let mut store = MemorySnapshotStore::new();
        saved_cart(&mut store, 2)?;

        let raw = store.get(CART_KEY)?.ok_or("cart should be saved")?;
        let mut json: serde_json::Value = serde_json::from_str(&raw)?;
        *json
            .pointer_mut("/items/0/quantity")
            .ok_or("expected a quantity")? = 5.into();
        store.set(CART_KEY, json.to_string())?;

        let restored = restore(&mut store, &PricingPolicy::default());

        assert_eq!(restored.cart, None);
        assert_eq!(store.get(CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn cart_saved_under_other_pricing_is_discarded() -> TestResult {
        let mut store = MemorySnapshotStore::new();
        saved_cart(&mut store, 1)?;

        let standard = PricingPolicy::default();
        let repriced = PricingPolicy::new(
            standard.tax_rate(),
            standard.free_shipping_threshold(),
            Money::from_minor(9_900, INR),
        )?;

        assert_eq!(restore(&mut store, &repriced).cart, None);
        assert_eq!(store.get(CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn cart_in_another_currency_is_discarded() -> TestResult {
        let mut store = MemorySnapshotStore::new();
        saved_cart(&mut store, 1)?;

        let sterling = PricingPolicy::new(
            PricingPolicy::default().tax_rate(),
            Money::from_minor(5_000, GBP),
            Money::from_minor(399, GBP),
        )?;

        assert_eq!(restore(&mut store, &sterling).cart, None);

        Ok(())
    }

    #[test]
    fn writer_saves_the_cart_after_each_transition() -> TestResult {
        let mut writer = SnapshotWriter::new(MemorySnapshotStore::new());
        let state = State::new(None, INR, Timestamp::UNIX_EPOCH);

        writer.on_transition(&Transition::ClearCart, &state);

        let saved = writer.store().get(CART_KEY)?.ok_or("cart should be saved")?;
        let cart: Cart = serde_json::from_str(&saved)?;

        assert_eq!(&cart, state.cart());

        Ok(())
    }
}
