//! Boutique prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartId, CartItem, CartItemId},
    checkout::{CheckoutError, Order, OrderId, ShippingAddress},
    clock::{Clock, FixedClock, SystemClock},
    config::{ConfigError, StoreConfig},
    fixtures::{Fixture, FixtureError},
    money::{Price, PriceError, format_price, parse_price},
    pricing::{PolicyError, PricingPolicy, Totals},
    products::{ColorId, Product, ProductId, SizeId, Variant, VariantId},
    session::Session,
    snapshots::{FileSnapshotStore, MemorySnapshotStore, SnapshotError, SnapshotStore},
    store::{CartStore, State, StoreObserver, Transition},
    summary::{CartSummary, SummaryError},
    users::{UserId, UserProfile},
    wishlist::{Wishlist, WishlistEntry, WishlistEntryId},
};
