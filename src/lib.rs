//! Boutique
//!
//! The cart and wishlist engine of an apparel storefront. A [`Session`]
//! exposes the shopper-facing operations; each one dispatches a single
//! [`store::Transition`] to a [`store::CartStore`], which replaces its
//! immutable [`store::State`] and re-derives the cart totals from the line
//! items on every change.
//!
//! [`Session`]: session::Session

pub mod cart;
pub mod checkout;
pub mod clock;
pub mod config;
pub mod fixtures;
pub mod ids;
pub mod money;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod session;
pub mod snapshots;
pub mod store;
pub mod summary;
pub mod users;
pub mod utils;
pub mod wishlist;
