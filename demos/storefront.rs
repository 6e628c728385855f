//! Storefront Example
//!
//! Fills a cart from a catalog fixture and prints the cart summary.
//!
//! Use `-f` to load a fixture set by name
//! Use `-a SKU[:QTY]` to add variants to the cart
//! Use `-w KEY` to favorite products
//! Use `--checkout` to place a simulated order
//! Use `--snapshot-dir` to keep the cart between runs

use std::io;

use anyhow::Result;

use boutique::{
    checkout::ShippingAddress,
    clock::SystemClock,
    fixtures::Fixture,
    money::format_price,
    observability::init_subscriber,
    session::Session,
    summary::CartSummary,
    utils::ExampleCartArgs,
};

/// Storefront Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ExampleCartArgs::load()?;

    init_subscriber(&args.store.logging)?;

    let policy = args.store.policy()?;
    let fixture = Fixture::from_set(&args.fixture)?;
    let snapshots = args.store.snapshots.open_store()?;

    let mut session = Session::open(policy, SystemClock, snapshots);

    if let Some(saved) = session.saved_cart() {
        println!(
            "Found a saved cart from an earlier run: {} units, {}",
            saved.quantity(),
            format_price(&saved.total())
        );
    }

    for (sku, quantity) in args.cart_lines()? {
        let (product, variant) = fixture.variant_by_sku(&sku)?;

        session.add_to_cart(product, variant, quantity);
    }

    for key in &args.wishlist {
        session.add_to_wishlist(fixture.product(key)?);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    CartSummary::from_state(&session.state()).write_to(&mut handle)?;

    if args.checkout {
        let order = session.checkout(ShippingAddress {
            full_name: "Demo Shopper".to_string(),
            line1: "1 MG Road".to_string(),
            line2: None,
            city: "Bengaluru".to_string(),
            postal_code: "560001".to_string(),
            country: "IN".to_string(),
            phone: "+91 80 0000 0000".to_string(),
        })?;

        println!(
            "\nPlaced order {} for {}",
            order.id,
            format_price(&order.totals.total)
        );
    }

    Ok(())
}
