//! End-to-end cart scenarios against the apparel fixture set.
//!
//! Prices are in INR major units:
//!
//! - `KURTA-IND-M`: 7500.00 (stock 12)
//! - `TEE-RST-S`: 1200.00 (stock 20)
//! - `STOLE-MRN-OS`: 2699.50 (stock 6)
//!
//! Pricing uses the default policy: 18% tax, free shipping strictly above
//! 8000.00, otherwise a flat 500.00.

use rusty_money::{Money, iso::INR};
use testresult::TestResult;

use boutique::{
    clock::FixedClock,
    fixtures::Fixture,
    money::Price,
    pricing::PricingPolicy,
    session::Session,
};

fn inr(rupees: i64) -> Price {
    Money::from_minor(rupees * 100, INR)
}

fn session() -> Session<FixedClock> {
    Session::with_clock(PricingPolicy::default(), FixedClock::default())
}

#[test]
fn first_add_creates_one_line_with_fresh_totals() -> TestResult {
    let fixture = Fixture::from_set("apparel")?;
    let (product, variant) = fixture.variant_by_sku("KURTA-IND-M")?;
    let mut session = session();

    let state = session.add_to_cart(product, variant, 2);
    let cart = state.cart();

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.quantity(), 2);
    assert_eq!(cart.subtotal(), inr(15_000));
    assert_eq!(cart.tax(), inr(2_700));
    assert_eq!(cart.shipping(), inr(0));
    assert_eq!(cart.total(), inr(17_700));

    Ok(())
}

#[test]
fn adding_the_same_variant_again_merges_the_line() -> TestResult {
    let fixture = Fixture::from_set("apparel")?;
    let (product, variant) = fixture.variant_by_sku("KURTA-IND-M")?;
    let mut session = session();

    session.add_to_cart(product, variant, 2);
    let state = session.add_to_cart(product, variant, 1);
    let cart = state.cart();

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.quantity(), 3);
    assert_eq!(cart.subtotal(), inr(22_500));
    assert_eq!(cart.tax(), inr(4_050));
    assert_eq!(cart.shipping(), inr(0));
    assert_eq!(cart.total(), inr(26_550));

    Ok(())
}

#[test]
fn negative_quantity_update_empties_the_cart() -> TestResult {
    let fixture = Fixture::from_set("apparel")?;
    let (product, variant) = fixture.variant_by_sku("KURTA-IND-M")?;
    let mut session = session();

    let state = session.add_to_cart(product, variant, 3);
    let item_id = state
        .cart()
        .items()
        .first()
        .map(|item| item.id().clone())
        .ok_or("expected a line item")?;

    let state = session.update_cart_quantity(&item_id, -1);
    let cart = state.cart();

    assert!(cart.is_empty());
    assert_eq!(cart.subtotal(), inr(0));
    assert_eq!(cart.tax(), inr(0));
    assert_eq!(cart.shipping(), inr(0));
    assert_eq!(cart.total(), inr(0));

    Ok(())
}

#[test]
fn favoriting_twice_keeps_one_entry() -> TestResult {
    let fixture = Fixture::from_set("apparel")?;
    let product = fixture.product("silk-stole")?;
    let mut session = session();

    session.add_to_wishlist(product);
    session.add_to_wishlist(product);

    assert_eq!(session.wishlist_count(), 1);
    assert!(session.is_in_wishlist(&product.id));

    Ok(())
}

#[test]
fn item_count_is_the_sum_of_quantities() -> TestResult {
    let fixture = Fixture::from_set("apparel")?;
    let mut session = session();

    for (sku, quantity) in [("KURTA-IND-M", 2), ("TEE-RST-S", 3), ("STOLE-MRN-OS", 1)] {
        let (product, variant) = fixture.variant_by_sku(sku)?;

        session.add_to_cart(product, variant, quantity);
    }

    assert_eq!(session.cart_items_count(), 6);
    assert_eq!(session.state().cart().len(), 3);

    Ok(())
}

#[test]
fn clearing_a_filled_cart_zeroes_everything() -> TestResult {
    let fixture = Fixture::from_set("apparel")?;
    let mut session = session();

    for sku in ["KURTA-IND-M", "TEE-RST-S"] {
        let (product, variant) = fixture.variant_by_sku(sku)?;

        session.add_to_cart(product, variant, 1);
    }

    let state = session.clear_cart();
    let cart = state.cart();

    assert!(cart.is_empty());
    assert_eq!(cart.subtotal(), inr(0));
    assert_eq!(cart.tax(), inr(0));
    assert_eq!(cart.shipping(), inr(0));
    assert_eq!(cart.total(), inr(0));

    Ok(())
}

#[test]
fn small_carts_pay_flat_shipping() -> TestResult {
    let fixture = Fixture::from_set("apparel")?;
    let (product, variant) = fixture.variant_by_sku("STOLE-MRN-OS")?;
    let mut session = session();

    // 2699.50 -> tax 485.91, shipping 500.00
    let state = session.add_to_cart(product, variant, 1);
    let cart = state.cart();

    assert_eq!(cart.subtotal(), Money::from_minor(269_950, INR));
    assert_eq!(cart.tax(), Money::from_minor(48_591, INR));
    assert_eq!(cart.shipping(), inr(500));
    assert_eq!(cart.total(), Money::from_minor(368_541, INR));

    Ok(())
}

#[test]
fn catalog_repricing_does_not_touch_existing_lines() -> TestResult {
    let fixture = Fixture::from_set("apparel")?;
    let (product, variant) = fixture.variant_by_sku("TEE-RST-S")?;
    let mut session = session();

    session.add_to_cart(product, variant, 1);

    let mut repriced = variant.clone();
    repriced.price = inr(999);

    let state = session.add_to_cart(product, &repriced, 1);
    let line = state.cart().items().first().ok_or("expected a line item")?;

    assert_eq!(line.unit_price(), inr(1_200));
    assert_eq!(state.cart().subtotal(), inr(2_400));

    Ok(())
}
