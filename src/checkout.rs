//! Checkout
//!
//! Turns the current cart into an [`Order`]. There is no payment step; a
//! checkout that passes validation always succeeds and empties the cart.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartItem},
    clock::Clock,
    ids::TypedId,
    money::format_price,
    pricing::Totals,
    session::Session,
    store::Transition,
    users::UserId,
};

/// Order Id
pub type OrderId = TypedId<Order>;

/// Checkout Errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing to buy
    #[error("cart is empty")]
    EmptyCart,

    /// A required address field was blank
    #[error("shipping address is missing {0}")]
    MissingAddressField(&'static str),

    /// A line item's variant is no longer sold
    #[error("variant {sku} is not available")]
    InactiveVariant {
        /// SKU of the inactive variant
        sku: String,
    },

    /// More units requested than the variant had in stock
    #[error("only {available} of {sku} in stock, {requested} requested")]
    StockExceeded {
        /// SKU of the variant
        sku: String,

        /// Units in the cart
        requested: u32,

        /// Units in stock when the line was added
        available: u32,
    },
}

/// Where to deliver an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient
    pub full_name: String,

    /// Street address
    pub line1: String,

    /// Apartment, suite, landmark
    #[serde(default)]
    pub line2: Option<String>,

    /// City
    pub city: String,

    /// Postal code
    pub postal_code: String,

    /// Country
    pub country: String,

    /// Contact number for the courier
    pub phone: String,
}

impl ShippingAddress {
    /// Check that every required field has content.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingAddressField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("full name", &self.full_name),
            ("address line 1", &self.line1),
            ("city", &self.city),
            ("postal code", &self.postal_code),
            ("country", &self.country),
            ("phone", &self.phone),
        ];

        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(CheckoutError::MissingAddressField(*field)),
            None => Ok(()),
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order id
    pub id: OrderId,

    /// Buyer, `None` for guest checkout
    pub user_id: Option<UserId>,

    /// Line items as they were in the cart
    pub items: Vec<CartItem>,

    /// Totals charged
    pub totals: Totals,

    /// Delivery address
    pub shipping_address: ShippingAddress,

    /// When the order was placed
    pub placed_at: Timestamp,
}

/// Check that a cart can be ordered.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if the cart is empty, the address is
/// incomplete, or a line item is inactive or exceeds the stock recorded on
/// its variant.
pub fn validate(cart: &Cart, address: &ShippingAddress) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    address.validate()?;

    for item in cart.iter() {
        let variant = item.variant();

        if !variant.active {
            return Err(CheckoutError::InactiveVariant {
                sku: variant.sku.clone(),
            });
        }

        if item.quantity() > variant.stock {
            return Err(CheckoutError::StockExceeded {
                sku: variant.sku.clone(),
                requested: item.quantity(),
                available: variant.stock,
            });
        }
    }

    Ok(())
}

impl<C: Clock> Session<C> {
    /// Place an order for everything in the cart, then empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the cart cannot be ordered. The cart is
    /// left unchanged in that case.
    pub fn checkout(&mut self, address: ShippingAddress) -> Result<Order, CheckoutError> {
        let state = self.state();
        let cart = state.cart();

        validate(cart, &address)?;

        let order = Order {
            id: OrderId::generate(),
            user_id: state.user().map(|user| user.id.clone()),
            items: cart.items().to_vec(),
            totals: *cart.totals(),
            shipping_address: address,
            placed_at: self.store().now(),
        };

        info!(
            order = %order.id,
            lines = order.items.len(),
            total = %format_price(&order.totals.total),
            "placed order"
        );

        self.dispatch(Transition::ClearCart);

        Ok(order)
    }
}
