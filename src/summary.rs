//! Cart Summary

use std::{fmt::Write, io};

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::CartItem, store::State};

/// Errors that can occur when writing a cart summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Plain-text view of the cart, its totals and the header badge counts.
#[derive(Debug, Clone)]
pub struct CartSummary<'a> {
    state: &'a State,
}

impl<'a> CartSummary<'a> {
    /// Summarise a state.
    pub fn from_state(state: &'a State) -> Self {
        Self { state }
    }

    /// Write the summary table and totals to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SummaryError> {
        let cart = self.state.cart();

        if cart.is_empty() {
            writeln!(out, "\nYour cart is empty.").map_err(|_err| SummaryError::IO)?;
        } else {
            let mut builder = Builder::default();

            builder.push_record([
                "",
                "Item",
                "Variant",
                "SKU",
                "Qty",
                "Unit Price",
                "Line Total",
            ]);

            for (idx, item) in cart.iter().enumerate() {
                builder.push_record([
                    format!("#{:<3}", idx + 1),
                    item.product().name.clone(),
                    variant_label(item),
                    item.variant().sku.clone(),
                    item.quantity().to_string(),
                    format!("{}", item.unit_price()),
                    format!("{}", line_total(item)),
                ]);
            }

            write_table(&mut out, builder)?;
        }

        let totals = cart.totals();
        let lines = [
            (" Subtotal:".to_string(), format!("{}  ", totals.subtotal)),
            (" Tax:".to_string(), format!("{}  ", totals.tax)),
            (" Shipping:".to_string(), shipping_label(totals.shipping)),
            (
                " \x1b[1mTotal:\x1b[0m".to_string(),
                format!("\x1b[1m{}  \x1b[0m", totals.total),
            ),
        ];

        let label_width = lines
            .iter()
            .map(|(label, _)| visible_width(label))
            .max()
            .unwrap_or_default();

        let value_width = lines
            .iter()
            .map(|(_, value)| visible_width(value))
            .max()
            .unwrap_or_default();

        for (label, value) in &lines {
            write_summary_line(&mut out, label, value, label_width, value_width)?;
        }

        writeln!(
            out,
            "\n Items in cart: {}   Wishlist: {}",
            cart.quantity(),
            self.state.wishlist().len()
        )
        .map_err(|_err| SummaryError::IO)
    }
}

fn variant_label(item: &CartItem) -> String {
    let product = item.product();
    let variant = item.variant();

    let color = product
        .colors
        .iter()
        .find(|color| color.id == variant.color_id)
        .map_or_else(|| variant.color_id.to_string(), |color| color.name.clone());

    let size = product
        .sizes
        .iter()
        .find(|size| size.id == variant.size_id)
        .map_or_else(|| variant.size_id.to_string(), |size| size.name.clone());

    format!("{color} / {size}")
}

fn line_total(item: &CartItem) -> Money<'static, Currency> {
    Money::from_minor(item.line_total_minor(), item.unit_price().currency())
}

fn shipping_label(shipping: Money<'static, Currency>) -> String {
    if shipping.is_zero() {
        "Free  ".to_string()
    } else {
        format!("{shipping}  ")
    }
}

fn write_table(out: &mut impl io::Write, builder: Builder) -> Result<(), SummaryError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..7), Alignment::right());

    let table_str = dim_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| SummaryError::IO)
}

fn dim_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Printable width, skipping ANSI escape sequences.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_width: usize,
    value_width: usize,
) -> Result<(), SummaryError> {
    let label_pad = label_width.saturating_sub(visible_width(label));
    let value_pad = value_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| SummaryError::IO)
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::{
        pricing::PricingPolicy, products::test_support::product_with_variant, store::Transition,
    };

    use super::*;

    fn render(state: &State) -> Result<String, Box<dyn std::error::Error>> {
        let mut out = Vec::new();

        CartSummary::from_state(state).write_to(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn empty_cart_says_so() -> TestResult {
        let state = State::new(None, INR, Timestamp::UNIX_EPOCH);

        let output = render(&state)?;

        assert!(output.contains("Your cart is empty."));
        assert!(output.contains("Items in cart: 0"));

        Ok(())
    }

    #[test]
    fn lists_each_line_and_the_badge_counts() -> TestResult {
        let policy = PricingPolicy::default();
        let (tee, tee_m) = product_with_variant("tee", 500);
        let (cap, _) = product_with_variant("cap", 300);

        let state = State::new(None, INR, Timestamp::UNIX_EPOCH)
            .apply(
                &Transition::add_to_cart(&tee, &tee_m, 3),
                &policy,
                Timestamp::UNIX_EPOCH,
            )
            .apply(
                &Transition::add_to_wishlist(&cap),
                &policy,
                Timestamp::UNIX_EPOCH,
            );

        let output = render(&state)?;

        assert!(output.contains("TEE-NV-M"));
        assert!(output.contains("navy / m"));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("Items in cart: 3   Wishlist: 1"));

        Ok(())
    }

    #[test]
    fn visible_width_ignores_escape_codes() {
        assert_eq!(visible_width("\x1b[1mTotal:\x1b[0m"), 6);
    }
}
