//! Command implementations.
//!
//! Each command takes the opened [`Storefront`](cartkeeper_store::Storefront),
//! applies at most one store operation and prints the outcome to stdout.

pub mod cart;
pub mod checkout;
pub mod session;
pub mod wishlist;

use cartkeeper_core::{CurrencyCode, EmailError, Price, PriceError};
use cartkeeper_store::{CheckoutError, ItemKey, LineItem};
use thiserror::Error;

use crate::{ItemArgs, KeyArgs};

/// Errors that can occur while turning arguments into store input.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Price argument was negative.
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    /// Email argument was malformed.
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    /// Login was attempted without a token.
    #[error("Token cannot be empty")]
    EmptyToken,

    /// Checkout is not possible in the current state.
    #[error("Checkout unavailable: {0}")]
    Checkout(#[from] CheckoutError),

    /// Output could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<&KeyArgs> for ItemKey {
    fn from(args: &KeyArgs) -> Self {
        Self::new(args.id.as_str(), args.size.as_str(), args.color.as_str())
    }
}

impl ItemArgs {
    /// Build a line item with the given quantity.
    pub fn into_line_item(
        self,
        quantity: std::num::NonZeroU32,
    ) -> Result<LineItem, CommandError> {
        let price = Price::new(self.price)?;
        Ok(LineItem::new(
            self.key.id,
            self.name,
            price,
            self.key.size,
            self.key.color,
            quantity,
        )
        .with_image(self.image))
    }
}

/// Render line items as an aligned table.
fn render_items(items: &[LineItem], currency: CurrencyCode, with_totals: bool) -> String {
    let mut out = String::new();
    for item in items {
        let line = if with_totals {
            format!(
                "{:<28} {:<24} x{:<4} {:>10} {:>10}\n",
                item.key().to_string(),
                item.name(),
                item.quantity(),
                item.unit_price().display(currency),
                item.line_total().display(currency),
            )
        } else {
            format!(
                "{:<28} {:<24} {:>10}\n",
                item.key().to_string(),
                item.name(),
                item.unit_price().display(currency),
            )
        };
        out.push_str(&line);
    }
    out
}

#[allow(clippy::print_stdout)]
fn print(text: &str) {
    print!("{text}");
}
