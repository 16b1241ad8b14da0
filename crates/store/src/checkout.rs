//! Checkout summary and order draft.
//!
//! The store does not talk to the backend or the payment provider. It only
//! computes what the checkout page shows (subtotal, first-order discount,
//! shipping, grand total) and assembles the order payload the page submits.

use cartkeeper_core::{CurrencyCode, OrderStatus, Price, ProductId, UserId};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::access::require_authenticated;
use crate::cart::CartState;
use crate::error::CheckoutError;
use crate::session::SessionState;

/// Share of the subtotal taken off a customer's first order (20%).
pub const FIRST_ORDER_DISCOUNT_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

/// Delivery options offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// 3-5 days.
    #[default]
    Standard,
    /// 1-2 days.
    Express,
    Overnight,
}

impl ShippingMethod {
    /// Flat shipping cost.
    #[must_use]
    pub fn cost(&self) -> Price {
        let cents = match self {
            Self::Standard => 599,
            Self::Express => 999,
            Self::Overnight => 1499,
        };
        Price::from_cents(cents).unwrap_or(Price::ZERO)
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard (3-5 days)",
            Self::Express => "Express (1-2 days)",
            Self::Overnight => "Overnight",
        }
    }
}

impl std::str::FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "overnight" => Ok(Self::Overnight),
            _ => Err(format!("invalid shipping method: {s}")),
        }
    }
}

/// Figures shown on the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub currency: CurrencyCode,
    pub subtotal: Price,
    pub discount: Price,
    pub shipping: Price,
    pub grand_total: Price,
}

impl CheckoutSummary {
    /// `grand_total = subtotal - discount + shipping`, with the discount
    /// applied only when this is the customer's first order.
    ///
    /// The discount is rounded to the cent, half away from zero.
    #[must_use]
    pub fn compute(
        cart: &CartState,
        shipping: ShippingMethod,
        first_order: bool,
        currency: CurrencyCode,
    ) -> Self {
        let subtotal = cart.total_price();
        let discount_amount = if first_order {
            (subtotal.amount() * FIRST_ORDER_DISCOUNT_RATE)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        };
        // The discount is a fraction of the subtotal, so neither value can go negative
        let discount = Price::new(discount_amount).unwrap_or(Price::ZERO);
        let shipping = shipping.cost();
        let grand_total =
            Price::new(subtotal.amount() - discount.amount()).unwrap_or(Price::ZERO) + shipping;

        Self {
            currency,
            subtotal,
            discount,
            shipping,
            grand_total,
        }
    }
}

/// One ordered item as the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraftItem {
    pub product: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: Price,
    pub size: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Order payload submitted to the backend before payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub user: UserId,
    pub items: Vec<OrderDraftItem>,
    pub total_amount: Price,
    pub status: OrderStatus,
}

impl OrderDraft {
    /// Build the payload for the signed-in user's cart. The total is
    /// computed from `cart` here, never taken from the caller.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Access`] for anonymous sessions and
    /// [`CheckoutError::EmptyCart`] when there is nothing to order.
    pub fn build(
        cart: &CartState,
        session: &SessionState,
        shipping: ShippingMethod,
        first_order: bool,
        currency: CurrencyCode,
    ) -> Result<Self, CheckoutError> {
        let user = require_authenticated(session)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let summary = CheckoutSummary::compute(cart, shipping, first_order, currency);

        let items = cart
            .items()
            .iter()
            .map(|item| OrderDraftItem {
                product: item.product_id().clone(),
                name: item.name().to_owned(),
                quantity: item.quantity().get(),
                price: item.unit_price(),
                size: item.size().to_owned(),
                color: item.color().to_owned(),
                image: item.image().map(str::to_owned),
            })
            .collect();

        Ok(Self {
            user: user.id.clone(),
            items,
            total_amount: summary.grand_total,
            status: OrderStatus::Processing,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use cartkeeper_core::{Email, UserRole};
    use secrecy::SecretString;

    use super::*;
    use crate::line_item::LineItem;
    use crate::session::SessionUser;

    fn price(cents: i64) -> Price {
        Price::from_cents(cents).unwrap()
    }

    fn cart_of(cents: i64, quantity: u32) -> CartState {
        let mut cart = CartState::new();
        cart.add_item(LineItem::new(
            "p1",
            "Linen Shirt",
            price(cents),
            "M",
            "#000",
            NonZeroU32::new(quantity).unwrap(),
        ));
        cart
    }

    fn signed_in() -> SessionState {
        let mut session = SessionState::new();
        session.login(
            SessionUser {
                id: UserId::new("u-1"),
                name: "Ada".to_string(),
                email: Email::parse("ada@example.com").unwrap(),
                role: UserRole::User,
            },
            SecretString::from("tok"),
        );
        session
    }

    #[test]
    fn test_shipping_costs() {
        assert_eq!(ShippingMethod::Standard.cost(), price(599));
        assert_eq!(ShippingMethod::Express.cost(), price(999));
        assert_eq!(ShippingMethod::Overnight.cost(), price(1499));
    }

    #[test]
    fn test_summary_without_discount() {
        let summary = CheckoutSummary::compute(
            &cart_of(2000, 2),
            ShippingMethod::Standard,
            false,
            CurrencyCode::EUR,
        );
        assert_eq!(summary.subtotal, price(4000));
        assert!(summary.discount.is_zero());
        assert_eq!(summary.grand_total, price(4599));
    }

    #[test]
    fn test_summary_first_order_discount() {
        let summary = CheckoutSummary::compute(
            &cart_of(2000, 2),
            ShippingMethod::Express,
            true,
            CurrencyCode::EUR,
        );
        // 40.00 - 8.00 + 9.99
        assert_eq!(summary.discount, price(800));
        assert_eq!(summary.grand_total, price(4199));
    }

    #[test]
    fn test_discount_rounds_to_cents() {
        // 20% of 0.99 is 0.198, which rounds to 0.20
        let summary = CheckoutSummary::compute(
            &cart_of(99, 1),
            ShippingMethod::Standard,
            true,
            CurrencyCode::EUR,
        );
        assert_eq!(summary.discount, price(20));
        assert_eq!(summary.grand_total, price(678));
    }

    #[test]
    fn test_draft_requires_session() {
        let cart = cart_of(2000, 1);
        let err = OrderDraft::build(
            &cart,
            &SessionState::new(),
            ShippingMethod::Standard,
            false,
            CurrencyCode::EUR,
        )
        .unwrap_err();
        assert!(matches!(err, CheckoutError::Access(_)));
    }

    #[test]
    fn test_draft_requires_items() {
        let cart = CartState::new();
        let err = OrderDraft::build(
            &cart,
            &signed_in(),
            ShippingMethod::Standard,
            false,
            CurrencyCode::EUR,
        )
        .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[test]
    fn test_draft_payload_shape() {
        let cart = cart_of(2000, 2);
        let draft = OrderDraft::build(
            &cart,
            &signed_in(),
            ShippingMethod::Standard,
            false,
            CurrencyCode::EUR,
        )
        .unwrap();

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["user"], "u-1");
        assert_eq!(json["status"], "Processing");
        assert_eq!(json["items"][0]["product"], "p1");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(draft.total_amount, price(4599));
    }

    #[test]
    fn test_draft_total_tracks_cart_and_discount() {
        let session = signed_in();
        let small = OrderDraft::build(
            &cart_of(1000, 1),
            &session,
            ShippingMethod::Express,
            true,
            CurrencyCode::EUR,
        )
        .unwrap();
        let large = OrderDraft::build(
            &cart_of(1000, 3),
            &session,
            ShippingMethod::Express,
            true,
            CurrencyCode::EUR,
        )
        .unwrap();

        // 10.00 - 2.00 + 9.99 and 30.00 - 6.00 + 9.99
        assert_eq!(small.total_amount, price(1799));
        assert_eq!(large.total_amount, price(3399));
    }
}
