//! Checkout commands.

use cartkeeper_store::{ShippingMethod, StateStorage, Storefront};

use super::{CommandError, print};

/// Print the checkout figures.
pub fn summary<S: StateStorage>(store: &Storefront<S>, shipping: ShippingMethod, first_order: bool) {
    let summary = store.checkout_summary(shipping, first_order);
    let currency = summary.currency;
    let mut out = format!("Subtotal:  {:>10}\n", summary.subtotal.display(currency));
    if !summary.discount.is_zero() {
        out.push_str(&format!(
            "Discount: -{:>10}\n",
            summary.discount.display(currency)
        ));
    }
    out.push_str(&format!(
        "Shipping:  {:>10}  {}\nTotal:     {:>10}\n",
        summary.shipping.display(currency),
        shipping.label(),
        summary.grand_total.display(currency),
    ));
    print(&out);
}

/// Print the JSON order payload.
pub fn draft<S: StateStorage>(
    store: &Storefront<S>,
    shipping: ShippingMethod,
    first_order: bool,
) -> Result<(), CommandError> {
    let draft = store.order_draft(shipping, first_order)?;
    print(&format!("{}\n", serde_json::to_string_pretty(&draft)?));
    Ok(())
}

/// Clear the cart after a confirmed order.
pub fn complete<S: StateStorage>(store: &mut Storefront<S>) {
    store.complete_checkout();
    print("Order confirmed, cart cleared\n");
}
