//! Cart commands.

use std::num::NonZeroU32;

use cartkeeper_store::{ItemKey, StateStorage, Storefront};

use super::{CommandError, print, render_items};
use crate::{ItemArgs, KeyArgs};

/// Add an item to the cart.
pub fn add<S: StateStorage>(
    store: &mut Storefront<S>,
    item: ItemArgs,
    quantity: NonZeroU32,
) -> Result<(), CommandError> {
    store.add_to_cart(item.into_line_item(quantity)?);
    show(store);
    Ok(())
}

/// Overwrite an item's quantity.
pub fn set<S: StateStorage>(store: &mut Storefront<S>, key: &KeyArgs, quantity: i64) {
    let key = ItemKey::from(key);
    if store.cart().get(&key).is_none() {
        tracing::info!(%key, "No such cart item");
    }
    store.set_cart_quantity(&key, quantity);
    show(store);
}

/// Step an item's quantity.
pub fn adjust<S: StateStorage>(store: &mut Storefront<S>, key: &KeyArgs, delta: i64) {
    store.adjust_cart_quantity(&ItemKey::from(key), delta);
    show(store);
}

pub fn remove<S: StateStorage>(store: &mut Storefront<S>, key: &KeyArgs) {
    store.remove_from_cart(&ItemKey::from(key));
    show(store);
}

pub fn save_for_later<S: StateStorage>(store: &mut Storefront<S>, key: &KeyArgs) {
    store.save_cart_item_for_later(&ItemKey::from(key));
    super::wishlist::show(store);
}

pub fn clear<S: StateStorage>(store: &mut Storefront<S>) {
    store.clear_cart();
    print("Cart cleared\n");
}

/// Print the cart with totals.
pub fn show<S: StateStorage>(store: &Storefront<S>) {
    let cart = store.cart();
    let currency = store.currency();
    if cart.is_empty() {
        print("Cart is empty\n");
        return;
    }

    let mut out = render_items(cart.items(), currency, true);
    out.push_str(&format!(
        "Items: {}  Total: {}\n",
        cart.total_quantity(),
        cart.total_price().display(currency)
    ));
    print(&out);
}
