//! Wishlist commands.

use std::num::NonZeroU32;

use cartkeeper_store::{ItemKey, StateStorage, Storefront};

use super::{CommandError, print, render_items};
use crate::{ItemArgs, KeyArgs};

pub fn add<S: StateStorage>(store: &mut Storefront<S>, item: ItemArgs) -> Result<(), CommandError> {
    store.add_to_wishlist(item.into_line_item(NonZeroU32::MIN)?);
    show(store);
    Ok(())
}

pub fn remove<S: StateStorage>(store: &mut Storefront<S>, key: &KeyArgs) {
    store.remove_from_wishlist(&ItemKey::from(key));
    show(store);
}

/// Move an item into the cart and show the cart.
pub fn move_to_cart<S: StateStorage>(store: &mut Storefront<S>, key: &KeyArgs) {
    store.move_wishlist_item_to_cart(&ItemKey::from(key));
    super::cart::show(store);
}

pub fn show<S: StateStorage>(store: &Storefront<S>) {
    let wishlist = store.wishlist();
    if wishlist.is_empty() {
        print("Wishlist is empty\n");
        return;
    }
    print(&render_items(wishlist.items(), store.currency(), false));
}
