//! Shopping cart state.
//!
//! The cart is an insertion-ordered list of [`LineItem`]s with at most one
//! entry per [`ItemKey`]. `total_quantity` and `total_price` are derived from
//! the items and recomputed after every mutation; nothing else writes them.
//!
//! All commands are total. Unknown keys and non-positive quantities resolve
//! to a defined outcome rather than an error. Each command reports whether the
//! state actually changed so the owner can decide whether to persist and
//! notify.

use std::num::NonZeroU32;

use cartkeeper_core::Price;
use serde::{Deserialize, Serialize};

use crate::line_item::{ItemKey, LineItem};

/// Cart contents plus derived aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CartRecord")]
pub struct CartState {
    items: Vec<LineItem>,
    total_quantity: u64,
    total_price: Price,
}

/// Stored shape of a cart. Stored totals are ignored and re-derived.
#[derive(Deserialize)]
struct CartRecord {
    #[serde(default)]
    items: Vec<LineItem>,
}

impl From<CartRecord> for CartState {
    fn from(record: CartRecord) -> Self {
        let mut cart = Self::default();
        // Replay through add so duplicate keys in a hand-edited file collapse
        for item in record.items {
            cart.add_item(item);
        }
        cart
    }
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item, merging quantities with an existing entry of the same identity.
    ///
    /// Always changes the state.
    pub fn add_item(&mut self, item: LineItem) -> bool {
        if let Some(existing) = self.items.iter_mut().find(|i| i.same_identity(&item)) {
            existing.merge_quantity(item.quantity());
        } else {
            self.items.push(item);
        }
        self.recompute_totals();
        true
    }

    /// Overwrite the quantity of an item. A quantity of zero or less removes it.
    ///
    /// Returns `false` when no item matches or the quantity is unchanged.
    pub fn set_quantity(&mut self, key: &ItemKey, quantity: i64) -> bool {
        let Some(index) = self.position(key) else {
            return false;
        };

        let changed = match u32::try_from(quantity).ok().and_then(NonZeroU32::new) {
            Some(quantity) => {
                let Some(item) = self.items.get_mut(index) else {
                    return false;
                };
                if item.quantity() == quantity {
                    false
                } else {
                    item.set_quantity(quantity);
                    true
                }
            }
            None if quantity > 0 => {
                // Larger than u32::MAX; clamp rather than drop
                let Some(item) = self.items.get_mut(index) else {
                    return false;
                };
                if item.quantity() == NonZeroU32::MAX {
                    false
                } else {
                    item.set_quantity(NonZeroU32::MAX);
                    true
                }
            }
            None => {
                self.items.remove(index);
                true
            }
        };

        if changed {
            self.recompute_totals();
        }
        changed
    }

    /// Step the quantity of an item by `delta`, never going below one.
    ///
    /// A step that would leave the quantity at zero or less is ignored; use
    /// [`CartState::remove_item`] to delete.
    pub fn adjust_quantity(&mut self, key: &ItemKey, delta: i64) -> bool {
        let Some(item) = self.get(key) else {
            return false;
        };
        let target = i64::from(item.quantity().get()).saturating_add(delta);
        if target < 1 {
            return false;
        }
        self.set_quantity(key, target)
    }

    /// Remove an item. Returns `false` if it was not present.
    pub fn remove_item(&mut self, key: &ItemKey) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !i.matches(key));
        let changed = self.items.len() != before;
        if changed {
            self.recompute_totals();
        }
        changed
    }

    /// Empty the cart. Returns `false` if it was already empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        self.total_quantity = 0;
        self.total_price = Price::ZERO;
        changed
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up an item by identity.
    #[must_use]
    pub fn get(&self, key: &ItemKey) -> Option<&LineItem> {
        self.items.iter().find(|i| i.matches(key))
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities over all items.
    #[must_use]
    pub const fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// Sum of line totals over all items.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        self.total_price
    }

    fn position(&self, key: &ItemKey) -> Option<usize> {
        self.items.iter().position(|i| i.matches(key))
    }

    fn recompute_totals(&mut self) {
        self.total_quantity = self
            .items
            .iter()
            .map(|i| u64::from(i.quantity().get()))
            .sum();
        self.total_price = self.items.iter().map(LineItem::line_total).sum();
    }
}
