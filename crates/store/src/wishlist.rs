//! Wishlist state.
//!
//! Same identity rules as the cart, but without quantity semantics: the
//! first item stored for a key wins and later duplicates are ignored.

use serde::{Deserialize, Serialize};

use crate::line_item::{ItemKey, LineItem};

/// Saved-for-later items in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "WishlistRecord")]
pub struct WishlistState {
    items: Vec<LineItem>,
}

#[derive(Deserialize)]
struct WishlistRecord {
    #[serde(default)]
    items: Vec<LineItem>,
}

impl From<WishlistRecord> for WishlistState {
    fn from(record: WishlistRecord) -> Self {
        let mut wishlist = Self::default();
        for item in record.items {
            wishlist.add_item(item);
        }
        wishlist
    }
}

impl WishlistState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item unless one with the same identity is already present.
    pub fn add_item(&mut self, item: LineItem) -> bool {
        if self.items.iter().any(|i| i.same_identity(&item)) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove an item. Returns `false` if it was not present.
    pub fn remove_item(&mut self, key: &ItemKey) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !i.matches(key));
        self.items.len() != before
    }

    /// Remove and return an item.
    pub fn take(&mut self, key: &ItemKey) -> Option<LineItem> {
        let index = self.items.iter().position(|i| i.matches(key))?;
        Some(self.items.remove(index))
    }

    #[must_use]
    pub fn contains(&self, key: &ItemKey) -> bool {
        self.items.iter().any(|i| i.matches(key))
    }

    #[must_use]
    pub fn get(&self, key: &ItemKey) -> Option<&LineItem> {
        self.items.iter().find(|i| i.matches(key))
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
