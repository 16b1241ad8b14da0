//! Line items and their identity key.
//!
//! A line item is one size/color variant of a product with a quantity. Two
//! items with the same [`ItemKey`] are the same entry, whatever their name,
//! price or image say.

use std::num::NonZeroU32;

use cartkeeper_core::{Price, ProductId};
use serde::{Deserialize, Serialize};

/// Identity of a line item within a cart or wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemKey {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

impl ItemKey {
    #[must_use]
    pub fn new(
        product_id: impl Into<ProductId>,
        size: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            size: size.into(),
            color: color.into(),
        }
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.product_id, self.size, self.color)
    }
}

/// One purchasable selection.
///
/// `line_total` is derived from `unit_price * quantity`. It is written out
/// for readers of the stored state but recomputed whenever an item is
/// deserialized, so a stale or edited total never survives a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LineItemRecord")]
pub struct LineItem {
    product_id: ProductId,
    name: String,
    unit_price: Price,
    size: String,
    color: String,
    quantity: NonZeroU32,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    line_total: Price,
}

/// Stored shape of a [`LineItem`]; any `lineTotal` in the input is ignored.
///
/// Wishlist entries may omit `quantity`, which then defaults to one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemRecord {
    product_id: ProductId,
    name: String,
    unit_price: Price,
    size: String,
    color: String,
    #[serde(default = "default_quantity")]
    quantity: NonZeroU32,
    #[serde(default)]
    image: Option<String>,
}

const fn default_quantity() -> NonZeroU32 {
    NonZeroU32::MIN
}

impl From<LineItemRecord> for LineItem {
    fn from(record: LineItemRecord) -> Self {
        Self::new(
            record.product_id,
            record.name,
            record.unit_price,
            record.size,
            record.color,
            record.quantity,
        )
        .with_image(record.image)
    }
}

impl LineItem {
    /// Create a line item. The line total is computed immediately.
    #[must_use]
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Price,
        size: impl Into<String>,
        color: impl Into<String>,
        quantity: NonZeroU32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            size: size.into(),
            color: color.into(),
            quantity,
            image: None,
            line_total: unit_price.times(quantity.get()),
        }
    }

    /// Attach a display image.
    #[must_use]
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// The identity key of this item.
    #[must_use]
    pub fn key(&self) -> ItemKey {
        ItemKey {
            product_id: self.product_id.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    /// Whether this item has the given identity.
    #[must_use]
    pub fn matches(&self, key: &ItemKey) -> bool {
        self.product_id == key.product_id && self.size == key.size && self.color == key.color
    }

    /// Whether two items share an identity.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.product_id == other.product_id && self.size == other.size && self.color == other.color
    }

    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub fn size(&self) -> &str {
        &self.size
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub const fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    #[must_use]
    pub const fn line_total(&self) -> Price {
        self.line_total
    }

    /// Overwrite the quantity and recompute the line total.
    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
        self.line_total = self.unit_price.times(quantity.get());
    }

    /// Increase the quantity (saturating) and recompute the line total.
    pub(crate) fn merge_quantity(&mut self, extra: NonZeroU32) {
        self.set_quantity(self.quantity.saturating_add(extra.get()));
    }

    /// A copy of this item carrying a different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: NonZeroU32) -> Self {
        let mut item = self.clone();
        item.set_quantity(quantity);
        item
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shirt(quantity: u32) -> LineItem {
        LineItem::new(
            "p1",
            "Linen Shirt",
            Price::from_cents(2000).unwrap(),
            "M",
            "#000",
            NonZeroU32::new(quantity).unwrap(),
        )
    }

    #[test]
    fn test_line_total_is_derived() {
        let item = shirt(3);
        assert_eq!(item.line_total(), Price::from_cents(6000).unwrap());
    }

    #[test]
    fn test_merge_quantity_recomputes_total() {
        let mut item = shirt(1);
        item.merge_quantity(NonZeroU32::new(2).unwrap());
        assert_eq!(item.quantity().get(), 3);
        assert_eq!(item.line_total(), Price::from_cents(6000).unwrap());
    }

    #[test]
    fn test_merge_quantity_saturates() {
        let mut item = shirt(u32::MAX);
        item.merge_quantity(NonZeroU32::new(5).unwrap());
        assert_eq!(item.quantity().get(), u32::MAX);
    }

    #[test]
    fn test_identity_ignores_name_and_price() {
        let a = shirt(1);
        let b = LineItem::new(
            "p1",
            "Renamed",
            Price::from_cents(1).unwrap(),
            "M",
            "#000",
            NonZeroU32::new(4).unwrap(),
        );
        assert!(a.same_identity(&b));
        assert!(a.matches(&ItemKey::new("p1", "M", "#000")));
        assert!(!a.matches(&ItemKey::new("p1", "L", "#000")));
    }

    #[test]
    fn test_deserialize_recomputes_stale_total() {
        let json = r##"{
            "productId": "p1",
            "name": "Linen Shirt",
            "unitPrice": "20.00",
            "size": "M",
            "color": "#000",
            "quantity": 2,
            "lineTotal": "999.00"
        }"##;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.line_total(), Price::from_cents(4000).unwrap());
        assert_eq!(item.image(), None);
    }

    #[test]
    fn test_deserialize_defaults_missing_quantity() {
        let json = r##"{
            "productId": "p1",
            "name": "Linen Shirt",
            "unitPrice": "20.00",
            "size": "M",
            "color": "#000"
        }"##;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity().get(), 1);
    }

    #[test]
    fn test_deserialize_rejects_zero_quantity() {
        let json = r##"{
            "productId": "p1",
            "name": "Linen Shirt",
            "unitPrice": "20.00",
            "size": "M",
            "color": "#000",
            "quantity": 0
        }"##;
        assert!(serde_json::from_str::<LineItem>(json).is_err());
    }
}
