//! Persistence of the combined client state.
//!
//! A [`StateStorage`] adapter moves an opaque string payload in and out of
//! durable storage. This module owns the payload format: a versioned JSON
//! envelope holding the cart, wishlist and session.
//!
//! # Contract
//!
//! - Reads happen once, when the controller is built.
//! - Absent, unreadable, undecodable or wrong-version payloads load as the
//!   empty state. The reason is logged, never returned.
//! - Writes are best-effort. The controller logs failures and keeps going.

mod file;
mod memory;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartState;
use crate::error::StorageError;
use crate::session::SessionState;
use crate::wishlist::WishlistState;

/// Version written into every envelope.
pub const STATE_VERSION: u32 = 1;

/// Key-value style backing store for the serialized state.
pub trait StateStorage {
    /// Read the stored payload. `Ok(None)` means nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored payload.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn save(&mut self, payload: &str) -> Result<(), StorageError>;
}

/// Rehydrated state.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredState {
    pub version: u32,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cart: CartState,
    #[serde(default)]
    pub wishlist: WishlistState,
    #[serde(default)]
    pub session: SessionState,
}

/// Borrowed view used for writing, so saving never clones the state.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredStateRef<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    cart: &'a CartState,
    wishlist: &'a WishlistState,
    session: &'a SessionState,
}

impl StoredState {
    /// The empty initial state.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: STATE_VERSION,
            ..Self::default()
        }
    }
}

/// Encode the state into the envelope format.
///
/// # Errors
///
/// Returns [`StorageError::Serialization`] if encoding fails.
pub fn encode_state(
    cart: &CartState,
    wishlist: &WishlistState,
    session: &SessionState,
) -> Result<String, StorageError> {
    let envelope = StoredStateRef {
        version: STATE_VERSION,
        saved_at: Utc::now(),
        cart,
        wishlist,
        session,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Decode an envelope.
///
/// # Errors
///
/// Returns [`StorageError::Serialization`] for malformed JSON and
/// [`StorageError::UnsupportedVersion`] for envelopes from another version.
pub fn decode_state(payload: &str) -> Result<StoredState, StorageError> {
    let state: StoredState = serde_json::from_str(payload)?;
    if state.version != STATE_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: state.version,
            expected: STATE_VERSION,
        });
    }
    Ok(state)
}

/// Load the stored state, falling back to the empty state on any problem.
pub fn load_state<S: StateStorage + ?Sized>(storage: &S) -> StoredState {
    let payload = match storage.load() {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            tracing::debug!("No stored state, starting empty");
            return StoredState::empty();
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored state, starting empty");
            return StoredState::empty();
        }
    };

    match decode_state(&payload) {
        Ok(state) => {
            tracing::debug!(
                cart_items = state.cart.len(),
                wishlist_items = state.wishlist.len(),
                authenticated = state.session.is_authenticated(),
                "Rehydrated stored state"
            );
            state
        }
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unusable stored state");
            StoredState::empty()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use cartkeeper_core::Price;

    use super::*;
    use crate::line_item::LineItem;

    fn sample_cart() -> CartState {
        let mut cart = CartState::new();
        cart.add_item(LineItem::new(
            "p1",
            "Linen Shirt",
            Price::from_cents(2000).unwrap(),
            "M",
            "#000",
            NonZeroU32::new(2).unwrap(),
        ));
        cart
    }

    #[test]
    fn test_absent_storage_is_empty() {
        let storage = MemoryStorage::new();
        let state = load_state(&storage);
        assert!(state.cart.is_empty());
        assert!(state.wishlist.is_empty());
        assert!(!state.session.is_authenticated());
    }

    #[test]
    fn test_corrupt_storage_is_empty() {
        for payload in ["", "not json", "{\"version\": 1, \"cart\": 5}", "[]"] {
            let storage = MemoryStorage::with_payload(payload);
            let state = load_state(&storage);
            assert!(state.cart.is_empty(), "payload {payload:?} should load empty");
        }
    }

    #[test]
    fn test_wrong_version_is_empty() {
        let cart = sample_cart();
        let payload = encode_state(&cart, &WishlistState::new(), &SessionState::new())
            .unwrap()
            .replace("\"version\": 1", "\"version\": 2");
        assert!(matches!(
            decode_state(&payload),
            Err(StorageError::UnsupportedVersion { found: 2, .. })
        ));
        assert!(load_state(&MemoryStorage::with_payload(&payload)).cart.is_empty());
    }

    #[test]
    fn test_encode_then_load() {
        let cart = sample_cart();
        let mut storage = MemoryStorage::new();
        let payload = encode_state(&cart, &WishlistState::new(), &SessionState::new()).unwrap();
        storage.save(&payload).unwrap();

        let state = load_state(&storage);
        assert_eq!(state.cart, cart);
        assert!(state.saved_at.is_some());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let state = decode_state("{\"version\": 1}").unwrap();
        assert!(state.cart.is_empty());
        assert!(state.wishlist.is_empty());
    }
}
