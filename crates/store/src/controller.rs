//! The storefront controller.
//!
//! [`Storefront`] owns the cart, wishlist and session, the persistence
//! adapter, and the registered listeners. UI code holds a reference to it and
//! calls its commands; nothing else mutates the state.
//!
//! Every command runs the pure state transition first. If the state changed,
//! the controller then saves it and notifies listeners, in that order. Saves
//! are best-effort: failures are logged and swallowed.

use cartkeeper_core::CurrencyCode;
use secrecy::SecretString;
use tracing::instrument;

use crate::cart::CartState;
use crate::checkout::{CheckoutSummary, OrderDraft, ShippingMethod};
use crate::error::CheckoutError;
use crate::line_item::{ItemKey, LineItem};
use crate::persistence::{StateStorage, encode_state, load_state};
use crate::session::{SessionState, SessionUser};
use crate::wishlist::WishlistState;

/// What just happened. Passed to listeners along with the new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    CartItemAdded(ItemKey),
    CartQuantityChanged(ItemKey),
    CartItemRemoved(ItemKey),
    CartCleared,
    WishlistItemAdded(ItemKey),
    WishlistItemRemoved(ItemKey),
    WishlistItemMovedToCart(ItemKey),
    CartItemSavedForLater(ItemKey),
    LoggedIn,
    LoggedOut,
    CheckoutCompleted,
}

/// Read-only view of the whole state.
#[derive(Debug, Clone, Copy)]
pub struct StoreView<'a> {
    pub cart: &'a CartState,
    pub wishlist: &'a WishlistState,
    pub session: &'a SessionState,
    pub currency: CurrencyCode,
}

/// Observer of state changes.
pub trait StoreListener {
    fn on_change(&mut self, event: &StoreEvent, view: &StoreView<'_>);
}

impl<F> StoreListener for F
where
    F: FnMut(&StoreEvent, &StoreView<'_>),
{
    fn on_change(&mut self, event: &StoreEvent, view: &StoreView<'_>) {
        self(event, view);
    }
}

/// Handle returned by [`Storefront::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Owner of the client-side storefront state.
pub struct Storefront<S: StateStorage> {
    cart: CartState,
    wishlist: WishlistState,
    session: SessionState,
    currency: CurrencyCode,
    storage: S,
    listeners: Vec<(ListenerId, Box<dyn StoreListener>)>,
    next_listener: u64,
}

impl<S: StateStorage> std::fmt::Debug for Storefront<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("cart", &self.cart)
            .field("wishlist", &self.wishlist)
            .field("session", &self.session)
            .field("currency", &self.currency)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<S: StateStorage> Storefront<S> {
    /// Rehydrate from `storage` and take ownership of it.
    ///
    /// This is the only read from storage; unusable data yields empty state.
    pub fn open(storage: S, currency: CurrencyCode) -> Self {
        let stored = load_state(&storage);
        Self {
            cart: stored.cart,
            wishlist: stored.wishlist,
            session: stored.session,
            currency,
            storage,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a listener. Listeners run in registration order after each
    /// state change.
    pub fn subscribe(&mut self, listener: impl StoreListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    // =========================================================================
    // Cart commands
    // =========================================================================

    /// Add to cart, merging quantities for an existing variant.
    #[instrument(skip_all, fields(key = %item.key(), quantity = item.quantity().get()))]
    pub fn add_to_cart(&mut self, item: LineItem) {
        let key = item.key();
        if self.cart.add_item(item) {
            self.commit(StoreEvent::CartItemAdded(key));
        }
    }

    /// Overwrite a cart quantity; zero or less removes the item.
    #[instrument(skip_all, fields(key = %key, quantity = quantity))]
    pub fn set_cart_quantity(&mut self, key: &ItemKey, quantity: i64) {
        let existed = self.cart.get(key).is_some();
        if self.cart.set_quantity(key, quantity) {
            let event = if existed && self.cart.get(key).is_none() {
                StoreEvent::CartItemRemoved(key.clone())
            } else {
                StoreEvent::CartQuantityChanged(key.clone())
            };
            self.commit(event);
        }
    }

    /// Step a cart quantity up or down without going below one.
    #[instrument(skip_all, fields(key = %key, delta = delta))]
    pub fn adjust_cart_quantity(&mut self, key: &ItemKey, delta: i64) {
        if self.cart.adjust_quantity(key, delta) {
            self.commit(StoreEvent::CartQuantityChanged(key.clone()));
        }
    }

    #[instrument(skip_all, fields(key = %key))]
    pub fn remove_from_cart(&mut self, key: &ItemKey) {
        if self.cart.remove_item(key) {
            self.commit(StoreEvent::CartItemRemoved(key.clone()));
        }
    }

    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        if self.cart.clear() {
            self.commit(StoreEvent::CartCleared);
        }
    }

    /// Copy a cart item into the wishlist. The cart keeps it.
    #[instrument(skip_all, fields(key = %key))]
    pub fn save_cart_item_for_later(&mut self, key: &ItemKey) {
        let Some(item) = self.cart.get(key).cloned() else {
            return;
        };
        if self.wishlist.add_item(item) {
            self.commit(StoreEvent::CartItemSavedForLater(key.clone()));
        }
    }

    // =========================================================================
    // Wishlist commands
    // =========================================================================

    /// Add to the wishlist unless the variant is already there.
    #[instrument(skip_all, fields(key = %item.key()))]
    pub fn add_to_wishlist(&mut self, item: LineItem) {
        let key = item.key();
        if self.wishlist.add_item(item) {
            self.commit(StoreEvent::WishlistItemAdded(key));
        }
    }

    #[instrument(skip_all, fields(key = %key))]
    pub fn remove_from_wishlist(&mut self, key: &ItemKey) {
        if self.wishlist.remove_item(key) {
            self.commit(StoreEvent::WishlistItemRemoved(key.clone()));
        }
    }

    /// Move a wishlist item into the cart with quantity one.
    #[instrument(skip_all, fields(key = %key))]
    pub fn move_wishlist_item_to_cart(&mut self, key: &ItemKey) {
        let Some(item) = self.wishlist.take(key) else {
            return;
        };
        self.cart.add_item(item.with_quantity(std::num::NonZeroU32::MIN));
        self.commit(StoreEvent::WishlistItemMovedToCart(key.clone()));
    }

    // =========================================================================
    // Session commands
    // =========================================================================

    #[instrument(skip_all, fields(user_id = %user.id))]
    pub fn login(&mut self, user: SessionUser, token: SecretString) {
        if self.session.login(user, token) {
            self.commit(StoreEvent::LoggedIn);
        }
    }

    #[instrument(skip(self))]
    pub fn logout(&mut self) {
        if self.session.logout() {
            self.commit(StoreEvent::LoggedOut);
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Figures for the checkout page.
    #[must_use]
    pub fn checkout_summary(&self, shipping: ShippingMethod, first_order: bool) -> CheckoutSummary {
        CheckoutSummary::compute(&self.cart, shipping, first_order, self.currency)
    }

    /// Order payload for the backend.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] if nobody is signed in or the cart is empty.
    pub fn order_draft(
        &self,
        shipping: ShippingMethod,
        first_order: bool,
    ) -> Result<OrderDraft, CheckoutError> {
        OrderDraft::build(&self.cart, &self.session, shipping, first_order, self.currency)
    }

    /// Clear the cart once the backend has confirmed the order.
    #[instrument(skip(self))]
    pub fn complete_checkout(&mut self) {
        if self.cart.clear() {
            self.commit(StoreEvent::CheckoutCompleted);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn cart(&self) -> &CartState {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistState {
        &self.wishlist
    }

    #[must_use]
    pub const fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    #[must_use]
    pub const fn view(&self) -> StoreView<'_> {
        StoreView {
            cart: &self.cart,
            wishlist: &self.wishlist,
            session: &self.session,
            currency: self.currency,
        }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage adapter.
    pub fn into_storage(self) -> S {
        self.storage
    }

    // =========================================================================
    // Post-mutation hook
    // =========================================================================

    fn commit(&mut self, event: StoreEvent) {
        tracing::debug!(
            ?event,
            cart_items = self.cart.len(),
            total_quantity = self.cart.total_quantity(),
            total_price = %self.cart.total_price(),
            "State changed"
        );

        match encode_state(&self.cart, &self.wishlist, &self.session) {
            Ok(payload) => {
                if let Err(e) = self.storage.save(&payload) {
                    tracing::warn!(error = %e, "Failed to persist state");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to encode state"),
        }

        let mut listeners = std::mem::take(&mut self.listeners);
        let view = self.view();
        for (_, listener) in &mut listeners {
            listener.on_change(&event, &view);
        }
        self.listeners = listeners;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::num::NonZeroU32;
    use std::rc::Rc;

    use cartkeeper_core::{Email, Price, UserId, UserRole};

    use super::*;
    use crate::error::StorageError;
    use crate::persistence::MemoryStorage;

    fn item(id: &str, quantity: u32) -> LineItem {
        LineItem::new(
            id,
            format!("Product {id}"),
            Price::from_cents(2000).unwrap(),
            "M",
            "#000",
            NonZeroU32::new(quantity).unwrap(),
        )
    }

    fn key(id: &str) -> ItemKey {
        ItemKey::new(id, "M", "#000")
    }

    fn store() -> Storefront<MemoryStorage> {
        Storefront::open(MemoryStorage::new(), CurrencyCode::EUR)
    }

    struct FailingStorage;

    impl StateStorage for FailingStorage {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io {
                path: "unavailable".into(),
                source: std::io::Error::other("storage offline"),
            })
        }

        fn save(&mut self, _payload: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: "unavailable".into(),
                source: std::io::Error::other("storage offline"),
            })
        }
    }

    #[test]
    fn test_saves_only_on_change() {
        let mut store = store();
        store.add_to_cart(item("p1", 1));
        assert_eq!(store.storage().writes(), 1);

        store.remove_from_cart(&key("p9"));
        store.set_cart_quantity(&key("p9"), 3);
        store.remove_from_wishlist(&key("p1"));
        store.logout();
        assert_eq!(store.storage().writes(), 1);

        store.set_cart_quantity(&key("p1"), 0);
        assert_eq!(store.storage().writes(), 2);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_repeated_clamped_set_saves_and_notifies_once() {
        let events = Rc::new(RefCell::new(0));
        let mut store = store();
        store.add_to_cart(item("p1", 1));

        let sink = Rc::clone(&events);
        store.subscribe(move |_: &StoreEvent, _: &StoreView<'_>| {
            *sink.borrow_mut() += 1;
        });
        store.set_cart_quantity(&key("p1"), i64::MAX);
        store.set_cart_quantity(&key("p1"), i64::MAX);

        assert_eq!(*events.borrow(), 1);
        assert_eq!(store.storage().writes(), 2);
        assert_eq!(store.cart().items()[0].quantity(), NonZeroU32::MAX);
        assert!(store.storage().payload().unwrap().contains("4294967295"));
    }

    #[test]
    fn test_listeners_receive_events_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = store();

        let sink = Rc::clone(&seen);
        store.subscribe(move |event: &StoreEvent, view: &StoreView<'_>| {
            sink.borrow_mut()
                .push((event.clone(), view.cart.total_quantity()));
        });

        store.add_to_cart(item("p1", 1));
        store.add_to_cart(item("p1", 1));
        store.set_cart_quantity(&key("p1"), 0);
        store.clear_cart();

        assert_eq!(
            *seen.borrow(),
            vec![
                (StoreEvent::CartItemAdded(key("p1")), 1),
                (StoreEvent::CartItemAdded(key("p1")), 2),
                (StoreEvent::CartItemRemoved(key("p1")), 0),
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut store = store();

        let sink = Rc::clone(&count);
        let id = store.subscribe(move |_: &StoreEvent, _: &StoreView<'_>| {
            *sink.borrow_mut() += 1;
        });
        store.add_to_cart(item("p1", 1));
        assert!(store.unsubscribe(id));
        store.add_to_cart(item("p1", 1));

        assert_eq!(*count.borrow(), 1);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_failing_storage_is_not_fatal() {
        let mut store = Storefront::open(FailingStorage, CurrencyCode::EUR);
        assert!(store.cart().is_empty());

        store.add_to_cart(item("p1", 2));
        assert_eq!(store.cart().total_quantity(), 2);
    }

    #[test]
    fn test_move_wishlist_item_to_cart() {
        let mut store = store();
        store.add_to_wishlist(item("p1", 3));
        store.add_to_cart(item("p1", 2));

        store.move_wishlist_item_to_cart(&key("p1"));
        assert!(store.wishlist().is_empty());
        // Merged with the existing cart entry at quantity one
        assert_eq!(store.cart().get(&key("p1")).unwrap().quantity().get(), 3);

        let writes = store.storage().writes();
        store.move_wishlist_item_to_cart(&key("p1"));
        assert_eq!(store.storage().writes(), writes);
    }

    #[test]
    fn test_save_for_later_keeps_cart() {
        let mut store = store();
        store.add_to_cart(item("p1", 2));
        store.save_cart_item_for_later(&key("p1"));

        assert!(store.wishlist().contains(&key("p1")));
        assert_eq!(store.cart().len(), 1);
    }

    #[test]
    fn test_complete_checkout_clears_cart_only() {
        let mut store = store();
        store.login(
            SessionUser {
                id: UserId::new("u-1"),
                name: "Ada".to_string(),
                email: Email::parse("ada@example.com").unwrap(),
                role: UserRole::User,
            },
            SecretString::from("tok"),
        );
        store.add_to_cart(item("p1", 2));
        store.add_to_wishlist(item("p2", 1));

        let draft = store.order_draft(ShippingMethod::Standard, true).unwrap();
        assert_eq!(draft.items.len(), 1);

        store.complete_checkout();
        assert!(store.cart().is_empty());
        assert_eq!(store.wishlist().len(), 1);
        assert!(store.session().is_authenticated());
    }

    #[test]
    fn test_reopen_rehydrates() {
        let mut store = store();
        store.add_to_cart(item("p1", 2));
        store.add_to_wishlist(item("p2", 1));

        let reopened = Storefront::open(store.into_storage(), CurrencyCode::EUR);
        assert_eq!(reopened.cart().total_quantity(), 2);
        assert_eq!(reopened.cart().total_price(), Price::from_cents(4000).unwrap());
        assert!(reopened.wishlist().contains(&key("p2")));
    }
}
