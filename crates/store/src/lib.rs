//! Cartkeeper Store - Client-side cart, wishlist and session state.
//!
//! # Architecture
//!
//! ```text
//! UI event ──► Storefront command ──► pure transition (cart / wishlist / session)
//!                                          │ changed?
//!                                          ▼
//!                              save to StateStorage ──► notify listeners
//! ```
//!
//! The state types ([`CartState`], [`WishlistState`], [`SessionState`]) are
//! plain values with total commands that report whether anything changed.
//! [`Storefront`] owns one of each plus a [`StateStorage`] adapter and runs
//! the post-mutation hook.
//!
//! # Modules
//!
//! - [`line_item`] - Line items and the `(product, size, color)` identity key
//! - [`cart`] - Cart with merge-on-add and derived totals
//! - [`wishlist`] - First-write-wins wishlist
//! - [`session`] - Signed-in user and token
//! - [`access`] - Checkout/admin gate
//! - [`checkout`] - Shipping, first-order discount and order payload
//! - [`persistence`] - Versioned JSON envelope and storage adapters
//! - [`controller`] - The `Storefront` owner and listener registry
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod controller;
pub mod error;
pub mod line_item;
pub mod persistence;
pub mod session;
pub mod wishlist;

pub use access::{require_admin, require_authenticated};
pub use cart::CartState;
pub use checkout::{CheckoutSummary, OrderDraft, OrderDraftItem, ShippingMethod};
pub use config::{ConfigError, StoreConfig};
pub use controller::{ListenerId, StoreEvent, StoreListener, StoreView, Storefront};
pub use error::{AccessError, CheckoutError, StorageError};
pub use line_item::{ItemKey, LineItem};
pub use persistence::{JsonFileStorage, MemoryStorage, StateStorage, StoredState};
pub use session::{SessionState, SessionUser};
pub use wishlist::WishlistState;
