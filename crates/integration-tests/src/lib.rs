//! Integration tests for Cartkeeper.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartkeeper-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart and wishlist behavior through the controller
//! - `persistence` - Reloading, corruption and file storage
//! - `checkout_flow` - Session gating and order payloads
//!
//! This crate only holds shared fixtures; the tests live in `tests/`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::num::NonZeroU32;
use std::path::PathBuf;

use cartkeeper_core::{CurrencyCode, Email, Price, UserId, UserRole};
use cartkeeper_store::{ItemKey, JsonFileStorage, LineItem, SessionUser, Storefront};

/// A state file in a fresh temp directory. The directory is removed on drop.
#[derive(Debug)]
pub struct TempStateFile {
    dir: PathBuf,
    path: PathBuf,
}

impl TempStateFile {
    #[must_use]
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("cartkeeper-it-{}", uuid::Uuid::new_v4()));
        let path = dir.join("state.json");
        Self { dir, path }
    }

    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Open a store backed by this file.
    #[must_use]
    pub fn open(&self) -> Storefront<JsonFileStorage> {
        Storefront::open(JsonFileStorage::new(&self.path), CurrencyCode::EUR)
    }

    /// Write raw bytes to the state file, bypassing the store.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[allow(clippy::expect_used)]
    pub fn write_raw(&self, payload: &str) {
        std::fs::create_dir_all(&self.dir).expect("create temp dir");
        std::fs::write(&self.path, payload).expect("write state file");
    }

    /// Read the state file back as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the file is missing or not JSON.
    #[allow(clippy::expect_used)]
    #[must_use]
    pub fn read_json(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(&self.path).expect("read state file");
        serde_json::from_str(&raw).expect("state file is JSON")
    }
}

impl Default for TempStateFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempStateFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

/// A line item priced in cents.
///
/// # Panics
///
/// Panics if `cents` is negative or `quantity` is zero.
#[allow(clippy::expect_used)]
#[must_use]
pub fn line_item(id: &str, size: &str, color: &str, cents: i64, quantity: u32) -> LineItem {
    LineItem::new(
        id,
        format!("Product {id}"),
        Price::from_cents(cents).expect("non-negative price"),
        size,
        color,
        NonZeroU32::new(quantity).expect("non-zero quantity"),
    )
}

/// Shorthand for an identity key.
#[must_use]
pub fn key(id: &str, size: &str, color: &str) -> ItemKey {
    ItemKey::new(id, size, color)
}

/// Price from cents.
///
/// # Panics
///
/// Panics if `cents` is negative.
#[allow(clippy::expect_used)]
#[must_use]
pub fn price(cents: i64) -> Price {
    Price::from_cents(cents).expect("non-negative price")
}

/// A session user with the given role.
///
/// # Panics
///
/// Panics if the fixture email fails validation.
#[allow(clippy::expect_used)]
#[must_use]
pub fn user(role: UserRole) -> SessionUser {
    SessionUser {
        id: UserId::new("u-100"),
        name: "Test Shopper".to_string(),
        email: Email::parse("shopper@example.com").expect("valid email"),
        role,
    }
}
