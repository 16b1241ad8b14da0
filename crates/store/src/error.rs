//! Error types for the edges of the store.
//!
//! Cart and wishlist commands never fail. Errors only exist where the store
//! touches storage, gates access, or prepares an order for the backend.

use std::path::PathBuf;

use thiserror::Error;

/// Failure inside a persistence adapter.
///
/// The controller logs these and carries on; they are only returned to
/// callers that use an adapter directly.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored envelope was written by an incompatible version.
    #[error("Unsupported state version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// Access denied by the session gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No signed-in user or no token.
    #[error("Sign in required")]
    NotAuthenticated,

    /// Signed in, but the route needs an admin.
    #[error("Admin access required")]
    NotAdmin,
}

/// Reasons an order draft cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// The session does not allow checkout.
    #[error("Access denied: {0}")]
    Access(#[from] AccessError),
}
