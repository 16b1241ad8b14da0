//! Core types for Cartkeeper.
//!
//! This module provides type-safe wrappers for common storefront concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
pub use status::*;
