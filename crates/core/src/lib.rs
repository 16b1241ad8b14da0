//! Cartkeeper Core - Shared value types.
//!
//! This crate provides the value types used across the Cartkeeper workspace:
//! - `store` - Cart, wishlist and session state with persistence
//! - `cli` - Command-line driver over the store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. Everything here is a plain value that can be serialized into the
//! persisted client state.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for identifiers, prices, emails, roles and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
