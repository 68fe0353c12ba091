//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Bazaar components:
//! - `storefront` - Client-side storefront state (cart, catalog, session)
//! - `cli` - Command-line front end for browsing, cart, and admin tasks
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no persistence,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, plus the product
//!   and review entities served by the catalog API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
