//! Bazaar storefront client library.
//!
//! Client-side state for a REST storefront: the cart, the catalog listing,
//! the auth session, and the flows that drive them, all persisted to a
//! durable key-value slot and reported to views through notices.
//!
//! # Layout
//!
//! - [`models`] - pure state types (cart, listing, session)
//! - [`store`] - persisted key-value slot
//! - [`api`] - HTTP client for the backend
//! - [`services`] - observable services built on the above
//! - [`state`] - the shared [`AppState`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod services;
pub mod state;
pub mod store;

pub use error::{Result, StorefrontError, ValidationError};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use state::AppState;
