//! Domain models for the storefront client.
//!
//! These are plain state types with no I/O. The services in
//! [`crate::services`] own instances of them, publish them to views, and
//! write them through to the persisted store.

pub mod cart;
pub mod listing;
pub mod session;

pub use cart::{AddOutcome, CartLine, CartState};
pub use listing::{FetchTicket, Listing, ListingQuery, ListingResult, ListingState, Pagination};
pub use session::Session;
