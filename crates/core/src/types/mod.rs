//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod review;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Discount, DiscountError, Price, PriceError};
pub use product::{Product, Variant};
pub use review::{Rating, RatingError, Review};
