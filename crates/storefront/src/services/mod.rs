//! Stateful storefront services.
//!
//! # Services
//!
//! - `cart` - observable, write-through cart
//! - `session` - observable, write-through auth session
//! - `catalog` - listing query controller with stale-result discard
//! - `scroll` - scroll restoration between listing and detail views
//! - `product` - product detail page with local stock
//! - `reviews` - review list and submission
//! - `auth` - login and registration forms
//! - `admin` - admin dashboard and product CRUD

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod product;
pub mod reviews;
pub mod scroll;
pub mod session;

pub use admin::{AdminConsole, ProductDraft};
pub use auth::{AuthError, AuthService, LoginForm, RegisterForm};
pub use cart::Cart;
pub use catalog::{Catalog, CatalogSource};
pub use product::ProductPage;
pub use reviews::{ReviewDraft, ReviewList};
pub use scroll::{ReturnMarker, ScrollAlign, ScrollCoordinator, ScrollTarget};
pub use session::AuthSession;
