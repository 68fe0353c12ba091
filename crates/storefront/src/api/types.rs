//! Request and response bodies for the API.

use serde::{Deserialize, Serialize};

use bazaar_core::{Discount, Price, Product, Rating, Variant};

/// Body of `GET /products`.
///
/// The listing normally arrives as `{ products, page, pages }`, but older
/// deployments answer with a bare array; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProductPageBody {
    Paged {
        #[serde(default)]
        products: Vec<Product>,
        #[serde(default)]
        page: Option<u32>,
        #[serde(default)]
        pages: Option<u32>,
    },
    Bare(Vec<Product>),
}

/// One page of the product listing, normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: u32,
    pub pages: u32,
}

impl From<ProductPageBody> for ProductPage {
    fn from(body: ProductPageBody) -> Self {
        match body {
            ProductPageBody::Paged {
                products,
                page,
                pages,
            } => Self {
                products,
                page: page.unwrap_or(1).max(1),
                pages: pages.unwrap_or(1).max(1),
            },
            ProductPageBody::Bare(products) => Self {
                products,
                page: 1,
                pages: 1,
            },
        }
    }
}

/// Credentials for `POST /users/login`.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body for `POST /users/register`.
#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login or registration.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    pub token: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl std::fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGrant")
            .field("token", &"[REDACTED]")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// Body for `POST /reviews/:productId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReview {
    pub name: String,
    pub comment: String,
    pub rating: Rating,
}

/// Body for `POST /products` and `PUT /products/:id`.
///
/// Optional fields left as `None` are omitted so the server keeps its
/// defaults (on create) or the stored value (on update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    pub images: Vec<String>,
    pub variants: Vec<Variant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// The account behind an admin session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AdminUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Body of `GET /admin`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminDashboard {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: AdminUser,
}

/// `{ "message": ... }` as found in error and delete responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
}
