//! Admin console: dashboard, paged product listing, and product CRUD.
//!
//! The admin flag on the session only decides whether the console is worth
//! showing. Every request still carries the bearer token and the server has
//! the final word; a rejected token becomes a blocking notice asking the user
//! to log in again. Nothing is retried.

use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing::instrument;

use bazaar_core::{Discount, Price, Product, ProductId, Variant};

use crate::api::{AdminDashboard, ApiClient, ProductInput, ProductPage};
use crate::error::{StorefrontError, ValidationError};
use crate::notify::Notifier;
use crate::services::catalog::FETCH_FAILED;
use crate::services::session::AuthSession;

/// The product form, with every field as typed.
///
/// Numeric fields stay strings until [`ProductDraft::validate`] so that a
/// blank field can mean "not set" rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub brand: String,
    pub price: String,
    pub discount: String,
    pub stock: String,
    pub images: Vec<String>,
    pub variants: Vec<Variant>,
    pub description: String,
    pub category: String,
}

impl ProductDraft {
    /// Prefill the form for editing an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            brand: product.brand.clone().unwrap_or_default(),
            price: product.price.amount().to_string(),
            discount: if product.discount.is_active() {
                product.discount.percent().to_string()
            } else {
                String::new()
            },
            stock: product.stock.to_string(),
            images: product.images.clone(),
            variants: product.variants.clone(),
            description: product.description.clone().unwrap_or_default(),
            category: product.category.clone().unwrap_or_default(),
        }
    }

    /// Check the form and build the request body.
    ///
    /// Name and price are required. Blank optional fields, blank image URLs,
    /// and all-blank variants are dropped.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a missing required field or a numeric
    /// field that does not parse or is out of range.
    pub fn validate(&self) -> Result<ProductInput, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("Name"));
        }
        let price = parse_decimal("Price", &self.price)?
            .ok_or(ValidationError::MissingField("Price"))?;
        let discount = parse_decimal("Discount", &self.discount)?
            .map(Discount::new)
            .transpose()?;
        let stock = non_blank(&self.stock)
            .map(|raw| {
                raw.parse::<u32>()
                    .map_err(|_| ValidationError::number("Stock", "must be a whole number"))
            })
            .transpose()?;

        Ok(ProductInput {
            name: name.to_string(),
            price: Price::new(price)?,
            brand: non_blank(&self.brand).map(String::from),
            discount,
            stock,
            images: self
                .images
                .iter()
                .filter_map(|url| non_blank(url).map(String::from))
                .collect(),
            variants: self
                .variants
                .iter()
                .filter(|v| !v.is_blank())
                .cloned()
                .collect(),
            description: non_blank(&self.description).map(String::from),
            category: non_blank(&self.category).map(String::from),
        })
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_decimal(field: &'static str, raw: &str) -> Result<Option<Decimal>, ValidationError> {
    non_blank(raw)
        .map(|raw| {
            raw.parse::<Decimal>()
                .map_err(|_| ValidationError::number(field, "must be a number"))
        })
        .transpose()
}

/// The admin console, borrowed from [`crate::state::AppState::admin`].
pub struct AdminConsole<'a> {
    api: &'a ApiClient,
    session: &'a AuthSession,
    notifier: &'a Notifier,
    page_size: u32,
}

impl<'a> AdminConsole<'a> {
    #[must_use]
    pub const fn new(
        api: &'a ApiClient,
        session: &'a AuthSession,
        notifier: &'a Notifier,
        page_size: u32,
    ) -> Self {
        Self {
            api,
            session,
            notifier,
            page_size,
        }
    }

    /// Whether the session claims admin rights. Advisory only.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    /// The bearer token, or a blocking "log in" notice without one.
    fn token(&self) -> Result<SecretString, StorefrontError> {
        let Some(token) = self.session.bearer() else {
            return Err(self.report(StorefrontError::LoginRequired));
        };
        if !self.session.is_admin() {
            tracing::info!("Non-admin session using the admin console; the server will decide");
        }
        Ok(token)
    }

    fn report(&self, err: StorefrontError) -> StorefrontError {
        err.report();
        self.notifier.notify(err.notice());
        err
    }

    /// The dashboard greeting for the logged-in admin.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` without a session, or the API error (blocking
    /// if the server refused the token).
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<AdminDashboard, StorefrontError> {
        let token = self.token()?;
        self.api
            .admin_dashboard(&token)
            .await
            .map_err(|e| self.report(e.into()))
    }

    /// One page of the admin product grid.
    ///
    /// # Errors
    ///
    /// Returns the API error after a "Failed to fetch products" notice.
    #[instrument(skip(self))]
    pub async fn list(&self, page: u32) -> Result<ProductPage, StorefrontError> {
        self.api
            .list_products(None, page.max(1), self.page_size)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Admin listing failed");
                self.notifier.error(FETCH_FAILED);
                e.into()
            })
    }

    /// Load a product into a draft for editing.
    ///
    /// # Errors
    ///
    /// Returns the API error after a "Failed to load product data" notice.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn edit_draft(&self, id: &ProductId) -> Result<ProductDraft, StorefrontError> {
        match self.api.get_product(id).await {
            Ok(product) => Ok(ProductDraft::from_product(&product)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load product for editing");
                self.notifier.error("Failed to load product data");
                Err(e.into())
            }
        }
    }

    /// Create a product from `draft`.
    ///
    /// # Errors
    ///
    /// Returns a validation error (never sent), `LoginRequired`, or the API
    /// error. Each is also published as a notice.
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, StorefrontError> {
        let input = draft.validate().map_err(|e| self.report(e.into()))?;
        let token = self.token()?;
        let product = self
            .api
            .create_product(&token, &input)
            .await
            .map_err(|e| self.report(e.into()))?;
        self.notifier.success("Product added successfully!");
        Ok(product)
    }

    /// Update product `id` from `draft`.
    ///
    /// # Errors
    ///
    /// Same as [`AdminConsole::create`].
    #[instrument(skip(self, draft), fields(id = %id))]
    pub async fn update(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, StorefrontError> {
        let input = draft.validate().map_err(|e| self.report(e.into()))?;
        let token = self.token()?;
        let product = self
            .api
            .update_product(&token, id, &input)
            .await
            .map_err(|e| self.report(e.into()))?;
        self.notifier.success("Product updated successfully!");
        Ok(product)
    }

    /// Delete product `id`.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` or the API error, also published as a notice.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), StorefrontError> {
        let token = self.token()?;
        self.api
            .delete_product(&token, id)
            .await
            .map_err(|e| self.report(e.into()))?;
        self.notifier.success("Product deleted!");
        Ok(())
    }
}
