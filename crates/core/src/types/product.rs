//! Catalog product entity as served by the products API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Discount, Price};

/// A purchasable option of a product (size, color, storage tier).
///
/// All fields are free text and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub storage: String,
}

impl Variant {
    /// Whether every field is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.size.trim().is_empty() && self.color.trim().is_empty() && self.storage.trim().is_empty()
    }

    /// Human-readable label, e.g. `"M | Red | 128GB"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} | {} | {}", self.size, self.color, self.storage)
    }
}

/// A product in the catalog.
///
/// Only `_id`, `name` and `price` are guaranteed by the backend; everything
/// else falls back to an empty/zero value when absent. The backend does not
/// range-check numbers, so a negative price reads as zero, stock is floored
/// into `0..=u32::MAX`, and the discount is clamped into `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(deserialize_with = "lenient_price")]
    pub price: Price,
    #[serde(default, deserialize_with = "lenient_discount")]
    pub discount: Discount,
    #[serde(default, deserialize_with = "lenient_stock")]
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    /// Price after the product's percentage discount.
    #[must_use]
    pub fn discounted_price(&self) -> Price {
        self.price.discounted(self.discount)
    }

    /// The first image, used as the card/cart thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Price, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let amount = rust_decimal::serde::float::deserialize(deserializer)?;
    Price::new(amount.max(Decimal::ZERO)).map_err(serde::de::Error::custom)
}

fn lenient_discount<'de, D>(deserializer: D) -> Result<Discount, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let percent = rust_decimal::serde::float_option::deserialize(deserializer)?;
    Ok(percent.map_or(Discount::NONE, Discount::clamped))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_stock<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    if !raw.is_finite() || raw <= 0.0 {
        return Ok(0);
    }
    // `as` saturates at u32::MAX.
    Ok(raw.floor() as u32)
}
