//! Cart state and its reducer operations.
//!
//! [`CartState`] is the pure part of the cart: every mutation goes through
//! one of its methods, which keep two invariants:
//!
//! - at most one [`CartLine`] per product id
//! - every line has a quantity of at least 1 (absence means removal)
//!
//! Persistence and notifications live in [`crate::services::cart::Cart`].

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use bazaar_core::{Discount, Price, Product, ProductId};

/// One product's entry in the cart.
///
/// Serialized with the same field names the catalog uses (`_id`, `qty`) so a
/// persisted cart stays readable by any client of the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "_id")]
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub discount: Discount,
    #[serde(default)]
    pub images: Vec<String>,
    pub qty: NonZeroU32,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            discount: product.discount,
            images: product.images.clone(),
            qty: NonZeroU32::MIN,
        }
    }

    /// `price × qty` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.qty.get())
    }
}

/// Result of [`CartState::add`], decided from the state *before* the mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended with quantity 1.
    Added,
    /// An existing line's quantity was incremented.
    QuantityUpdated,
}

impl AddOutcome {
    /// Confirmation text shown to the user.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Added => "Added to cart",
            Self::QuantityUpdated => "Quantity updated",
        }
    }
}

/// Ordered cart contents, in the order products were first added.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct CartState {
    lines: Vec<CartLine>,
}

impl CartState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`: increment its line or append a new one.
    pub fn add(&mut self, product: &Product) -> AddOutcome {
        if let Some(line) = self.line_mut(&product.id) {
            line.qty = line.qty.saturating_add(1);
            return AddOutcome::QuantityUpdated;
        }
        self.lines.push(CartLine::from_product(product));
        AddOutcome::Added
    }

    /// Remove the line for `product_id`. Returns `false` if there was none.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product_id != product_id);
        self.lines.len() != before
    }

    /// Replace a line's quantity.
    ///
    /// Quantities below 1 are ignored, as are unknown ids. Quantities above
    /// `u32::MAX` are capped there. Returns whether the state changed.
    pub fn set_qty(&mut self, product_id: &ProductId, qty: i64) -> bool {
        if qty < 1 {
            return false;
        }
        let qty = u32::try_from(qty)
            .ok()
            .and_then(NonZeroU32::new)
            .unwrap_or(NonZeroU32::MAX);
        match self.line_mut(product_id) {
            Some(line) if line.qty != qty => {
                line.qty = qty;
                true
            }
            _ => false,
        }
    }

    /// Empty the cart. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_lines = !self.lines.is_empty();
        self.lines.clear();
        had_lines
    }

    /// Sum of `price × qty` over all lines, computed on every call.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.qty.get())).sum()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
    }
}

/// Rebuild a cart from raw lines, folding duplicate ids into the first
/// occurrence so a hand-edited slot cannot break the one-line-per-id rule.
impl From<Vec<CartLine>> for CartState {
    fn from(raw: Vec<CartLine>) -> Self {
        let mut cart = Self::default();
        for line in raw {
            match cart.line_mut(&line.product_id) {
                Some(existing) => existing.qty = existing.qty.saturating_add(line.qty.get()),
                None => cart.lines.push(line),
            }
        }
        cart
    }
}

impl From<CartState> for Vec<CartLine> {
    fn from(cart: CartState) -> Self {
        cart.lines
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn product(id: &str, price: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            brand: None,
            price: Price::from_units(price),
            discount: Discount::NONE,
            stock: 10,
            images: vec![format!("{id}.jpg")],
            variants: Vec::new(),
            description: None,
            category: None,
        }
    }

    fn qty_of(cart: &CartState, id: &str) -> Option<u32> {
        cart.line(&ProductId::new(id)).map(|line| line.qty.get())
    }

    #[test]
    fn test_add_twice_then_other_product() {
        let a = product("a", 100);
        let b = product("b", 50);
        let mut cart = CartState::new();

        assert_eq!(cart.add(&a), AddOutcome::Added);
        assert_eq!(cart.add(&a), AddOutcome::QuantityUpdated);
        assert_eq!(cart.add(&b), AddOutcome::Added);

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(qty_of(&cart, "a"), Some(2));
        assert_eq!(qty_of(&cart, "b"), Some(1));
        assert_eq!(cart.total(), Price::from_units(250));
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.unit_count(), 3);
    }

    #[test]
    fn test_qty_equals_number_of_adds_per_id() {
        let products = [product("x", 1), product("y", 2), product("z", 3)];
        let sequence = [0, 1, 0, 2, 2, 2, 0, 1];
        let mut cart = CartState::new();
        for &i in &sequence {
            cart.add(&products[i]);
        }

        for (i, p) in products.iter().enumerate() {
            let expected = sequence.iter().filter(|&&s| s == i).count();
            assert_eq!(
                qty_of(&cart, p.id.as_str()),
                Some(u32::try_from(expected).unwrap())
            );
        }
        assert_eq!(cart.item_count(), products.len());
    }

    #[test]
    fn test_set_qty_below_one_is_ignored() {
        let mut cart = CartState::new();
        cart.add(&product("a", 10));
        let before = cart.clone();

        assert!(!cart.set_qty(&ProductId::new("a"), 0));
        assert!(!cart.set_qty(&ProductId::new("a"), -1));
        assert!(!cart.set_qty(&ProductId::new("a"), i64::MIN));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_set_qty_replaces_quantity() {
        let mut cart = CartState::new();
        cart.add(&product("a", 10));

        assert!(cart.set_qty(&ProductId::new("a"), 7));
        assert_eq!(qty_of(&cart, "a"), Some(7));
        assert_eq!(cart.total(), Price::from_units(70));

        // Same value and unknown ids are no-ops.
        assert!(!cart.set_qty(&ProductId::new("a"), 7));
        assert!(!cart.set_qty(&ProductId::new("missing"), 3));
    }

    #[test]
    fn test_set_qty_caps_huge_quantities() {
        let mut cart = CartState::new();
        cart.add(&product("a", 10));

        assert!(cart.set_qty(&ProductId::new("a"), 5_000_000_000));
        assert_eq!(qty_of(&cart, "a"), Some(u32::MAX));
        assert!(!cart.set_qty(&ProductId::new("a"), i64::MAX));
    }

    #[test]
    fn test_total_saturates_instead_of_panicking() {
        let mut cart = CartState::new();
        let mut pricey = product("a", 1);
        pricey.price = Price::new(Decimal::from_i128_with_scale(10_i128.pow(20), 0)).unwrap();
        cart.add(&pricey);
        cart.add(&product("b", 5));

        assert!(cart.set_qty(&ProductId::new("a"), 4_000_000_000));
        assert_eq!(cart.total(), Price::MAX);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = CartState::new();
        cart.add(&product("a", 10));
        let before = cart.clone();

        assert!(!cart.remove(&ProductId::new("missing")));
        assert_eq!(cart, before);

        assert!(cart.remove(&ProductId::new("a")));
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_total_tracks_line_changes() {
        let mut cart = CartState::new();
        cart.add(&product("a", 100));
        cart.add(&product("b", 50));
        assert_eq!(cart.total(), Price::from_units(150));

        cart.set_qty(&ProductId::new("b"), 4);
        assert_eq!(cart.total(), Price::from_units(300));

        cart.remove(&ProductId::new("a"));
        assert_eq!(cart.total(), Price::from_units(200));
    }

    #[test]
    fn test_total_ignores_discount() {
        let mut discounted = product("a", 100);
        discounted.discount = Discount::new(Decimal::from(50)).unwrap();
        let mut cart = CartState::new();
        cart.add(&discounted);
        assert_eq!(cart.total(), Price::from_units(100));
    }

    #[test]
    fn test_deserialize_merges_duplicate_ids() {
        let cart: CartState = serde_json::from_value(json!([
            { "_id": "a", "name": "A", "price": 10, "qty": 2 },
            { "_id": "b", "name": "B", "price": 5, "qty": 1, "stock": 3 },
            { "_id": "a", "name": "A", "price": 10, "qty": 3 }
        ]))
        .unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(qty_of(&cart, "a"), Some(5));
    }

    #[test]
    fn test_deserialize_rejects_zero_qty() {
        let result = serde_json::from_value::<CartState>(json!([
            { "_id": "a", "name": "A", "price": 10, "qty": 0 }
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let mut cart = CartState::new();
        cart.add(&product("a", 100));
        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value[0]["_id"], "a");
        assert_eq!(value[0]["qty"], 1);
        assert_eq!(value[0]["images"][0], "a.jpg");
    }
}
