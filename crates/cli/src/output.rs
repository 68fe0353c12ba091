//! Terminal rendering for command output and notices.
//!
//! Command output goes to stdout; notices go to stderr so piping a listing
//! stays clean.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::cell::Cell;
use std::rc::Rc;

use tokio::sync::broadcast::{self, error::TryRecvError};

use bazaar_core::{Product, Review};
use bazaar_storefront::models::{CartState, Pagination};
use bazaar_storefront::services::{ScrollAlign, ScrollTarget};
use bazaar_storefront::{Notice, NoticeLevel};

pub fn notice(notice: &Notice) {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
        NoticeLevel::Blocking => "action required",
    };
    eprintln!("[{tag}] {}", notice.message);
}

/// Print every queued notice. Returns how many were printed.
pub fn drain_notices(rx: &mut broadcast::Receiver<Notice>) -> usize {
    let mut shown = 0;
    loop {
        match rx.try_recv() {
            Ok(n) => {
                notice(&n);
                shown += 1;
            }
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Dropped notices");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => return shown,
        }
    }
}

pub fn line(text: impl std::fmt::Display) {
    println!("{text}");
}

/// A rendered listing row. Scrolling it into view marks it as focused.
pub struct Row {
    index: usize,
    focus: Rc<Cell<Option<usize>>>,
}

impl Row {
    pub const fn new(index: usize, focus: Rc<Cell<Option<usize>>>) -> Self {
        Self { index, focus }
    }
}

impl ScrollTarget for Row {
    fn scroll_into_view(&self, _align: ScrollAlign) {
        self.focus.set(Some(self.index));
    }
}

fn price_cell(product: &Product) -> String {
    if product.discount.is_active() {
        format!(
            "{} (was {}, {})",
            product.discounted_price(),
            product.price,
            product.discount
        )
    } else {
        product.price.to_string()
    }
}

pub fn product_rows(products: &[Product], focused: Option<usize>) {
    if products.is_empty() {
        println!("No products found.");
        return;
    }
    for (i, product) in products.iter().enumerate() {
        let cursor = if focused == Some(i) { '>' } else { ' ' };
        let stock = if product.stock == 0 {
            "out of stock".to_string()
        } else {
            format!("{} in stock", product.stock)
        };
        println!(
            "{cursor} {:<26} {:<32} {:<28} {stock}",
            product.id.as_str(),
            product.name,
            price_cell(product)
        );
    }
}

pub fn pager(pagination: Pagination, search: &str) {
    println!("Page {} of {}", pagination.page, pagination.page_count);
    let flag = if search.is_empty() {
        String::new()
    } else {
        format!(" --search {search:?}")
    };
    if pagination.has_prev() {
        println!("  prev: bazaar products list{flag} --page {}", pagination.prev());
    }
    if pagination.has_next() {
        println!("  next: bazaar products list{flag} --page {}", pagination.next());
    }
}

pub fn product_detail(product: &Product, local_stock: u32) {
    println!("{} [{}]", product.name, product.id);
    match (&product.brand, &product.description) {
        (Some(brand), Some(desc)) => println!("{brand} | {desc}"),
        (Some(text), None) | (None, Some(text)) => println!("{text}"),
        (None, None) => {}
    }
    println!("Price: {}", price_cell(product));
    if local_stock == 0 {
        println!("Stock: out of stock");
    } else {
        println!("Stock: {local_stock}");
    }
    let variants: Vec<_> = product
        .variants
        .iter()
        .filter(|v| !v.is_blank())
        .map(bazaar_core::Variant::label)
        .collect();
    if !variants.is_empty() {
        println!("Variants: {}", variants.join(", "));
    }
    for image in &product.images {
        println!("Image: {image}");
    }
}

pub fn reviews(reviews: &[Review]) {
    if reviews.is_empty() {
        println!("No reviews yet.");
        return;
    }
    for review in reviews {
        let stars = review.rating.stars();
        let filled = "*".repeat(usize::from(stars));
        let empty = ".".repeat(usize::from(5 - stars.min(5)));
        let date = review
            .date
            .map(|d| d.format(" (%Y-%m-%d)").to_string())
            .unwrap_or_default();
        println!("{filled}{empty} {}{date}: {}", review.name, review.comment);
    }
}

pub fn cart(cart: &CartState) {
    println!("Cart ({})", cart.item_count());
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for line in cart.lines() {
        println!(
            "  {:<26} {:<32} {} x {} = {}",
            line.product_id.as_str(),
            line.name,
            line.qty,
            line.price,
            line.line_total()
        );
    }
    println!("Total: {}", cart.total());
}
