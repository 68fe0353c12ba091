//! The cart service: observable, write-through wrapper around [`CartState`].
//!
//! Every mutation runs inside the watch channel's write lock, persists the
//! new state before releasing it, and then emits a notice. No-op mutations
//! (unknown id, quantity below 1) change nothing, write nothing, and notify
//! no one.

use tokio::sync::watch;

use bazaar_core::{Price, Product, ProductId};

use crate::error::add_breadcrumb;
use crate::models::{AddOutcome, CartLine, CartState};
use crate::notify::Notifier;
use crate::store::PersistedStore;

/// The shopping cart.
#[derive(Debug)]
pub struct Cart {
    state: watch::Sender<CartState>,
    store: PersistedStore,
    notifier: Notifier,
}

impl Cart {
    /// Restore the cart saved in `store` (empty if none).
    #[must_use]
    pub fn load(store: PersistedStore, notifier: Notifier) -> Self {
        let cart = store.load_cart();
        tracing::debug!(lines = cart.item_count(), "Restored cart");
        Self {
            state: watch::Sender::new(cart),
            store,
            notifier,
        }
    }

    /// Add one unit of `product`.
    ///
    /// The outcome reflects whether the line existed before this call, and
    /// is decided in the same critical section as the mutation.
    pub fn add_item(&self, product: &Product) -> AddOutcome {
        let mut outcome = AddOutcome::Added;
        self.state.send_modify(|cart| {
            outcome = cart.add(product);
            self.persist(cart);
        });

        add_breadcrumb("cart", outcome.message(), Some(&[("product_id", product.id.as_str())]));
        self.notifier.success(outcome.message());
        outcome
    }

    /// Remove a product's line. Returns `false` if it was not in the cart.
    pub fn remove_item(&self, product_id: &ProductId) -> bool {
        let removed = self.mutate(|cart| cart.remove(product_id));
        if removed {
            self.notifier.success("Item removed");
        }
        removed
    }

    /// Set a line's quantity. Values below 1 and unknown ids are ignored.
    pub fn set_qty(&self, product_id: &ProductId, qty: i64) -> bool {
        self.mutate(|cart| cart.set_qty(product_id, qty))
    }

    /// The cart page's `+` button.
    pub fn increment(&self, product_id: &ProductId) -> bool {
        let changed = self.mutate(|cart| {
            let Some(qty) = cart.line(product_id).map(|line| i64::from(line.qty.get())) else {
                return false;
            };
            cart.set_qty(product_id, qty + 1)
        });
        if changed {
            self.notifier.success("Quantity increased");
        }
        changed
    }

    /// The cart page's `-` button. Never drops a line below quantity 1.
    pub fn decrement(&self, product_id: &ProductId) -> bool {
        let changed = self.mutate(|cart| {
            let Some(qty) = cart.line(product_id).map(|line| i64::from(line.qty.get())) else {
                return false;
            };
            cart.set_qty(product_id, qty - 1)
        });
        if changed {
            self.notifier.success("Quantity decreased");
        }
        changed
    }

    /// Empty the cart.
    pub fn clear(&self) -> bool {
        self.mutate(CartState::clear)
    }

    fn mutate(&self, change: impl FnOnce(&mut CartState) -> bool) -> bool {
        self.state.send_if_modified(|cart| {
            let changed = change(cart);
            if changed {
                self.persist(cart);
            }
            changed
        })
    }

    fn persist(&self, cart: &CartState) {
        if let Err(e) = self.store.save_cart(cart) {
            tracing::error!(error = %e, "Failed to persist cart");
        }
    }

    /// Sum of `price × qty`, recomputed from the lines on every call.
    #[must_use]
    pub fn total(&self) -> Price {
        self.state.borrow().total()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.state.borrow().item_count()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.state.borrow().lines().to_vec()
    }

    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }
}
