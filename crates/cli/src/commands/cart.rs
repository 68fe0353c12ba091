//! Cart commands. The cart lives in the state file, so it persists between
//! invocations.

use clap::Subcommand;

use bazaar_core::ProductId;
use bazaar_storefront::{AppState, StorefrontError};

use crate::output;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart and its total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: String,
    },
    /// Remove a product's line
    Remove {
        /// Product ID
        id: String,
    },
    /// Set a line's quantity (values below 1 are ignored)
    Qty {
        /// Product ID
        id: String,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Increase a line's quantity by one
    Inc {
        /// Product ID
        id: String,
    },
    /// Decrease a line's quantity by one (never below 1)
    Dec {
        /// Product ID
        id: String,
    },
    /// Empty the cart
    Clear,
}

pub async fn run(state: &AppState, action: CartAction) -> Result<(), StorefrontError> {
    let cart = state.cart();
    match action {
        CartAction::Show => {}
        CartAction::Add { id } => {
            let product = state.api().get_product(&ProductId::new(id)).await?;
            cart.add_item(&product);
        }
        CartAction::Remove { id } => {
            if !cart.remove_item(&ProductId::new(id.as_str())) {
                tracing::info!(id = %id, "Not in cart");
            }
        }
        CartAction::Qty { id, qty } => {
            if !cart.set_qty(&ProductId::new(id.as_str()), qty) {
                tracing::info!(id = %id, qty, "Quantity unchanged");
            }
        }
        CartAction::Inc { id } => {
            cart.increment(&ProductId::new(id));
        }
        CartAction::Dec { id } => {
            cart.decrement(&ProductId::new(id));
        }
        CartAction::Clear => {
            cart.clear();
        }
    }

    output::cart(&cart.snapshot());
    Ok(())
}
