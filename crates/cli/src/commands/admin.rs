//! Admin console commands.
//!
//! # Usage
//!
//! ```bash
//! bazaar admin dashboard
//! bazaar admin list --page 2
//! bazaar admin create --name "Phone" --price 499 --variant "128GB|black|128GB"
//! bazaar admin update <id> --stock 3
//! bazaar admin delete <id>
//! ```
//!
//! The local admin flag is advisory. Requests are sent with the stored token
//! and the server decides.

use clap::{Args, Subcommand};

use bazaar_core::{ProductId, Variant};
use bazaar_storefront::services::ProductDraft;
use bazaar_storefront::{AppState, StorefrontError};

use crate::output;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Show the admin dashboard greeting
    Dashboard,
    /// List products, admin page size
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Create a product
    Create(ProductArgs),
    /// Update a product; omitted fields keep their current value
    Update {
        /// Product ID
        id: String,
        #[command(flatten)]
        fields: ProductArgs,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: String,
    },
}

#[derive(Args, Default)]
pub struct ProductArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    brand: Option<String>,

    #[arg(long)]
    price: Option<String>,

    /// Percent off, 0 to 100
    #[arg(long)]
    discount: Option<String>,

    #[arg(long)]
    stock: Option<String>,

    /// Image URL (repeatable; replaces all images when given)
    #[arg(long = "image")]
    images: Vec<String>,

    /// Variant as `size|color|storage` (repeatable; replaces all variants)
    #[arg(long = "variant", value_parser = parse_variant)]
    variants: Vec<Variant>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    category: Option<String>,
}

impl ProductArgs {
    /// Overlay the given fields onto `draft`.
    fn apply(self, draft: &mut ProductDraft) {
        let fields = [
            (&mut draft.name, self.name),
            (&mut draft.brand, self.brand),
            (&mut draft.price, self.price),
            (&mut draft.discount, self.discount),
            (&mut draft.stock, self.stock),
            (&mut draft.description, self.description),
            (&mut draft.category, self.category),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if !self.images.is_empty() {
            draft.images = self.images;
        }
        if !self.variants.is_empty() {
            draft.variants = self.variants;
        }
    }
}

fn parse_variant(raw: &str) -> Result<Variant, String> {
    let parts: Vec<&str> = raw.split('|').map(str::trim).collect();
    if parts.len() > 3 {
        return Err("expected at most three fields: size|color|storage".to_string());
    }
    let field = |i: usize| parts.get(i).copied().unwrap_or_default().to_string();
    Ok(Variant {
        size: field(0),
        color: field(1),
        storage: field(2),
    })
}

pub async fn run(state: &AppState, action: AdminAction) -> Result<(), StorefrontError> {
    let console = state.admin();
    if !console.is_admin() {
        output::line("Note: this session is not marked as admin; the server may refuse.");
    }

    match action {
        AdminAction::Dashboard => {
            let dashboard = console.dashboard().await?;
            output::line(&dashboard.message);
            if !dashboard.user.email.is_empty() {
                output::line(format!("{} <{}>", dashboard.user.name, dashboard.user.email));
            }
        }
        AdminAction::List { page } => {
            let listing = console.list(page).await?;
            output::product_rows(&listing.products, None);
            output::line(format!("Page {} of {}", listing.page, listing.pages));
        }
        AdminAction::Create(fields) => {
            let mut draft = ProductDraft::default();
            fields.apply(&mut draft);
            let product = console.create(&draft).await?;
            output::line(format!("Created {}", product.id));
        }
        AdminAction::Update { id, fields } => {
            let id = ProductId::new(id);
            let mut draft = console.edit_draft(&id).await?;
            fields.apply(&mut draft);
            let product = console.update(&id, &draft).await?;
            output::product_detail(&product, product.stock);
        }
        AdminAction::Delete { id } => {
            console.delete(&ProductId::new(id)).await?;
        }
    }
    Ok(())
}
