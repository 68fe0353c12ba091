//! Command implementations. Each returns `StorefrontError` so `main` can turn
//! failures into the same notices the library emits.

pub mod account;
pub mod admin;
pub mod cart;
pub mod products;
pub mod reviews;

use bazaar_storefront::{AppState, StorefrontError};

use crate::Commands;

pub async fn run(state: &AppState, command: Commands) -> Result<(), StorefrontError> {
    match command {
        Commands::Products { action } => products::run(state, action).await,
        Commands::Cart { action } => cart::run(state, action).await,
        Commands::Reviews { action } => reviews::run(state, action).await,
        Commands::Login(args) => account::login(state, args).await,
        Commands::Register(args) => account::register(state, args).await,
        Commands::Logout => account::logout(state),
        Commands::Whoami => {
            account::whoami(state);
            Ok(())
        }
        Commands::Admin { action } => admin::run(state, action).await,
    }
}
