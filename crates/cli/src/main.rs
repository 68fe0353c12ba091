//! Bazaar CLI - a terminal storefront on top of `bazaar-storefront`.
//!
//! # Usage
//!
//! ```bash
//! # Browse, search, and page through the catalog
//! bazaar products list --search phone --page 2
//! bazaar products list --link '/?search=phone&page=2'
//!
//! # View a product and return to the listing at the same row
//! bazaar products show 64f0c0ffee
//! bazaar products list --search phone --page 2 --from 64f0c0ffee
//!
//! # Cart
//! bazaar cart add 64f0c0ffee
//! bazaar cart qty 64f0c0ffee 3
//! bazaar cart show
//!
//! # Account
//! bazaar login -e me@example.com -p secret
//! bazaar logout
//!
//! # Admin
//! bazaar admin dashboard
//! bazaar admin create --name Phone --price 499
//! ```
//!
//! # Environment Variables
//!
//! See `bazaar_storefront::config` (`BAZAAR_API_URL` is required).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bazaar_storefront::AppState;
use bazaar_storefront::config::StorefrontConfig;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar storefront in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: commands::products::ProductsAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Read and write product reviews
    Reviews {
        #[command(subcommand)]
        action: commands::reviews::ReviewsAction,
    },
    /// Log in with email and password
    Login(commands::account::LoginArgs),
    /// Create an account
    Register(commands::account::RegisterArgs),
    /// Forget the stored session
    Logout,
    /// Show the stored session
    Whoami,
    /// Admin console
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Quiet by default so log lines don't interleave with command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_storefront=warn,bazaar_cli=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let state = AppState::new(config);
    let mut notices = state.notifier().subscribe();

    let result = commands::run(&state, cli.command).await;

    let shown = output::drain_notices(&mut notices);
    if let Err(e) = result {
        if shown == 0 {
            e.report();
            output::notice(&e.notice());
        }
        tracing::debug!("Command failed: {e}");
        std::process::exit(1);
    }
}
