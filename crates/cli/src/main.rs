//! Arcane CLI - browse the catalog, manage the cart and check out.
//!
//! # Usage
//!
//! ```bash
//! # List every product
//! arcane gallery
//!
//! # Show one product with its reviews
//! arcane product hoodie-01
//!
//! # Add a product in size M, then check out
//! arcane add hoodie-01 --size M
//! arcane checkout
//!
//! # Manage cart lines
//! arcane cart remove hoodie-01 --size M
//! arcane cart inc hoodie-01 --size M
//!
//! # Leave a review
//! arcane review hoodie-01 --rating 5 --comment "Great fit"
//!
//! # Stock, sales and rating tables
//! arcane charts
//! ```
//!
//! # Environment Variables
//!
//! - `ARCANE_API_URL` - remote store service (default `http://127.0.0.1:3000`)
//! - `ARCANE_STATE_FILE` - local cart/sales/reviews file (default `.arcane/state.json`)
//! - `ARCANE_REQUEST_TIMEOUT_SECS` - optional request timeout
//! - `ARCANE_LOG_FORMAT` - `json` for structured logs on stderr, text otherwise
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - optional error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use arcane_storefront::config::StorefrontConfig;
use arcane_storefront::error::StorefrontError;
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod charts;
mod commands;
mod render;

#[derive(Parser)]
#[command(name = "arcane")]
#[command(author, version, about = "Arcane merch storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every product
    Gallery,
    /// Show a product and its reviews
    Product {
        /// Product id
        id: String,
    },
    /// Add one unit of a product to the cart
    Add {
        /// Product id
        id: String,

        /// Size (S, M, L, XL)
        #[arg(short, long, default_value = "S")]
        size: String,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Submit the cart
    Checkout,
    /// Review a product
    Review {
        /// Product id
        id: String,

        /// Stars, 1 to 5
        #[arg(short, long)]
        rating: u8,

        /// Optional comment
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Stock, units sold and average rating per product
    Charts,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Remove a line
    Remove {
        /// Product id
        id: String,

        /// Size of the line
        #[arg(short, long, default_value = "S")]
        size: String,
    },
    /// Add one to a line's quantity
    Inc {
        /// Product id
        id: String,

        /// Size of the line
        #[arg(short, long, default_value = "S")]
        size: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, config).await {
        e.report();
        std::process::exit(1);
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "arcane_storefront=info,arcane_cli=info".into());

    // JSON for log shippers, text for humans
    let json = json_logs(std::env::var("ARCANE_LOG_FORMAT").ok().as_deref());
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

fn json_logs(format: Option<&str>) -> bool {
    format.is_some_and(|format| format.eq_ignore_ascii_case("json"))
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), StorefrontError> {
    let ctx = commands::Context::new(config)?;

    match cli.command {
        Commands::Gallery => commands::gallery(&ctx).await,
        Commands::Product { id } => commands::product(&ctx, &id).await,
        Commands::Add { id, size } => commands::add(&ctx, &id, &size).await,
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => commands::cart_show(&ctx).await,
            CartAction::Remove { id, size } => {
                commands::cart_command(&ctx, commands::LineCommand::Remove, &id, &size).await
            }
            CartAction::Inc { id, size } => {
                commands::cart_command(&ctx, commands::LineCommand::Increment, &id, &size).await
            }
        },
        Commands::Checkout => commands::checkout(&ctx).await,
        Commands::Review {
            id,
            rating,
            comment,
        } => commands::review(&ctx, &id, rating, &comment).await,
        Commands::Charts => commands::charts(&ctx).await,
    }
}
