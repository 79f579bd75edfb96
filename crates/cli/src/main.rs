//! Pizzeria CLI - drive the session and cart from the terminal.
//!
//! State lives in `PIZZERIA_DATA_DIR` (default `.pizzeria`), so a login or a
//! cart survives between invocations.
//!
//! # Usage
//!
//! ```bash
//! pizzeria login mario@example.com
//! pizzeria rename "Super Mario"
//! pizzeria offers
//! pizzeria cart add margherita Margherita 7.50
//! pizzeria cart offer OFF101
//! pizzeria cart sync
//! pizzeria logout
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use pizzeria_core::Price;
use pizzeria_storefront::config::StorefrontConfig;
use pizzeria_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "pizzeria")]
#[command(author, version, about = "Pizzeria ordering CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in (credentials are not verified)
    Login {
        /// Email address
        email: String,

        /// Password
        #[arg(short, long, default_value = "")]
        password: String,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Change the username
    Rename {
        /// New username
        name: String,
    },
    /// List the offer catalog
    Offers,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add one unit of an item
    Add {
        /// Item id
        id: String,
        /// Display name
        name: String,
        /// Unit price, e.g. 7.50
        price: Price,
    },
    /// Remove one unit of an item
    Remove {
        /// Item id
        id: String,
    },
    /// Select an offer from the catalog
    Offer {
        /// Offer id, e.g. OFF101
        id: String,
    },
    /// Clear the selected offer
    ClearOffer,
    /// Empty the cart
    Clear,
    /// Push the cart to the backend
    Sync,
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

    Some(guard)
}

/// Send warnings and errors to Sentry as events; keep info and debug as breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pizzeria_storefront=info,pizzeria_cli=info".into());

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
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::from_config(config);
    state.start().await;

    match cli.command {
        Commands::Login { email, password } => {
            commands::account::login(&state, &email, &password).await?;
        }
        Commands::Logout => commands::account::logout(&state).await,
        Commands::Whoami => commands::account::whoami(&state)?,
        Commands::Rename { name } => commands::account::rename(&state, &name).await?,
        Commands::Offers => commands::cart::offers(&state),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add { id, name, price } => commands::cart::add(&state, id, name, price),
            CartAction::Remove { id } => commands::cart::remove(&state, id),
            CartAction::Offer { id } => commands::cart::select_offer(&state, id)?,
            CartAction::ClearOffer => commands::cart::clear_offer(&state),
            CartAction::Clear => commands::cart::clear(&state),
            CartAction::Sync => commands::cart::sync(&state).await?,
        },
    }

    if state.cart().snapshot().revision() > 0 {
        state.cart().persist_now().await?;
    }
    Ok(())
}
