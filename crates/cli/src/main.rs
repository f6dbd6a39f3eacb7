//! SimpleMART CLI - browse the catalog, manage the cart, and check out.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password from --password or SIMPLEMART_PASSWORD)
//! simplemart login mor_2314 --password 83r5^_
//!
//! # Browse
//! simplemart products list --category electronics --search drive
//! simplemart products show 9
//!
//! # Cart
//! simplemart cart add 9
//! simplemart cart set 9 3
//! simplemart cart show
//!
//! # Account profile (requires login)
//! simplemart profile
//!
//! # Pay, then feed the redirect route back in
//! simplemart checkout buyer@example.com
//! simplemart checkout complete /payment-success
//! ```
//!
//! Session state (token and cart) persists in `SIMPLEMART_STATE_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]
// Command output is the product of this binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use simplemart_core::{DEFAULT_PROFILE_ID, ProductId};
use simplemart_storefront::config::StorefrontConfig;
use simplemart_storefront::error::AppError;
use simplemart_storefront::state::AppState;
use simplemart_storefront::store::{FileStorage, SessionStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "simplemart")]
#[command(author, version, about = "SimpleMART storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        username: String,

        /// Account password
        #[arg(short, long, env = "SIMPLEMART_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and empty the cart
    Logout,
    /// Show the session status
    Whoami,
    /// Show the account profile
    Profile {
        /// User id to look up
        #[arg(long, default_value_t = DEFAULT_PROFILE_ID)]
        id: i64,
    },
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Pay for the cart
    #[command(args_conflicts_with_subcommands = true)]
    Checkout {
        /// Payer email address
        email: Option<String>,

        #[command(subcommand)]
        action: Option<CheckoutAction>,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products from the feed
    List {
        /// Category to show (`all` for every category)
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Only show products whose title contains this text
        #[arg(short, long, default_value = "")]
        search: String,

        /// Products per page (defaults to SIMPLEMART_PAGE_SIZE)
        #[arg(short, long)]
        limit: Option<usize>,

        /// How many pages to load
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Show one product
    Show { id: ProductId },
    /// List category names
    Categories,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add { id: ProductId },
    /// Set the quantity of a line (0 removes it)
    Set { id: ProductId, quantity: u32 },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Apply the route the payment page redirected to
    Complete { route: String },
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
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr; stdout carries command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "simplemart_storefront=info,simplemart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report();
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), AppError> {
    let mut store = SessionStore::hydrate(FileStorage::new(&config.state_dir));
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::session::login(&state, &mut store, &username, password).await?;
        }
        Commands::Logout => commands::session::logout(&mut store)?,
        Commands::Whoami => commands::session::whoami(&store),
        Commands::Profile { id } => {
            commands::require_login(&store)?;
            commands::profile::show(&state, id).await?;
        }
        Commands::Products { action } => match action {
            ProductsAction::List {
                category,
                search,
                limit,
                pages,
            } => {
                let limit = limit.unwrap_or(state.config().page_size);
                commands::products::list(&state, &mut store, category, search, limit, pages)
                    .await?;
            }
            ProductsAction::Show { id } => commands::products::show(&state, id).await?,
            ProductsAction::Categories => commands::products::categories(&state).await?,
        },
        Commands::Cart { action } => {
            commands::require_login(&store)?;
            match action {
                CartAction::Show => commands::cart::show(&store),
                CartAction::Add { id } => commands::cart::add(&state, &mut store, id).await?,
                CartAction::Set { id, quantity } => commands::cart::set(&mut store, id, quantity)?,
                CartAction::Clear => commands::cart::clear(&mut store)?,
            }
        }
        Commands::Checkout { email, action } => {
            commands::require_login(&store)?;
            match (action, email) {
                (Some(CheckoutAction::Complete { route }), _) => {
                    commands::checkout::complete(&mut store, &route)?;
                }
                (None, Some(email)) => commands::checkout::start(&state, &store, &email).await?,
                (None, None) => {
                    return Err(AppError::BadRequest(
                        "Usage: simplemart checkout <EMAIL>".to_string(),
                    ));
                }
            }
        }
    }
    Ok(())
}
