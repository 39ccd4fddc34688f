//! Bazari CLI - the storefront without the screens.
//!
//! # Usage
//!
//! ```bash
//! # Log in with catalog credentials and store the session marker
//! bazari login -u johnd -p 'm38rmF$'
//!
//! # Browse the catalog
//! bazari products list
//! bazari products show 1
//!
//! # Work the cart (loads the local cart, seeds from the remote record
//! # on first run, fetches live prices)
//! bazari cart show
//! bazari cart add 1
//! bazari cart set 1 3
//! bazari cart rm 1
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - session marker management
//! - `products` - read-only catalog browsing
//! - `cart` - cart reconciliation operations

#![cfg_attr(not(test), forbid(unsafe_code))]
// This binary IS the user interface; its output belongs on stdout.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bazari")]
#[command(author, version, about = "Bazari storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with catalog credentials and store the session marker
    Login {
        /// Catalog username
        #[arg(short, long)]
        username: String,

        /// Catalog password
        #[arg(short, long)]
        password: String,
    },
    /// Remove the stored session marker
    Logout,
    /// Show who the stored session belongs to
    Whoami,
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Inspect and mutate the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all catalog products
    List,
    /// Show a single product
    Show {
        /// Product id
        id: i64,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with live prices and the running total
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: i64,
    },
    /// Set the quantity of a line item (clamped to 1..=10)
    Set {
        /// Product id
        id: i64,
        /// Requested quantity
        quantity: i64,
    },
    /// Remove a line item
    Rm {
        /// Product id
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; defaults to info level for our
    // crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazari_storefront=info,bazari_cli=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = bazari_storefront::config::AppConfig::from_env()?;
    let state = bazari_storefront::state::AppState::new(config)?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&state, &username, &password).await?;
        }
        Commands::Logout => commands::auth::logout(&state).await?,
        Commands::Whoami => commands::auth::whoami(&state).await?,
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(&state).await?,
            ProductsAction::Show { id } => commands::products::show(&state, id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state).await?,
            CartAction::Add { id } => commands::cart::add(&state, id).await?,
            CartAction::Set { id, quantity } => commands::cart::set(&state, id, quantity).await?,
            CartAction::Rm { id } => commands::cart::remove(&state, id).await?,
        },
    }

    Ok(())
}
