//! Pineapple Cart CLI - drive the storefront cart from a terminal.
//!
//! Every invocation is one page load: the cart is restored from the data
//! directory, the command is applied, and the result is saved back.
//!
//! # Usage
//!
//! ```bash
//! # List products
//! cart-cli catalog
//!
//! # Add two tees and a tote
//! cart-cli add 1 1 2
//!
//! # Remove a line
//! cart-cli remove 2
//!
//! # Show the cart sidebar
//! cart-cli show
//!
//! # Review the order summary, then confirm it
//! cart-cli checkout
//! cart-cli checkout --confirm
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use pineapple_cart_core::ProductId;
use pineapple_cart_storefront::config::CartConfig;
use pineapple_cart_storefront::error::AppError;
use pineapple_cart_storefront::telemetry;

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Pineapple Cart storefront cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the products that can be added
    Catalog,
    /// Add one unit of each product id, in order
    Add {
        /// Product ids
        #[arg(required = true)]
        ids: Vec<ProductId>,
    },
    /// Remove a product's line from the cart
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Show the cart sidebar
    Show,
    /// Show the order summary, or place the order with --confirm
    Checkout {
        /// Place the order
        #[arg(long)]
        confirm: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            telemetry::init_tracing("pineapple_cart_storefront=info,cart_cli=info");
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry before tracing so the tracing layer has a client
    let _sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing("pineapple_cart_storefront=info,cart_cli=info");

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CartConfig) -> Result<(), AppError> {
    match cli.command {
        Commands::Catalog => commands::catalog(config)?,
        Commands::Add { ids } => commands::add(config, &ids)?,
        Commands::Remove { id } => commands::remove(config, id)?,
        Commands::Show => commands::show(config)?,
        Commands::Checkout { confirm } => commands::checkout(config, confirm).await?,
    }
    Ok(())
}
