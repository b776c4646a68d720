//! Naked Pineapple Cart CLI - Inspect and drive carts outside the browser.
//!
//! Runs the same cart engine the storefront embeds, against a JSON file that
//! stands in for `localStorage`. Useful for reproducing customer cart issues
//! and for exercising the guest/customer merge by hand.
//!
//! # Usage
//!
//! ```bash
//! # Add a product as a guest
//! np-cart add soap --name "Pineapple Soap" --price 12.50
//!
//! # Change quantity, then show the cart
//! np-cart qty soap 3
//! np-cart show
//!
//! # Sign in (merges the guest cart into the customer's cart)
//! np-cart sign-in --token "$JWT"
//!
//! # Back to the guest cart
//! np-cart sign-out
//! ```
//!
//! # Environment Variables
//!
//! - `CART_STORAGE_PATH` - Storage file (default: `.np-cart.json`, overridden by `--storage`)
//! - `RUST_LOG` - Log filter (default: `naked_pineapple_cart=info,naked_pineapple_cli=info`)
//! - `CART_*` - Cart configuration, see `naked_pineapple_cart::config`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// Storage file used when neither `--storage` nor `CART_STORAGE_PATH` is set.
const DEFAULT_STORAGE_PATH: &str = ".np-cart.json";

#[derive(Parser)]
#[command(name = "np-cart")]
#[command(author, version, about = "Naked Pineapple cart harness")]
struct Cli {
    /// Storage file standing in for browser localStorage
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Print the cart as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: String,

        /// Product name
        #[arg(short, long)]
        name: String,

        /// Unit price (e.g. 12.50)
        #[arg(short, long)]
        price: String,

        /// Product image URL
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Remove a product's line
    Remove {
        /// Product ID
        id: String,
    },
    /// Set a line's quantity (clamped to 1-99)
    Qty {
        /// Product ID
        id: String,

        /// New quantity
        qty: f64,
    },
    /// Empty the cart
    Clear,
    /// Sign in with a bearer token, merging the guest cart
    SignIn {
        /// JWT issued by the auth backend
        #[arg(long)]
        token: String,
    },
    /// Sign out and switch to the guest cart
    SignOut,
}

fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "naked_pineapple_cart=info,naked_pineapple_cli=info".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let storage = cli
        .storage
        .or_else(|| std::env::var_os("CART_STORAGE_PATH").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH));

    let session = commands::cart::CartSession::open(storage)?;

    match cli.command {
        Commands::Show => {}
        Commands::Add {
            id,
            name,
            price,
            image_url,
        } => session.add(&id, &name, &price, image_url)?,
        Commands::Remove { id } => session.remove(&id),
        Commands::Qty { id, qty } => session.set_qty(&id, qty),
        Commands::Clear => session.clear(),
        Commands::SignIn { token } => session.sign_in(&token)?,
        Commands::SignOut => session.sign_out()?,
    }

    commands::cart::render(&session.view(), session.identity().as_ref(), cli.json)?;
    Ok(())
}
