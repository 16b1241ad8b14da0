//! Cartkeeper CLI - Drive the cart, wishlist and session store from a shell.
//!
//! Each invocation rehydrates the state file, applies one command, and lets
//! the store persist the result.
//!
//! # Usage
//!
//! ```bash
//! # Add two medium black shirts to the cart
//! ck-cli cart add --id p1 --name "Linen Shirt" --price 20 --size M --color '#000' --quantity 2
//!
//! # Overwrite the quantity (0 removes the line)
//! ck-cli cart set --id p1 --size M --color '#000' --quantity 1
//!
//! # Show the cart and its totals
//! ck-cli cart show
//!
//! # Sign in and preview checkout with the first-order discount
//! ck-cli session login --user-id u1 --name Ada --email ada@example.com --token abc
//! ck-cli checkout summary --shipping express --first-order
//! ```
//!
//! # Commands
//!
//! - `cart` - add, set, adjust, remove, clear, show, save-for-later
//! - `wishlist` - add, remove, move-to-cart, show
//! - `session` - login, logout, show
//! - `checkout` - summary, draft, complete
//!
//! # Environment Variables
//!
//! - `CARTKEEPER_STATE_PATH` - State file (overridden by `--state`)
//! - `CARTKEEPER_CURRENCY` - Display currency
//! - `RUST_LOG` - Log filter (default: `warn`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::num::NonZeroU32;
use std::path::PathBuf;

use cartkeeper_core::UserRole;
use cartkeeper_store::{JsonFileStorage, ShippingMethod, StoreConfig, Storefront};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ck-cli")]
#[command(author, version, about = "Cartkeeper storefront state tools")]
struct Cli {
    /// State file to read and update
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Sign in or out
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Preview and complete checkout
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

/// Identity of a line item.
#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Product ID
    #[arg(long)]
    pub id: String,

    /// Size variant
    #[arg(long)]
    pub size: String,

    /// Color variant
    #[arg(long)]
    pub color: String,
}

/// A full line item.
#[derive(Args, Debug, Clone)]
pub struct ItemArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Product display name
    #[arg(long)]
    pub name: String,

    /// Unit price (e.g. 19.99)
    #[arg(long)]
    pub price: Decimal,

    /// Image URL
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add an item, merging with an existing variant
    Add {
        #[command(flatten)]
        item: ItemArgs,

        /// Quantity to add
        #[arg(short, long, default_value = "1")]
        quantity: NonZeroU32,
    },
    /// Overwrite an item's quantity (0 or less removes it)
    Set {
        #[command(flatten)]
        key: KeyArgs,

        #[arg(short, long, allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Step an item's quantity without going below one
    Adjust {
        #[command(flatten)]
        key: KeyArgs,

        #[arg(short, long, allow_hyphen_values = true)]
        delta: i64,
    },
    /// Remove an item
    Remove {
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Copy an item into the wishlist
    SaveForLater {
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Empty the cart
    Clear,
    /// Print the cart
    Show,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Save an item (ignored if already saved)
    Add {
        #[command(flatten)]
        item: ItemArgs,
    },
    /// Remove an item
    Remove {
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Move an item into the cart with quantity one
    MoveToCart {
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Print the wishlist
    Show,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Record a successful sign-in
    Login {
        #[arg(long)]
        user_id: String,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// User role (`user`, `admin`)
        #[arg(short, long, default_value = "user")]
        role: UserRole,

        /// Bearer token issued by the backend
        #[arg(long)]
        token: String,
    },
    /// Forget the signed-in user
    Logout,
    /// Print the session
    Show,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Print subtotal, discount, shipping and grand total
    Summary {
        /// Shipping method (`standard`, `express`, `overnight`)
        #[arg(long, default_value = "standard")]
        shipping: ShippingMethod,

        /// Apply the first-order discount
        #[arg(long)]
        first_order: bool,
    },
    /// Print the order payload for the backend
    Draft {
        #[arg(long, default_value = "standard")]
        shipping: ShippingMethod,

        #[arg(long)]
        first_order: bool,
    },
    /// Clear the cart after the backend confirmed the order
    Complete,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
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
    let mut config = StoreConfig::from_env()?;
    if let Some(path) = cli.state {
        config.state_path = path;
    }

    tracing::debug!(path = %config.state_path.display(), "Opening state file");
    let mut store = Storefront::open(JsonFileStorage::new(&config.state_path), config.currency);

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Add { item, quantity } => commands::cart::add(&mut store, item, quantity)?,
            CartAction::Set { key, quantity } => commands::cart::set(&mut store, &key, quantity),
            CartAction::Adjust { key, delta } => commands::cart::adjust(&mut store, &key, delta),
            CartAction::Remove { key } => commands::cart::remove(&mut store, &key),
            CartAction::SaveForLater { key } => commands::cart::save_for_later(&mut store, &key),
            CartAction::Clear => commands::cart::clear(&mut store),
            CartAction::Show => commands::cart::show(&store),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Add { item } => commands::wishlist::add(&mut store, item)?,
            WishlistAction::Remove { key } => commands::wishlist::remove(&mut store, &key),
            WishlistAction::MoveToCart { key } => {
                commands::wishlist::move_to_cart(&mut store, &key);
            }
            WishlistAction::Show => commands::wishlist::show(&store),
        },
        Commands::Session { action } => match action {
            SessionAction::Login {
                user_id,
                name,
                email,
                role,
                token,
            } => commands::session::login(&mut store, user_id, name, &email, role, token)?,
            SessionAction::Logout => commands::session::logout(&mut store),
            SessionAction::Show => commands::session::show(&store),
        },
        Commands::Checkout { action } => match action {
            CheckoutAction::Summary {
                shipping,
                first_order,
            } => commands::checkout::summary(&store, shipping, first_order),
            CheckoutAction::Draft {
                shipping,
                first_order,
            } => commands::checkout::draft(&store, shipping, first_order)?,
            CheckoutAction::Complete => commands::checkout::complete(&mut store),
        },
    }
    Ok(())
}
