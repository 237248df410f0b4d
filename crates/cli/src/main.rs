//! LocalCart CLI - shop from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (tokens persist when LOCALCART_TOKEN_FILE is set)
//! localcart login -e you@example.com -p secret
//!
//! # Browse the catalog
//! localcart products list --page 1 --limit 12
//! localcart products search "coffee mug" --category c1
//!
//! # Manage the cart and check out
//! localcart cart add <product-id> -q 2
//! localcart cart checkout
//!
//! # Order history
//! localcart orders list
//! localcart orders cancel <order-id> --reason "Changed my mind"
//! ```
//!
//! # Environment Variables
//!
//! - `LOCALCART_API_URL` - API base URL (default `http://localhost:8080/api/v1`)
//! - `LOCALCART_TOKEN_FILE` - Path for persisted auth tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "localcart")]
#[command(author, version, about = "LocalCart command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Register a new account
    Register {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Given name
        #[arg(long)]
        first_name: String,

        /// Family name
        #[arg(long)]
        last_name: String,
    },
    /// Log out and discard persisted tokens
    Logout,
    /// Show the currently authenticated user
    Whoami,
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// List all categories
    Categories,
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// View and manage orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products, paginated
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Items per page
        #[arg(long, default_value_t = 12)]
        limit: u32,
    },
    /// Show one product by its URL slug
    Show {
        /// Product slug
        slug: String,
    },
    /// Search products by free text
    Search {
        /// Search query
        query: String,

        /// Restrict to a category ID
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the current cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        product_id: String,

        /// Quantity to add (must be at least 1)
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Change a cart line's quantity
    Update {
        /// Cart item ID
        item_id: String,

        /// New quantity
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a line from the cart
    Remove {
        /// Cart item ID
        item_id: String,
    },
    /// Empty the cart
    Clear,
    /// Convert the cart into an order
    Checkout,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List past orders, paginated
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Items per page
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Show one order
    Show {
        /// Order ID
        id: String,
    },
    /// Request cancellation of an order
    Cancel {
        /// Order ID
        id: String,

        /// Reason passed to the server
        #[arg(long, default_value = "Cancelled by customer")]
        reason: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&email, &password).await?;
        }
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            commands::auth::register(&email, &password, &first_name, &last_name).await?;
        }
        Commands::Logout => commands::auth::logout()?,
        Commands::Whoami => commands::auth::whoami().await?,
        Commands::Products { action } => match action {
            ProductsAction::List { page, limit } => {
                commands::catalog::list_products(page, limit).await?;
            }
            ProductsAction::Show { slug } => commands::catalog::show_product(&slug).await?,
            ProductsAction::Search { query, category } => {
                commands::catalog::search_products(&query, category.as_deref()).await?;
            }
        },
        Commands::Categories => commands::catalog::list_categories().await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show().await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&product_id, quantity).await?,
            CartAction::Update { item_id, quantity } => {
                commands::cart::update(&item_id, quantity).await?;
            }
            CartAction::Remove { item_id } => commands::cart::remove(&item_id).await?,
            CartAction::Clear => commands::cart::clear().await?,
            CartAction::Checkout => commands::cart::checkout().await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List { page, limit } => {
                commands::orders::list(page, limit).await?;
            }
            OrdersAction::Show { id } => commands::orders::show(&id).await?,
            OrdersAction::Cancel { id, reason } => {
                commands::orders::cancel(&id, &reason).await?;
            }
        },
    }
    Ok(())
}
