//! Shop directory CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! shopctl migrate
//!
//! # Create a shop
//! shopctl shop create -e owner@example.com -a "123 Main St" -n "Corner Store"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `shop create` - Create a shop

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shopctl")]
#[command(author, version, about = "Shop directory CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage shops
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
}

#[derive(Subcommand)]
enum ShopAction {
    /// Create a new shop
    Create {
        /// Contact email (must be unique)
        #[arg(short, long)]
        email: String,

        /// Street address (6-128 characters)
        #[arg(short, long)]
        address: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Picture URL
        #[arg(short, long)]
        picture: Option<String>,

        /// Shop role (`user`, `admin`)
        #[arg(short, long, default_value = "user")]
        role: String,

        /// Longitude of the shop location
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,

        /// Latitude of the shop location
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Shop { action } => match action {
            ShopAction::Create {
                email,
                address,
                name,
                picture,
                role,
                lng,
                lat,
            } => {
                commands::shop::create(commands::shop::NewShop {
                    email,
                    address,
                    name,
                    picture,
                    role,
                    loc: lng.zip(lat),
                })
                .await?;
            }
        },
    }
    Ok(())
}
