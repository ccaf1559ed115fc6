//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Storefront - catalog, pricing and back-office API for a streaming device shop
#[derive(Parser)]
#[command(name = "storefront")]
#[command(version)]
#[command(about = "Storefront and back-office API for streaming devices and IPTV plans", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Print an Argon2 hash for `api.admin_password`
    HashPassword {
        /// Plaintext password
        password: String,
    },

    /// Load the demo catalog into an empty database
    Seed,

    /// Print dashboard counters
    Stats,

    /// Price lookups without a database
    Price {
        #[command(subcommand)]
        action: PriceCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum PriceCommands {
    /// IPTV plan price, e.g. `price iptv 1yr 3`
    Iptv {
        /// 1mo, 3mo, 6mo or 1yr
        plan: String,
        /// Simultaneous devices (1-5)
        devices: u32,
    },

    /// Quantity discount, e.g. `price quantity 4999 3`
    Quantity {
        /// Unit price in cents
        base_unit_cents: i64,
        /// Units (1-5)
        quantity: u32,
    },
}
