//! CLI commands and argument parsing

use clap::{Parser, Subcommand};

/// Rockflint property marketplace client
#[derive(Parser, Debug)]
#[command(name = "rockflint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Also write logs to a daily file in the state directory
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in (prompts for password and, when required, a one-time code)
    Login {
        /// Account email; defaults to the last one used
        email: Option<String>,

        /// Keep the session and remember the password in the OS keychain
        #[arg(long)]
        remember: bool,
    },

    /// Sign out and forget stored tokens
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Search listings
    Listings {
        /// Free-text search
        search: Option<String>,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,

        #[arg(long)]
        bedrooms: Option<u32>,

        #[arg(long)]
        category: Option<i64>,

        #[arg(long)]
        state: Option<i64>,

        /// Server-side ordering, e.g. `price` or `-created`
        #[arg(long)]
        ordering: Option<String>,

        #[arg(long)]
        page: Option<u32>,
    },

    /// Show one listing with reviews and similar listings
    Listing { id: i64 },

    /// Add or remove a listing from favorites
    Favorite { id: i64 },

    /// Show the signed-in customer's saved listings
    Wishlist,

    /// List public vendor profiles
    Vendors,

    /// Show a vendor's dashboard
    Dashboard { vendor_id: i64 },

    /// List listing categories
    Categories,

    /// Ask the marketplace assistant
    Chat { message: String },
}
