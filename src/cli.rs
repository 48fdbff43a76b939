use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "treadmark", version, about = "Treadmark storefront session CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Catalog JSON file (defaults to the built-in catalog)"
    )]
    pub catalog: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse and validate the product catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Toggle and list favorite products
    Fav {
        #[command(subcommand)]
        command: FavCommands,
    },
    /// Narrow the product listing
    Filter {
        #[command(subcommand)]
        command: FilterCommands,
    },
    /// View-mode and dark-mode preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
    /// Replay a recorded interaction trace (JSON event list)
    Replay { trace: PathBuf },
    /// Check the session store, catalog and configuration
    Doctor,
    /// Offline cache inspection
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    List { query: Option<String> },
    Show { id: String },
    Validate,
}

#[derive(Subcommand, Debug)]
pub enum CartCommands {
    Add {
        id: String,
        #[arg(long, default_value_t = false)]
        show_cart: bool,
    },
    Remove {
        id: String,
    },
    Qty {
        id: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    Show,
    Count,
    Clear,
    Checkout,
}

#[derive(Subcommand, Debug)]
pub enum FavCommands {
    Toggle { id: String },
    List,
}

#[derive(Subcommand, Debug)]
pub enum FilterCommands {
    /// Set the given dimensions and re-run the filter pass
    Apply {
        #[arg(long = "season")]
        seasons: Vec<String>,
        #[arg(long = "type")]
        types: Vec<String>,
        #[arg(long = "brand")]
        brands: Vec<String>,
        #[arg(long = "size")]
        sizes: Vec<String>,
        #[arg(long)]
        price_min: Option<u64>,
        #[arg(long)]
        price_max: Option<u64>,
    },
    Reset,
    Show,
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommands {
    View {
        #[arg(value_enum)]
        mode: ViewMode,
    },
    Dark {
        #[arg(value_enum)]
        flag: Toggle,
    },
    Show,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    Manifest,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Grid,
    List,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}
