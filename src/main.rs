use clap::Parser;

mod catalog;
mod cli;
mod commands;
mod domain;
mod services;

use catalog::CatalogError;
use cli::Cli;
use services::cart::CartError;
use services::config::load_config;
use services::output::print_error;
use services::storage::{store_root, FsStore, StorageError};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        print_error(cli.json, error_code(&err), &format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let catalog = catalog::load_catalog(cli.catalog.as_deref())?;
    let config = load_config().unwrap_or_default();
    let mut store = FsStore::open(store_root()?);

    if commands::handle_admin_commands(cli, &catalog, &mut store)? {
        return Ok(());
    }
    commands::handle_shop_commands(cli, &catalog, store, &config)
}

fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<CatalogError>() {
        return match e {
            CatalogError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            CatalogError::DuplicateProduct(_) => "DUPLICATE_PRODUCT",
        };
    }
    if err.downcast_ref::<StorageError>().is_some() {
        return "STORAGE_WRITE";
    }
    if err.downcast_ref::<CartError>().is_some() {
        return "EMPTY_CART";
    }
    "IO"
}
