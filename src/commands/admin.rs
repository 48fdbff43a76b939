use crate::catalog::{self, Catalog};
use crate::cli::{CacheCommands, CatalogCommands, Cli, Commands, PrefsCommands, Toggle, ViewMode};
use crate::domain::constants::{CACHE_NAME, KEY_DARK_MODE, KEY_VIEW_MODE, PRECACHE_ASSETS};
use crate::domain::models::{CacheManifest, CheckItem, DoctorReport, JsonOut, PrefsReport};
use crate::services::config::load_config;
use crate::services::output::{print_one, print_out};
use crate::services::storage::{FsStore, Store};

/// Handles everything that does not touch the cart engine. Returns false
/// when the command belongs to the shop handlers.
pub fn handle_admin_commands(
    cli: &Cli,
    catalog: &Catalog,
    store: &mut FsStore,
) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Catalog { command } => match command {
            CatalogCommands::List { query } => {
                let items: Vec<_> = catalog::search(catalog, query.as_deref())
                    .into_iter()
                    .cloned()
                    .collect();
                print_out(cli.json, &items, |p| {
                    format!("{}\t{}\t{}\t{}", p.id, p.name, p.price, p.size)
                })?;
            }
            CatalogCommands::Show { id } => {
                let p = catalog::lookup(catalog, id)?;
                if cli.json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&JsonOut { ok: true, data: p })?
                    );
                } else {
                    println!("id: {}", p.id);
                    println!("name: {}", p.name);
                    println!("price: {}", p.price);
                    println!("size: {}", p.size);
                    if !p.categories.is_empty() {
                        println!("categories: {}", p.categories.join(", "));
                    }
                }
            }
            CatalogCommands::Validate => {
                catalog::validate(catalog)?;
                print_one(cli.json, "valid", |_| "catalog valid".to_string())?;
            }
        },
        Commands::Prefs { command } => match command {
            PrefsCommands::View { mode } => {
                store.save(KEY_VIEW_MODE, mode)?;
                print_one(cli.json, *mode, |m| {
                    format!("view mode: {}", format!("{:?}", m).to_lowercase())
                })?;
            }
            PrefsCommands::Dark { flag } => {
                let enabled = matches!(flag, Toggle::On);
                store.save(KEY_DARK_MODE, &enabled)?;
                print_one(cli.json, enabled, |on| {
                    format!("dark mode: {}", if *on { "on" } else { "off" })
                })?;
            }
            PrefsCommands::Show => {
                let report = PrefsReport {
                    view_mode: store.load(KEY_VIEW_MODE, ViewMode::Grid),
                    dark_mode: store.load(KEY_DARK_MODE, false),
                };
                if cli.json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&JsonOut {
                            ok: true,
                            data: report
                        })?
                    );
                } else {
                    println!(
                        "view mode: {}",
                        format!("{:?}", report.view_mode).to_lowercase()
                    );
                    println!("dark mode: {}", if report.dark_mode { "on" } else { "off" });
                }
            }
        },
        Commands::Doctor => {
            let report = run_doctor(catalog, store);
            let failed = report.overall == "failed";
            print_one(cli.json, report, |r| format!("doctor: {}", r.overall))?;
            if failed {
                std::process::exit(1);
            }
        }
        Commands::Cache { command } => match command {
            CacheCommands::Manifest => {
                let manifest = CacheManifest {
                    name: CACHE_NAME.to_string(),
                    assets: PRECACHE_ASSETS.iter().map(|a| a.to_string()).collect(),
                };
                if cli.json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&JsonOut {
                            ok: true,
                            data: manifest
                        })?
                    );
                } else {
                    println!("cache: {}", manifest.name);
                    for asset in &manifest.assets {
                        println!("{}", asset);
                    }
                }
            }
        },
        _ => return Ok(false),
    }

    Ok(true)
}

fn run_doctor(catalog: &Catalog, store: &mut FsStore) -> DoctorReport {
    let mut checks = Vec::new();

    let probe = store
        .save_raw("doctor_probe", "{}".to_string())
        .map(|_| store.remove("doctor_probe"));
    checks.push(CheckItem {
        name: "store_writable".to_string(),
        status: if probe.is_ok() { "ok" } else { "failed" }.to_string(),
    });

    checks.push(CheckItem {
        name: "catalog".to_string(),
        status: if catalog::validate(catalog).is_ok() {
            "ok"
        } else {
            "failed"
        }
        .to_string(),
    });

    checks.push(CheckItem {
        name: "config".to_string(),
        status: if load_config().is_ok() { "ok" } else { "failed" }.to_string(),
    });

    let overall = if checks.iter().all(|c| c.status == "ok") {
        "ok"
    } else {
        "failed"
    };
    DoctorReport {
        overall: overall.to_string(),
        checks,
    }
}
