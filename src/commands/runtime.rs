use crate::catalog::Catalog;
use crate::cli::{CartCommands, Cli, Commands, FavCommands, FilterCommands};
use crate::domain::constants::KEY_FILTERS;
use crate::domain::models::{CartView, FilterReport, FilterState, JsonOut, TraceEvent};
use crate::services::cart::{CartEngine, QuantityOutcome};
use crate::services::config::AppConfig;
use crate::services::events;
use crate::services::favorites::{self, FavoriteToggle};
use crate::services::filter;
use crate::services::notify::{ConsoleNotifier, Notifier, Severity};
use crate::services::output::{print_one, print_out};
use crate::services::storage::{log_event, FsStore, StorageError, Store};

pub fn handle_shop_commands(
    cli: &Cli,
    catalog: &Catalog,
    mut store: FsStore,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let log_root = store.root().to_path_buf();
    let mut notifier = ConsoleNotifier;

    match &cli.command {
        Commands::Cart { command } => {
            let mut cart = CartEngine::load(store);
            match command {
                CartCommands::Add { id, show_cart } => {
                    let added = cart.add_item(id, catalog).map(|i| i.clone());
                    let added = warn_on_write_failure(added, &mut notifier)?;
                    let name = added
                        .as_ref()
                        .map(|i| i.name.clone())
                        .unwrap_or_else(|| id.clone());
                    notifier.notify(&format!("\"{}\" added to cart", name), Severity::Success);
                    log_event(&log_root, "cart_add", serde_json::json!({ "product": id }));
                    if *show_cart || config.ui.show_cart_after_add {
                        print_cart_view(cli.json, cart.view())?;
                    } else if let Some(item) = added {
                        print_one(cli.json, item, |i| {
                            format!("added {} x{}", i.name, i.quantity)
                        })?;
                    } else {
                        print_cart_view(cli.json, cart.view())?;
                    }
                }
                CartCommands::Remove { id } => {
                    let removed = warn_on_write_failure(cart.remove_item(id), &mut notifier)?;
                    if removed.unwrap_or(true) {
                        notifier.notify("Product removed from cart", Severity::Info);
                        log_event(&log_root, "cart_remove", serde_json::json!({ "product": id }));
                    }
                    print_cart_view(cli.json, cart.view())?;
                }
                CartCommands::Qty { id, delta } => {
                    let outcome =
                        warn_on_write_failure(cart.change_quantity(id, *delta), &mut notifier)?;
                    match outcome {
                        Some(QuantityOutcome::Removed) => {
                            notifier.notify("Product removed from cart", Severity::Info);
                        }
                        Some(QuantityOutcome::Absent) => {
                            notifier.notify("Product is not in the cart", Severity::Info);
                        }
                        _ => {}
                    }
                    log_event(
                        &log_root,
                        "cart_qty",
                        serde_json::json!({ "product": id, "delta": delta }),
                    );
                    print_cart_view(cli.json, cart.view())?;
                }
                CartCommands::Show => {
                    if let Some(last) = cart.take_last_added() {
                        notifier.notify(
                            &format!("\"{}\" was added to your cart", last.name),
                            Severity::Info,
                        );
                    }
                    print_cart_view(cli.json, cart.view())?;
                }
                CartCommands::Count => {
                    print_one(cli.json, cart.item_count(), |n| format!("{} items", n))?;
                }
                CartCommands::Clear => {
                    warn_on_write_failure(cart.clear(), &mut notifier)?;
                    log_event(&log_root, "cart_clear", serde_json::json!({}));
                    print_one(cli.json, "cleared", |_| "cart cleared".to_string())?;
                }
                CartCommands::Checkout => {
                    let report = cart.checkout()?;
                    notifier.notify(
                        &format!("Order placed! Total: {}", report.order_total),
                        Severity::Success,
                    );
                    log_event(
                        &log_root,
                        "checkout",
                        serde_json::json!({ "total": report.order_total }),
                    );
                    print_one(cli.json, report, |r| {
                        format!("order placed, total {}", r.order_total)
                    })?;
                }
            }
        }
        Commands::Fav { command } => match command {
            FavCommands::Toggle { id } => {
                let outcome = favorites::toggle(&mut store, catalog, id)?;
                log_event(&log_root, "fav_toggle", serde_json::json!({ "product": id }));
                match outcome {
                    FavoriteToggle::Added(item) => {
                        notifier.notify(
                            &format!("\"{}\" added to favorites", item.name),
                            Severity::Success,
                        );
                        print_one(
                            cli.json,
                            serde_json::json!({ "status": "added", "item": item }),
                            |_| "added".to_string(),
                        )?;
                    }
                    FavoriteToggle::Removed(name) => {
                        notifier.notify(
                            &format!("\"{}\" removed from favorites", name),
                            Severity::Info,
                        );
                        print_one(
                            cli.json,
                            serde_json::json!({ "status": "removed", "name": name }),
                            |_| "removed".to_string(),
                        )?;
                    }
                }
            }
            FavCommands::List => {
                print_out(cli.json, &favorites::list(&store), |f| {
                    format!("{}\t{}\t{}", f.product_id, f.name, f.price)
                })?;
            }
        },
        Commands::Filter { command } => match command {
            FilterCommands::Apply {
                seasons,
                types,
                brands,
                sizes,
                price_min,
                price_max,
            } => {
                let mut state = stored_or_default_state(&store, config);
                if !seasons.is_empty() {
                    state.seasons = seasons.clone();
                }
                if !types.is_empty() {
                    state.types = types.clone();
                }
                if !brands.is_empty() {
                    state.brands = brands.clone();
                }
                if !sizes.is_empty() {
                    state.sizes = sizes.clone();
                }
                if let Some(min) = price_min {
                    state.price_min = *min;
                }
                if let Some(max) = price_max {
                    state.price_max = *max;
                }
                let state = state.normalized();
                warn_on_write_failure(
                    filter::save_state(&mut store, &state).map_err(Into::into),
                    &mut notifier,
                )?;
                log_event(&log_root, "filter_apply", serde_json::json!({}));
                let report = filter_report(catalog, state);
                notifier.notify(
                    &format!("Found {} products", report.count),
                    Severity::Info,
                );
                print_filter_report(cli.json, report)?;
            }
            FilterCommands::Reset => {
                let state = FilterState {
                    price_max: config.filter.default_price_max,
                    ..Default::default()
                };
                warn_on_write_failure(
                    filter::save_state(&mut store, &state).map_err(Into::into),
                    &mut notifier,
                )?;
                notifier.notify("Filters reset", Severity::Info);
                log_event(&log_root, "filter_reset", serde_json::json!({}));
                print_filter_report(cli.json, filter_report(catalog, state))?;
            }
            FilterCommands::Show => {
                let state = stored_or_default_state(&store, config);
                print_filter_report(cli.json, filter_report(catalog, state))?;
            }
        },
        Commands::Replay { trace } => {
            let raw = std::fs::read_to_string(trace)?;
            let trace_events: Vec<TraceEvent> = serde_json::from_str(&raw)?;
            let mut cart = CartEngine::load(store);
            let report = events::replay(&mut cart, catalog, trace_events);
            log_event(
                &log_root,
                "replay",
                serde_json::json!({ "applied": report.applied, "failed": report.failed }),
            );
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
                    "applied: {}  ignored: {}  throttled: {}  failed: {}",
                    report.applied, report.ignored, report.throttled, report.failed
                );
                for n in &report.notifications {
                    println!("[{}] {}", n.severity, n.message);
                }
            }
        }
        Commands::Catalog { .. }
        | Commands::Prefs { .. }
        | Commands::Doctor
        | Commands::Cache { .. } => {
            unreachable!("handled by the admin command tree")
        }
    }

    Ok(())
}

/// Storage write failures are non-fatal: warn, keep the in-memory state
/// authoritative, and let the command finish.
fn warn_on_write_failure<T>(
    result: anyhow::Result<T>,
    notifier: &mut dyn Notifier,
) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(err) if err.downcast_ref::<StorageError>().is_some() => {
            notifier.notify(
                &format!("state kept in memory only: {}", err),
                Severity::Warning,
            );
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn stored_or_default_state(store: &FsStore, config: &AppConfig) -> FilterState {
    if store.load_raw(KEY_FILTERS).is_none() {
        return FilterState {
            price_max: config.filter.default_price_max,
            ..Default::default()
        };
    }
    filter::load_state(store)
}

fn filter_report(catalog: &Catalog, state: FilterState) -> FilterReport {
    let mask = filter::select_visible(&filter::cards_for(catalog), &state);
    let visible: Vec<String> = catalog
        .products
        .iter()
        .zip(&mask)
        .filter(|(_, keep)| **keep)
        .map(|(p, _)| p.id.clone())
        .collect();
    FilterReport {
        count: visible.len(),
        state,
        visible,
    }
}

fn print_filter_report(json: bool, report: FilterReport) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: report
            })?
        );
    } else {
        println!("visible: {}", report.visible.join(", "));
        println!("count: {}", report.count);
    }
    Ok(())
}

fn print_cart_view(json: bool, view: CartView) -> anyhow::Result<()> {
    if json {
        print_one(true, view, |_| String::new())
    } else {
        if view.items.is_empty() {
            println!("cart is empty");
        }
        for i in &view.items {
            println!(
                "{}\t{} x{}\t{}",
                i.product_id,
                i.name,
                i.quantity,
                i.price * i.quantity
            );
        }
        println!("total: {}", view.total);
        Ok(())
    }
}
