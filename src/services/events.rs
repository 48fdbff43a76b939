use crate::catalog::{parse_price_text, Catalog};
use crate::cli::ViewMode;
use crate::domain::constants::{CLICK_THROTTLE_MS, KEY_VIEW_MODE, PRICE_DEBOUNCE_MS};
use crate::domain::models::{Notification, ReplayReport, TraceEvent};
use crate::services::cart::CartEngine;
use crate::services::favorites::{self, FavoriteToggle};
use crate::services::filter;
use crate::services::notify::{MemoryNotifier, Notifier, Severity};
use crate::services::storage::{StorageError, Store};

/// The closed set of user actions the storefront reacts to. Everything the
/// page can do funnels through here; raw attribute parsing happens in
/// `parse_event` and nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddToCart { product_id: String },
    RemoveFromCart { product_id: String },
    IncreaseQuantity { product_id: String },
    DecreaseQuantity { product_id: String },
    ToggleFavorite { product_id: String },
    ToggleFilter { dimension: FilterDimension, value: String },
    PriceInput { min: Option<u64>, max: Option<u64> },
    ApplyFilter,
    ResetFilter,
    SetViewMode(ViewMode),
    Checkout,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterDimension {
    Season,
    Type,
    Brand,
    Size,
}

impl FilterDimension {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "season" => Some(Self::Season),
            "type" => Some(Self::Type),
            "brand" => Some(Self::Brand),
            "size" => Some(Self::Size),
            _ => None,
        }
    }
}

/// Maps a recorded event (action token plus data attributes) onto an
/// `Action`. Unknown tokens and events missing their required attributes
/// yield `None` and are skipped, like a click that matched no delegate.
pub fn parse_event(ev: &TraceEvent) -> Option<Action> {
    let product_id = || ev.data.get("product-id").cloned();
    match ev.action.as_str() {
        "add-to-cart" => Some(Action::AddToCart {
            product_id: product_id()?,
        }),
        "remove-from-cart" => Some(Action::RemoveFromCart {
            product_id: product_id()?,
        }),
        "quantity-plus" => Some(Action::IncreaseQuantity {
            product_id: product_id()?,
        }),
        "quantity-minus" => Some(Action::DecreaseQuantity {
            product_id: product_id()?,
        }),
        "toggle-favorite" => Some(Action::ToggleFavorite {
            product_id: product_id()?,
        }),
        "filter-toggle" => Some(Action::ToggleFilter {
            dimension: FilterDimension::parse(ev.data.get("dimension")?)?,
            value: ev.data.get("value")?.clone(),
        }),
        "price-input" => {
            let min = ev.data.get("min").map(|v| parse_price_text(v));
            let max = ev.data.get("max").map(|v| parse_price_text(v));
            if min.is_none() && max.is_none() {
                return None;
            }
            Some(Action::PriceInput { min, max })
        }
        "apply-filters" => Some(Action::ApplyFilter),
        "reset-filters" => Some(Action::ResetFilter),
        "set-view" => match ev.data.get("mode").map(String::as_str) {
            Some("grid") => Some(Action::SetViewMode(ViewMode::Grid)),
            Some("list") => Some(Action::SetViewMode(ViewMode::List)),
            _ => None,
        },
        "checkout" => Some(Action::Checkout),
        _ => None,
    }
}

/// Trailing-edge debounce over trace timestamps. A new touch supersedes the
/// pending deadline; there is no cancellation beyond that.
pub struct Debouncer {
    delay_ms: u64,
    armed_at: Option<u64>,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            armed_at: None,
        }
    }

    pub fn touch(&mut self, at_ms: u64) {
        self.armed_at = Some(at_ms);
    }

    /// True when the quiet period has elapsed by `now_ms`; disarms on fire.
    pub fn fires_before(&mut self, now_ms: u64) -> bool {
        match self.armed_at {
            Some(at) if now_ms >= at + self.delay_ms => {
                self.armed_at = None;
                true
            }
            _ => false,
        }
    }

    /// Fires whatever is still pending at end of input.
    pub fn flush(&mut self) -> bool {
        self.armed_at.take().is_some()
    }
}

/// Leading-edge throttle: the first event in a window passes, the rest of the
/// window is swallowed.
pub struct Throttle {
    window_ms: u64,
    last_fire: Option<u64>,
}

impl Throttle {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_fire: None,
        }
    }

    pub fn allow(&mut self, at_ms: u64) -> bool {
        match self.last_fire {
            Some(last) if at_ms < last + self.window_ms => false,
            _ => {
                self.last_fire = Some(at_ms);
                true
            }
        }
    }
}

#[derive(Default)]
struct PendingPrice {
    min: Option<u64>,
    max: Option<u64>,
}

/// Replays a recorded interaction trace through the typed action handler.
/// Product-card clicks are throttled, price input is debounced into a single
/// filter pass, and every error stays local to its event: an unknown product
/// notifies and moves on, a storage write failure downgrades to a warning.
pub fn replay<S: Store>(
    cart: &mut CartEngine<S>,
    catalog: &Catalog,
    mut events: Vec<TraceEvent>,
) -> ReplayReport {
    events.sort_by_key(|e| e.at_ms);

    let mut report = ReplayReport::default();
    let mut notifier = MemoryNotifier::default();
    let mut debounce = Debouncer::new(PRICE_DEBOUNCE_MS);
    let mut throttle = Throttle::new(CLICK_THROTTLE_MS);
    let mut pending = PendingPrice::default();

    for ev in &events {
        if debounce.fires_before(ev.at_ms) {
            apply_pending_price(cart, catalog, &mut pending, &mut notifier, &mut report);
        }

        let Some(action) = parse_event(ev) else {
            report.ignored += 1;
            continue;
        };

        match action {
            Action::PriceInput { min, max } => {
                if min.is_some() {
                    pending.min = min;
                }
                if max.is_some() {
                    pending.max = max;
                }
                debounce.touch(ev.at_ms);
            }
            Action::AddToCart { .. } | Action::ToggleFavorite { .. }
                if !throttle.allow(ev.at_ms) =>
            {
                report.throttled += 1;
            }
            other => dispatch(other, cart, catalog, &mut notifier, &mut report),
        }
    }

    if debounce.flush() {
        apply_pending_price(cart, catalog, &mut pending, &mut notifier, &mut report);
    }

    report.notifications = notifier
        .messages
        .into_iter()
        .map(|(severity, message)| Notification { severity, message })
        .collect();
    report
}

/// The single typed handler behind every replayed action.
fn dispatch<S: Store>(
    action: Action,
    cart: &mut CartEngine<S>,
    catalog: &Catalog,
    notifier: &mut dyn Notifier,
    report: &mut ReplayReport,
) {
    let result: anyhow::Result<()> = (|| {
        match action {
            Action::AddToCart { product_id } => {
                let item = cart.add_item(&product_id, catalog)?;
                notifier.notify(
                    &format!("\"{}\" added to cart", item.name),
                    Severity::Success,
                );
            }
            Action::RemoveFromCart { product_id } => {
                if cart.remove_item(&product_id)? {
                    notifier.notify("Product removed from cart", Severity::Info);
                }
            }
            Action::IncreaseQuantity { product_id } => {
                cart.change_quantity(&product_id, 1)?;
            }
            Action::DecreaseQuantity { product_id } => {
                cart.change_quantity(&product_id, -1)?;
            }
            Action::ToggleFavorite { product_id } => {
                match favorites::toggle(cart.store_mut(), catalog, &product_id)? {
                    FavoriteToggle::Added(item) => notifier.notify(
                        &format!("\"{}\" added to favorites", item.name),
                        Severity::Success,
                    ),
                    FavoriteToggle::Removed(name) => notifier.notify(
                        &format!("\"{}\" removed from favorites", name),
                        Severity::Info,
                    ),
                }
            }
            Action::ToggleFilter { dimension, value } => {
                let mut state = filter::load_state(cart.store_mut());
                let values = match dimension {
                    FilterDimension::Season => &mut state.seasons,
                    FilterDimension::Type => &mut state.types,
                    FilterDimension::Brand => &mut state.brands,
                    FilterDimension::Size => &mut state.sizes,
                };
                match values.iter().position(|v| v == &value) {
                    Some(idx) => {
                        values.remove(idx);
                    }
                    None => values.push(value),
                }
                filter::save_state(cart.store_mut(), &state)?;
                run_filter_pass(cart, catalog, notifier);
            }
            Action::PriceInput { .. } => {
                // Debounced in the replay loop; never reaches the handler.
            }
            Action::ApplyFilter => {
                run_filter_pass(cart, catalog, notifier);
            }
            Action::ResetFilter => {
                filter::save_state(cart.store_mut(), &Default::default())?;
                notifier.notify("Filters reset", Severity::Info);
                run_filter_pass(cart, catalog, notifier);
            }
            Action::SetViewMode(mode) => {
                cart.store_mut().save(KEY_VIEW_MODE, &mode)?;
            }
            Action::Checkout => {
                if cart.items().is_empty() {
                    notifier.notify("Cart is empty", Severity::Info);
                } else {
                    let r = cart.checkout()?;
                    notifier.notify(
                        &format!("Order placed, total: {}", r.order_total),
                        Severity::Success,
                    );
                }
            }
        }
        Ok(())
    })();

    match result {
        Ok(()) => report.applied += 1,
        Err(err) => {
            report.failed += 1;
            let severity = if err.downcast_ref::<StorageError>().is_some() {
                Severity::Warning
            } else {
                Severity::Error
            };
            notifier.notify(&err.to_string(), severity);
        }
    }
}

fn apply_pending_price<S: Store>(
    cart: &mut CartEngine<S>,
    catalog: &Catalog,
    pending: &mut PendingPrice,
    notifier: &mut dyn Notifier,
    report: &mut ReplayReport,
) {
    let mut state = filter::load_state(cart.store_mut());
    if let Some(min) = pending.min.take() {
        state.price_min = min;
    }
    if let Some(max) = pending.max.take() {
        state.price_max = max;
    }
    match filter::save_state(cart.store_mut(), &state) {
        Ok(()) => {
            run_filter_pass(cart, catalog, notifier);
            report.applied += 1;
        }
        Err(err) => {
            report.failed += 1;
            notifier.notify(&err.to_string(), Severity::Warning);
        }
    }
}

fn run_filter_pass<S: Store>(
    cart: &mut CartEngine<S>,
    catalog: &Catalog,
    notifier: &mut dyn Notifier,
) {
    let state = filter::load_state(cart.store_mut());
    let mask = filter::select_visible(&filter::cards_for(catalog), &state);
    notifier.notify(
        &format!("Found {} products", filter::visible_count(&mask)),
        Severity::Info,
    );
}
