use crate::cli::ViewMode;
use crate::domain::constants::DEFAULT_PRICE_MAX;
use crate::services::notify::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// One line in the cart. `quantity` is always >= 1; a line reaching zero is
/// removed, never stored.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub image: String,
    pub quantity: u64,
    pub added_at: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FavoriteItem {
    pub product_id: String,
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub image: String,
    pub added_at: u64,
}

/// Marker for the most recently added product, consumed once by the next
/// cart view.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LastAdded {
    pub name: String,
    pub price: u64,
}

/// The user's current narrowing criteria over the product listing.
/// An empty dimension means "match all" on that dimension.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilterState {
    #[serde(default)]
    pub seasons: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub price_min: u64,
    #[serde(default = "default_price_max")]
    pub price_max: u64,
}

fn default_price_max() -> u64 {
    DEFAULT_PRICE_MAX
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            seasons: Vec::new(),
            types: Vec::new(),
            brands: Vec::new(),
            sizes: Vec::new(),
            price_min: 0,
            price_max: DEFAULT_PRICE_MAX,
        }
    }
}

impl FilterState {
    /// Returns a copy with an inverted price range swapped back into order.
    pub fn normalized(&self) -> Self {
        let mut f = self.clone();
        if f.price_min > f.price_max {
            std::mem::swap(&mut f.price_min, &mut f.price_max);
        }
        f
    }
}

/// Per-card metadata the filter engine matches against. Rebuilt from the
/// catalog on every pass; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub categories: Vec<String>,
    pub price: u64,
    pub size: String,
}

/// One recorded event in an interaction trace: a timestamp, the action
/// token, and its data attributes.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TraceEvent {
    pub at_ms: u64,
    pub action: String,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

#[derive(Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total: u64,
    pub item_count: u64,
}

#[derive(Serialize, Debug)]
pub struct CheckoutReport {
    pub order_total: u64,
    pub item_count: u64,
}

#[derive(Serialize)]
pub struct FilterReport {
    pub state: FilterState,
    pub visible: Vec<String>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct PrefsReport {
    pub view_mode: ViewMode,
    pub dark_mode: bool,
}

#[derive(Serialize, Clone)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

#[derive(Serialize, Default)]
pub struct ReplayReport {
    pub applied: usize,
    pub ignored: usize,
    pub throttled: usize,
    pub failed: usize,
    pub notifications: Vec<Notification>,
}

#[derive(Serialize)]
pub struct CheckItem {
    pub name: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct DoctorReport {
    pub overall: String,
    pub checks: Vec<CheckItem>,
}

#[derive(Serialize)]
pub struct CacheManifest {
    pub name: String,
    pub assets: Vec<String>,
}
