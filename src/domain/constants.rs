//! Stable constants shared across commands and services.

/// Storage keys. One JSON blob per key; names must stay stable across
/// releases or existing sessions lose their state.
pub const KEY_CART: &str = "cart";
pub const KEY_FAVORITES: &str = "favorites";
pub const KEY_FILTERS: &str = "filters";
pub const KEY_LAST_ADDED: &str = "last_added";
pub const KEY_VIEW_MODE: &str = "view_mode";
pub const KEY_DARK_MODE: &str = "dark_mode";

/// Upper price bound assumed when the user has not set one.
pub const DEFAULT_PRICE_MAX: u64 = 50_000;

/// Quiet period before a price input takes effect, in trace milliseconds.
pub const PRICE_DEBOUNCE_MS: u64 = 500;

/// Minimum window between product-card clicks, in trace milliseconds.
pub const CLICK_THROTTLE_MS: u64 = 100;

/// Offline cache manifest handed to the service worker. A fixed list;
/// the worker itself is outside this crate.
pub const CACHE_NAME: &str = "treadmark-v1.0.0";
pub const PRECACHE_ASSETS: &[&str] = &[
    "/",
    "/styles/main.css",
    "/scripts/app.js",
    "/images/logo.png",
    "/images/background.jpg",
];
