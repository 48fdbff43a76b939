//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `cart.rs` — the cart engine: add/remove/quantity/checkout over storage.
//! - `favorites.rs` — favorite toggling keyed by product id.
//! - `filter.rs` — pure visibility mask plus filter-state persistence.
//! - `events.rs` — typed action dispatch, debounce/throttle, trace replay.
//! - `storage.rs` — key/value JSON store (fs + in-memory) and event log.
//! - `notify.rs` — user-facing notification sinks.
//! - `config.rs` — optional TOML configuration.
//! - `output.rs` — JSON/text output helpers and the error envelope.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod cart;
pub mod config;
pub mod events;
pub mod favorites;
pub mod filter;
pub mod notify;
pub mod output;
pub mod storage;
