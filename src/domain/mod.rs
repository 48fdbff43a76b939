//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep state/report structs in one place.
//! - Avoid cyclic imports and duplicated type definitions.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — cart/favorites/filter state and report/output structs.
//! - `constants.rs` — storage keys, default bounds, precache manifest.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem side effects.

pub mod constants;
pub mod models;
