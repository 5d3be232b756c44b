//! Transformation-time enumeration lookups
//!
//! Provides:
//! - `EnumerationConfig` declarations with per-table normalization
//! - `EnumerationRegistry`, which serves cached IDs, mints on first sight,
//!   and emits each newly observed member exactly once per run

mod config;
mod registry;

pub use config::{EnumerationConfig, IdStrategy};
pub use registry::EnumerationRegistry;
