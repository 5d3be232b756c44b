//! Reference catalog: batch assignment of dense sequential IDs
//!
//! A first full pass records every distinct value per enumeration table
//! and auxiliary namespace; `finalize` assigns `1..=N` in canonical order
//! and persists one reference file per namespace. Later runs reload the
//! files with `load_existing` instead of renumbering.

mod id_catalog;

pub use id_catalog::{IdCatalog, NamespaceConfig};
