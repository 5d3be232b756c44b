//! snaptab store - filesystem side of the snapshot-to-table pipeline
//!
//! Provides:
//! - Streaming iteration over gzip JSON-lines snapshot partitions
//! - The reference-file codec with atomic writes
//! - `IdCatalog` for dense, order-independent ID assignment
//! - `EnumerationRegistry` for lookups and first-sight emission
//! - `TsvTableSink`, one tab-delimited file per output table
//! - YAML pipeline configuration

pub mod catalog;
pub mod enumeration;
pub mod errors;
pub mod pipeline;
pub mod reference;
pub mod sink;
pub mod snapshot;

// Re-export key types
pub use catalog::{IdCatalog, NamespaceConfig};
pub use enumeration::{EnumerationConfig, EnumerationRegistry, IdStrategy};
pub use errors::Result;
pub use pipeline::PipelineConfig;
pub use sink::TsvTableSink;
pub use snapshot::{IterOptions, ProgressReporter, SnapshotReader};
