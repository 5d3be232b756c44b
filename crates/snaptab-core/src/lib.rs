//! snaptab core - identity assignment and row emission kernel
//!
//! This crate holds the filesystem-free parts of the snapshot-to-table
//! pipeline:
//! - Row and table models with declared dedup keys
//! - `TableEmitter`, the single write path with per-session dedup
//! - Surrogate ID strategies (`HashedAssigner`, `CatalogAssigner`)
//! - Value normalization shared by catalogs and registries
//! - Error and logging facilities used by every other crate

pub mod emitter;
pub mod errors;
pub mod ids;
pub mod logging_facility;
pub mod model;
pub mod normalize;

// Re-export commonly used types
pub use emitter::{MemorySink, RowSink, TableEmitter};
pub use errors::{ExError, ExErrorKind, Result, SnapTabError};
pub use ids::{Assignment, CatalogAssigner, HashedAssigner, IdentifierAssigner};
pub use model::{FieldValue, Row, SurrogateId, TableSpec, PENDING_ID};
pub use normalize::{NormalizeKind, Normalizer};
