//! Snapshot partition streaming
//!
//! Provides:
//! - `SnapshotReader` over `<root>/<entity>/updated_date=<date>/*.gz`
//! - File and record caps checked between records
//! - Observational progress reporting

mod progress;
mod reader;

pub use progress::{ProgressReporter, ProgressSink, DEFAULT_INTERVAL};
pub use reader::{EntityDocuments, IterOptions, SnapshotReader};
