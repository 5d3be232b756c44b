//! Reference catalog files
//!
//! Provides:
//! - Atomic temp→rename writes
//! - The two-column delimited codec shared by the catalog and the
//!   enumeration registry

mod atomic;
mod table_file;

pub use atomic::atomic_write;
pub use table_file::{detect_delimiter, read_reference_rows, write_reference_rows, ReferenceRows};
