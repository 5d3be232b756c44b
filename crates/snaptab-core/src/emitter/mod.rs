//! Central write path for output rows
//!
//! Every producer writes through [`TableEmitter`], which enforces
//! at-most-once emission per configured dedup key per table before handing
//! rows to a [`RowSink`].

mod sink;
mod table_emitter;

pub use sink::{MemorySink, RowSink};
pub use table_emitter::TableEmitter;
