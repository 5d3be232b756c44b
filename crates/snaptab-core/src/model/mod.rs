//! Row and table models shared by the emitter and its sinks

pub mod row;
pub mod table;

pub use row::{FieldValue, KeyValue, Row};
pub use table::TableSpec;

/// Surrogate key assigned to a namespace value. Never zero.
pub type SurrogateId = u64;

/// Reserved sentinel: never assigned, returned by collecting passes.
pub const PENDING_ID: SurrogateId = 0;
