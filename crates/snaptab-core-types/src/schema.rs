//! Field keys and event names shared by every snaptab log line
//!
//! The `log_op_*` macros emit `component`, `op`, `event` and, on failure,
//! `err.kind` / `err.code`. Catalog, registry, and snapshot passes add the
//! identity and counter fields below.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Identity domains
pub const FIELD_NAMESPACE: &str = "namespace";
pub const FIELD_TABLE: &str = "table";
pub const FIELD_ENTITY: &str = "entity";

// Counters
pub const FIELD_RECORDS: &str = "records";
pub const FIELD_FILES: &str = "files";
pub const FIELD_VALUES: &str = "values";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_PROGRESS: &str = "progress";
