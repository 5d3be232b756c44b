//! Operation boundary macros
//!
//! Every boundary event carries `component` (the calling module), `op`, and
//! `event` from `snaptab_core_types::schema`. Extra fields pass through to
//! `tracing` unchanged.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_boundary {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = snaptab_core_types::schema::$event,
            $($($field)*)?
        )
    };
}

/// Operation started
///
/// ```
/// # use snaptab_core::log_op_start;
/// log_op_start!("catalog_finalize");
/// log_op_start!("catalog_finalize", namespaces = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_boundary!(info, $op, EVENT_START $(, $($field)*)?)
    };
}

/// Operation finished; `duration_ms` is required
///
/// ```
/// # use snaptab_core::log_op_end;
/// log_op_end!("catalog_finalize", duration_ms = 42);
/// log_op_end!("catalog_load", duration_ms = 7, available = true);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_boundary!(
            info, $op, EVENT_END,
            duration_ms = $duration $(, $($field)*)?
        )
    };
}

/// Operation failed
///
/// `$err` is anything convertible into `ExError`; its kind and stable code
/// are logged as `err.kind` and `err.code`.
///
/// ```
/// # use snaptab_core::{log_op_error, errors::SnapTabError};
/// let err = SnapTabError::UnknownNamespace { namespace: "country".to_string() };
/// log_op_error!("id_for", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_boundary!(
            error, $op, EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}
