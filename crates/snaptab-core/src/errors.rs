use thiserror::Error;

/// Result type alias using SnapTabError
pub type Result<T> = std::result::Result<T, SnapTabError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and CLI exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    NotFound,
    MalformedDocument,
    InvalidConfig,
    InvalidTableSpec,

    // Identity
    UnknownNamespace,
    MissingAssignment,
    IdConflict,
    IdSpaceExhausted,

    // Emission
    /// A dedup key field was absent from a row
    MissingKeyValue,
    Sink,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::MalformedDocument => "ERR_MALFORMED_DOCUMENT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidTableSpec => "ERR_INVALID_TABLE_SPEC",
            ExErrorKind::UnknownNamespace => "ERR_UNKNOWN_NAMESPACE",
            ExErrorKind::MissingAssignment => "ERR_MISSING_ASSIGNMENT",
            ExErrorKind::IdConflict => "ERR_ID_CONFLICT",
            ExErrorKind::IdSpaceExhausted => "ERR_ID_SPACE_EXHAUSTED",
            ExErrorKind::MissingKeyValue => "ERR_MISSING_KEY_VALUE",
            ExErrorKind::Sink => "ERR_SINK",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, namespace, table, path) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    namespace: Option<String>,
    table: Option<String>,
    path: Option<String>,
    line: Option<u64>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            namespace: None,
            table: None,
            path: None,
            line: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add namespace context
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add output table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add line number context
    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn line(&self) -> Option<u64> {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(namespace) = &self.namespace {
            write!(f, " (namespace: {})", namespace)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(line) = self.line {
            write!(f, " (line: {})", line)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for identity assignment and row emission
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapTabError {
    // ===== Input Errors =====
    /// Input rejected before any state was touched
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Value to assign an ID to was empty
    #[error("Value must be a non-empty string in namespace {namespace}")]
    EmptyValue { namespace: String },

    /// Bit width outside the supported range
    #[error("Bit width {bits} is outside 1..=63")]
    InvalidBits { bits: u32 },

    /// Table specification rejected at emitter construction
    #[error("Invalid table spec for {table}: {reason}")]
    InvalidTableSpec { table: String, reason: String },

    // ===== Identity Errors =====
    /// Lookup against a namespace that was never configured
    #[error("Unknown namespace: {namespace}")]
    UnknownNamespace { namespace: String },

    /// Catalog replay found no assignment for a value
    #[error("Value '{value}' missing from namespace '{namespace}' assignments")]
    MissingAssignment { namespace: String, value: String },

    /// An ID is already held by a different value in the namespace
    #[error("ID {id} in namespace {namespace} is held by '{existing}', cannot bind '{value}'")]
    IdConflict {
        namespace: String,
        id: u64,
        existing: String,
        value: String,
    },

    /// Collision probing ran out of attempts
    #[error("No free {bits}-bit ID for a value in namespace {namespace} after {attempts} attempts")]
    IdSpaceExhausted {
        namespace: String,
        bits: u32,
        attempts: u64,
    },

    // ===== Emission Errors =====
    /// A dedup key field was missing or null in an emitted row
    #[error("Missing key value for table {table}: field {field}")]
    MissingKeyValue { table: String, field: String },

    /// Underlying row sink failed
    #[error("Row sink failed for table {table}: {message}")]
    Sink { table: String, message: String },

    // ===== Serialization =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from SnapTabError to ExError
impl From<SnapTabError> for ExError {
    fn from(err: SnapTabError) -> Self {
        let message = err.to_string();
        match err {
            SnapTabError::InvalidInput { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            SnapTabError::EmptyValue { namespace } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("assign_id")
                .with_namespace(namespace)
                .with_message(message),

            SnapTabError::InvalidBits { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("assign_id")
                .with_message(message),

            SnapTabError::InvalidTableSpec { table, .. } => {
                ExError::new(ExErrorKind::InvalidTableSpec)
                    .with_op("build_emitter")
                    .with_table(table)
                    .with_message(message)
            }

            SnapTabError::UnknownNamespace { namespace } => {
                ExError::new(ExErrorKind::UnknownNamespace)
                    .with_namespace(namespace)
                    .with_message(message)
            }

            SnapTabError::MissingAssignment { namespace, .. } => {
                ExError::new(ExErrorKind::MissingAssignment)
                    .with_op("catalog_lookup")
                    .with_namespace(namespace)
                    .with_message(message)
            }

            SnapTabError::IdConflict { namespace, .. } => ExError::new(ExErrorKind::IdConflict)
                .with_namespace(namespace)
                .with_message(message),

            SnapTabError::IdSpaceExhausted { namespace, .. } => {
                ExError::new(ExErrorKind::IdSpaceExhausted)
                    .with_op("assign_id")
                    .with_namespace(namespace)
                    .with_message(message)
            }

            SnapTabError::MissingKeyValue { table, .. } => {
                ExError::new(ExErrorKind::MissingKeyValue)
                    .with_op("emit")
                    .with_table(table)
                    .with_message(message)
            }

            SnapTabError::Sink { table, .. } => ExError::new(ExErrorKind::Sink)
                .with_op("write_row")
                .with_table(table)
                .with_message(message),

            SnapTabError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to SnapTabError
impl From<serde_json::Error> for SnapTabError {
    fn from(err: serde_json::Error) -> Self {
        SnapTabError::Serialization {
            message: err.to_string(),
        }
    }
}
