use thiserror::Error;

/// Result type alias for vitals operations
pub type Result<T> = std::result::Result<T, VitalsError>;

/// Errors that can occur while reading counters from a metrics source
#[derive(Error, Debug)]
pub enum VitalsError {
    /// The metrics source could not be reached
    #[error("metrics source unavailable: {0}")]
    SourceUnavailable(String),

    /// Request to the metrics source timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// The source answered with an error status
    #[error("source error ({status}): {message}")]
    Remote {
        /// Status code reported by the source
        status: u16,
        /// Exception or error class reported by the source, if any
        error_type: Option<String>,
        /// Error message from the source
        message: String,
    },

    /// The requested attribute does not exist on the source
    #[error("attribute {attribute} not found on {mbean}")]
    AttributeNotFound {
        /// Bean the attribute was read from
        mbean: String,
        /// Attribute name
        attribute: String,
    },

    /// A garbage collector vanished between enumeration and read
    #[error("garbage collector not found: {name}")]
    CollectorNotFound {
        /// Collector identifier as it was enumerated
        name: String,
    },

    /// The source returned a value of the wrong shape
    #[error("unexpected value for {what}: {value}")]
    UnexpectedValue {
        /// Counter that was being read
        what: String,
        /// Raw value as received
        value: String,
    },

    /// The source has no counter for what a sampler needs
    #[error("metrics source does not provide {0}")]
    Unsupported(String),

    /// Reading `/proc` failed
    #[error("procfs error: {0}")]
    Procfs(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl VitalsError {
    /// Returns true if the error only signals an optional capability that
    /// the source does not provide
    #[must_use]
    pub const fn is_missing_capability(&self) -> bool {
        matches!(self, Self::AttributeNotFound { .. })
    }

    /// Returns true if the error means the source could not be reached at all
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_) | Self::Timeout(_))
    }

    /// Returns the status code if the source reported one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::AttributeNotFound { .. } | Self::CollectorNotFound { .. } => Some(404),
            _ => None,
        }
    }
}
