//! Index error types
//!
//! Error codes:
//! - TREE_PROJECTION_FAILED (FATAL)
//! - TREE_SENTINEL_VALUE (FATAL)
//! - TREE_CONFIG_INVALID (ERROR)

use std::fmt;

/// Severity levels for index errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation rejected, store left unchanged
    Error,
    /// Programmer error; caller must not continue as if the write happened
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Index-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorCode {
    /// An indexed attribute could not be projected from an entity
    TreeProjectionFailed,
    /// An entity projected a sentinel as a real value
    TreeSentinelValue,
    /// Store configuration rejected
    TreeConfigInvalid,
}

impl IndexErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            IndexErrorCode::TreeProjectionFailed => "TREE_PROJECTION_FAILED",
            IndexErrorCode::TreeSentinelValue => "TREE_SENTINEL_VALUE",
            IndexErrorCode::TreeConfigInvalid => "TREE_CONFIG_INVALID",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            IndexErrorCode::TreeProjectionFailed | IndexErrorCode::TreeSentinelValue => {
                Severity::Fatal
            }
            IndexErrorCode::TreeConfigInvalid => Severity::Error,
        }
    }
}

impl fmt::Display for IndexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Index error type with full context
#[derive(Debug, Clone)]
pub struct IndexError {
    /// Error code
    code: IndexErrorCode,
    /// Human-readable message
    message: String,
    /// Attribute involved, if any
    attribute: Option<String>,
}

impl IndexError {
    /// Create a projection failure for a missing or unrepresentable attribute
    pub fn projection_failed(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            code: IndexErrorCode::TreeProjectionFailed,
            message: format!("cannot project attribute '{}': {}", attribute, reason.into()),
            attribute: Some(attribute),
        }
    }

    /// Create an error for a sentinel projected as a stored value
    pub fn sentinel_value(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            code: IndexErrorCode::TreeSentinelValue,
            message: format!("attribute '{}' projected a range sentinel", attribute),
            attribute: Some(attribute),
        }
    }

    /// Create a configuration error
    pub fn config_invalid(reason: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::TreeConfigInvalid,
            message: reason.into(),
            attribute: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> IndexErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the attribute if applicable
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for IndexError {}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(IndexErrorCode::TreeProjectionFailed.code(), "TREE_PROJECTION_FAILED");
        assert_eq!(IndexErrorCode::TreeSentinelValue.code(), "TREE_SENTINEL_VALUE");
        assert_eq!(IndexErrorCode::TreeConfigInvalid.code(), "TREE_CONFIG_INVALID");
    }

    #[test]
    fn test_projection_errors_are_fatal() {
        assert!(IndexError::projection_failed("year", "missing").is_fatal());
        assert!(IndexError::sentinel_value("year").is_fatal());
        assert!(!IndexError::config_invalid("empty name").is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = IndexError::projection_failed("price", "attribute missing");
        let display = format!("{}", err);
        assert!(display.contains("TREE_PROJECTION_FAILED"));
        assert!(display.contains("FATAL"));
        assert!(display.contains("price"));
        assert_eq!(err.attribute(), Some("price"));
    }
}
