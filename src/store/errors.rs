//! Snapshot errors

use thiserror::Error;

use crate::index::IndexError;

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Snapshot export/restore errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encode/decode failed: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("snapshot checksum mismatch: expected {expected}, computed {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("unsupported snapshot format version {0}")]
    UnsupportedVersion(u8),

    #[error("snapshot belongs to store {actual:?}, expected {expected:?}")]
    StoreMismatch { expected: String, actual: String },

    #[error(transparent)]
    Index(#[from] IndexError),
}

impl SnapshotError {
    /// Whether the snapshot content itself is untrustworthy
    pub fn is_corruption(&self) -> bool {
        matches!(self, SnapshotError::ChecksumMismatch { .. } | SnapshotError::Codec(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_display() {
        let err = SnapshotError::ChecksumMismatch {
            expected: "crc32:00000001".to_string(),
            actual: "crc32:00000002".to_string(),
        };
        assert!(err.to_string().contains("crc32:00000001"));
        assert!(err.is_corruption());
    }

    #[test]
    fn test_store_mismatch_is_not_corruption() {
        let err = SnapshotError::StoreMismatch {
            expected: "books".to_string(),
            actual: "people".to_string(),
        };
        assert!(err.to_string().contains("\"people\""));
        assert!(!err.is_corruption());
    }

    #[test]
    fn test_index_error_is_transparent() {
        let err: SnapshotError = IndexError::projection_failed("year", "missing").into();
        assert!(err.to_string().contains("TREE_PROJECTION_FAILED"));
        assert!(!err.is_corruption());
    }
}
