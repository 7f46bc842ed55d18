//! Error type shared by the table engine and its configuration.

use thiserror::Error;

/// Failures reported by [`ChainedHashMap`](crate::ChainedHashMap).
///
/// A missing key is not an error: lookups and removals return `Option`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A bucket array or key copy could not be allocated. The table is
    /// left exactly as it was before the call.
    #[error("allocation failed: requested {bytes} bytes")]
    Allocation {
        /// Size of the allocation that failed
        bytes: usize,
    },

    /// The requested capacity is larger than the last ladder value.
    #[error("capacity {requested} exceeds the largest supported capacity {max}")]
    CapacityExceeded {
        /// The hint that was asked for
        requested: usize,
        /// The largest ladder value
        max: usize,
    },

    /// The key is already present and the table rejects duplicates.
    #[error("duplicate key: {key:?}")]
    DuplicateKey {
        /// The key that was already present
        key: String,
    },

    /// A [`TableConfig`](crate::TableConfig) value is unusable.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration
        message: String,
    },
}

impl TableError {
    pub(crate) fn allocation<T>(count: usize) -> Self {
        Self::Allocation {
            bytes: count.saturating_mul(core::mem::size_of::<T>()),
        }
    }

    pub(crate) fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// True for the duplicate-key rejection.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;
