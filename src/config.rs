//! Table configuration.

use crate::capacity::MIN_CAPACITY;
use crate::error::{Result, TableError};

/// Load factor above which an insert grows the table.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.80;

/// What `insert` does when the key is already present.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DuplicatePolicy {
    /// Fail with [`TableError::DuplicateKey`] and leave the table unchanged.
    #[default]
    Reject,
    /// Overwrite the stored value in place and hand the old one back.
    Replace,
}

/// Construction parameters for a [`ChainedHashMap`](crate::ChainedHashMap).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    /// Requested bucket count; rounded up to a ladder value.
    pub capacity_hint: usize,
    /// Duplicate-key handling.
    pub duplicates: DuplicatePolicy,
    /// Growth threshold for `len / capacity`.
    pub max_load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity_hint: MIN_CAPACITY,
            duplicates: DuplicatePolicy::default(),
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity_hint(mut self, hint: usize) -> Self {
        self.capacity_hint = hint;
        self
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn max_load_factor(mut self, factor: f64) -> Self {
        self.max_load_factor = factor;
        self
    }

    /// Checks values that cannot be caught by the type system.
    pub fn validate(&self) -> Result<()> {
        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0.0 {
            return Err(TableError::invalid_config(format!(
                "max_load_factor must be finite and positive, got {}",
                self.max_load_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = TableConfig::default();
        assert_eq!(c.capacity_hint, 13);
        assert_eq!(c.duplicates, DuplicatePolicy::Reject);
        assert_eq!(c.max_load_factor, 0.80);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let c = TableConfig::new()
            .capacity_hint(1_000)
            .duplicates(DuplicatePolicy::Replace)
            .max_load_factor(1.5);
        assert_eq!(c.capacity_hint, 1_000);
        assert_eq!(c.duplicates, DuplicatePolicy::Replace);
        assert_eq!(c.max_load_factor, 1.5);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_load_factor() {
        for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let err = TableConfig::new().max_load_factor(bad).validate().unwrap_err();
            assert!(matches!(err, TableError::InvalidConfig { .. }), "{bad}");
        }
    }
}
