//! Error types for the lead scoring pipeline.
//!
//! Every fallible operation returns [`LeadError`]. The binary maps each kind to a
//! process exit code so scripts can tell a bad input file from a broken model store.

use std::path::PathBuf;

/// Top-level error type for all pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    /// A required feature/label column or value is missing or malformed.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// The model artifact could not be read or written.
    #[error("storage error at '{}': {message}", path.display())]
    Storage { path: PathBuf, message: String },

    /// Invalid configuration or CLI option.
    #[error("config error: {message}")]
    Config { message: String },

    /// Training could not run on the given data.
    #[error("training error: {message}")]
    Training { message: String },

    /// Filesystem I/O error outside of artifact storage.
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// CSV reader/writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LeadError>;

impl LeadError {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema { message: msg.into() }
    }

    pub fn storage(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Storage {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config { message: msg.into() }
    }

    pub fn training(msg: impl Into<String>) -> Self {
        Self::Training { message: msg.into() }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for the `leads` binary.
    ///
    /// - 2: bad input (schema, config, CSV, file access)
    /// - 3: artifact storage
    /// - 4: training
    pub fn exit_code(&self) -> u8 {
        match self {
            LeadError::Schema { .. } | LeadError::Config { .. } | LeadError::Io { .. } | LeadError::Csv(_) => 2,
            LeadError::Storage { .. } => 3,
            LeadError::Training { .. } => 4,
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, LeadError::Schema { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, LeadError::Storage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_exit_codes() {
        let err = LeadError::schema("missing required column `employees`");
        assert_eq!(err.to_string(), "schema error: missing required column `employees`");
        assert_eq!(err.exit_code(), 2);

        let err = LeadError::storage("models/model.bin", "permission denied");
        assert!(err.to_string().contains("models/model.bin"));
        assert_eq!(err.exit_code(), 3);
        assert!(err.is_storage());
        assert!(!err.is_schema());

        assert_eq!(LeadError::training("one class").exit_code(), 4);
    }
}
