//! Domain error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    #[error("Malformed data in {}: {reason}", .path.display())]
    DataFormat { path: PathBuf, reason: String },

    #[error("Invalid rate {0}: must be a positive, finite number")]
    InvalidRate(f64),
}

impl FxError {
    pub fn data_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        FxError::DataFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
