//! Index-loading error type.

use thiserror::Error;

/// Errors produced while loading or writing a spatial index resource.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported {resource} version {found} (expected {expected})")]
    UnsupportedVersion {
        resource: &'static str,
        found: i32,
        expected: i32,
    },

    #[error("corrupt {resource}: {reason}")]
    Corrupt {
        resource: &'static str,
        reason: String,
    },
}

impl IndexError {
    pub(crate) fn corrupt(resource: &'static str, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            resource,
            reason: reason.into(),
        }
    }

    /// `true` for errors that mean the resource itself is bad, as opposed to
    /// the read failing.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::UnsupportedVersion { .. } | Self::Corrupt { .. })
    }
}

pub type IndexResult<T> = Result<T, IndexError>;
