use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while converting a document.
///
/// A missing capability (no markdown support compiled in, no Chrome on the
/// machine) is kept apart from every other failure so the caller can report
/// it as such; both kinds end the current attempt.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{capability} not available: {reason}")]
    CapabilityMissing {
        capability: &'static str,
        reason: String,
    },

    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("markdown conversion failed: {0}")]
    Markdown(String),

    #[error("pdf rendering failed: {0}")]
    Render(String),
}

impl ConvertError {
    pub fn missing(capability: &'static str, reason: impl ToString) -> Self {
        ConvertError::CapabilityMissing {
            capability,
            reason: reason.to_string(),
        }
    }

    pub fn is_missing_capability(&self) -> bool {
        matches!(self, ConvertError::CapabilityMissing { .. })
    }
}
