use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading a document and handing one
/// equation body to a caller.
///
/// Only [`ExtractError::NotFound`] and [`ExtractError::AmbiguousLookup`] are
/// ever returned as `Err` by lookups. The other two are non-fatal: readers
/// degrade to empty text and the tokenizer collects malformed environments in
/// [`crate::Extraction::problems`] while it keeps scanning.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Offset is a byte position in the preprocessed document body.
    #[error("malformed environment at byte {offset}: {message}")]
    MalformedEnvironment { message: String, offset: usize },

    #[error("no equation is numbered ({label})")]
    NotFound { label: String },

    #[error("equation ({label}) was neither confirmed nor replaced")]
    AmbiguousLookup { label: String },
}

impl ExtractError {
    pub fn not_found(label: impl Into<String>) -> Self {
        Self::NotFound {
            label: label.into(),
        }
    }
}
