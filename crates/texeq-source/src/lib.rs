//! # texeq source
//!
//! The collaborators around the extraction engine: reading a document from
//! disk, finding the primary `.tex` file of a paper's sources, and packaging
//! an extracted equation for a derivation service.
//!
//! ```no_run
//! use texeq_source::{read_document, LocalDirectory, SourceProvider};
//!
//! let provider = LocalDirectory::default();
//! let path = provider.locate("downloads/2311.17667")?;
//! let text = read_document(&path);
//! let extraction = texeq_extract::extract(&text);
//! println!("{} equations", extraction.records.len());
//! # Ok::<(), texeq_source::SourceError>(())
//! ```

pub mod derivation;
pub mod provider;

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use texeq_extract::ExtractError;
use thiserror::Error;

pub use derivation::{DerivationBackend, DerivationRequest, Message, Role};
pub use provider::{LocalDirectory, SourceProvider};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no document found for {identifier:?}")]
    NotFound { identifier: String },

    #[error("no .tex file under {}", dir.display())]
    NoPrimaryDocument { dir: PathBuf },

    #[error("failed to walk {}: {source}", dir.display())]
    Walk {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("derivation backend {backend} failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}

/// Reads a document leniently.
///
/// Undecodable bytes are dropped rather than replaced. An unreadable file is
/// logged and read as empty text.
pub fn read_document(path: &Path) -> String {
    match try_read_document(path) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("{}", e);
            String::new()
        }
    }
}

/// Like [`read_document`] but reports unreadable files.
pub fn try_read_document(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path).map_err(|source| ExtractError::ReadFailure {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_lossy(&bytes))
}

fn decode_lossy(bytes: &[u8]) -> String {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => text.replace(char::REPLACEMENT_CHARACTER, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_drops_invalid_bytes() {
        assert_eq!(decode_lossy(b"a\xffb\xfe"), "ab");
        assert_eq!(decode_lossy("é".as_bytes()), "é");
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.tex");
        assert_eq!(read_document(&path), "");
        assert!(matches!(
            try_read_document(&path),
            Err(ExtractError::ReadFailure { .. })
        ));
    }
}
