//! Locating the primary document of a paper's sources.

use std::path::{Path, PathBuf};

use texeq_extract::preprocess::strip_comments;
use walkdir::WalkDir;

use crate::{read_document, SourceError};

/// Resolves an identifier to the path of exactly one primary document.
///
/// Fetching and unpacking remote archives belongs to implementations of this
/// trait; the extraction engine only ever sees the returned path.
pub trait SourceProvider: std::fmt::Debug {
    fn locate(&self, identifier: &str) -> Result<PathBuf, SourceError>;

    /// A human-readable name for this provider.
    fn name(&self) -> &'static str;
}

/// Treats identifiers as paths below a base directory.
///
/// A `.tex` file is returned as is. For a directory, the primary document is
/// the first `.tex` file (in path order) that declares `\documentclass`, then
/// the first with `\begin{document}`, then simply the first. Nothing on disk
/// is modified.
#[derive(Debug, Clone, Default)]
pub struct LocalDirectory {
    base: PathBuf,
}

impl LocalDirectory {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Picks the primary `.tex` file under `dir`.
    pub fn primary_document(dir: &Path) -> Result<PathBuf, SourceError> {
        let mut candidates = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|source| SourceError::Walk {
                dir: dir.to_path_buf(),
                source,
            })?;
            if entry.file_type().is_file() && is_tex(entry.path()) {
                candidates.push(entry.into_path());
            }
        }
        log::debug!("{} .tex files under {:?}", candidates.len(), dir);

        let mut with_body = None;
        for path in &candidates {
            let text = strip_comments(&read_document(path));
            if text.contains("\\documentclass") {
                return Ok(path.clone());
            }
            if with_body.is_none() && text.contains("\\begin{document}") {
                with_body = Some(path.clone());
            }
        }

        with_body
            .or_else(|| candidates.into_iter().next())
            .ok_or_else(|| SourceError::NoPrimaryDocument {
                dir: dir.to_path_buf(),
            })
    }
}

impl SourceProvider for LocalDirectory {
    fn locate(&self, identifier: &str) -> Result<PathBuf, SourceError> {
        let path = self.base.join(identifier);
        if path.is_dir() {
            Self::primary_document(&path)
        } else if path.is_file() && is_tex(&path) {
            Ok(path)
        } else {
            Err(SourceError::NotFound {
                identifier: identifier.to_string(),
            })
        }
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

fn is_tex(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "tex")
}
