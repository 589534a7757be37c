//! # texeq extract
//!
//! Finds the display equations of a LaTeX document and numbers them the way
//! the compiled paper does, so that "equation 7" can be looked up by the
//! number a reader sees.
//!
//! ## Pipeline
//!
//! ```text
//! source ─► strip comments ─► resolve aliases ─► strip labels, keep body
//!        ─► tokenize (tagged AST) ─► number (NumberingState) ─► records
//! ```
//!
//! - [`aliases`]: `\def\beq{\begin{equation}}` and friends are expanded.
//! - [`preprocess`]: comments, `\label{...}` and the preamble go away.
//! - [`tokenizer`]: outermost `subequations` blocks and numbered display
//!   environments become [`ast::MathBlock`]s. Environments are matched with a
//!   stack, so same-name nesting is safe.
//! - [`numbering`]: a separate pass assigns `"7"`, `"7a"` or nothing to each
//!   line, threading one explicit [`NumberingState`].
//! - [`locate`]: lookup by printed label, with an optional confirmation step.
//!
//! Extraction never fails. Malformed environments are skipped and reported in
//! [`Extraction::problems`].
//!
//! ## Example
//!
//! ```
//! use texeq_extract::extract;
//!
//! let doc = r"
//! \begin{document}
//! \begin{align}
//!   a &= b \\
//!   c &= d \notag
//! \end{align}
//! \begin{equation} e = f \end{equation}
//! \end{document}
//! ";
//! let extraction = extract(doc);
//! let numbers: Vec<_> = extraction
//!     .records
//!     .iter()
//!     .map(|r| r.number.as_deref())
//!     .collect();
//! assert_eq!(numbers, vec![Some("1"), None, Some("2")]);
//! assert_eq!(extraction.locate("2").unwrap().body, "e = f");
//! ```

pub mod aliases;
pub mod ast;
pub mod error;
pub mod lines;
pub mod locate;
pub mod numbering;
pub mod options;
pub mod preprocess;
pub mod tokenizer;

use log::debug;
use serde::{Deserialize, Serialize};

pub use aliases::{Alias, CustomCommandTable, Direction};
pub use error::ExtractError;
pub use locate::{Answer, Disambiguation};
pub use numbering::NumberingState;
pub use options::ExtractOptions;

/// One line of display math in document order.
///
/// `number` is `None` for suppressed and unnumbered lines. Records are never
/// deduplicated or sorted; duplicates and gaps in the numbering are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationRecord {
    pub number: Option<String>,
    pub body: String,
}

impl EquationRecord {
    pub fn numbered(number: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            body: body.into(),
        }
    }

    pub fn unnumbered(body: impl Into<String>) -> Self {
        Self {
            number: None,
            body: body.into(),
        }
    }
}

/// Output of one extraction run.
#[derive(Debug)]
pub struct Extraction {
    pub records: Vec<EquationRecord>,
    /// Non-fatal problems, currently only
    /// [`ExtractError::MalformedEnvironment`].
    pub problems: Vec<ExtractError>,
}

impl Extraction {
    pub fn locate(&self, label: &str) -> Result<&EquationRecord, ExtractError> {
        locate::locate(&self.records, label)
    }

    pub fn disambiguate(
        &self,
        label: &str,
        radius: usize,
    ) -> Result<Disambiguation<'_>, ExtractError> {
        Disambiguation::open(&self.records, label, radius)
    }
}

/// Extracts with [`ExtractOptions::default`].
pub fn extract(text: &str) -> Extraction {
    extract_with(text, &ExtractOptions::default())
}

/// Runs the whole pipeline over one document with a fresh [`NumberingState`].
pub fn extract_with(text: &str, options: &ExtractOptions) -> Extraction {
    let text = preprocess::truncate(text, options.max_input_bytes);
    let text = preprocess::strip_comments(text);
    let resolved = aliases::resolve(&text);
    debug!("resolved {} alias macros", resolved.table.len());
    let body = preprocess::preprocess(&resolved.text, options);

    let tokenized = tokenizer::tokenize(&body);
    let mut state = NumberingState::new();
    let records = numbering::number(&tokenized.blocks, &mut state);
    debug!("numbered {} records", records.len());

    Extraction {
        records,
        problems: tokenized.problems,
    }
}
