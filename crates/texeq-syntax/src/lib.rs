//! # texeq syntax
//!
//! A small, total LaTeX front end: a [`lexer::Lexer`] that splits source into
//! tokens that matter for display math (commands, groups, `&`, `\\`), and a
//! [`parser`] that builds a lossless [`rowan`] tree in which every
//! `\end{name}` is matched against the innermost open `\begin{name}`.
//!
//! Parsing never fails. Problems such as unclosed or mismatched environments
//! are reported as [`parser::SyntaxError`]s next to the tree, so callers can
//! skip the broken region and keep going.
//!
//! ```
//! use texeq_syntax::{ast::Environment, parse};
//!
//! let result = parse(r"\begin{equation} E = mc^2 \end{equation}");
//! let root = result.syntax();
//! let env = root
//!     .children()
//!     .find_map(Environment::cast)
//!     .unwrap();
//! assert_eq!(env.name().as_deref(), Some("equation"));
//! assert!(env.is_closed());
//! assert!(result.errors.is_empty());
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;

pub use parser::{parse, ParseResult, SyntaxError, SyntaxErrorKind};
use rowan::Language;
pub use rowan::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    LBrace = 0,
    RBrace,
    LBracket,
    RBracket,
    Dollar,
    Ampersand, // alignment column separator
    LineBreak, // \\
    Command,   // \frac, \notag, \%
    Whitespace,
    Comment, // % ...
    Text,    // Regular text

    // Composite Nodes
    Root,
    Group,       // { ... }
    Environment, // \begin{...} ... \end{...}
    BeginMarker, // \begin{name}
    EndMarker,   // \end{name}
    Error,       // unmatched or misplaced input

    // Technical
    Eof,
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TexEqLanguage {}

impl Language for TexEqLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::Eof as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<TexEqLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<TexEqLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<TexEqLanguage>;
