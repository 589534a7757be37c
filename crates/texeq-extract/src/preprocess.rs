//! Document preprocessing: comments, labels and the document body.
//!
//! Everything here works on lexer tokens rather than raw characters, so an
//! escaped `\%` is never mistaken for a comment and a label such as
//! `\label{eq:{a}}` is removed whole.

use log::warn;
use texeq_syntax::lexer::Lexer;
use texeq_syntax::SyntaxKind;

use crate::ExtractOptions;

const DOCUMENT_BEGIN: &str = "\\begin{document}";
const DOCUMENT_END: &str = "\\end{document}";

/// Strips comments and labels, then keeps only the document body.
///
/// Input without `\begin{document}` (a fragment) is kept whole.
pub fn preprocess(text: &str, options: &ExtractOptions) -> String {
    let text = strip_labels(&strip_comments(text));
    document_body(&text, options.respect_document_end).to_string()
}

/// Cuts `text` to at most `max_bytes`, backing off to a char boundary.
pub fn truncate(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    warn!(
        "input is {} bytes, only the first {} are examined",
        text.len(),
        end
    );
    &text[..end]
}

/// Removes every unescaped `%` through the end of its line, keeping the newline.
pub fn strip_comments(text: &str) -> String {
    Lexer::new(text)
        .filter(|(kind, _)| *kind != SyntaxKind::Comment)
        .map(|(_, token)| token)
        .collect()
}

/// Removes every `\label{...}`.
pub fn strip_labels(text: &str) -> String {
    let tokens: Vec<_> = Lexer::new(text).collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < tokens.len() {
        let (kind, token) = tokens[i];
        if kind == SyntaxKind::Command && token == "\\label" {
            if let Some(next) = argument_end(&tokens, i + 1) {
                i = next;
                continue;
            }
        }
        out.push_str(token);
        i += 1;
    }
    out
}

/// Index just past the balanced `{...}` argument that starts at `start`,
/// after optional whitespace.
fn argument_end(tokens: &[(SyntaxKind, &str)], start: usize) -> Option<usize> {
    let mut i = start;
    while matches!(tokens.get(i), Some((SyntaxKind::Whitespace, _))) {
        i += 1;
    }
    if !matches!(tokens.get(i), Some((SyntaxKind::LBrace, _))) {
        return None;
    }
    let mut depth = 0usize;
    for (offset, (kind, _)) in tokens[i..].iter().enumerate() {
        match kind {
            SyntaxKind::LBrace => depth += 1,
            SyntaxKind::RBrace => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// The text after `\begin{document}`, up to `\end{document}` if requested.
pub fn document_body(text: &str, respect_end: bool) -> &str {
    let body = match text.find(DOCUMENT_BEGIN) {
        Some(start) => &text[start + DOCUMENT_BEGIN.len()..],
        None => text,
    };
    if respect_end {
        if let Some(end) = body.find(DOCUMENT_END) {
            return &body[..end];
        }
    }
    body
}
