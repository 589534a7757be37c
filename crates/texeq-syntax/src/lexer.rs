use crate::SyntaxKind;

/// A lexer for LaTeX source code, tuned for display math.
///
/// ## Overview
///
/// The lexer performs **character-level scanning** of LaTeX source, producing
/// a stream of ([`SyntaxKind`], `&str`) tuples. It handles:
///
/// - **Commands**: `\notag`, `\begin`, `\&` (escape sequences)
/// - **Line breaks**: `\\` becomes a dedicated [`SyntaxKind::LineBreak`] token
/// - **Alignment**: every unescaped `&` is an [`SyntaxKind::Ampersand`] token
/// - **Delimiters**: `{`, `}`, `[`, `]`, `$`
/// - **Comments**: unescaped `%` through end of line
/// - **Whitespace**: consecutive whitespace collapsed into single tokens
/// - **Text**: everything else, consumed greedily until a special character
///
/// Concatenating the token texts reproduces the input exactly, which lets
/// later passes rewrite a document token by token.
///
/// ## Examples
///
/// ```
/// use texeq_syntax::lexer::Lexer;
/// use texeq_syntax::SyntaxKind;
///
/// let tokens: Vec<_> = Lexer::new(r"a &= b \\ c").collect();
///
/// assert_eq!(tokens[2], (SyntaxKind::Ampersand, "&"));
/// assert_eq!(tokens[3], (SyntaxKind::Text, "="));
/// assert_eq!(tokens[7], (SyntaxKind::LineBreak, r"\\"));
/// ```
pub struct Lexer<'a> {
    /// The input source text being lexed.
    input: &'a str,
    /// Current byte position in the input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new `Lexer` for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Byte offset of the next token.
    pub fn offset(&self) -> usize {
        self.position
    }

    /// Returns the next token (kind, text).
    /// If EOF, returns (SyntaxKind::Eof, "").
    pub fn next_token(&mut self) -> (SyntaxKind, &'a str) {
        let start = self.position;
        let Some(c) = self.input[start..].chars().next() else {
            return (SyntaxKind::Eof, "");
        };
        self.position += c.len_utf8();

        let kind = match c {
            '\\' => self.command(),
            '{' => SyntaxKind::LBrace,
            '}' => SyntaxKind::RBrace,
            '[' => SyntaxKind::LBracket,
            ']' => SyntaxKind::RBracket,
            '$' => SyntaxKind::Dollar,
            '&' => SyntaxKind::Ampersand,
            '%' => {
                self.eat_while(|n| n != '\n' && n != '\r');
                SyntaxKind::Comment
            }
            c if c.is_whitespace() => {
                self.eat_while(char::is_whitespace);
                SyntaxKind::Whitespace
            }
            _ => {
                self.eat_while(|n| !is_special(n) && !n.is_whitespace());
                SyntaxKind::Text
            }
        };

        (kind, &self.input[start..self.position])
    }

    /// Lexes the rest of a control sequence; the backslash is already consumed.
    fn command(&mut self) -> SyntaxKind {
        match self.input[self.position..].chars().next() {
            Some('\\') => {
                self.position += 1;
                SyntaxKind::LineBreak
            }
            Some(next) if next.is_alphabetic() => {
                self.eat_while(char::is_alphabetic);
                SyntaxKind::Command
            }
            Some(next) => {
                // Control symbol: \$ \% \& \,
                self.position += next.len_utf8();
                SyntaxKind::Command
            }
            None => SyntaxKind::Command,
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(n) = self.input[self.position..].chars().next() {
            if !pred(n) {
                break;
            }
            self.position += n.len_utf8();
        }
    }
}

fn is_special(c: char) -> bool {
    matches!(c, '\\' | '{' | '}' | '[' | ']' | '%' | '$' | '&')
}

impl<'a> Iterator for Lexer<'a> {
    type Item = (SyntaxKind, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let (kind, text) = self.next_token();
        if kind == SyntaxKind::Eof {
            None
        } else {
            Some((kind, text))
        }
    }
}
