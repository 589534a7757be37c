use crate::{lexer::Lexer, SyntaxKind, SyntaxNode};
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SyntaxErrorKind {
    /// A `{` group reached EOF or an outer `\end` before its `}`.
    UnclosedGroup,
    /// A `}` with no open group.
    UnmatchedBrace,
    /// `\begin`/`\end` not followed by a `{name}` argument.
    MissingEnvironmentName,
    /// An environment whose `\end{name}` never came.
    UnclosedEnvironment,
    /// An `\end{name}` that closes nothing.
    UnmatchedEnd,
    /// Groups and environments nested past [`MAX_NESTING_DEPTH`].
    NestingTooDeep,
}

impl SyntaxErrorKind {
    /// True for problems with `\begin`/`\end` pairing.
    pub fn is_environment_error(self) -> bool {
        matches!(
            self,
            Self::MissingEnvironmentName | Self::UnclosedEnvironment | Self::UnmatchedEnd
        )
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub message: String,
    pub range: TextRange,
}

/// Groups and environments opened deeper than this are kept as flat tokens.
pub const MAX_NESTING_DEPTH: usize = 512;

/// What is currently open around the parser position.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Frame {
    Group,
    Environment(String),
}

/// Recursive-descent parser producing a lossless CST.
///
/// Environments are matched with an explicit stack of open frames: an
/// `\end{name}` closes the innermost open `\begin{name}`, so environments of
/// the same name nest correctly. An `\end` naming an outer environment closes
/// the inner ones as unclosed; an `\end` naming nothing open becomes an
/// [`SyntaxKind::Error`] node.
///
/// Past [`MAX_NESTING_DEPTH`] open frames, `{` and `\begin` no longer open
/// nodes. They are counted in `flattened` and their closers are consumed as
/// plain tokens, which keeps the recursion bounded for any input.
pub struct Parser<'a> {
    tokens: Vec<(SyntaxKind, &'a str)>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
    current_offset: TextSize,
    frames: Vec<Frame>,
    flattened: usize,
    depth_reported: bool,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: Lexer::new(input).collect(),
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            current_offset: TextSize::from(0),
            frames: Vec::new(),
            flattened: 0,
            depth_reported: false,
        }
    }

    pub fn parse(mut self) -> ParseResult {
        self.builder.start_node(SyntaxKind::Root.into());
        while self.peek() != SyntaxKind::Eof {
            self.parse_element();
        }
        self.builder.finish_node();
        ParseResult {
            green_node: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn peek(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|(k, _)| *k)
            .unwrap_or(SyntaxKind::Eof)
    }

    fn peek_text(&self) -> &'a str {
        self.tokens.get(self.pos).map(|(_, t)| *t).unwrap_or("")
    }

    fn at_command(&self, name: &str) -> bool {
        self.peek() == SyntaxKind::Command && self.peek_text() == name
    }

    fn bump(&mut self) {
        if let Some((kind, text)) = self.tokens.get(self.pos).copied() {
            self.builder.token(kind.into(), text);
            self.current_offset += TextSize::of(text);
            self.pos += 1;
        }
    }

    fn bump_whitespace(&mut self) {
        while self.peek() == SyntaxKind::Whitespace {
            self.bump();
        }
    }

    fn error(&mut self, kind: SyntaxErrorKind, message: String) {
        let start = self.current_offset;
        let len = TextSize::of(self.peek_text());
        let range = TextRange::at(start, len);
        self.errors.push(SyntaxError {
            kind,
            message,
            range,
        });
    }

    /// Reads the `{name}` argument following the `\begin`/`\end` at the
    /// current position without consuming anything.
    fn lookahead_env_name(&self) -> Option<String> {
        let mut i = 1;
        while self.nth(i) == SyntaxKind::Whitespace {
            i += 1;
        }
        if self.nth(i) != SyntaxKind::LBrace {
            return None;
        }
        i += 1;
        let mut name = String::new();
        loop {
            match self.tokens.get(self.pos + i) {
                Some((SyntaxKind::RBrace, _)) => return Some(name.trim().to_string()),
                Some((SyntaxKind::Text | SyntaxKind::Whitespace, text)) => name.push_str(text),
                _ => return None,
            }
            i += 1;
        }
    }

    fn is_open_environment(&self, name: &str) -> bool {
        self.frames
            .iter()
            .any(|frame| matches!(frame, Frame::Environment(open) if open == name))
    }

    /// True if an `\end` at the current position closes something already open,
    /// in which case the innermost construct must give way.
    fn at_end_of_open_environment(&self) -> bool {
        self.at_command("\\end")
            && self
                .lookahead_env_name()
                .is_some_and(|name| self.is_open_environment(&name))
    }

    fn parse_element(&mut self) {
        match self.peek() {
            SyntaxKind::Command if self.at_command("\\begin") && self.too_deep() => {
                self.bump_flattened()
            }
            SyntaxKind::Command if self.at_command("\\begin") => self.parse_environment(),
            SyntaxKind::Command if self.at_command("\\end") && self.flattened > 0 => {
                self.flattened -= 1;
                self.bump();
            }
            SyntaxKind::Command if self.at_command("\\end") => self.parse_stray_end(),
            SyntaxKind::LBrace if self.too_deep() => self.bump_flattened(),
            SyntaxKind::LBrace => self.parse_group(),
            SyntaxKind::RBrace if self.flattened > 0 => {
                self.flattened -= 1;
                self.bump();
            }
            SyntaxKind::RBrace => {
                self.error(SyntaxErrorKind::UnmatchedBrace, "Unmatched '}'".into());
                self.builder.start_node(SyntaxKind::Error.into());
                self.bump();
                self.builder.finish_node();
            }
            SyntaxKind::Eof => {}
            _ => self.bump(),
        }
    }

    fn too_deep(&self) -> bool {
        self.frames.len() >= MAX_NESTING_DEPTH
    }

    /// Consumes an opener without starting a node. Reported once per parse.
    fn bump_flattened(&mut self) {
        if !self.depth_reported {
            self.error(
                SyntaxErrorKind::NestingTooDeep,
                format!("Nesting deeper than {} levels is kept flat", MAX_NESTING_DEPTH),
            );
            self.depth_reported = true;
        }
        self.flattened += 1;
        self.bump();
    }

    fn parse_group(&mut self) {
        self.builder.start_node(SyntaxKind::Group.into());
        self.bump(); // Consume '{'
        self.frames.push(Frame::Group);

        loop {
            match self.peek() {
                SyntaxKind::Eof => {
                    self.error(SyntaxErrorKind::UnclosedGroup, "Expected '}'".into());
                    break;
                }
                SyntaxKind::RBrace if self.flattened > 0 => self.parse_element(),
                SyntaxKind::RBrace => {
                    self.bump(); // Consume '}'
                    break;
                }
                _ if self.at_end_of_open_environment() => {
                    self.error(SyntaxErrorKind::UnclosedGroup, "Expected '}'".into());
                    break;
                }
                _ => self.parse_element(),
            }
        }

        self.frames.pop();
        self.builder.finish_node();
    }

    /// Parses `\begin{name}` or `\end{name}` into a marker node and returns the name.
    fn parse_marker(&mut self, kind: SyntaxKind) -> Option<String> {
        let name = self.lookahead_env_name();
        self.builder.start_node(kind.into());
        let command = self.peek_text();
        self.bump(); // Consume \begin or \end

        if name.is_some() {
            self.bump_whitespace();
            self.parse_group();
        } else {
            self.error(
                SyntaxErrorKind::MissingEnvironmentName,
                format!("Expected '{{' after {}", command),
            );
        }

        self.builder.finish_node();
        name
    }

    fn parse_stray_end(&mut self) {
        if let Some(name) = self.lookahead_env_name() {
            self.error(
                SyntaxErrorKind::UnmatchedEnd,
                format!("Unexpected \\end{{{}}} without matching \\begin", name),
            );
        }
        self.builder.start_node(SyntaxKind::Error.into());
        self.parse_marker(SyntaxKind::EndMarker);
        self.builder.finish_node();
    }

    fn parse_environment(&mut self) {
        self.builder.start_node(SyntaxKind::Environment.into());

        let Some(name) = self.parse_marker(SyntaxKind::BeginMarker) else {
            self.builder.finish_node();
            return;
        };
        self.frames.push(Frame::Environment(name.clone()));

        // Parse content until the matching \end
        loop {
            match self.peek() {
                SyntaxKind::Eof => {
                    self.error(
                        SyntaxErrorKind::UnclosedEnvironment,
                        format!("Unclosed environment, expected \\end{{{}}}", name),
                    );
                    break;
                }
                SyntaxKind::Command if self.at_command("\\end") => {
                    match self.lookahead_env_name() {
                        Some(end) if end == name => {
                            self.parse_marker(SyntaxKind::EndMarker);
                            break;
                        }
                        Some(end) if self.is_open_environment(&end) => {
                            self.error(
                                SyntaxErrorKind::UnclosedEnvironment,
                                format!(
                                    "Unclosed environment, expected \\end{{{}}} before \\end{{{}}}",
                                    name, end
                                ),
                            );
                            break;
                        }
                        _ => self.parse_element(),
                    }
                }
                SyntaxKind::RBrace if self.flattened > 0 => self.parse_element(),
                SyntaxKind::RBrace if self.frames.contains(&Frame::Group) => {
                    // The enclosing group ends first; the environment never closed.
                    self.error(
                        SyntaxErrorKind::UnclosedEnvironment,
                        format!("Unclosed environment, expected \\end{{{}}}", name),
                    );
                    break;
                }
                SyntaxKind::RBrace => {
                    self.error(
                        SyntaxErrorKind::UnmatchedBrace,
                        "Unmatched '}' inside environment".into(),
                    );
                    self.builder.start_node(SyntaxKind::Error.into());
                    self.bump();
                    self.builder.finish_node();
                }
                _ => self.parse_element(),
            }
        }

        self.frames.pop();
        self.builder.finish_node();
    }
}

pub struct ParseResult {
    pub green_node: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green_node.clone())
    }
}

pub fn parse(input: &str) -> ParseResult {
    Parser::new(input).parse()
}
