//! Custom command resolution.
//!
//! Papers often abbreviate display math with macros such as
//! `\def\beq{\begin{equation}}`. This module finds those aliases and rewrites
//! the document so that later stages only ever see literal
//! `\begin{...}`/`\end{...}`.
//!
//! Recognized forms, each with a body that is exactly one `\begin{env}` or
//! `\end{env}`:
//!
//! - `\def\name{...}`
//! - `\newcommand{\name}[n]{...}`, `\renewcommand`, `\providecommand`,
//!   optionally starred, with or without braces around `\name`

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use texeq_syntax::lexer::Lexer;
use texeq_syntax::SyntaxKind;

static DEF_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\def\s*\\([A-Za-z]+)\s*\{\s*\\(begin|end)\s*\{([^{}]+)\}\s*\}").unwrap()
});

static COMMAND_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\\(?:newcommand|renewcommand|providecommand)\*?\s*(?:\{\s*\\([A-Za-z]+)\s*\}|\\([A-Za-z]+))\s*(?:\[\s*\d\s*\])?\s*\{\s*\\(begin|end)\s*\{([^{}]+)\}\s*\}",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Begin,
    End,
}

impl Direction {
    fn from_keyword(keyword: &str) -> Self {
        if keyword == "end" {
            Self::End
        } else {
            Self::Begin
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Begin => f.write_str("begin"),
            Self::End => f.write_str("end"),
        }
    }
}

/// What one alias macro stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub direction: Direction,
    pub environment: String,
}

impl Alias {
    /// The canonical text the macro is replaced with, e.g. `\begin{equation}`.
    pub fn expansion(&self) -> String {
        format!("\\{}{{{}}}", self.direction, self.environment)
    }
}

/// Alias macros of one document, keyed by name without the backslash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomCommandTable {
    aliases: BTreeMap<String, Alias>,
}

/// A definition statement found in the source.
struct Definition {
    start: usize,
    end: usize,
    name: String,
    alias: Alias,
}

impl CustomCommandTable {
    /// Scans `text` for alias definitions. The first definition of a name wins.
    pub fn discover(text: &str) -> Self {
        let mut table = Self::default();
        for definition in definitions(text) {
            table.insert(definition.name, definition.alias);
        }
        table
    }

    fn insert(&mut self, name: String, alias: Alias) {
        if self.aliases.contains_key(&name) {
            return;
        }
        debug!("alias \\{} -> {}", name, alias.expansion());
        self.aliases.insert(name, alias);
    }

    pub fn get(&self, name: &str) -> Option<&Alias> {
        self.aliases.get(name)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Replaces every invocation of an alias with its expansion.
    ///
    /// Control words are matched whole, token by token, so an alias `\be`
    /// never rewrites the head of `\beq` or `\bea`, regardless of the order in
    /// which aliases were defined. Unknown macros pass through untouched.
    pub fn rewrite(&self, text: &str) -> String {
        if self.is_empty() {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        for (kind, token) in Lexer::new(text) {
            let alias = token
                .strip_prefix('\\')
                .filter(|_| kind == SyntaxKind::Command)
                .and_then(|name| self.get(name));
            match alias {
                Some(alias) => out.push_str(&alias.expansion()),
                None => out.push_str(token),
            }
        }
        out
    }
}

/// Result of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub table: CustomCommandTable,
    /// The document with definitions removed and aliases expanded.
    pub text: String,
}

/// Discovers aliases, removes their definitions and expands their uses.
///
/// Removing the definition statements keeps a bare `\begin{equation}` body
/// from being mistaken for a real environment when the input has no preamble.
pub fn resolve(text: &str) -> Resolved {
    let definitions = definitions(text);
    if definitions.is_empty() {
        return Resolved {
            table: CustomCommandTable::default(),
            text: text.to_string(),
        };
    }

    let mut table = CustomCommandTable::default();
    let mut stripped = String::with_capacity(text.len());
    let mut cursor = 0;
    for definition in definitions {
        if definition.start >= cursor {
            stripped.push_str(&text[cursor..definition.start]);
            cursor = definition.end;
        }
        table.insert(definition.name, definition.alias);
    }
    stripped.push_str(&text[cursor..]);

    let text = table.rewrite(&stripped);
    Resolved { table, text }
}

/// All alias definitions in document order.
fn definitions(text: &str) -> Vec<Definition> {
    let mut found: Vec<Definition> = DEF_ALIAS
        .captures_iter(text)
        .filter_map(|caps| definition(&caps, 1, None, 2, 3))
        .chain(
            COMMAND_ALIAS
                .captures_iter(text)
                .filter_map(|caps| definition(&caps, 1, Some(2), 3, 4)),
        )
        .collect();
    found.sort_by_key(|definition| definition.start);
    found
}

fn definition(
    caps: &Captures<'_>,
    name: usize,
    alt_name: Option<usize>,
    direction: usize,
    environment: usize,
) -> Option<Definition> {
    let whole = caps.get(0)?;
    let name = caps
        .get(name)
        .or_else(|| alt_name.and_then(|index| caps.get(index)))?;
    Some(Definition {
        start: whole.start(),
        end: whole.end(),
        name: name.as_str().to_string(),
        alias: Alias {
            direction: Direction::from_keyword(caps.get(direction)?.as_str()),
            environment: caps.get(environment)?.as_str().trim().to_string(),
        },
    })
}
