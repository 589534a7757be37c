//! Splitting one environment body into logical lines.
//!
//! Works on the children of an [`Environment`] node. Only breaks, separators
//! and markers at the environment's own level are interpreted; groups and
//! deeper environments are copied verbatim into the line that contains them,
//! apart from suppression markers, which count wherever they appear.

use texeq_syntax::ast::{group_text, Environment};
use texeq_syntax::{SyntaxElement, SyntaxKind, SyntaxNode};

use crate::ast::{is_alignment_name, is_nested_environment, Body, Line, MathEnv, NestedMath};

const SUPPRESSION_MARKERS: [&str; 2] = ["\\notag", "\\nonumber"];

/// Leading arguments an environment takes before its body starts.
#[derive(Debug, Clone, Copy, Default)]
struct Arguments {
    optional: bool,
    required: bool,
}

fn arguments(name: &str) -> Arguments {
    match name.trim_end_matches('*') {
        "alignat" | "xalignat" => Arguments {
            optional: false,
            required: true,
        },
        "aligned" | "gathered" => Arguments {
            optional: true,
            required: false,
        },
        "alignedat" | "empheq" => Arguments {
            optional: true,
            required: true,
        },
        _ => Arguments::default(),
    }
}

/// Builds the body of a numbered display environment.
pub fn display_body(env: &Environment, kind: MathEnv) -> Body {
    let name = kind.name();
    let elements = env.body();
    let (start, required) = skip_arguments(&elements, arguments(name));

    let alignment = match kind {
        MathEnv::Empheq => required.as_deref().is_some_and(is_alignment_name),
        other => other.is_alignment(),
    };
    let elements = &elements[start..];

    let mut nested = Vec::new();
    let mut suppressed = false;
    collect_nested(elements, &mut nested, &mut suppressed);
    if nested.is_empty() {
        return Body::Lines {
            alignment,
            lines: split_lines(elements, alignment),
        };
    }

    let inner = nested.iter().map(nested_math).collect();
    Body::Nested {
        // A marker on one line of an alignment environment leaves the
        // combined record numbered.
        suppressed: suppressed && !alignment,
        inner,
    }
}

fn nested_math(env: &Environment) -> NestedMath {
    let name = env.name().unwrap_or_default();
    let elements = env.body();
    let (start, _) = skip_arguments(&elements, arguments(&name));
    let lines = split_lines(&elements[start..], is_alignment_name(&name));
    NestedMath { name, lines }
}

/// Returns the index of the first body element and the text of the required
/// argument, if one was expected and present.
fn skip_arguments(elements: &[SyntaxElement], args: Arguments) -> (usize, Option<String>) {
    let mut i = 0;
    if args.optional {
        let j = skip_whitespace(elements, i);
        if let Some(end) = bracket_end(elements, j) {
            i = end;
        }
    }
    let mut required = None;
    if args.required {
        let j = skip_whitespace(elements, i);
        if let Some(SyntaxElement::Node(node)) = elements.get(j) {
            if node.kind() == SyntaxKind::Group {
                required = group_text(node);
                i = j + 1;
            }
        }
    }
    (i, required)
}

fn skip_whitespace(elements: &[SyntaxElement], mut i: usize) -> usize {
    while elements
        .get(i)
        .is_some_and(|el| el.kind() == SyntaxKind::Whitespace)
    {
        i += 1;
    }
    i
}

/// Index just past the `[...]` that starts at `start`, if there is one.
fn bracket_end(elements: &[SyntaxElement], start: usize) -> Option<usize> {
    if elements.get(start)?.kind() != SyntaxKind::LBracket {
        return None;
    }
    let mut depth = 0usize;
    for (offset, el) in elements[start..].iter().enumerate() {
        match el.kind() {
            SyntaxKind::LBracket => depth += 1,
            SyntaxKind::RBracket => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Finds the outermost closed nested structures among `elements`, descending
/// through groups and unrelated environments. Suppression markers met along
/// the way, outside the nested structures, set `suppressed`.
fn collect_nested(elements: &[SyntaxElement], out: &mut Vec<Environment>, suppressed: &mut bool) {
    for element in elements {
        match element {
            SyntaxElement::Token(token) => {
                if is_marker(token.kind(), token.text()) {
                    *suppressed = true;
                }
            }
            SyntaxElement::Node(node) => match Environment::cast(node.clone()) {
                Some(env)
                    if env.is_closed()
                        && env.name().as_deref().is_some_and(is_nested_environment) =>
                {
                    out.push(env);
                }
                Some(env) => collect_nested(&env.body(), out, suppressed),
                None => {
                    let children: Vec<_> = node.children_with_tokens().collect();
                    collect_nested(&children, out, suppressed);
                }
            },
        }
    }
}

fn is_marker(kind: SyntaxKind, text: &str) -> bool {
    kind == SyntaxKind::Command && SUPPRESSION_MARKERS.contains(&text)
}

/// A line being assembled, one string per alignment column.
#[derive(Default)]
struct LineBuilder {
    columns: Vec<String>,
    suppressed: bool,
}

impl LineBuilder {
    fn push(&mut self, text: &str) {
        match self.columns.last_mut() {
            Some(column) => column.push_str(text),
            None => self.columns.push(text.to_string()),
        }
    }

    fn next_column(&mut self) {
        if self.columns.is_empty() {
            self.columns.push(String::new());
        }
        self.columns.push(String::new());
    }

    fn push_node(&mut self, node: &SyntaxNode) {
        for token in node
            .descendants_with_tokens()
            .filter_map(|el| el.into_token())
        {
            if is_marker(token.kind(), token.text()) {
                self.suppressed = true;
            } else {
                self.push(token.text());
            }
        }
    }

    fn finish(self, alignment: bool) -> Option<Line> {
        let text = if alignment {
            self.columns
                .iter()
                .map(|column| column.trim())
                .collect::<Vec<_>>()
                .join(" & ")
        } else {
            self.columns.concat()
        };
        let text = text.trim();
        if text.is_empty() && !self.suppressed {
            return None;
        }
        Some(Line {
            text: text.to_string(),
            suppressed: self.suppressed,
        })
    }
}

/// Splits `elements` at `\\`, normalizing `&` when `alignment` is set.
///
/// The `*` and `[dimen]` that may follow a line break are dropped. Blank
/// lines are dropped too, unless they carry a suppression marker.
pub fn split_lines(elements: &[SyntaxElement], alignment: bool) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = LineBuilder::default();
    let mut i = 0;

    while i < elements.len() {
        let element = &elements[i];
        i += 1;
        match element {
            SyntaxElement::Node(node) => line.push_node(node),
            SyntaxElement::Token(token) => match token.kind() {
                SyntaxKind::LineBreak => {
                    lines.extend(std::mem::take(&mut line).finish(alignment));
                    i = skip_break_options(elements, i, &mut line);
                }
                SyntaxKind::Ampersand if alignment => line.next_column(),
                kind if is_marker(kind, token.text()) => line.suppressed = true,
                _ => line.push(token.text()),
            },
        }
    }
    lines.extend(line.finish(alignment));
    lines
}

/// Consumes the `*` and `[...]` directly after a `\\`. A text token that
/// starts with `*` keeps its remainder.
fn skip_break_options(elements: &[SyntaxElement], mut i: usize, line: &mut LineBuilder) -> usize {
    if let Some(SyntaxElement::Token(token)) = elements.get(i) {
        if token.kind() == SyntaxKind::Text {
            if let Some(rest) = token.text().strip_prefix('*') {
                i += 1;
                if !rest.is_empty() {
                    line.push(rest);
                    return i;
                }
            }
        }
    }
    bracket_end(elements, i).unwrap_or(i)
}
