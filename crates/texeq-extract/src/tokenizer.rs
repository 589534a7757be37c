//! Finds the outermost math environments of a preprocessed document.

use log::{debug, warn};
use texeq_syntax::ast::Environment;
use texeq_syntax::{parse, SyntaxError, SyntaxNode};

use crate::ast::{DisplayMath, MathBlock, MathEnv};
use crate::error::ExtractError;
use crate::lines::display_body;

const SUBEQUATIONS: &str = "subequations";

/// The math blocks of one document plus what went wrong finding them.
#[derive(Debug)]
pub struct Tokenized {
    pub blocks: Vec<MathBlock>,
    pub problems: Vec<ExtractError>,
}

/// Scans `text` for `subequations` blocks and numbered display environments.
///
/// Environments are found at any depth of non-math structure, but never
/// inside another math environment. An unclosed math environment yields no
/// block; the scan continues inside it so later environments still count.
pub fn tokenize(text: &str) -> Tokenized {
    let parse = parse(text);
    let problems = parse
        .errors
        .iter()
        .filter(|error| error.kind.is_environment_error())
        .map(malformed)
        .collect();

    let mut blocks = Vec::new();
    walk(&parse.syntax(), &mut blocks);
    debug!("found {} math blocks", blocks.len());

    Tokenized { blocks, problems }
}

fn malformed(error: &SyntaxError) -> ExtractError {
    let offset = usize::from(error.range.start());
    warn!("skipping malformed environment at byte {}: {}", offset, error.message);
    ExtractError::MalformedEnvironment {
        message: error.message.clone(),
        offset,
    }
}

fn walk(node: &SyntaxNode, blocks: &mut Vec<MathBlock>) {
    for child in node.children() {
        let Some(env) = Environment::cast(child.clone()) else {
            walk(&child, blocks);
            continue;
        };
        let name = env.name().unwrap_or_default();
        if env.is_closed() && name == SUBEQUATIONS {
            let mut displays = Vec::new();
            collect_displays(env.syntax(), &mut displays);
            blocks.push(MathBlock::Subequations(displays));
        } else if let Some(display) = display(&env, &name) {
            blocks.push(MathBlock::Display(display));
        } else {
            walk(&child, blocks);
        }
    }
}

/// Display environments under `node`; nested `subequations` are transparent.
fn collect_displays(node: &SyntaxNode, out: &mut Vec<DisplayMath>) {
    for child in node.children() {
        let display = Environment::cast(child.clone())
            .and_then(|env| display(&env, &env.name().unwrap_or_default()));
        match display {
            Some(display) => out.push(display),
            None => collect_displays(&child, out),
        }
    }
}

fn display(env: &Environment, name: &str) -> Option<DisplayMath> {
    if !env.is_closed() {
        return None;
    }
    let (kind, starred) = MathEnv::parse(name)?;
    Some(DisplayMath {
        env: kind,
        starred,
        body: display_body(env, kind),
        offset: env.offset(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Body, Line};

    fn displays(blocks: &[MathBlock]) -> Vec<&DisplayMath> {
        blocks
            .iter()
            .filter_map(|block| match block {
                MathBlock::Display(display) => Some(display),
                MathBlock::Subequations(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_finds_top_level_environments() {
        let text = r"
\begin{equation} a \end{equation}
text
\begin{align*} b \end{align*}
\begin{figure} \begin{gather} c \end{gather} \end{figure}
";
        let tokenized = tokenize(text);
        assert!(tokenized.problems.is_empty());
        let found: Vec<_> = displays(&tokenized.blocks)
            .iter()
            .map(|d| (d.env, d.starred))
            .collect();
        assert_eq!(
            found,
            vec![
                (MathEnv::Equation, false),
                (MathEnv::Align, true),
                (MathEnv::Gather, false)
            ]
        );
    }

    #[test]
    fn test_math_inside_math_is_not_a_block() {
        let text = r"\begin{align} a \begin{equation} b \end{equation} \end{align}";
        let tokenized = tokenize(text);
        assert_eq!(tokenized.blocks.len(), 1);
    }

    #[test]
    fn test_subequations_collects_inner_displays() {
        let text = r"
\begin{subequations}
  \begin{align} a \\ b \end{align}
  \begin{itemize} \begin{equation*} s \end{equation*} \end{itemize}
  \begin{equation} c \end{equation}
\end{subequations}
";
        let tokenized = tokenize(text);
        match &tokenized.blocks[..] {
            [MathBlock::Subequations(inner)] => {
                assert_eq!(inner.len(), 3);
                assert_eq!(inner[0].env, MathEnv::Align);
                assert!(inner[1].starred);
                assert_eq!(
                    inner[2].body,
                    Body::Lines {
                        alignment: false,
                        lines: vec![Line::new("c")]
                    }
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_same_name_nesting() {
        let text = r"\begin{equation} \begin{cases} a \begin{cases} b \end{cases} \end{cases} \end{equation} \begin{equation} z \end{equation}";
        let tokenized = tokenize(text);
        assert!(tokenized.problems.is_empty());
        assert_eq!(tokenized.blocks.len(), 2);
    }

    #[test]
    fn test_unclosed_environment_is_reported_and_skipped() {
        let text = r"\begin{align} a \\ b \begin{equation} c \end{equation}";
        let tokenized = tokenize(text);
        assert_eq!(tokenized.problems.len(), 1);
        assert!(matches!(
            tokenized.problems[0],
            ExtractError::MalformedEnvironment { .. }
        ));
        let found = displays(&tokenized.blocks);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].env, MathEnv::Equation);
    }

    #[test]
    fn test_stray_end_does_not_stop_the_scan() {
        let text = r"\end{align} \begin{equation} x \end{equation}";
        let tokenized = tokenize(text);
        assert_eq!(tokenized.problems.len(), 1);
        assert_eq!(tokenized.blocks.len(), 1);
    }

    #[test]
    fn test_offsets() {
        let text = r"ab \begin{equation} x \end{equation}";
        let found = tokenize(text);
        assert_eq!(displays(&found.blocks)[0].offset, 3);
    }
}
