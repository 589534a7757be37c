//! Typed views over the untyped CST.

use crate::{SyntaxElement, SyntaxKind, SyntaxNode};

/// A `\begin{name} ... \end{name}` node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Environment(SyntaxNode);

impl Environment {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        (node.kind() == SyntaxKind::Environment).then_some(Self(node))
    }

    pub fn syntax(&self) -> &SyntaxNode {
        &self.0
    }

    /// The environment name as written in `\begin{...}`, e.g. `align*`.
    pub fn name(&self) -> Option<String> {
        let begin = self.marker(SyntaxKind::BeginMarker)?;
        group_text(&begin.children().find(|n| n.kind() == SyntaxKind::Group)?)
    }

    /// True if the parser found the matching `\end{name}`.
    pub fn is_closed(&self) -> bool {
        self.marker(SyntaxKind::EndMarker).is_some()
    }

    /// Everything between the begin and end markers, in source order.
    pub fn body(&self) -> Vec<SyntaxElement> {
        self.0
            .children_with_tokens()
            .filter(|el| {
                !matches!(el.kind(), SyntaxKind::BeginMarker | SyntaxKind::EndMarker)
            })
            .collect()
    }

    /// Byte offset of the `\begin` command.
    pub fn offset(&self) -> usize {
        self.0.text_range().start().into()
    }

    fn marker(&self, kind: SyntaxKind) -> Option<SyntaxNode> {
        self.0.children().find(|n| n.kind() == kind)
    }
}

/// Text inside a `{...}` group, without the braces, trimmed.
pub fn group_text(group: &SyntaxNode) -> Option<String> {
    if group.kind() != SyntaxKind::Group {
        return None;
    }
    let text: String = group
        .children_with_tokens()
        .filter(|el| !matches!(el.kind(), SyntaxKind::LBrace | SyntaxKind::RBrace))
        .map(|el| element_text(&el))
        .collect();
    Some(text.trim().to_string())
}

/// Source text covered by a node or token.
pub fn element_text(element: &SyntaxElement) -> String {
    match element {
        SyntaxElement::Node(node) => node.text().to_string(),
        SyntaxElement::Token(token) => token.text().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn first_env(input: &str) -> Environment {
        parse(input)
            .syntax()
            .descendants()
            .find_map(Environment::cast)
            .unwrap()
    }

    #[test]
    fn test_body_excludes_markers() {
        let env = first_env(r"\begin{equation}x=1\end{equation}");
        let body: String = env.body().iter().map(element_text).collect();
        assert_eq!(body, "x=1");
    }

    #[test]
    fn test_unclosed_body_runs_to_eof() {
        let env = first_env(r"\begin{gather} a \\ b");
        assert!(!env.is_closed());
        let body: String = env.body().iter().map(element_text).collect();
        assert_eq!(body, r" a \\ b");
    }

    #[test]
    fn test_offset() {
        let env = first_env(r"ab \begin{split} \end{split}");
        assert_eq!(env.offset(), 3);
    }

    #[test]
    fn test_group_text_rejects_non_groups() {
        let root = parse("x").syntax();
        assert_eq!(group_text(&root), None);
    }
}
