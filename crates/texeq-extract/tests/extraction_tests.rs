use pretty_assertions::assert_eq;
use texeq_extract::{extract, extract_with, EquationRecord, ExtractError, ExtractOptions};

fn numbers(text: &str) -> Vec<Option<String>> {
    extract(text).records.into_iter().map(|r| r.number).collect()
}

fn label(s: &str) -> Option<String> {
    Some(s.to_string())
}

#[test]
fn test_single_equation_is_number_one() {
    let records = extract(r"\begin{equation} x^2 + y^2 = z^2 \end{equation}").records;
    assert_eq!(records, vec![EquationRecord::numbered("1", "x^2 + y^2 = z^2")]);
}

#[test]
fn test_subequations_use_letters_then_resume() {
    let text = r"
\begin{subequations}
\begin{align}
  a &= 1 \\
  b &= 2 \\
  c &= 3
\end{align}
\end{subequations}
\begin{equation} d = 4 \end{equation}
";
    assert_eq!(
        numbers(text),
        vec![label("1a"), label("1b"), label("1c"), label("2")]
    );
}

#[test]
fn test_notag_does_not_advance_the_counter() {
    let with_marker = r"
\begin{align}
  a &= 1 \\
  b &= 2 \notag \\
  c &= 3
\end{align}";
    let without_line = r"
\begin{align}
  a &= 1 \\
  c &= 3
\end{align}";
    assert_eq!(numbers(with_marker), vec![label("1"), None, label("2")]);
    assert_eq!(numbers(without_line), vec![label("1"), label("2")]);

    let records = extract(with_marker).records;
    assert_eq!(records[1], EquationRecord::unnumbered("b & = 2"));
}

#[test]
fn test_nonumber_in_equation_suppresses_it() {
    let text = r"\begin{equation} a \nonumber \end{equation} \begin{equation} b \end{equation}";
    assert_eq!(numbers(text), vec![None, label("1")]);
}

#[test]
fn test_starred_environments_contribute_nothing() {
    let text = r"
\begin{align*} a &= b \\ c &= d \end{align*}
\begin{equation*} e \end{equation*}
\begin{gather*} f \end{gather*}
";
    assert!(extract(text).records.is_empty());
}

#[test]
fn test_aliases_extract_like_literal_environments() {
    let aliased = r"
\def\beq{\begin{equation}}
\def\eeq{\end{equation}}
\begin{document}
\beq a = b \eeq
\beq c = d \eeq
\end{document}";
    let literal = r"
\begin{document}
\begin{equation} a = b \end{equation}
\begin{equation} c = d \end{equation}
\end{document}";
    assert_eq!(extract(aliased).records, extract(literal).records);
}

#[test]
fn test_prefix_aliases_do_not_collide() {
    let text = r"
\newcommand{\be}{\begin{equation}}
\newcommand{\ee}{\end{equation}}
\newcommand{\bea}{\begin{eqnarray}}
\newcommand{\eea}{\end{eqnarray}}
\be x \ee
\bea y &=& z \\ u &=& v \eea
";
    let records = extract(text).records;
    assert_eq!(
        records,
        vec![
            EquationRecord::numbered("1", "x"),
            EquationRecord::numbered("2", "y & = & z"),
            EquationRecord::numbered("3", "u & = & v"),
        ]
    );
}

#[test]
fn test_third_equation_round_trip() {
    let text = r"
\begin{document}
\begin{equation} a \end{equation}
% \begin{equation} commented \end{equation}
\begin{equation*} skipped \end{equation*}
\begin{equation} b \end{equation}
\begin{align}
  x &= y \label{eq:three} % the one
\end{align}
\end{document}";
    let extraction = extract(text);
    assert_eq!(extraction.locate("3").unwrap().body, "x & = y");
}

#[test]
fn test_extraction_is_idempotent() {
    let text = r"
\begin{subequations}\begin{equation} a \end{equation}\end{subequations}
\begin{align} b \\ c \notag \\ d \end{align}";
    assert_eq!(extract(text).records, extract(text).records);
}

#[test]
fn test_duplicates_and_order_are_preserved() {
    let text = r"
\begin{equation} first \end{equation}
\begin{subequations}
\begin{equation} inner \end{equation}
\end{subequations}
\begin{align} a \\ b \end{align}";
    assert_eq!(
        numbers(text),
        vec![label("1"), label("2a"), label("3"), label("4")]
    );
}

#[test]
fn test_malformed_environment_does_not_stop_extraction() {
    let text = r"
\begin{equation} a \end{equation}
\begin{align} broken \end{gather}
\begin{equation} b \end{equation}";
    let extraction = extract(text);
    assert!(!extraction.problems.is_empty());
    assert!(
        extraction
            .problems
            .iter()
            .all(|p| matches!(p, ExtractError::MalformedEnvironment { .. }))
    );
    let bodies: Vec<_> = extraction.records.iter().map(|r| r.body.as_str()).collect();
    assert!(bodies.contains(&"a"));
    assert!(bodies.contains(&"b"));
}

#[test]
fn test_text_after_document_end_is_ignored() {
    let text = r"\begin{document}\begin{equation} a \end{equation}\end{document}
\begin{equation} b \end{equation}";
    assert_eq!(numbers(text), vec![label("1")]);

    let options = ExtractOptions {
        respect_document_end: false,
        ..ExtractOptions::default()
    };
    assert_eq!(extract_with(text, &options).records.len(), 2);
}

#[test]
fn test_oversized_input_is_truncated() {
    let text = r"\begin{equation} a \end{equation}\begin{equation} b \end{equation}";
    let options = ExtractOptions {
        max_input_bytes: 33,
        ..ExtractOptions::default()
    };
    let records = extract_with(text, &options).records;
    assert_eq!(records, vec![EquationRecord::numbered("1", "a")]);
}

#[test]
fn test_unknown_label_is_not_found() {
    let extraction = extract(r"\begin{equation} a \end{equation}");
    assert!(matches!(
        extraction.locate("1a"),
        Err(ExtractError::NotFound { .. })
    ));
}

#[test]
fn test_confirmation_window() {
    let text = r"\begin{align} a \\ b \\ c \\ d \\ e \end{align}";
    let extraction = extract(text);
    let pending = extraction.disambiguate("3", 1).unwrap();
    let window: Vec<_> = pending
        .window()
        .iter()
        .map(|(_, record)| record.body.as_str())
        .collect();
    assert_eq!(window, vec!["b", "c", "d"]);
    assert_eq!(pending.answer("yes").unwrap().body, "c");
    assert_eq!(pending.answer("5").unwrap().body, "e");
}

#[test]
fn test_line_marker_beside_nested_structures_in_align() {
    let text = r"
\def\beq{\begin{equation}}
\def\eeq{\end{equation}}
\def\ba{\begin{align}}
\def\ea{\end{align}}
\begin{document}
\ba
x &= \begin{pmatrix} 1 & 2 \\ 3 & 4 \end{pmatrix} \notag \\
z &= w \\
\begin{cases} a &= b \nonumber \\ c &= d \end{cases}
\ea
\beq q = r \eeq
\end{document}
";
    assert_eq!(
        extract(text).records,
        vec![
            EquationRecord::numbered("1", r"1 & 2 \\ 3 & 4 \\ a &= b \\ c &= d"),
            EquationRecord::numbered("2", "q = r"),
        ]
    );
}

#[test]
fn test_marker_only_line_keeps_its_place() {
    let records = extract(r"\begin{align} a \\ \notag \\ b \end{align}").records;
    assert_eq!(
        records,
        vec![
            EquationRecord::numbered("1", "a"),
            EquationRecord::unnumbered(""),
            EquationRecord::numbered("2", "b"),
        ]
    );
}

#[test]
fn test_deep_braces_do_not_overflow() {
    let text = format!(
        r"\begin{{equation}} a \end{{equation}}{}",
        "{".repeat(1_000_000)
    );
    assert_eq!(extract(&text).records, vec![EquationRecord::numbered("1", "a")]);
}
