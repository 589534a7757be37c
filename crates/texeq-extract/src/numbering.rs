//! Assigning printed labels to the blocks found by the tokenizer.

use crate::ast::{Body, DisplayMath, Line, MathBlock};
use crate::EquationRecord;

/// The equation counter of one document.
///
/// Create a fresh state for every document; nothing here is shared between
/// documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingState {
    /// Value the next plain label will carry.
    pub next_counter: u32,
    pub in_subequations: bool,
    /// Parent number of the open `subequations` block.
    pub subequation_base: Option<u32>,
    /// Zero-based index of the next letter suffix (`0` is `a`).
    pub next_letter: u32,
}

impl Default for NumberingState {
    fn default() -> Self {
        Self {
            next_counter: 1,
            in_subequations: false,
            subequation_base: None,
            next_letter: 0,
        }
    }
}

impl NumberingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the next label and advances the counter or the letter.
    pub fn next_label(&mut self) -> String {
        match self.subequation_base {
            Some(base) if self.in_subequations => {
                let label = format!("{}{}", base, alph(self.next_letter));
                self.next_letter += 1;
                label
            }
            _ => {
                let label = self.next_counter.to_string();
                self.next_counter += 1;
                label
            }
        }
    }

    /// Reserves the parent number of a `subequations` block and returns it.
    pub fn begin_subequations(&mut self) -> u32 {
        let base = self.next_counter;
        self.next_counter += 1;
        self.in_subequations = true;
        self.subequation_base = Some(base);
        self.next_letter = 0;
        base
    }

    pub fn end_subequations(&mut self) {
        self.in_subequations = false;
        self.subequation_base = None;
        self.next_letter = 0;
    }
}

/// Letter suffix for a zero-based index: `a`..`z`, then `aa`, `ab`, ...
pub fn alph(mut index: u32) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'a' + (index % 26) as u8));
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Numbers `blocks` in document order.
pub fn number(blocks: &[MathBlock], state: &mut NumberingState) -> Vec<EquationRecord> {
    let mut records = Vec::new();
    for block in blocks {
        match block {
            MathBlock::Display(display) => number_display(display, state, &mut records),
            MathBlock::Subequations(displays) => {
                state.begin_subequations();
                for display in displays {
                    number_display(display, state, &mut records);
                }
                state.end_subequations();
            }
        }
    }
    records
}

fn number_display(
    display: &DisplayMath,
    state: &mut NumberingState,
    out: &mut Vec<EquationRecord>,
) {
    if display.starred {
        return;
    }
    match &display.body {
        Body::Nested { suppressed, inner } => {
            let body = inner
                .iter()
                .flat_map(|nested| nested.lines.iter())
                .map(|line| line.text.as_str())
                .collect::<Vec<_>>()
                .join(" \\\\ ");
            out.push(record(*suppressed, body, state));
        }
        Body::Lines {
            alignment: true,
            lines,
        } => {
            for line in lines {
                out.push(record(line.suppressed, line.text.clone(), state));
            }
        }
        Body::Lines {
            alignment: false,
            lines,
        } => number_single(lines, state, out),
    }
}

/// A block that carries one number: on its first line, unless any line
/// asks for suppression.
fn number_single(lines: &[Line], state: &mut NumberingState, out: &mut Vec<EquationRecord>) {
    let suppressed = lines.iter().any(|line| line.suppressed);
    let Some((first, rest)) = lines.split_first() else {
        out.push(record(false, String::new(), state));
        return;
    };
    out.push(record(suppressed, first.text.clone(), state));
    out.extend(rest.iter().map(|line| EquationRecord::unnumbered(line.text.clone())));
}

fn record(suppressed: bool, body: String, state: &mut NumberingState) -> EquationRecord {
    if suppressed {
        EquationRecord::unnumbered(body)
    } else {
        EquationRecord::numbered(state.next_label(), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{MathEnv, NestedMath};

    fn display(env: MathEnv, starred: bool, body: Body) -> MathBlock {
        MathBlock::Display(display_math(env, starred, body))
    }

    fn display_math(env: MathEnv, starred: bool, body: Body) -> DisplayMath {
        DisplayMath {
            env,
            starred,
            body,
            offset: 0,
        }
    }

    fn aligned(lines: Vec<Line>) -> Body {
        Body::Lines {
            alignment: true,
            lines,
        }
    }

    fn single(lines: Vec<Line>) -> Body {
        Body::Lines {
            alignment: false,
            lines,
        }
    }

    fn labels(records: &[EquationRecord]) -> Vec<Option<&str>> {
        records.iter().map(|r| r.number.as_deref()).collect()
    }

    #[test]
    fn test_alph() {
        assert_eq!(alph(0), "a");
        assert_eq!(alph(25), "z");
        assert_eq!(alph(26), "aa");
        assert_eq!(alph(27), "ab");
        assert_eq!(alph(51), "az");
        assert_eq!(alph(52), "ba");
    }

    #[test]
    fn test_state_lifecycle() {
        let mut state = NumberingState::new();
        assert_eq!(state.next_label(), "1");
        assert_eq!(state.begin_subequations(), 2);
        assert_eq!(state.next_label(), "2a");
        assert_eq!(state.next_label(), "2b");
        state.end_subequations();
        assert_eq!(state.next_counter, 3);
        assert_eq!(state.next_label(), "3");
    }

    #[test]
    fn test_suppressed_lines_do_not_advance() {
        let blocks = vec![display(
            MathEnv::Align,
            false,
            aligned(vec![Line::new("a"), Line::suppressed("b"), Line::new("c")]),
        )];
        let records = number(&blocks, &mut NumberingState::new());
        assert_eq!(labels(&records), vec![Some("1"), None, Some("2")]);
        assert_eq!(records[1].body, "b");
    }

    #[test]
    fn test_starred_contributes_nothing() {
        let blocks = vec![
            display(MathEnv::Align, true, aligned(vec![Line::new("a")])),
            display(MathEnv::Equation, false, single(vec![Line::new("b")])),
        ];
        let records = number(&blocks, &mut NumberingState::new());
        assert_eq!(records, vec![EquationRecord::numbered("1", "b")]);
    }

    #[test]
    fn test_single_number_blocks() {
        let blocks = vec![
            display(
                MathEnv::Multline,
                false,
                single(vec![Line::new("a"), Line::new("b")]),
            ),
            display(
                MathEnv::Equation,
                false,
                single(vec![Line::new("c"), Line::suppressed("d")]),
            ),
            display(MathEnv::Equation, false, single(vec![])),
        ];
        let records = number(&blocks, &mut NumberingState::new());
        assert_eq!(
            records,
            vec![
                EquationRecord::numbered("1", "a"),
                EquationRecord::unnumbered("b"),
                EquationRecord::unnumbered("c"),
                EquationRecord::unnumbered("d"),
                EquationRecord::numbered("2", ""),
            ]
        );
    }

    #[test]
    fn test_nested_body_gets_one_number() {
        let body = Body::Nested {
            suppressed: false,
            inner: vec![NestedMath {
                name: "pmatrix".to_string(),
                lines: vec![Line::new("1 & 0"), Line::new("0 & 1")],
            }],
        };
        let records = number(
            &[display(MathEnv::Equation, false, body)],
            &mut NumberingState::new(),
        );
        assert_eq!(records, vec![EquationRecord::numbered("1", r"1 & 0 \\ 0 & 1")]);
    }

    #[test]
    fn test_subequations_share_letters_across_environments() {
        let blocks = vec![
            MathBlock::Subequations(vec![
                display_math(
                    MathEnv::Align,
                    false,
                    aligned(vec![Line::new("a"), Line::suppressed("x")]),
                ),
                display_math(MathEnv::Equation, true, single(vec![Line::new("s")])),
                display_math(MathEnv::Equation, false, single(vec![Line::new("b")])),
            ]),
            display(MathEnv::Equation, false, single(vec![Line::new("c")])),
        ];
        let records = number(&blocks, &mut NumberingState::new());
        assert_eq!(labels(&records), vec![Some("1a"), None, Some("1b"), Some("2")]);
    }

    #[test]
    fn test_empty_subequations_still_consume_a_number() {
        let blocks = vec![
            MathBlock::Subequations(vec![]),
            display(MathEnv::Equation, false, single(vec![Line::new("c")])),
        ];
        let records = number(&blocks, &mut NumberingState::new());
        assert_eq!(labels(&records), vec![Some("2")]);
    }

    #[test]
    fn test_zero_line_alignment_has_no_records() {
        let blocks = vec![display(MathEnv::Align, false, aligned(vec![]))];
        assert!(number(&blocks, &mut NumberingState::new()).is_empty());
    }
}
