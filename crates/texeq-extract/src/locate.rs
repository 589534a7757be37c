//! Looking up an equation by the number a reader of the paper sees.

use crate::error::ExtractError;
use crate::EquationRecord;

/// Index of the first record numbered exactly `label`.
pub fn position(records: &[EquationRecord], label: &str) -> Option<usize> {
    records
        .iter()
        .position(|record| record.number.as_deref() == Some(label))
}

/// The first record numbered exactly `label`; `"7"` never matches `"7a"`.
pub fn locate<'a>(
    records: &'a [EquationRecord],
    label: &str,
) -> Result<&'a EquationRecord, ExtractError> {
    position(records, label)
        .map(|index| &records[index])
        .ok_or_else(|| ExtractError::not_found(label))
}

/// A reply to "is this the equation you meant?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Confirm,
    /// Use the record with this label instead.
    Relabel(String),
}

impl Answer {
    /// `y`/`yes` confirm, any other word is a replacement label, blank input
    /// is no answer.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            None
        } else if input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes") {
            Some(Self::Confirm)
        } else {
            Some(Self::Relabel(input.to_string()))
        }
    }
}

/// A pending lookup waiting for the user to confirm the match.
///
/// Exposes the records around the match so the caller can show them, then
/// turns an [`Answer`] into the final record. Reading the answer is up to the
/// caller.
#[derive(Debug, Clone)]
pub struct Disambiguation<'a> {
    records: &'a [EquationRecord],
    index: usize,
    label: String,
    radius: usize,
}

impl<'a> Disambiguation<'a> {
    pub fn open(
        records: &'a [EquationRecord],
        label: &str,
        radius: usize,
    ) -> Result<Self, ExtractError> {
        let index = position(records, label).ok_or_else(|| ExtractError::not_found(label))?;
        Ok(Self {
            records,
            index,
            label: label.to_string(),
            radius,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn candidate(&self) -> &'a EquationRecord {
        &self.records[self.index]
    }

    /// The match and up to `radius` records on each side, with their indices.
    pub fn window(&self) -> Vec<(usize, &'a EquationRecord)> {
        let start = self.index.saturating_sub(self.radius);
        let end = (self.index + self.radius + 1).min(self.records.len());
        (start..end).map(|i| (i, &self.records[i])).collect()
    }

    /// True if more than one record carries the label.
    pub fn is_duplicated(&self) -> bool {
        self.records
            .iter()
            .filter(|record| record.number.as_deref() == Some(self.label.as_str()))
            .nth(1)
            .is_some()
    }

    pub fn resolve(&self, answer: &Answer) -> Result<&'a EquationRecord, ExtractError> {
        match answer {
            Answer::Confirm => Ok(self.candidate()),
            Answer::Relabel(label) => locate(self.records, label),
        }
    }

    /// Parses raw terminal input and resolves it.
    pub fn answer(&self, input: &str) -> Result<&'a EquationRecord, ExtractError> {
        let answer = Answer::parse(input).ok_or_else(|| ExtractError::AmbiguousLookup {
            label: self.label.clone(),
        })?;
        self.resolve(&answer)
    }
}
