//! Handing an extracted equation to a derivation service.
//!
//! The engine never inspects the reply. It only builds the request: a system
//! prompt describing the task and a user message carrying the equation body.

use serde::{Deserialize, Serialize};
use texeq_extract::EquationRecord;

use crate::SourceError;

const SYSTEM_PROMPT: &str = "You are a mathematics expert and you are good at providing simple \
derivations of equations. The user will provide you with an equation in LaTeX and you need to \
provide the derivation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// A chat-style request asking for the derivation of one equation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationRequest {
    /// Printed label of the equation, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub messages: Vec<Message>,
}

impl DerivationRequest {
    pub fn new(equation: &str) -> Self {
        Self {
            label: None,
            messages: vec![
                Message {
                    role: Role::System,
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: Role::User,
                    content: format!(
                "Provide me with the derivation of this equation {}.",
                equation
            ),
                },
            ],
        }
    }

    pub fn for_record(record: &EquationRecord) -> Self {
        Self {
            label: record.number.clone(),
            ..Self::new(&record.body)
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A service that turns a [`DerivationRequest`] into explanatory text.
pub trait DerivationBackend: std::fmt::Debug {
    fn derive(&self, request: &DerivationRequest) -> Result<String, SourceError>;

    /// A human-readable name for this backend.
    fn name(&self) -> &'static str;
}
