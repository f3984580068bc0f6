// Error handling for uritemplate

use thiserror::Error;

/// What went wrong while expanding a template.
///
/// Every kind is recoverable: expansion carries on past it and only the first
/// one is reported.
#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid percent escape {0:?}")]
    MalformedPercentEscape(String),

    #[error("unterminated expression")]
    UnterminatedExpression,

    #[error("empty expression")]
    EmptyExpression,

    #[error("expression {expression:?}: unknown operator {operator:?}")]
    ReservedOperator { expression: String, operator: char },

    #[error("expression {expression:?}: missing variable name")]
    MissingVariableName { expression: String },

    #[error("expression {expression:?}: unexpected character {character:?}")]
    UnexpectedCharacter { expression: String, character: char },

    /// A value's custom text encoding reported a failure.
    #[error("expression {expression:?}: variable {variable:?}: {source}")]
    Render {
        expression: String,
        variable: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("illegal character {0:?}")]
    IllegalCharacter(char),
}

/// The first error of an expansion, plus the best-effort output.
#[derive(Debug, Error)]
#[error("expand uri template {template:?}: {kind}")]
pub struct ExpandError {
    template: String,
    #[source]
    kind: ErrorKind,
    output: String,
}

impl ExpandError {
    pub(crate) fn new(template: &str, kind: ErrorKind, output: String) -> Self {
        Self {
            template: template.to_string(),
            kind,
            output,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// The expansion produced despite the error.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }
}
