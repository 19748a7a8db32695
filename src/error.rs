use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const DIAG_MALFORMED_EXPRESSION: &str = "WELD-E001";

fn get_hint(code: &str) -> &'static str {
    match code {
        DIAG_MALFORMED_EXPRESSION => {
            "Binding values use unquoted keys, quoted strings, numbers, booleans or nested { } literals."
        }
        _ => "Unknown diagnostic.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXPRESSION ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Failure to decode a binding expression. Offsets are byte positions into the
/// expression text that was handed to the parser.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("unexpected character '{found}' at {position}")]
    UnexpectedChar { found: char, position: usize },

    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: usize },

    #[error("invalid escape sequence '\\{found}' at {position}")]
    InvalidEscape { found: String, position: usize },

    #[error("invalid number '{text}' at {position}")]
    InvalidNumber { text: String, position: usize },

    #[error("expected {expected}, found {found} at {position}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: usize,
    },

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("unexpected trailing input at {position}")]
    TrailingInput { position: usize },

    #[error("literal nested deeper than {limit} levels at {position}")]
    NestingTooDeep { limit: usize, position: usize },
}

// ═══════════════════════════════════════════════════════════════════════════════
// DOCUMENT ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Error, Debug)]
pub enum DomError {
    #[error("failed to read markup: {0}")]
    Read(#[from] std::io::Error),
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC
// ═══════════════════════════════════════════════════════════════════════════════

/// A recoverable problem found while scanning. Diagnostics never abort a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: String,
    /// Binder name of the marker the problem was found on, if known.
    pub binder: Option<String>,
    /// Attribute the expression came from. Empty when the text was parsed
    /// outside a scan.
    pub attribute: String,
    /// The raw expression text.
    pub source: String,
    pub message: String,
    pub hint: String,
}

impl Diagnostic {
    pub fn malformed_expression(
        binder: Option<&str>,
        attribute: &str,
        source: &str,
        error: &ExpressionError,
    ) -> Self {
        Self::new(
            DIAG_MALFORMED_EXPRESSION,
            binder,
            attribute,
            source,
            &format!("Invalid binding data: {}", error),
        )
    }

    pub fn new(
        code: &str,
        binder: Option<&str>,
        attribute: &str,
        source: &str,
        message: &str,
    ) -> Self {
        Diagnostic {
            code: code.to_string(),
            binder: binder.map(str::to_string),
            attribute: attribute.to_string(),
            source: source.to_string(),
            message: message.to_string(),
            hint: get_hint(code).to_string(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.attribute.is_empty() {
            return write!(f, "[{}] {} (\"{}\")", self.code, self.message, self.source);
        }
        match &self.binder {
            Some(binder) => write!(
                f,
                "[{}] {} ({}=\"{}\", binder '{}')",
                self.code, self.message, self.attribute, self.source, binder
            ),
            None => write!(
                f,
                "[{}] {} ({}=\"{}\")",
                self.code, self.message, self.attribute, self.source
            ),
        }
    }
}
