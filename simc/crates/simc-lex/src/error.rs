//! Error type for lexical analysis.
//!
//! Every variant carries the 1-based source line the offending text started
//! on, so the driver can turn it into a `Diagnostic` without re-scanning the
//! source. There is no recovery: the first `LexError` a file produces ends
//! the lex phase for that file.

use simc_util::diagnostic::DiagnosticCode;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString { line: u32 },

    #[error("invalid numeric literal: more than one decimal point")]
    InvalidNumber { line: u32 },

    #[error("unbalanced '{opener}': no matching closer before end of input")]
    UnbalancedBracketOpen { opener: char, line: u32 },

    #[error("unexpected closing '{closer}'")]
    UnbalancedBracketClose { closer: char, line: u32 },

    #[error("'{word}' is a reserved C keyword and cannot be used as an identifier")]
    ReservedWord { word: String, line: u32 },

    #[error("cannot find module '{name}'")]
    UnresolvedImport { name: String, line: u32 },

    #[error("'BEGIN_C' without a matching 'END_C'")]
    UnmatchedRawC { line: u32 },

    #[error("'END_C' without a matching 'BEGIN_C'")]
    UnmatchedEndRawC { line: u32 },

    #[error("unexpected character '{ch}'")]
    InvalidCharacter { ch: char, line: u32 },
}

impl LexError {
    pub fn line(&self) -> u32 {
        match self {
            LexError::UnterminatedString { line }
            | LexError::InvalidNumber { line }
            | LexError::UnbalancedBracketOpen { line, .. }
            | LexError::UnbalancedBracketClose { line, .. }
            | LexError::ReservedWord { line, .. }
            | LexError::UnresolvedImport { line, .. }
            | LexError::UnmatchedRawC { line }
            | LexError::UnmatchedEndRawC { line }
            | LexError::InvalidCharacter { line, .. } => *line,
        }
    }

    /// The stable diagnostic code for this failure (§4.1).
    pub fn code(&self) -> DiagnosticCode {
        match self {
            LexError::InvalidCharacter { .. } => DiagnosticCode::L_UNEXPECTED_CHAR,
            LexError::UnterminatedString { .. } => DiagnosticCode::L_UNTERMINATED_STRING,
            LexError::InvalidNumber { .. } => DiagnosticCode::L_INVALID_NUMBER,
            LexError::UnbalancedBracketOpen { .. } | LexError::UnbalancedBracketClose { .. } => {
                DiagnosticCode::L_UNBALANCED_BRACKETS
            }
            LexError::ReservedWord { .. } | LexError::UnmatchedRawC { .. }
            | LexError::UnmatchedEndRawC { .. } => DiagnosticCode::L_UNEXPECTED_CHAR,
            LexError::UnresolvedImport { .. } => DiagnosticCode::D_IMPORT_NOT_FOUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_matches_failure_kind() {
        assert_eq!(LexError::UnterminatedString { line: 1 }.code(), DiagnosticCode::L_UNTERMINATED_STRING);
        assert_eq!(LexError::UnresolvedImport { name: "x".into(), line: 1 }.code(), DiagnosticCode::D_IMPORT_NOT_FOUND);
    }
}

pub type Result<T> = std::result::Result<T, LexError>;
