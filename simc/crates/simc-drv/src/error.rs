//! Driver-level errors (§7): everything a pipeline stage can fail with,
//! plus the couple of failure modes that exist before any stage runs.

use std::path::PathBuf;

use simc_util::diagnostic::DiagnosticCode;
use simc_util::Span;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("no source file given")]
    MissingSource,

    #[error("source file '{0}' must have a .simc extension")]
    BadExtension(PathBuf),

    #[error("failed to access '{path}': {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error(transparent)]
    Lex(#[from] simc_lex::LexError),

    #[error(transparent)]
    Parse(#[from] simc_par::ParseError),

    #[error(transparent)]
    Gen(#[from] simc_gen::GenError),
}

impl DriverError {
    /// The line to report this at, or `Span::DUMMY` for a pre-source or
    /// internal failure (§7's line = -1 sentinel).
    pub fn span(&self) -> Span {
        match self {
            DriverError::Lex(e) => Span::new(e.line()),
            DriverError::Parse(e) => Span::new(e.line()),
            DriverError::MissingSource | DriverError::BadExtension(_) | DriverError::Io { .. }
            | DriverError::Gen(_) => Span::DUMMY,
        }
    }

    /// The stable diagnostic code for this failure (§4.1), where one
    /// applies — `Io`/`Gen` are internal/environment failures the taxonomy
    /// in `simc_util::diagnostic::codes` has no stage-specific code for.
    pub fn code(&self) -> Option<DiagnosticCode> {
        match self {
            DriverError::MissingSource | DriverError::BadExtension(_) => Some(DiagnosticCode::D_FILE_NOT_FOUND),
            DriverError::Lex(e) => Some(e.code()),
            DriverError::Parse(e) => Some(e.code()),
            DriverError::Io { .. } | DriverError::Gen(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DriverError>;
