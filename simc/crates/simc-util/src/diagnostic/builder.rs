//! Fluent diagnostic construction.

use super::{Diagnostic, DiagnosticCode, Level, Span};

/// Builder for a single diagnostic.
///
/// # Examples
///
/// ```
/// use simc_util::diagnostic::{DiagnosticBuilder, DiagnosticCode};
/// use simc_util::Span;
///
/// let diag = DiagnosticBuilder::error("unexpected token `}`")
///     .code(DiagnosticCode::P_UNEXPECTED_TOKEN)
///     .span(Span::new(4))
///     .help("did you forget a `)`?")
///     .build();
/// ```
pub struct DiagnosticBuilder {
    level: Level,
    message: String,
    span: Span,
    code: Option<DiagnosticCode>,
    notes: Vec<String>,
    helps: Vec<String>,
    snippet: Option<String>,
}

impl DiagnosticBuilder {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            span: Span::DUMMY,
            code: None,
            notes: Vec::new(),
            helps: Vec::new(),
            snippet: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    /// Attach the offending source line, fetched from a `SourceMap`, for
    /// display under the message.
    pub fn snippet(mut self, line_text: impl Into<String>) -> Self {
        self.snippet = Some(line_text.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            message: self.message,
            span: self.span,
            code: self.code,
            notes: self.notes,
            helps: self.helps,
            snippet: self.snippet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_defaults_to_dummy_span() {
        let diag = DiagnosticBuilder::error("bad token").build();
        assert_eq!(diag.level, Level::Error);
        assert!(diag.span.is_dummy());
    }

    #[test]
    fn warning_sets_warning_level() {
        let diag = DiagnosticBuilder::warning("unused import").build();
        assert_eq!(diag.level, Level::Warning);
    }

    #[test]
    fn code_and_span_are_set() {
        let diag = DiagnosticBuilder::error("oops")
            .code(DiagnosticCode::P_UNEXPECTED_TOKEN)
            .span(Span::new(3))
            .build();
        assert_eq!(diag.code, Some(DiagnosticCode::P_UNEXPECTED_TOKEN));
        assert_eq!(diag.span, Span::new(3));
    }

    #[test]
    fn notes_and_helps_accumulate_in_order() {
        let diag = DiagnosticBuilder::error("type mismatch")
            .note("left side is `int`")
            .note("right side is `char*`")
            .help("wrap the left side in `(char*)`")
            .build();
        assert_eq!(diag.notes, vec!["left side is `int`", "right side is `char*`"]);
        assert_eq!(diag.helps, vec!["wrap the left side in `(char*)`"]);
    }

    #[test]
    fn snippet_carries_the_source_line() {
        let diag = DiagnosticBuilder::error("bad token")
            .snippet("x =+ 1")
            .build();
        assert_eq!(diag.snippet.as_deref(), Some("x =+ 1"));
    }
}
