//! Diagnostic rendering.
//!
//! simc stops at the first error a stage produces (§7 — no error
//! aggregation): the lexer, parser and generator all return `Result`s that
//! short-circuit with `?`, and only one `Diagnostic` is ever built per run.
//! `Handler` exists to turn that single diagnostic into readable terminal
//! output; it does not collect a batch the way a `rustc`-style handler
//! would.
//!
//! Only the top-level `simc` binary ever calls [`Handler::report`]: it maps
//! the first `Err` a pipeline stage returns into a `Diagnostic` and reports
//! it, which prints to stderr and exits the process. Library crates
//! (`simc-lex`, `simc-par`, `simc-gen`) never call it themselves — they
//! return `Result`s so they stay unit-testable without forking a process.
//!
//! # Examples
//!
//! ```
//! use simc_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Handler};
//! use simc_util::Span;
//!
//! let diag = DiagnosticBuilder::error("unexpected token `}`")
//!     .code(DiagnosticCode::P_UNEXPECTED_TOKEN)
//!     .span(Span::new(4))
//!     .help("did you forget a `)`?")
//!     .build();
//! let handler = Handler::new();
//! println!("{}", handler.render(&diag));
//! ```

mod builder;
mod codes;
mod level;

pub use builder::DiagnosticBuilder;
pub use codes::DiagnosticCode;
pub use level::{ColorConfig, Level};

use crate::Span;

/// A single diagnostic message: a severity, a message, and optionally a
/// location, a code, notes, help text, and the offending source line.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
    pub code: Option<DiagnosticCode>,
    pub notes: Vec<String>,
    pub helps: Vec<String>,
    pub snippet: Option<String>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            code: None,
            notes: Vec::new(),
            helps: Vec::new(),
            snippet: None,
        }
    }

    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }
}

/// Renders diagnostics to stderr, one at a time.
pub struct Handler {
    color: ColorConfig,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            color: ColorConfig::Auto,
        }
    }

    pub fn with_color(color: ColorConfig) -> Self {
        Self { color }
    }

    /// Writes `diagnostic` to stderr and exits the process when it is an
    /// error. There is no aggregation: simc has nothing left to do once the
    /// first error is reported, so this never returns for `Level::Error`.
    pub fn report(&self, diagnostic: &Diagnostic) -> ! {
        eprintln!("{}", self.render(diagnostic));
        std::process::exit(1);
    }

    /// Renders a diagnostic without printing it, for testing and for
    /// callers (like the top-level binary) that need the text themselves.
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        use std::io::IsTerminal;
        let use_color = self.color.use_color(std::io::stderr().is_terminal());
        let mut out = String::new();

        let header = match diagnostic.code {
            Some(code) => format!("{}[{}]: {}", diagnostic.level, code, diagnostic.message),
            None => format!("{}: {}", diagnostic.level, diagnostic.message),
        };
        if use_color {
            out.push_str(&format!(
                "\x1b[1;{}m{}\x1b[0m",
                diagnostic.level.color_code(),
                header
            ));
        } else {
            out.push_str(&header);
        }

        if !diagnostic.span.is_dummy() {
            out.push_str(&format!("\n  --> {}", diagnostic.span));
        }
        if let Some(snippet) = &diagnostic.snippet {
            out.push_str(&format!("\n  | {}", snippet));
        }
        for note in &diagnostic.notes {
            out.push_str(&format!("\n  = note: {}", note));
        }
        for help in &diagnostic.helps {
            out.push_str(&format!("\n  = help: {}", help));
        }

        out
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_error_sets_error_level() {
        let diag = Diagnostic::error("bad token", Span::DUMMY);
        assert_eq!(diag.level, Level::Error);
    }

    #[test]
    fn diagnostic_warning_sets_warning_level() {
        let diag = Diagnostic::warning("unused import", Span::DUMMY);
        assert_eq!(diag.level, Level::Warning);
    }

    #[test]
    fn render_includes_level_and_message() {
        let handler = Handler::with_color(ColorConfig::Never);
        let diag = Diagnostic::error("unexpected token", Span::DUMMY);
        let rendered = handler.render(&diag);
        assert!(rendered.contains("error"));
        assert!(rendered.contains("unexpected token"));
    }

    #[test]
    fn render_includes_code_when_present() {
        let handler = Handler::with_color(ColorConfig::Never);
        let mut diag = Diagnostic::error("bad token", Span::DUMMY);
        diag.code = Some(DiagnosticCode::P_UNEXPECTED_TOKEN);
        let rendered = handler.render(&diag);
        assert!(rendered.contains("P0001"));
    }

    #[test]
    fn render_includes_span_when_not_dummy() {
        let handler = Handler::with_color(ColorConfig::Never);
        let diag = Diagnostic::error("bad token", Span::new(7));
        let rendered = handler.render(&diag);
        assert!(rendered.contains("line 7"));
    }

    #[test]
    fn render_omits_span_line_for_dummy_span() {
        let handler = Handler::with_color(ColorConfig::Never);
        let diag = Diagnostic::error("bad token", Span::DUMMY);
        assert!(!handler.render(&diag).contains("-->"));
    }

    #[test]
    fn render_includes_notes_and_helps() {
        let handler = Handler::with_color(ColorConfig::Never);
        let mut diag = Diagnostic::error("type mismatch", Span::DUMMY);
        diag.notes.push("left side is `int`".to_string());
        diag.helps.push("cast the right side".to_string());
        let rendered = handler.render(&diag);
        assert!(rendered.contains("note: left side is `int`"));
        assert!(rendered.contains("help: cast the right side"));
    }
}
