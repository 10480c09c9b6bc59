//! Diagnostic severity levels.

use std::fmt;

/// Diagnostic severity.
///
/// # Examples
///
/// ```
/// use simc_util::diagnostic::Level;
///
/// assert_eq!(format!("{}", Level::Error), "error");
/// assert!(Level::Error.is_error());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Stops compilation. simc never aggregates more than one of these per
    /// run — the pipeline returns the first error it hits.
    Error,
    /// Doesn't stop compilation.
    Warning,
    /// Additional context attached to an error or warning.
    Note,
    /// A suggested fix.
    Help,
}

impl Level {
    #[inline]
    pub const fn is_error(&self) -> bool {
        matches!(self, Level::Error)
    }

    #[inline]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Level::Warning)
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
            Level::Help => "help",
        }
    }

    /// ANSI color code used when rendering to a terminal.
    #[inline]
    pub const fn color_code(&self) -> &'static str {
        match self {
            Level::Error => "31",   // red
            Level::Warning => "33", // yellow
            Level::Note => "36",    // cyan
            Level::Help => "32",    // green
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Whether to colorize rendered diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ColorConfig {
    /// Color only when stderr looks like a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorConfig {
    pub fn use_color(&self, is_tty: bool) -> bool {
        match self {
            ColorConfig::Auto => is_tty,
            ColorConfig::Always => true,
            ColorConfig::Never => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_error() {
        assert!(Level::Error.is_error());
        assert!(!Level::Warning.is_error());
    }

    #[test]
    fn level_name_and_display() {
        assert_eq!(Level::Error.name(), "error");
        assert_eq!(format!("{}", Level::Warning), "warning");
    }

    #[test]
    fn level_ordering_puts_errors_first() {
        assert!(Level::Error > Level::Warning);
        assert!(Level::Warning > Level::Note);
        assert!(Level::Note > Level::Help);
    }

    #[test]
    fn color_config_use_color() {
        assert!(ColorConfig::Always.use_color(false));
        assert!(!ColorConfig::Never.use_color(true));
        assert!(ColorConfig::Auto.use_color(true));
        assert!(!ColorConfig::Auto.use_color(false));
    }

    #[test]
    fn color_config_default_is_auto() {
        assert_eq!(ColorConfig::default(), ColorConfig::Auto);
    }
}
