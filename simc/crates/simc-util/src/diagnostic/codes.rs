//! Diagnostic codes, grouped by the pipeline stage that raises them.
//!
//! Codes follow the format `{prefix}{number:04}`: `D` for the driver
//! (file/import resolution), `L` for the lexer, `P` for the parser, `S`
//! for the type inference that runs fused into the parser.

/// A unique code identifying a diagnostic message.
///
/// # Examples
///
/// ```
/// use simc_util::diagnostic::DiagnosticCode;
///
/// assert_eq!(DiagnosticCode::P_UNEXPECTED_TOKEN.as_str(), "P0001");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    pub prefix: &'static str,
    pub number: u32,
}

impl DiagnosticCode {
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // Driver: source discovery and module imports (SPEC_FULL §4.1, §4.5).
    pub const D_FILE_NOT_FOUND: Self = Self::new("D", 1);
    pub const D_IMPORT_NOT_FOUND: Self = Self::new("D", 2);
    pub const D_IMPORT_CYCLE: Self = Self::new("D", 3);

    // Lexer (SPEC_FULL §4.2).
    pub const L_UNEXPECTED_CHAR: Self = Self::new("L", 1);
    pub const L_UNTERMINATED_STRING: Self = Self::new("L", 2);
    pub const L_INVALID_NUMBER: Self = Self::new("L", 3);
    pub const L_UNBALANCED_BRACKETS: Self = Self::new("L", 4);

    // Parser (SPEC_FULL §4.3).
    pub const P_UNEXPECTED_TOKEN: Self = Self::new("P", 1);
    pub const P_EXPECTED_TOKEN: Self = Self::new("P", 2);
    pub const P_UNEXPECTED_EOF: Self = Self::new("P", 3);
    pub const P_DUPLICATE_FUNCTION: Self = Self::new("P", 4);
    pub const P_DUPLICATE_STRUCT: Self = Self::new("P", 5);

    // Type inference, fused into the parser (SPEC_FULL §3, §4.3).
    pub const S_UNDEFINED_VARIABLE: Self = Self::new("S", 1);
    pub const S_UNDEFINED_FUNCTION: Self = Self::new("S", 2);
    pub const S_INVALID_OPERATOR_FOR_TYPE: Self = Self::new("S", 3);
    pub const S_WRONG_ARGUMENT_COUNT: Self = Self::new("S", 4);
    pub const S_UNDEFINED_STRUCT_MEMBER: Self = Self::new("S", 5);
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_code_roundtrips_prefix_and_number() {
        let code = DiagnosticCode::new("P", 7);
        assert_eq!(code.prefix(), "P");
        assert_eq!(code.number(), 7);
    }

    #[test]
    fn as_str_pads_to_four_digits() {
        assert_eq!(DiagnosticCode::new("L", 1).as_str(), "L0001");
        assert_eq!(DiagnosticCode::new("S", 42).as_str(), "S0042");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", DiagnosticCode::P_UNEXPECTED_TOKEN), "P0001");
    }

    #[test]
    fn debug_wraps_the_code() {
        assert_eq!(
            format!("{:?}", DiagnosticCode::L_UNTERMINATED_STRING),
            "DiagnosticCode(L0002)"
        );
    }

    #[test]
    fn predefined_codes_are_distinct() {
        assert_ne!(DiagnosticCode::D_FILE_NOT_FOUND, DiagnosticCode::D_IMPORT_NOT_FOUND);
        assert_ne!(DiagnosticCode::P_UNEXPECTED_TOKEN, DiagnosticCode::S_UNDEFINED_VARIABLE);
    }

    #[test]
    fn equal_codes_compare_equal() {
        assert_eq!(DiagnosticCode::new("D", 1), DiagnosticCode::D_FILE_NOT_FOUND);
    }
}
