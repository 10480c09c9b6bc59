//! Numeric literal lexing: `[0-9.]+`, typed by dot presence and fractional
//! digit count (§4.2). No hex/octal/binary prefixes, no exponent notation —
//! those are C/Rust conventions this surface grammar doesn't have.

use simc_util::{DataType, Meta};

use crate::error::LexError;
use crate::lexer::core::Lexer;
use crate::token::TokenKind;

impl<'a, 'sym> Lexer<'a, 'sym> {
    pub(crate) fn lex_number(&mut self) -> Result<TokenKind, LexError> {
        let start = self.cursor.position();
        let mut dot_count = 0u32;
        let mut fractional_digits = 0u32;
        let mut seen_dot = false;

        while self.cursor.current_char().is_ascii_digit() || self.cursor.current_char() == '.' {
            if self.cursor.current_char() == '.' {
                dot_count += 1;
                seen_dot = true;
            } else if seen_dot {
                fractional_digits += 1;
            }
            self.cursor.advance();
        }

        if dot_count > 1 {
            return Err(LexError::InvalidNumber { line: self.token_start_line });
        }

        let text = self.cursor.slice_from(start).to_string();
        let datatype = if dot_count == 0 {
            DataType::Int
        } else if fractional_digits <= 7 {
            DataType::Float
        } else {
            DataType::Double
        };

        let id = self.symbols.insert(text, datatype, Meta::Constant);
        Ok(TokenKind::Number(id))
    }
}
