//! String and char literal lexing.
//!
//! `"`-delimited text is always a string. `'`-delimited text is a `char`
//! when it resolves to exactly one character and a string otherwise (§4.2)
//! — simc has no dedicated single-character-literal syntax, just length.

use simc_util::{DataType, Meta};

use crate::error::LexError;
use crate::lexer::core::Lexer;
use crate::token::TokenKind;

impl<'a, 'sym> Lexer<'a, 'sym> {
    pub(crate) fn lex_string(&mut self, quote: char) -> Result<TokenKind, LexError> {
        self.cursor.advance(); // opening quote

        let mut raw = String::new();
        raw.push(quote);
        let mut resolved_len = 0usize;

        loop {
            if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
                return Err(LexError::UnterminatedString { line: self.token_start_line });
            }
            let c = self.cursor.current_char();
            if c == quote {
                raw.push(c);
                self.cursor.advance();
                break;
            }
            if c == '\\' {
                raw.push(c);
                self.cursor.advance();
                if self.cursor.is_at_end() {
                    return Err(LexError::UnterminatedString { line: self.token_start_line });
                }
                raw.push(self.cursor.current_char());
                self.cursor.advance();
                resolved_len += 1;
                continue;
            }
            raw.push(c);
            self.cursor.advance();
            resolved_len += 1;
        }

        let datatype = if quote == '\'' && resolved_len == 1 {
            DataType::Char
        } else {
            DataType::StringLit
        };
        let id = self.symbols.insert(raw, datatype.clone(), Meta::Constant);
        Ok(if datatype == DataType::Char {
            TokenKind::CharLit(id)
        } else {
            TokenKind::StringLit(id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simc_util::SymbolTable;

    fn lex_type(source: &str) -> DataType {
        let mut symbols = SymbolTable::new();
        let kind = {
            let mut lexer = Lexer::new(source, &mut symbols);
            lexer.next_token().unwrap().unwrap().kind
        };
        let id = match kind {
            TokenKind::StringLit(id) | TokenKind::CharLit(id) => id,
            other => panic!("expected string/char token, got {other:?}"),
        };
        symbols.get(id).datatype.clone()
    }

    #[test]
    fn double_quoted_is_always_a_string() {
        assert_eq!(lex_type("\"a\""), DataType::StringLit);
    }

    #[test]
    fn single_quoted_one_char_is_a_char() {
        assert_eq!(lex_type("'a'"), DataType::Char);
    }

    #[test]
    fn single_quoted_multi_char_is_a_string() {
        assert_eq!(lex_type("'ab'"), DataType::StringLit);
    }

    #[test]
    fn escape_sequence_counts_as_one_character() {
        assert_eq!(lex_type("'\\n'"), DataType::Char);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let mut symbols = SymbolTable::new();
        let mut lexer = Lexer::new("\"abc", &mut symbols);
        assert!(lexer.next_token().is_err());
    }
}
