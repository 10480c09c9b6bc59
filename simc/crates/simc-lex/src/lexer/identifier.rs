//! Identifier, keyword, math-constant, bool-literal and cast-marker lexing.

use simc_util::{DataType, Meta};

use crate::error::LexError;
use crate::lexer::core::{is_ident_continue, Lexer};
use crate::token::{cast_type_from_word, keyword_from_word, Token, TokenKind, C_RESERVED_WORDS};

/// `PI`, `E`, `inf`, `NaN` lex as a `number` token of type `double` (§4.2).
const MATH_CONSTANTS: &[&str] = &["PI", "E", "inf", "NaN"];

impl<'a, 'sym> Lexer<'a, 'sym> {
    pub(crate) fn lex_identifier(&mut self) -> Result<Token, LexError> {
        let start = self.cursor.position();
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start).to_string();

        if let Some(kind) = keyword_from_word(&text) {
            return Ok(self.emit(kind));
        }

        if text == "true" || text == "false" {
            let id = self.symbols.insert(text, DataType::Bool, Meta::Constant);
            return Ok(self.emit(TokenKind::Bool(id)));
        }

        if MATH_CONSTANTS.contains(&text.as_str()) {
            let id = self.symbols.insert(text, DataType::Double, Meta::Constant);
            return Ok(self.emit(TokenKind::Number(id)));
        }

        if let Some(cast) = cast_type_from_word(&text) {
            if self.cursor.current_char() == '(' {
                return Ok(self.emit(TokenKind::TypeCast(cast)));
            }
            return Err(LexError::ReservedWord { word: text, line: self.token_start_line });
        }

        if C_RESERVED_WORDS.contains(&text.as_str()) {
            return Err(LexError::ReservedWord { word: text, line: self.token_start_line });
        }

        let id = match self.symbols.lookup_name(&text) {
            Some(existing) => existing,
            None => self.symbols.insert(text, DataType::Var, Meta::Variable),
        };
        Ok(self.emit(TokenKind::Ident(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simc_util::SymbolTable;

    fn lex_one(source: &str) -> (TokenKind, SymbolTable) {
        let mut symbols = SymbolTable::new();
        let kind = {
            let mut lexer = Lexer::new(source, &mut symbols);
            lexer.next_token().unwrap().unwrap().kind
        };
        (kind, symbols)
    }

    #[test]
    fn keywords_are_not_identifiers() {
        let (kind, _) = lex_one("while");
        assert_eq!(kind, TokenKind::KwWhile);
    }

    #[test]
    fn var_fun_print_input_are_keywords() {
        assert_eq!(lex_one("var").0, TokenKind::KwVar);
        assert_eq!(lex_one("fun").0, TokenKind::KwFun);
        assert_eq!(lex_one("print").0, TokenKind::KwPrint);
        assert_eq!(lex_one("input").0, TokenKind::KwInput);
    }

    #[test]
    fn bool_literal_registers_a_constant() {
        let (kind, symbols) = lex_one("true");
        match kind {
            TokenKind::Bool(id) => assert_eq!(symbols.get(id).datatype, DataType::Bool),
            other => panic!("expected Bool token, got {other:?}"),
        }
    }

    #[test]
    fn math_constant_is_a_double_number() {
        let (kind, symbols) = lex_one("PI");
        match kind {
            TokenKind::Number(id) => assert_eq!(symbols.get(id).datatype, DataType::Double),
            other => panic!("expected Number token, got {other:?}"),
        }
    }

    #[test]
    fn type_name_before_paren_is_a_cast_marker() {
        let (kind, _) = lex_one("int(");
        assert!(matches!(kind, TokenKind::TypeCast(_)));
    }

    #[test]
    fn type_name_without_paren_is_a_reserved_word_error() {
        let mut symbols = SymbolTable::new();
        let mut lexer = Lexer::new("int x", &mut symbols);
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, LexError::ReservedWord { .. }));
    }

    #[test]
    fn reserved_c_word_is_an_error() {
        let mut symbols = SymbolTable::new();
        let mut lexer = Lexer::new("sizeof", &mut symbols);
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn repeated_identifier_reuses_its_symbol_id() {
        let mut symbols = SymbolTable::new();
        let mut lexer = Lexer::new("foo foo", &mut symbols);
        let TokenKind::Ident(first) = lexer.next_token().unwrap().unwrap().kind else {
            panic!("expected an identifier")
        };
        let TokenKind::Ident(second) = lexer.next_token().unwrap().unwrap().kind else {
            panic!("expected an identifier")
        };
        assert_eq!(first, second);
    }
}
