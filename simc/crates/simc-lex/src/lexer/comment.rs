//! Comment lexing and raw-C passthrough.
//!
//! Unlike a generic-language lexer that silently discards comments, simc
//! keeps their text: the generator re-emits them into the output C file
//! verbatim (§4.3's `single_line_comment`/`multi_line_comment` opcodes).

use crate::error::LexError;
use crate::lexer::core::Lexer;
use crate::token::{Token, TokenKind};

impl<'a, 'sym> Lexer<'a, 'sym> {
    pub(crate) fn lex_comment(&mut self) -> Result<TokenKind, LexError> {
        self.cursor.advance(); // first '/'
        if self.cursor.match_char('/') {
            let start = self.cursor.position();
            while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                self.cursor.advance();
            }
            return Ok(TokenKind::SingleLineComment(self.cursor.slice_from(start).to_string()));
        }

        self.cursor.match_char('*');
        let start = self.cursor.position();
        loop {
            if self.cursor.is_at_end() {
                return Ok(TokenKind::MultiLineComment(self.cursor.slice_from(start).to_string()));
            }
            if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                let text = self.cursor.slice_from(start).to_string();
                self.cursor.advance();
                self.cursor.advance();
                return Ok(TokenKind::MultiLineComment(text));
            }
            self.cursor.advance();
        }
    }

    /// Reads one whole line verbatim while in `BEGIN_C`/`END_C` raw mode.
    pub(crate) fn lex_raw_c_line(&mut self) -> Result<Option<Token>, LexError> {
        if self.cursor.is_at_end() {
            let line = self.raw_c_start_line.unwrap_or(self.cursor.line());
            return Err(LexError::UnmatchedRawC { line });
        }

        let line_number = self.cursor.line();
        let start = self.cursor.position();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start).to_string();
        if !self.cursor.is_at_end() {
            self.cursor.advance(); // the newline
        }

        if text.trim() == "END_C" {
            self.in_raw_c = false;
            self.raw_c_start_line = None;
            return Ok(Some(Token::new(TokenKind::KwEndC, line_number)));
        }

        Ok(Some(Token::new(TokenKind::RawC(text), line_number)))
    }
}
