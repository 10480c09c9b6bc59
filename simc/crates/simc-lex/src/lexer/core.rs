//! The dispatch loop: one `next_token()` call scans exactly one token.

use simc_util::SymbolTable;

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::{Token, TokenKind};

/// Scans simc source into tokens, registering every literal and identifier
/// it sees in the shared symbol table as it goes (§3 — the lexer is the
/// table's first writer).
pub struct Lexer<'a, 'sym> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) symbols: &'sym mut SymbolTable,
    pub(crate) token_start_line: u32,
    /// Set between `BEGIN_C` and `END_C`: every whole line is passed
    /// through verbatim as a `RawC` token instead of being tokenized.
    pub(crate) in_raw_c: bool,
    /// The kind of the last token actually emitted (comments excluded),
    /// used to disambiguate `&` into `AddressOf` vs `BitwiseAnd` (§4.2).
    pub(crate) last_kind: Option<TokenKind>,
    /// A synthetic token already decided but not yet handed to the caller —
    /// used for the `call_end` sentinel, which trails one token behind the
    /// `)` that triggers it.
    pending: Option<Token>,
    /// The line `BEGIN_C` was seen on, for reporting an unmatched raw-C
    /// block at end of input.
    pub(crate) raw_c_start_line: Option<u32>,
}

impl<'a, 'sym> Lexer<'a, 'sym> {
    pub fn new(source: &'a str, symbols: &'sym mut SymbolTable) -> Self {
        Self {
            cursor: Cursor::new(source),
            symbols,
            token_start_line: 1,
            in_raw_c: false,
            last_kind: None,
            pending: None,
            raw_c_start_line: None,
        }
    }

    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    pub(crate) fn emit(&mut self, kind: TokenKind) -> Token {
        let token = Token::new(kind.clone(), self.token_start_line);
        if !matches!(kind, TokenKind::SingleLineComment(_) | TokenKind::MultiLineComment(_)) {
            self.last_kind = Some(kind);
        }
        token
    }

    /// Scans and returns the next token, or `None` at end of input once all
    /// brackets have been accounted for.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        if let Some(tok) = self.pending.take() {
            return Ok(Some(tok));
        }

        if self.in_raw_c {
            return self.lex_raw_c_line();
        }

        self.skip_insignificant();

        if self.cursor.is_at_end() {
            if let Some((opener, line)) = self.cursor.unclosed_brackets().first().copied() {
                return Err(LexError::UnbalancedBracketOpen { opener, line });
            }
            return Ok(None);
        }

        self.token_start_line = self.cursor.line();

        let c = self.cursor.current_char();
        match c {
            '\n' => {
                self.cursor.advance();
                Ok(Some(self.emit(TokenKind::Newline)))
            }
            '/' if self.cursor.peek_char(1) == '/' || self.cursor.peek_char(1) == '*' => {
                self.lex_comment().map(|k| Some(self.emit(k)))
            }
            '(' => {
                self.cursor.advance();
                self.cursor.enter_paren();
                self.cursor.push_bracket('(');
                Ok(Some(self.emit(TokenKind::LParen)))
            }
            ')' => {
                self.cursor.advance();
                self.cursor.exit_paren();
                if self.cursor.pop_bracket(')').is_none() {
                    return Err(LexError::UnbalancedBracketClose { closer: ')', line: self.token_start_line });
                }
                let tok = self.emit(TokenKind::RParen);
                if self.at_call_end() {
                    self.pending = Some(Token::new(TokenKind::CallEnd, self.token_start_line));
                    self.last_kind = Some(TokenKind::CallEnd);
                }
                Ok(Some(tok))
            }
            '{' => {
                self.cursor.advance();
                self.cursor.push_bracket('{');
                Ok(Some(self.emit(TokenKind::LBrace)))
            }
            '}' => {
                self.cursor.advance();
                if self.cursor.pop_bracket('}').is_none() {
                    return Err(LexError::UnbalancedBracketClose { closer: '}', line: self.token_start_line });
                }
                Ok(Some(self.emit(TokenKind::RBrace)))
            }
            '[' => {
                self.cursor.advance();
                self.cursor.push_bracket('[');
                Ok(Some(self.emit(TokenKind::LBracket)))
            }
            ']' => {
                self.cursor.advance();
                if self.cursor.pop_bracket(']').is_none() {
                    return Err(LexError::UnbalancedBracketClose { closer: ']', line: self.token_start_line });
                }
                Ok(Some(self.emit(TokenKind::RBracket)))
            }
            ',' => {
                self.cursor.advance();
                Ok(Some(self.emit(TokenKind::Comma)))
            }
            ':' => {
                self.cursor.advance();
                Ok(Some(self.emit(TokenKind::Colon)))
            }
            '+' | '-' | '*' | '/' | '%' | '=' | '!' | '<' | '>' | '&' | '|' | '^' => {
                let kind = self.lex_operator(c)?;
                Ok(Some(self.emit(kind)))
            }
            '"' | '\'' => {
                let kind = self.lex_string(c)?;
                Ok(Some(self.emit(kind)))
            }
            c if is_ident_start(c) => {
                let token = self.lex_identifier()?;
                if token.kind == TokenKind::KwBeginC {
                    self.raw_c_start_line = Some(token.line);
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                    self.cursor.advance(); // the newline itself
                    self.in_raw_c = true;
                } else if token.kind == TokenKind::KwEndC {
                    // Reached only outside raw mode — `lex_raw_c_line` intercepts
                    // the matching `END_C` before it ever gets here.
                    return Err(LexError::UnmatchedEndRawC { line: token.line });
                }
                Ok(Some(token))
            }
            c if c.is_ascii_digit() => {
                let kind = self.lex_number()?;
                Ok(Some(self.emit(kind)))
            }
            other => {
                self.cursor.advance();
                Err(LexError::InvalidCharacter { ch: other, line: self.token_start_line })
            }
        }
    }

    /// True when the next non-space character after a just-scanned `)`
    /// ends a function-call argument list (§4.2).
    fn at_call_end(&self) -> bool {
        let mut i = 0;
        loop {
            match self.cursor.peek_char(i) {
                ' ' | '\t' | '\r' => i += 1,
                '\n' | '{' | '}' | ',' | '\0' => return true,
                _ => return false,
            }
        }
    }

    /// Skips whitespace and decides whether `\n` is significant, without
    /// consuming it — `next_token` handles `\n` itself so its line number
    /// is recorded correctly.
    fn skip_insignificant(&mut self) {
        loop {
            self.cursor.skip_inline_whitespace();
            if self.cursor.current_char() == '\n' && self.cursor.in_parens() {
                self.cursor.advance();
                continue;
            }
            return;
        }
    }
}

/// `[A-Za-z_]` — simc identifiers are ASCII-only.
pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// `[A-Za-z0-9_.]` — the surface grammar allows `.` inside an identifier
/// run so `var.member` lexes as one token for the parser to split.
pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}
