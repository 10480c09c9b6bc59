//! Operator lexing: the two-character lookahead dispatch table from §4.2.
//!
//! Each `lex_*` method is entered with the cursor still on the lead
//! character; it consumes as many characters as the longest operator it can
//! match and returns the resulting `TokenKind`. Longest-operator-wins is
//! enforced by trying the longer spellings first in every method.

use crate::error::LexError;
use crate::lexer::core::Lexer;
use crate::token::TokenKind;

impl<'a, 'sym> Lexer<'a, 'sym> {
    pub(crate) fn lex_operator(&mut self, lead: char) -> Result<TokenKind, LexError> {
        self.cursor.advance();
        Ok(match lead {
            '+' => {
                if self.cursor.match_char('=') {
                    TokenKind::PlusEqual
                } else if self.cursor.match_char('+') {
                    TokenKind::Increment
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.cursor.match_char('=') {
                    TokenKind::MinusEqual
                } else if self.cursor.match_char('-') {
                    TokenKind::Decrement
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.cursor.match_char('=') {
                    TokenKind::MultiplyEqual
                } else if self.cursor.match_char('*') {
                    TokenKind::Power
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.cursor.match_char('=') {
                    TokenKind::DivideEqual
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.cursor.match_char('=') {
                    TokenKind::ModulusEqual
                } else {
                    TokenKind::Percent
                }
            }
            '=' => {
                if self.cursor.match_char('=') {
                    TokenKind::Equal
                } else {
                    TokenKind::Assignment
                }
            }
            '!' => {
                if self.cursor.match_char('=') {
                    TokenKind::NotEqual
                } else {
                    // The operator table has no bare `!` (§4.2) — only `!=`.
                    return Err(LexError::InvalidCharacter { ch: '!', line: self.token_start_line });
                }
            }
            '<' => {
                if self.cursor.match_char('=') {
                    TokenKind::LessThanEqual
                } else if self.cursor.match_char('<') {
                    TokenKind::LeftShift
                } else {
                    TokenKind::LessThan
                }
            }
            '>' => {
                if self.cursor.match_char('=') {
                    TokenKind::GreaterThanEqual
                } else if self.cursor.match_char('>') {
                    TokenKind::RightShift
                } else {
                    TokenKind::GreaterThan
                }
            }
            '&' => {
                if self.cursor.match_char('&') {
                    TokenKind::And
                } else if self.preceding_is_operand() {
                    TokenKind::BitwiseAnd
                } else {
                    TokenKind::AddressOf
                }
            }
            '|' => {
                if self.cursor.match_char('|') {
                    TokenKind::Or
                } else {
                    TokenKind::BitwiseOr
                }
            }
            '^' => TokenKind::BitwiseXor,
            _ => unreachable!("lex_operator called on non-operator lead character"),
        })
    }

    /// `&` is `bitwise_and` when the preceding token was a number or an
    /// identifier (it's infix between two operands), and `address_of`
    /// otherwise — at the start of an expression or right after another
    /// operator (§4.2).
    fn preceding_is_operand(&self) -> bool {
        matches!(
            self.last_kind,
            Some(TokenKind::Number(_))
                | Some(TokenKind::Ident(_))
                | Some(TokenKind::RParen)
                | Some(TokenKind::RBracket)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simc_util::SymbolTable;

    fn lex_one(source: &str) -> TokenKind {
        let mut symbols = SymbolTable::new();
        let mut lexer = Lexer::new(source, &mut symbols);
        lexer.next_token().unwrap().unwrap().kind
    }

    #[test]
    fn longest_match_wins_for_compound_assign() {
        assert_eq!(lex_one("+="), TokenKind::PlusEqual);
        assert_eq!(lex_one("++"), TokenKind::Increment);
        assert_eq!(lex_one("+"), TokenKind::Plus);
    }

    #[test]
    fn power_beats_multiply_equal() {
        assert_eq!(lex_one("**"), TokenKind::Power);
        assert_eq!(lex_one("*="), TokenKind::MultiplyEqual);
    }

    #[test]
    fn comparison_operators() {
        assert_eq!(lex_one("=="), TokenKind::Equal);
        assert_eq!(lex_one("="), TokenKind::Assignment);
        assert_eq!(lex_one("!="), TokenKind::NotEqual);
        assert_eq!(lex_one(">="), TokenKind::GreaterThanEqual);
        assert_eq!(lex_one("<="), TokenKind::LessThanEqual);
    }

    #[test]
    fn ampersand_is_address_of_at_expression_start() {
        let mut symbols = SymbolTable::new();
        let mut lexer = Lexer::new("&x", &mut symbols);
        let kind = lexer.next_token().unwrap().unwrap().kind;
        assert_eq!(kind, TokenKind::AddressOf);
    }

    #[test]
    fn ampersand_is_bitwise_and_after_an_operand() {
        let mut symbols = SymbolTable::new();
        let mut lexer = Lexer::new("1 & 2", &mut symbols);
        lexer.next_token().unwrap(); // the number
        let kind = lexer.next_token().unwrap().unwrap().kind;
        assert_eq!(kind, TokenKind::BitwiseAnd);
    }

    #[test]
    fn bare_bang_is_not_in_the_operator_table() {
        let mut symbols = SymbolTable::new();
        let mut lexer = Lexer::new("!x", &mut symbols);
        assert!(lexer.next_token().is_err());
    }
}
