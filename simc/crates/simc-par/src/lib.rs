//! simc-par - parsing and inline type inference for the simc compiler
//!
//! Turns a token stream into a flat `Vec<Op>` (§3, §4.3): there is no
//! intermediate tree. The parser is the symbol table's only writer once
//! lexing finishes — it widens `DataType::Var` placeholders as it learns
//! what an identifier is used as, and it is the only stage that can fail
//! with a `ParseError`. The generator that consumes the opcode stream only
//! ever reads the table.

mod ast;
mod error;
mod expr;
mod items;
mod stmt;
mod types;

pub use ast::{Op, OpCode};
pub use error::{ParseError, Result};
pub use types::{AssignOp, ParsedExpr, UnaryOp};

use simc_lex::{Token, TokenKind};
use simc_util::{SymbolId, SymbolTable};

/// Where in the surface grammar the parser currently sits. Bodies are
/// always explicit `ScopeBegin`/`ScopeOver` pairs in the opcode stream,
/// even when the source used a brace-less one-line form — see
/// `Parser::open_block`/`close_block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Global,
    Main,
    Function,
    Struct,
}

pub struct Parser<'sym> {
    tokens: Vec<Token>,
    pos: usize,
    symbols: &'sym mut SymbolTable,
    scope_stack: Vec<Scope>,
    main_seen: bool,
    /// The enclosing function's own symbol, while inside its body. A
    /// function's `datatype` row doubles as its inferred *return* type —
    /// `return <expr>` widens it via `resolve_from` the same way an
    /// ordinary assignment would. `None` means `return` is rejected
    /// (§4.3's "return outside a function" edge case).
    current_function: Option<SymbolId>,
}

const EOF: TokenKind = TokenKind::Eof;

impl<'sym> Parser<'sym> {
    pub fn new(tokens: Vec<Token>, symbols: &'sym mut SymbolTable) -> Self {
        Self {
            tokens,
            pos: 0,
            symbols,
            scope_stack: vec![Scope::Global],
            main_seen: false,
            current_function: None,
        }
    }

    pub(crate) fn current(&self) -> &TokenKind {
        self.tokens.get(self.pos).map(|t| &t.kind).unwrap_or(&EOF)
    }

    pub(crate) fn peek(&self, offset: usize) -> &TokenKind {
        self.tokens.get(self.pos + offset).map(|t| &t.kind).unwrap_or(&EOF)
    }

    pub(crate) fn current_line(&self) -> u32 {
        self.tokens
            .get(self.pos)
            .map(|t| t.line)
            .unwrap_or_else(|| self.tokens.last().map(|t| t.line).unwrap_or(1))
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn advance(&mut self) -> TokenKind {
        let kind = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    /// Consumes the current token if it matches `expected`, else fails
    /// with `ParseError::UnexpectedToken`.
    pub(crate) fn expect(&mut self, expected: TokenKind, what: &str) -> Result<()> {
        if self.current() == &expected {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: what.to_string(),
                found: format!("{:?}", self.current()),
                line: self.current_line(),
            })
        }
    }

    /// Skips zero or more newline tokens — used between statements and
    /// after `)`/`{` where the surface grammar allows blank lines.
    pub(crate) fn skip_newlines(&mut self) {
        while matches!(self.current(), TokenKind::Newline) {
            self.advance();
        }
    }

    /// Errors with `ParseError::ForbiddenInScope` when the innermost scope
    /// on the stack is `forbidden` — the scope-restricted statement check
    /// §4.3 requires (`fun`/`struct` may only appear at global scope, per
    /// the original).
    pub(crate) fn reject_scope(
        &self,
        forbidden: Scope,
        stmt: &'static str,
        scope: &'static str,
        line: u32,
    ) -> Result<()> {
        if self.scope_stack.last() == Some(&forbidden) {
            return Err(ParseError::ForbiddenInScope { stmt, scope, line });
        }
        Ok(())
    }

    /// Entry point: parses the whole token stream into a flat opcode
    /// list. A source file is a run of top-level statements, imports, one
    /// `MAIN`/`END_MAIN` block, and any number of `BEGIN_C`/`END_C`
    /// blocks and comments.
    pub fn parse(mut self) -> Result<Vec<Op>> {
        let mut ops = Vec::new();
        self.skip_newlines();
        while !self.at_end() {
            ops.extend(self.parse_statement()?);
            self.skip_newlines();
        }
        if self.main_seen {
            // nothing further to check; `parse_statement` rejects a
            // second MAIN and a dangling END_MAIN as it goes.
        }
        Ok(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simc_lex::lex_file;
    use std::path::PathBuf;

    fn parse_source(source: &str) -> Result<Vec<Op>> {
        let mut symbols = SymbolTable::new();
        let (tokens, _) = lex_file(source, &PathBuf::from("."), &mut symbols).unwrap();
        Parser::new(tokens, &mut symbols).parse()
    }

    #[test]
    fn empty_source_parses_to_no_opcodes() {
        assert_eq!(parse_source("").unwrap(), vec![]);
    }

    #[test]
    fn a_lone_main_block_round_trips() {
        let ops = parse_source("MAIN\nEND_MAIN\n").unwrap();
        assert!(matches!(ops[0].code, OpCode::Main));
        assert!(matches!(ops[1].code, OpCode::EndMain));
    }
}
