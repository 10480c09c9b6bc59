//! Error types for C code generation.
//!
//! The generator only ever reads the symbol table (§5); the failure modes
//! left for it are a handful of invariants the parser is supposed to have
//! already guaranteed — if one fires it points at a parser bug, not a bad
//! source file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("symbol table has no entry for the opcode operand at index {0}")]
    UnknownSymbol(usize),

    #[error("'{0}' has no resolved type at code generation time")]
    UnresolvedType(String),

    #[error("'return' emitted outside any function body")]
    ReturnOutsideFunction,

    #[error("unbalanced scope_begin/scope_over in the opcode stream")]
    UnbalancedScope,
}

pub type Result<T> = std::result::Result<T, GenError>;
