//! simc-gen - C code generation for the simc compiler
//!
//! Turns the parser's flat opcode stream into a C source file (§4.4). The
//! symbol table is read-only here: every type decision it needs was already
//! made while parsing, so generation is a single pass with no failure mode
//! beyond the opcode stream itself being malformed.

mod emit;
pub mod error;
mod types;

pub use emit::Generator;
pub use error::{GenError, Result};
pub use types::infer_includes;
