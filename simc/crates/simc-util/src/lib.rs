//! simc-util - shared infrastructure for the simc compiler
//!
//! Every other crate in this workspace depends on this one. It carries the
//! pieces that are not specific to lexing, parsing, or code generation:
//! typed indices, the symbol table, diagnostics, and source-line lookup.
//!
//! The symbol table (`symtab`) is the one piece of state shared across the
//! whole pipeline: the lexer creates entries for every identifier and
//! literal it sees, the parser mutates their types as inference resolves
//! them, and the generator only reads the final result. There is a single
//! writer at any point in the pipeline, so `SymbolTable` is a plain owned
//! struct threaded through by `&mut`/`&` rather than anything
//! lock-protected.

pub mod diagnostic;
pub mod index_vec;
pub mod span;
pub mod symbol_id;
pub mod symtab;

pub use symbol_id::{SymbolId, SymbolIdGenerator};
pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use span::Span;
pub use symtab::{DataType, Meta, Param, Precedence, SymbolTable};

// Re-export commonly used hashing/ordering helpers, matched to what the
// rest of the workspace pulls from this crate.
pub use indexmap::{IndexMap, IndexSet};
pub use rustc_hash::{FxHashMap, FxHashSet};
