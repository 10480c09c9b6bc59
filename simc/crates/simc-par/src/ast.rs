//! `OpCode` — the intermediate instruction the parser emits and the code
//! generator consumes (§3). Every payload here is a typed field instead of
//! a `---`/`&&&`-delimited string (§9's design note).

use simc_util::SymbolId;

use crate::types::{AssignOp, UnaryOp};

#[derive(Debug, Clone, PartialEq)]
pub enum OpCode {
    Print { spec: String, expr: String },
    VarAssign { name: SymbolId, expr: String },
    VarNoAssign { name: SymbolId },
    /// `input` lowering (§4.3): a prompt string plus the dtype code the
    /// generator expands into a `printf`+`scanf` pair.
    VarAssignInput { name: SymbolId, prompt: String, dtype_code: char },
    PtrAssign { name: SymbolId, expr: String, depth: u32 },
    PtrNoAssign { name: SymbolId },
    ArrayAssign { name: SymbolId, size: String, init: String },
    ArrayNoAssign { name: SymbolId, size: String },
    ArrayOnlyAssign { name: SymbolId, init: String },
    Assign { name: SymbolId, op: AssignOp, expr: String },
    PtrOnlyAssign { name: SymbolId, op: AssignOp, expr: String },
    Unary { name: SymbolId, op: UnaryOp, prefix: bool },
    FuncDecl { name: SymbolId, params: Vec<SymbolId> },
    FuncCall { name: SymbolId, args: Vec<String> },
    StructDecl { name: SymbolId },
    StructInstantiate { struct_name: SymbolId, var_name: SymbolId },
    StructScopeOver,
    ScopeBegin,
    ScopeOver,
    Main,
    EndMain,
    /// `for <var> in <start> to <end> by <op> <step>` (§4.3). `cmp` is the
    /// comparison operator the loop condition uses — `>` when `start` is a
    /// literal greater than `end`, `<` otherwise (§8).
    For { var: SymbolId, start: String, end: String, cmp: &'static str, step_op: AssignOp, step: String },
    While { cond: String },
    Do,
    WhileDo { cond: String },
    If { cond: String },
    ElseIf { cond: String },
    Else,
    Switch { expr: String },
    Case { expr: String },
    Default,
    Return { expr: Option<String> },
    Break,
    Continue,
    Exit { code: String },
    SingleLineComment(String),
    MultiLineComment(String),
    Raw(String),
    Import(String),
}

/// An opcode paired with the source line it was emitted from, for
/// diagnostics downstream of the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Op {
    pub code: OpCode,
    pub line: u32,
}

impl Op {
    pub fn new(code: OpCode, line: u32) -> Self {
        Self { code, line }
    }
}
