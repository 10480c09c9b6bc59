//! Include inference (§4.4): a single scan over the opcode stream decides
//! which C headers the generated file needs, in a fixed canonical order
//! so re-generating from the same opcodes is byte-identical (§8).

use simc_par::OpCode;
use simc_util::{DataType, SymbolId, SymbolTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Include {
    Stdio,
    Stdbool,
    Math,
}

impl Include {
    fn header(self) -> &'static str {
        match self {
            Include::Stdio => "stdio.h",
            Include::Stdbool => "stdbool.h",
            Include::Math => "math.h",
        }
    }
}

/// Returns the `#include` lines to emit before anything else, in
/// canonical order.
///
/// Boolean-ness is read straight off the symbol table (§3's resolved
/// `DataType`) rather than sniffed out of the rendered expression text —
/// a `var x = y` whose RHS is a bare identifier never spells `true`,
/// `false`, or `bool` even when `y` is boolean-typed.
pub fn infer_includes(ops: &[simc_par::Op], symbols: &SymbolTable) -> Vec<String> {
    let mut wanted = Vec::new();
    let mut want = |inc: Include| {
        if !wanted.contains(&inc) {
            wanted.push(inc);
        }
    };
    let is_bool = |id: SymbolId| matches!(symbols.get(id).datatype, DataType::Bool);

    for op in ops {
        match &op.code {
            OpCode::Print { .. } => want(Include::Stdio),
            OpCode::VarAssignInput { .. } => {
                want(Include::Stdio);
                want(Include::Stdbool);
            }
            OpCode::VarAssign { name, expr } => {
                scan_text(expr, &mut want);
                if is_bool(*name) {
                    want(Include::Stdbool);
                }
            }
            OpCode::VarNoAssign { name } | OpCode::PtrNoAssign { name } => {
                if is_bool(*name) {
                    want(Include::Stdbool);
                }
            }
            OpCode::Assign { expr, .. }
            | OpCode::PtrAssign { expr, .. }
            | OpCode::PtrOnlyAssign { expr, .. }
            | OpCode::ArrayOnlyAssign { init: expr, .. } => scan_text(expr, &mut want),
            OpCode::ArrayAssign { init, .. } => scan_text(init, &mut want),
            OpCode::FuncDecl { name, params } => {
                if is_bool(*name) {
                    want(Include::Stdbool);
                }
                if params.iter().any(|p| is_bool(*p)) {
                    want(Include::Stdbool);
                }
            }
            _ => {}
        }
    }

    wanted.sort();
    wanted.into_iter().map(|inc| format!("#include <{}>", inc.header())).collect()
}

fn scan_text(text: &str, want: &mut impl FnMut(Include)) {
    if text.contains("pow(") || text.contains("M_PI") || text.contains("M_E")
        || text.contains("INFINITY") || text.contains("NAN")
    {
        want(Include::Math);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simc_par::{Op, OpCode};
    use simc_util::{Meta, SymbolTable};

    #[test]
    fn print_pulls_in_stdio() {
        let symbols = SymbolTable::new();
        let ops = vec![Op::new(OpCode::Print { spec: "%d".into(), expr: "1".into() }, 1)];
        assert_eq!(infer_includes(&ops, &symbols), vec!["#include <stdio.h>"]);
    }

    #[test]
    fn pow_call_pulls_in_math_in_canonical_order() {
        let mut symbols = SymbolTable::new();
        let x = symbols.insert("x", DataType::Int, Meta::Variable);
        let ops = vec![
            Op::new(OpCode::Print { spec: "%d".into(), expr: "1".into() }, 1),
            Op::new(OpCode::VarAssign { name: x, expr: "pow(2, 3)".into() }, 2),
        ];
        assert_eq!(infer_includes(&ops, &symbols), vec!["#include <stdio.h>", "#include <math.h>"]);
    }

    #[test]
    fn no_interesting_opcodes_means_no_includes() {
        let symbols = SymbolTable::new();
        let ops = vec![Op::new(OpCode::Break, 1)];
        assert!(infer_includes(&ops, &symbols).is_empty());
    }

    #[test]
    fn a_bare_identifier_assigned_from_a_bool_typed_variable_still_pulls_in_stdbool() {
        let mut symbols = SymbolTable::new();
        let x = symbols.insert("x", DataType::Bool, Meta::Variable);
        let ops = vec![Op::new(OpCode::VarAssign { name: x, expr: "y".into() }, 1)];
        assert_eq!(infer_includes(&ops, &symbols), vec!["#include <stdbool.h>"]);
    }

    #[test]
    fn a_bool_typed_function_parameter_pulls_in_stdbool() {
        let mut symbols = SymbolTable::new();
        let f = symbols.insert("f", DataType::Var, Meta::Function { params: vec![] });
        let p = symbols.insert("flag", DataType::Bool, Meta::Variable);
        let ops = vec![Op::new(OpCode::FuncDecl { name: f, params: vec![p] }, 1)];
        assert_eq!(infer_includes(&ops, &symbols), vec!["#include <stdbool.h>"]);
    }
}
