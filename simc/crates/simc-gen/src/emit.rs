//! The C-text emitter (§4.4): walks the flat opcode stream once and renders
//! it straight to a `String` — there is no intermediate tree to lower, and
//! every opcode's C spelling is fixed, so a second pass over the same
//! opcodes always produces byte-identical text (§8).
//!
//! `MAIN`/`END_MAIN` are the only opcodes that change where later output
//! goes: simc sources declare everything else — imports, structs,
//! functions — before the single `MAIN` block, so one growing buffer with
//! an `in_main` flag reproduces the outside-main/inside-main split without
//! needing two buffers spliced back together at the end.

use std::fmt::Write as _;

use simc_par::{Op, OpCode};
use simc_util::{DataType, Meta, SymbolTable};

use crate::error::{GenError, Result};
use crate::types::infer_includes;

pub struct Generator<'sym> {
    symbols: &'sym SymbolTable,
    out: String,
    indent: usize,
    in_main: bool,
    main_has_returned: bool,
}

impl<'sym> Generator<'sym> {
    pub fn new(symbols: &'sym SymbolTable) -> Self {
        Self { symbols, out: String::new(), indent: 0, in_main: false, main_has_returned: false }
    }

    /// Renders the whole opcode stream to one C source file: the inferred
    /// `#include` block, then everything else in source order.
    pub fn generate(mut self, ops: &[Op]) -> Result<String> {
        for include in infer_includes(ops, self.symbols) {
            writeln!(self.out, "{include}").ok();
        }
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for op in ops {
            self.emit(op)?;
        }
        Ok(self.out)
    }

    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn ctype(&self, id: simc_util::SymbolId) -> &'static str {
        self.symbols.get(id).datatype.as_c_type()
    }

    fn name(&self, id: simc_util::SymbolId) -> String {
        self.symbols.get(id).value.clone()
    }

    fn emit(&mut self, op: &Op) -> Result<()> {
        match &op.code {
            OpCode::Print { spec, expr } => self.emit_print(spec, expr),
            OpCode::VarAssign { name, expr } => {
                self.line(format!("{} {} = {};", self.ctype(*name), self.name(*name), expr));
            }
            OpCode::VarNoAssign { name } => {
                self.line(format!("{} {};", self.ctype(*name), self.name(*name)));
            }
            OpCode::VarAssignInput { name, prompt, dtype_code } => {
                self.emit_input(*name, prompt, *dtype_code);
            }
            OpCode::PtrAssign { name, expr, depth } => {
                let stars = "*".repeat(*depth as usize);
                self.line(format!("{} {}{} = {};", self.ctype(*name), stars, self.name(*name), expr));
            }
            OpCode::PtrNoAssign { name } => {
                self.line(format!("{} *{};", self.ctype(*name), self.name(*name)));
            }
            OpCode::ArrayAssign { name, size, init } => {
                self.line(format!(
                    "{} {}[{}] = {};",
                    self.ctype(*name),
                    self.name(*name),
                    size,
                    init
                ));
            }
            OpCode::ArrayNoAssign { name, size } => {
                self.line(format!("{} {}[{}];", self.ctype(*name), self.name(*name), size));
            }
            OpCode::ArrayOnlyAssign { name, init } => {
                self.line(format!("{} = {};", self.name(*name), init));
            }
            OpCode::Assign { name, op, expr } => {
                self.line(format!("{} {} {};", self.name(*name), op.as_c_str(), expr));
            }
            OpCode::PtrOnlyAssign { name, op, expr } => {
                self.line(format!("*{} {} {};", self.name(*name), op.as_c_str(), expr));
            }
            OpCode::Unary { name, op, prefix } => {
                let n = self.name(*name);
                self.line(if *prefix {
                    format!("{}{};", op.as_c_str(), n)
                } else {
                    format!("{}{};", n, op.as_c_str())
                });
            }
            OpCode::FuncDecl { name, params } => self.emit_func_decl(*name, params),
            OpCode::FuncCall { name, args } => {
                self.line(format!("{}({});", self.name(*name), args.join(", ")));
            }
            OpCode::StructDecl { name } => self.emit_struct_decl(*name),
            OpCode::StructInstantiate { struct_name, var_name } => {
                self.line(format!("struct {} {};", self.name(*struct_name), self.name(*var_name)));
            }
            OpCode::StructScopeOver => self.line("};"),
            OpCode::ScopeBegin => {
                self.indent += 1;
            }
            OpCode::ScopeOver => {
                self.indent = self.indent.checked_sub(1).ok_or(GenError::UnbalancedScope)?;
                self.line("}");
            }
            OpCode::Main => {
                self.line("int main() {");
                self.in_main = true;
                self.main_has_returned = false;
                self.indent += 1;
            }
            OpCode::EndMain => {
                if !self.main_has_returned {
                    self.line("return 0;");
                }
                self.indent = self.indent.checked_sub(1).ok_or(GenError::UnbalancedScope)?;
                self.line("}");
                self.in_main = false;
            }
            OpCode::For { var, start, end, cmp, step_op, step } => {
                let n = self.name(*var);
                self.line(format!(
                    "for ({} {} = {}; {} {} {}; {} {} {}) {{",
                    self.ctype(*var),
                    n,
                    start,
                    n,
                    cmp,
                    end,
                    n,
                    step_op.as_c_str(),
                    step
                ));
            }
            OpCode::While { cond } => self.line(format!("while ({cond}) {{")),
            OpCode::Do => self.line("do {"),
            OpCode::WhileDo { cond } => self.line(format!("while ({cond});")),
            OpCode::If { cond } => self.line(format!("if ({cond}) {{")),
            OpCode::ElseIf { cond } => self.line(format!("else if ({cond}) {{")),
            OpCode::Else => self.line("else {"),
            OpCode::Switch { expr } => self.line(format!("switch ({expr}) {{")),
            OpCode::Case { expr } => self.line(format!("case {expr}:")),
            OpCode::Default => self.line("default:"),
            OpCode::Return { expr } => {
                if self.in_main {
                    self.main_has_returned = true;
                }
                match expr {
                    Some(expr) => self.line(format!("return {expr};")),
                    None => self.line("return;"),
                }
            }
            OpCode::Break => self.line("break;"),
            OpCode::Continue => self.line("continue;"),
            OpCode::Exit { code } => self.line(format!("exit({code});")),
            OpCode::SingleLineComment(text) => self.line(format!("// {text}")),
            OpCode::MultiLineComment(text) => self.line(format!("/* {text} */")),
            OpCode::Raw(text) => self.line(text.clone()),
            OpCode::Import(name) => self.line(format!("#include \"{name}.h\"")),
        }
        Ok(())
    }

    fn emit_print(&mut self, spec: &str, expr: &str) {
        if expr.starts_with('"') {
            self.line(format!("printf({expr});"));
        } else {
            self.line(format!("printf(\"{spec}\", {expr});"));
        }
    }

    fn emit_input(&mut self, name: simc_util::SymbolId, prompt: &str, dtype_code: char) {
        let n = self.name(name);
        match dtype_code {
            'i' => {
                self.line(format!("int {n};"));
                self.line(format!("printf(\"{prompt}\");"));
                self.line(format!("scanf(\"%d\", &{n});"));
            }
            'f' => {
                self.line(format!("float {n};"));
                self.line(format!("printf(\"{prompt}\");"));
                self.line(format!("scanf(\"%f\", &{n});"));
            }
            'd' => {
                self.line(format!("double {n};"));
                self.line(format!("printf(\"{prompt}\");"));
                self.line(format!("scanf(\"%lf\", &{n});"));
            }
            _ => {
                self.line(format!("char {n}[256];"));
                self.line(format!("printf(\"{prompt}\");"));
                self.line(format!("scanf(\"%s\", {n});"));
            }
        }
    }

    /// The function's own symbol-table row doubles as its inferred return
    /// type (`void` until a `return <expr>` widens it); parameters are
    /// rendered with their own resolved types.
    fn emit_func_decl(&mut self, name: simc_util::SymbolId, params: &[simc_util::SymbolId]) {
        let ret = self.ctype(name);
        let func_name = self.name(name);
        let rendered_params: Vec<String> =
            params.iter().map(|p| format!("{} {}", self.ctype(*p), self.name(*p))).collect();
        let param_list = if rendered_params.is_empty() { "void".to_string() } else { rendered_params.join(", ") };
        self.line(format!("{} {}({}) {{", ret, func_name, param_list));
    }

    fn emit_struct_decl(&mut self, name: simc_util::SymbolId) {
        self.line(format!("struct {} {{", self.name(name)));
        self.indent += 1;
        let members = match &self.symbols.get(name).meta {
            Meta::StructMembers(members) => members.clone(),
            _ => Vec::new(),
        };
        for member in members {
            self.line(format!("{} {};", self.member_ctype(member), self.name(member)));
        }
        self.indent -= 1;
    }

    fn member_ctype(&self, id: simc_util::SymbolId) -> &'static str {
        let dt = &self.symbols.get(id).datatype;
        if matches!(dt, DataType::Var | DataType::Declared | DataType::NotKnown) {
            "int"
        } else {
            dt.as_c_type()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simc_lex::lex_file;
    use simc_par::Parser;
    use std::path::PathBuf;

    fn generate(source: &str) -> String {
        let mut symbols = SymbolTable::new();
        let (tokens, _) = lex_file(source, &PathBuf::from("."), &mut symbols).unwrap();
        let ops = Parser::new(tokens, &mut symbols).parse().unwrap();
        Generator::new(&symbols).generate(&ops).unwrap()
    }

    #[test]
    fn empty_main_gets_an_implicit_return() {
        let c = generate("MAIN\nEND_MAIN\n");
        assert!(c.contains("int main() {\n\treturn 0;\n}\n"));
    }

    #[test]
    fn var_decl_before_main_is_a_plain_c_declaration() {
        let c = generate("var x = 1\nMAIN\nEND_MAIN\n");
        assert!(c.contains("int x = 1;"));
    }

    #[test]
    fn explicit_return_suppresses_the_implicit_one() {
        let c = generate("MAIN\nreturn 1\nEND_MAIN\n");
        assert!(c.contains("return 1;"));
        assert!(!c.contains("return 0;"));
    }

    #[test]
    fn a_return_nested_inside_an_if_still_suppresses_the_implicit_one() {
        let c = generate("MAIN\nif(1) { return 1 }\nEND_MAIN\n");
        assert!(c.contains("return 1;"));
        assert!(!c.contains("return 0;"), "{c}");
    }

    #[test]
    fn print_of_a_string_literal_skips_the_format_wrapper() {
        let c = generate("MAIN\nprint(\"hi\")\nEND_MAIN\n");
        assert!(c.contains("printf(\"hi\");"));
    }

    #[test]
    fn print_of_a_number_gets_wrapped_in_a_format_string() {
        let c = generate("MAIN\nprint(1 + 2)\nEND_MAIN\n");
        assert!(c.contains("printf(\"%d\", 1 + 2);"));
    }

    #[test]
    fn else_if_and_else_do_not_double_close_the_preceding_block() {
        let c = generate(
            "MAIN\nif(1) { print(\"a\") } else if(2) { print(\"b\") } else { print(\"c\") }\nEND_MAIN\n",
        );
        assert!(!c.contains("}\n\t}"), "adjacent closing braces: {c}");
        assert!(c.contains("else if"));
        assert!(c.contains("else {"));
    }

    #[test]
    fn pow_usage_pulls_in_math_h() {
        let c = generate("var x = 2 ** 3\nMAIN\nEND_MAIN\n");
        assert!(c.starts_with("#include <math.h>"));
    }

    #[test]
    fn empty_parameter_list_renders_as_void() {
        let c = generate("fun foo() {\nreturn\n}\nMAIN\nEND_MAIN\n");
        assert!(c.contains("foo(void) {"), "{c}");
    }

    #[test]
    fn ascending_for_loop_uses_less_than() {
        let c = generate("MAIN\nfor i in 1 to 10 by plus 1 { print(i) }\nEND_MAIN\n");
        assert!(c.contains("i < 10"), "{c}");
    }

    #[test]
    fn descending_for_loop_uses_greater_than() {
        let c = generate("MAIN\nfor i in 10 to 1 by minus 1 { print(i) }\nEND_MAIN\n");
        assert!(c.contains("i > 1"), "{c}");
    }
}
