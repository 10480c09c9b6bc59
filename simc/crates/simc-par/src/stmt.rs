//! Statement-level parsing and the scope state machine (§4.3).
//!
//! A block body is always lowered to an explicit `ScopeBegin`/`ScopeOver`
//! pair regardless of whether the source wrote braces — a one-line
//! function/if/while/for body still gets a synthesized pair around its
//! single statement, so the generator never has to special-case the
//! brace-less form.

use simc_util::{DataType, Meta, Precedence, SymbolId};

use crate::ast::{Op, OpCode};
use crate::error::{ParseError, Result};
use crate::types::AssignOp;
use crate::{Parser, Scope, TokenKind};

impl<'sym> Parser<'sym> {
    pub(crate) fn parse_statement(&mut self) -> Result<Vec<Op>> {
        self.skip_newlines();
        let line = self.current_line();
        match self.current().clone() {
            TokenKind::SingleLineComment(text) => {
                self.advance();
                Ok(vec![Op::new(OpCode::SingleLineComment(text), line)])
            }
            TokenKind::MultiLineComment(text) => {
                self.advance();
                Ok(vec![Op::new(OpCode::MultiLineComment(text), line)])
            }
            TokenKind::RawC(text) => {
                self.advance();
                Ok(vec![Op::new(OpCode::Raw(text), line)])
            }
            TokenKind::KwImport => self.parse_import(),
            TokenKind::KwMain => self.parse_main_block(),
            TokenKind::KwEndMain => Err(ParseError::UnmatchedMain { line }),
            TokenKind::KwVar => self.parse_var_decl(),
            TokenKind::KwFun => self.parse_function(),
            TokenKind::KwStruct => self.parse_struct(),
            TokenKind::KwIf => self.parse_if(),
            TokenKind::KwElse => Err(ParseError::DanglingElse { line }),
            TokenKind::KwWhile => self.parse_while(),
            TokenKind::KwDo => self.parse_do_while(),
            TokenKind::KwFor => self.parse_for(),
            TokenKind::KwSwitch => self.parse_switch(),
            TokenKind::KwCase => self.parse_case(),
            TokenKind::KwDefault => self.parse_default(),
            TokenKind::KwReturn => self.parse_return(),
            TokenKind::KwBreak => {
                self.advance();
                Ok(vec![Op::new(OpCode::Break, line)])
            }
            TokenKind::KwContinue => {
                self.advance();
                Ok(vec![Op::new(OpCode::Continue, line)])
            }
            TokenKind::KwExit => self.parse_exit(),
            TokenKind::KwPrint => self.parse_print(),
            TokenKind::Star => self.parse_pointer_decl(),
            TokenKind::Ident(id) => self.parse_ident_statement(id),
            other => Err(ParseError::UnexpectedToken {
                expected: "a statement".to_string(),
                found: format!("{other:?}"),
                line,
            }),
        }
    }

    /// A brace-delimited body, or a single brace-less statement, always
    /// wrapped in `ScopeBegin`/`ScopeOver`.
    pub(crate) fn parse_block(&mut self, scope: Scope) -> Result<Vec<Op>> {
        let begin_line = self.current_line();
        let mut ops = vec![Op::new(OpCode::ScopeBegin, begin_line)];
        self.skip_newlines();

        self.scope_stack.push(scope);
        if matches!(self.current(), TokenKind::LBrace) {
            self.advance();
            self.skip_newlines();
            while !matches!(self.current(), TokenKind::RBrace) {
                if self.at_end() {
                    self.scope_stack.pop();
                    return Err(ParseError::UnmatchedBrace { line: self.current_line() });
                }
                ops.extend(self.parse_statement()?);
                self.skip_newlines();
            }
            self.advance();
        } else {
            ops.extend(self.parse_statement()?);
        }
        self.scope_stack.pop();

        ops.push(Op::new(OpCode::ScopeOver, self.current_line()));
        Ok(ops)
    }

    fn parse_import(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.advance();
        let name = match self.current().clone() {
            TokenKind::Ident(id) => {
                self.advance();
                self.symbols.get(id).value.clone()
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a module name".to_string(),
                    found: format!("{other:?}"),
                    line,
                })
            }
        };
        Ok(vec![Op::new(OpCode::Import(name), line)])
    }

    fn parse_main_block(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        if self.main_seen {
            return Err(ParseError::DuplicateMain { line });
        }
        self.main_seen = true;
        self.advance();
        self.scope_stack.push(Scope::Main);

        let mut ops = vec![Op::new(OpCode::Main, line)];
        self.skip_newlines();
        while !matches!(self.current(), TokenKind::KwEndMain) {
            if self.at_end() {
                return Err(ParseError::UnmatchedMain { line: self.current_line() });
            }
            ops.extend(self.parse_statement()?);
            self.skip_newlines();
        }
        let end_line = self.current_line();
        self.advance();
        self.scope_stack.pop();
        ops.push(Op::new(OpCode::EndMain, end_line));
        Ok(ops)
    }

    /// `var name` / `var name[size]` with no initializer is only legal the
    /// first time: once a prior `var` statement (or an earlier assignment)
    /// has given `name` a real type, seeing it bare again is a
    /// re-declaration (§4.3's contract). `DataType::Var` is what every
    /// identifier starts as until something resolves it, so that's the
    /// only state a second `var name` may find it in.
    fn reject_redeclaration(&self, name: SymbolId, line: u32) -> Result<()> {
        if self.symbols.get(name).datatype != DataType::Var {
            return Err(ParseError::Redeclaration {
                name: self.symbols.get(name).value.clone(),
                line,
            });
        }
        Ok(())
    }

    fn parse_var_decl(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.advance();
        let name = match self.current().clone() {
            TokenKind::Ident(id) => {
                self.advance();
                id
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a variable name".to_string(),
                    found: format!("{other:?}"),
                    line,
                })
            }
        };

        // `var name[size]` / `var name[size] = init` - array declaration.
        if matches!(self.current(), TokenKind::LBracket) {
            self.advance();
            let size = self.parse_expr("array size")?;
            self.expect(TokenKind::RBracket, "']' after array size")?;
            let known_size = size.text.parse::<usize>().ok();
            if let Some(n) = known_size {
                self.symbols.get_mut(name).meta = Meta::ArraySize(n);
            }
            if matches!(self.current(), TokenKind::Assignment) {
                self.advance();
                let init = self.parse_expr("array initializer")?;
                self.symbols.resolve_from(name, init.precedence_as_datatype());
                return Ok(vec![Op::new(
                    OpCode::ArrayAssign { name, size: size.text, init: init.text },
                    line,
                )]);
            }
            if known_size.is_none() {
                return Err(ParseError::ArraySizeUnknown {
                    name: self.symbols.get(name).value.clone(),
                    line,
                });
            }
            self.reject_redeclaration(name, line)?;
            self.symbols.get_mut(name).datatype = DataType::ArrDeclared;
            return Ok(vec![Op::new(OpCode::ArrayNoAssign { name, size: size.text }, line)]);
        }

        if !matches!(self.current(), TokenKind::Assignment) {
            self.reject_redeclaration(name, line)?;
            self.symbols.get_mut(name).datatype = DataType::Declared;
            return Ok(vec![Op::new(OpCode::VarNoAssign { name }, line)]);
        }
        self.advance();

        // `var name = input("prompt"[, 'd'])` - detected structurally
        // rather than via the text-sentinel search this was modeled on.
        if matches!(self.current(), TokenKind::KwInput) {
            let parsed = self.parse_expr("input(...) initializer")?;
            let (prompt, dtype_code) = parsed
                .text
                .rsplit_once("---")
                .expect("parse_input_call always emits a '---' separated pair");
            let dtype_code = dtype_code.chars().next().unwrap_or('s');
            self.symbols.resolve_from(name, parsed.precedence_as_datatype());
            return Ok(vec![Op::new(
                OpCode::VarAssignInput { name, prompt: prompt.to_string(), dtype_code },
                line,
            )]);
        }

        let expr = self.parse_expr("variable initializer")?;
        self.symbols.resolve_from(name, expr.precedence_as_datatype());
        Ok(vec![Op::new(OpCode::VarAssign { name, expr: expr.text }, line)])
    }

    fn parse_pointer_decl(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        let mut depth = 0u32;
        while matches!(self.current(), TokenKind::Star) {
            self.advance();
            depth += 1;
        }
        let name = match self.current().clone() {
            TokenKind::Ident(id) => {
                self.advance();
                id
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a pointer name".to_string(),
                    found: format!("{other:?}"),
                    line,
                })
            }
        };
        match self.current().clone() {
            TokenKind::Assignment => {
                self.advance();
                let expr = self.parse_expr("pointer initializer")?;
                Ok(vec![Op::new(OpCode::PtrAssign { name, expr: expr.text, depth }, line)])
            }
            TokenKind::PlusEqual | TokenKind::MinusEqual | TokenKind::MultiplyEqual
            | TokenKind::DivideEqual | TokenKind::ModulusEqual => {
                let op = match self.advance() {
                    TokenKind::PlusEqual => AssignOp::Add,
                    TokenKind::MinusEqual => AssignOp::Sub,
                    TokenKind::MultiplyEqual => AssignOp::Mul,
                    TokenKind::DivideEqual => AssignOp::Div,
                    TokenKind::ModulusEqual => AssignOp::Mod,
                    _ => unreachable!(),
                };
                let expr = self.parse_expr("pointer compound assignment")?;
                Ok(vec![Op::new(OpCode::PtrOnlyAssign { name, op, expr: expr.text }, line)])
            }
            _ => Ok(vec![Op::new(OpCode::PtrNoAssign { name }, line)]),
        }
    }

    fn parse_if(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.advance();
        let cond = self.parse_paren_expr("if condition")?;
        let mut ops = vec![Op::new(OpCode::If { cond }, line)];
        ops.extend(self.parse_block(Scope::Function)?);

        loop {
            self.skip_newlines();
            match (self.current().clone(), self.peek(1).clone()) {
                (TokenKind::KwElse, TokenKind::KwIf) => {
                    let else_if_line = self.current_line();
                    self.advance();
                    self.advance();
                    let cond = self.parse_paren_expr("else-if condition")?;
                    ops.push(Op::new(OpCode::ElseIf { cond }, else_if_line));
                    ops.extend(self.parse_block(Scope::Function)?);
                }
                (TokenKind::KwElse, _) => {
                    let else_line = self.current_line();
                    self.advance();
                    ops.push(Op::new(OpCode::Else, else_line));
                    ops.extend(self.parse_block(Scope::Function)?);
                    break;
                }
                _ => break,
            }
        }
        Ok(ops)
    }

    fn parse_while(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.advance();
        let cond = self.parse_paren_expr("while condition")?;
        let mut ops = vec![Op::new(OpCode::While { cond }, line)];
        ops.extend(self.parse_block(Scope::Function)?);
        Ok(ops)
    }

    fn parse_do_while(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.advance();
        let mut ops = vec![Op::new(OpCode::Do, line)];
        ops.extend(self.parse_block(Scope::Function)?);
        self.skip_newlines();
        let while_line = self.current_line();
        self.expect(TokenKind::KwWhile, "'while' after do-block")?;
        let cond = self.parse_paren_expr("do-while condition")?;
        ops.push(Op::new(OpCode::WhileDo { cond }, while_line));
        Ok(ops)
    }

    /// `for id in start to end by op step`.
    fn parse_for(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.advance();
        let var = match self.current().clone() {
            TokenKind::Ident(id) => {
                self.advance();
                id
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a loop variable".to_string(),
                    found: format!("{other:?}"),
                    line,
                })
            }
        };
        self.expect(TokenKind::KwIn, "'in' in for-loop header")?;
        let start = self.parse_expr("for-loop start value")?;
        self.expect(TokenKind::KwTo, "'to' in for-loop header")?;
        let end = self.parse_expr("for-loop end value")?;
        self.expect(TokenKind::KwBy, "'by' in for-loop header")?;
        let step_op = self.parse_assign_op_word(line)?;
        let step = self.parse_expr("for-loop step value")?;

        self.symbols.resolve_from(var, DataType::Int);
        let cmp = for_comparison(&start.text, &end.text);
        let mut ops = vec![Op::new(
            OpCode::For { var, start: start.text, end: end.text, cmp, step_op, step: step.text },
            line,
        )];
        ops.extend(self.parse_block(Scope::Function)?);
        Ok(ops)
    }

    /// `by` is followed by one of the bare operator words, not a
    /// compound-assignment token.
    fn parse_assign_op_word(&mut self, line: u32) -> Result<AssignOp> {
        let op = match self.current().clone() {
            TokenKind::Ident(id) => match self.symbols.get(id).value.as_str() {
                "plus" => AssignOp::Add,
                "minus" => AssignOp::Sub,
                "multiply" => AssignOp::Mul,
                "divide" => AssignOp::Div,
                other => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "plus, minus, multiply or divide".to_string(),
                        found: other.to_string(),
                        line,
                    })
                }
            },
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "plus, minus, multiply or divide".to_string(),
                    found: format!("{other:?}"),
                    line,
                })
            }
        };
        self.advance();
        Ok(op)
    }

    fn parse_switch(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.advance();
        let expr = self.parse_paren_expr("switch expression")?;
        let mut ops = vec![Op::new(OpCode::Switch { expr }, line)];
        ops.extend(self.parse_block(Scope::Function)?);
        Ok(ops)
    }

    fn parse_case(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.advance();
        let expr = self.parse_expr("case value")?;
        self.expect_colon(line)?;
        Ok(vec![Op::new(OpCode::Case { expr: expr.text }, line)])
    }

    fn parse_default(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.advance();
        self.expect_colon(line)?;
        Ok(vec![Op::new(OpCode::Default, line)])
    }

    fn expect_colon(&mut self, line: u32) -> Result<()> {
        if matches!(self.current(), TokenKind::Colon) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::MissingColon { keyword: "case/default", line })
        }
    }

    fn parse_return(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        let Some(func) = self.current_function else {
            return Err(ParseError::ReturnOutsideFunction { line });
        };
        self.advance();
        if matches!(self.current(), TokenKind::Newline | TokenKind::CallEnd | TokenKind::RBrace) {
            return Ok(vec![Op::new(OpCode::Return { expr: None }, line)]);
        }
        let expr = self.parse_expr("return value")?;
        self.symbols.resolve_from(func, expr.precedence_as_datatype());
        Ok(vec![Op::new(OpCode::Return { expr: Some(expr.text) }, line)])
    }

    fn parse_exit(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.advance();
        self.expect(TokenKind::LParen, "'(' after exit")?;
        let code = self.parse_expr("exit code")?;
        self.expect(TokenKind::RParen, "')' after exit code")?;
        Ok(vec![Op::new(OpCode::Exit { code: code.text }, line)])
    }

    fn parse_print(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.advance();
        self.expect(TokenKind::LParen, "'(' after print")?;
        let expr = self.parse_expr("print argument")?;
        self.expect(TokenKind::RParen, "')' after print argument")?;
        let spec = format_spec_for(expr.precedence);
        Ok(vec![Op::new(OpCode::Print { spec: spec.to_string(), expr: expr.text }, line)])
    }

    /// Dispatches everything that starts with a plain identifier:
    /// assignment, compound assignment, `++`/`--`, a function call
    /// statement, or a struct instantiation (`StructName var_name`).
    fn parse_ident_statement(&mut self, id: SymbolId) -> Result<Vec<Op>> {
        let line = self.current_line();

        if matches!(self.symbols.get(id).meta, Meta::Function { .. }) {
            self.advance();
            let args = self.parse_call_args(id, line)?;
            return Ok(vec![Op::new(OpCode::FuncCall { name: id, args }, line)]);
        }

        if let DataType::StructVar { .. } = &self.symbols.get(id).datatype {
            if let TokenKind::Ident(var_id) = self.peek(1).clone() {
                self.advance();
                self.advance();
                self.symbols.get_mut(var_id).datatype = DataType::StructVar { struct_name: id };
                self.resolve_struct_members(id, var_id);
                return Ok(vec![Op::new(
                    OpCode::StructInstantiate { struct_name: id, var_name: var_id },
                    line,
                )]);
            }
        }

        self.advance();
        match self.current().clone() {
            TokenKind::Assignment => {
                self.advance();
                let expr = self.parse_expr("assignment")?;
                self.symbols.resolve_from(id, expr.precedence_as_datatype());
                Ok(vec![Op::new(OpCode::VarAssign { name: id, expr: expr.text }, line)])
            }
            TokenKind::PlusEqual | TokenKind::MinusEqual | TokenKind::MultiplyEqual
            | TokenKind::DivideEqual | TokenKind::ModulusEqual => {
                let op = match self.advance() {
                    TokenKind::PlusEqual => AssignOp::Add,
                    TokenKind::MinusEqual => AssignOp::Sub,
                    TokenKind::MultiplyEqual => AssignOp::Mul,
                    TokenKind::DivideEqual => AssignOp::Div,
                    TokenKind::ModulusEqual => AssignOp::Mod,
                    _ => unreachable!(),
                };
                let expr = self.parse_expr("compound assignment")?;
                Ok(vec![Op::new(OpCode::Assign { name: id, op, expr: expr.text }, line)])
            }
            TokenKind::Increment => {
                self.advance();
                Ok(vec![Op::new(
                    OpCode::Unary { name: id, op: crate::types::UnaryOp::Increment, prefix: false },
                    line,
                )])
            }
            TokenKind::Decrement => {
                self.advance();
                Ok(vec![Op::new(
                    OpCode::Unary { name: id, op: crate::types::UnaryOp::Decrement, prefix: false },
                    line,
                )])
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "'=', a compound assignment, or '++'/'--'".to_string(),
                found: format!("{other:?}"),
                line,
            }),
        }
    }

    /// After a `<StructName> <var>` instantiation, resolves every
    /// `<var>.<member>` identifier the lexer already registered (as a
    /// single dotted token, §4.2) to its member's declared type, via the
    /// same `resolve_from` widening every other assignment uses — there is
    /// nothing to insert if the source never actually references that
    /// member.
    fn resolve_struct_members(&mut self, struct_id: SymbolId, var_id: SymbolId) {
        let members = match &self.symbols.get(struct_id).meta {
            Meta::StructMembers(members) => members.clone(),
            _ => return,
        };
        let var_name = self.symbols.get(var_id).value.clone();
        for member_id in members {
            let member_name = self.symbols.get(member_id).value.clone();
            let dotted = format!("{var_name}.{member_name}");
            if let Some(derived_id) = self.symbols.lookup_name(&dotted) {
                let member_type = self.symbols.get(member_id).datatype.clone();
                self.symbols.resolve_from(derived_id, member_type);
            }
        }
    }

    pub(crate) fn parse_paren_expr(&mut self, context: &'static str) -> Result<String> {
        self.expect(TokenKind::LParen, "'(' before condition")?;
        let expr = self.parse_expr(context)?;
        self.expect(TokenKind::RParen, "')' after condition")?;
        Ok(expr.text)
    }
}

/// `>` when both bounds are literal integers and `start` is the greater
/// of the two, `<` otherwise (§8's boundary behaviour) — non-literal
/// bounds (variables, calls) always get `<`, the common ascending case.
fn for_comparison(start: &str, end: &str) -> &'static str {
    match (start.parse::<i64>(), end.parse::<i64>()) {
        (Ok(start), Ok(end)) if start > end => ">",
        _ => "<",
    }
}

fn format_spec_for(prec: Precedence) -> &'static str {
    match prec {
        Precedence::StringConst | Precedence::CharPtr => "%s",
        Precedence::Char => "%c",
        Precedence::Int => "%d",
        Precedence::Float => "%f",
        Precedence::Double => "%lf",
        Precedence::Bool => "%d",
    }
}
