//! Function and struct declarations (§4.3).

use simc_util::{DataType, Meta, Param, SymbolId};

use crate::ast::{Op, OpCode};
use crate::error::{ParseError, Result};
use crate::{Parser, Scope, TokenKind};

impl<'sym> Parser<'sym> {
    /// `fun name(param, param = default, ...) { body }`, or a brace-less
    /// one-line body. A parameter with a default value must come after
    /// every parameter without one.
    pub(crate) fn parse_function(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.reject_scope(Scope::Struct, "a function declaration", "struct scope", line)?;
        self.reject_scope(Scope::Function, "a function declaration", "another function", line)?;
        self.reject_scope(Scope::Main, "a function declaration", "MAIN", line)?;
        self.advance();
        let name = match self.current().clone() {
            TokenKind::Ident(id) => {
                self.advance();
                id
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a function name".to_string(),
                    found: format!("{other:?}"),
                    line,
                })
            }
        };

        self.expect(TokenKind::LParen, "'(' after function name")?;
        let params = self.parse_function_params()?;
        self.expect(TokenKind::RParen, "')' after parameter list")?;

        // `datatype` stays whatever the lexer defaulted it to (`DataType::Var`)
        // and widens as `return` statements inside the body resolve it — it
        // doubles as the function's inferred return type. `meta` is what
        // marks the symbol callable.
        self.symbols.get_mut(name).meta = Meta::Function { params: params.clone() };

        let mut ops = vec![Op::new(
            OpCode::FuncDecl { name, params: params.iter().map(|p| p.name).collect() },
            line,
        )];

        let outer_function = self.current_function.replace(name);
        ops.extend(self.parse_block(Scope::Function)?);
        self.current_function = outer_function;
        Ok(ops)
    }

    fn parse_function_params(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();
        let mut seen_default = false;

        if matches!(self.current(), TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            let line = self.current_line();
            let param_id = match self.current().clone() {
                TokenKind::Ident(id) => {
                    self.advance();
                    id
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "a parameter name".to_string(),
                        found: format!("{other:?}"),
                        line,
                    })
                }
            };

            let default = if matches!(self.current(), TokenKind::Assignment) {
                self.advance();
                seen_default = true;
                Some(self.parse_literal_default(line)?)
            } else {
                if seen_default {
                    return Err(ParseError::OutOfOrderDefault {
                        name: self.symbols.get(param_id).value.clone(),
                        line,
                    });
                }
                None
            };

            params.push(Param { name: param_id, default });

            if matches!(self.current(), TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(params)
    }

    /// Default values are literals only (§4.3), matching the surface
    /// grammar's `default_value -> number || string`.
    fn parse_literal_default(&mut self, line: u32) -> Result<SymbolId> {
        match self.current().clone() {
            TokenKind::Number(id)
            | TokenKind::StringLit(id)
            | TokenKind::CharLit(id)
            | TokenKind::Bool(id) => {
                self.advance();
                Ok(id)
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "a literal default value".to_string(),
                found: format!("{other:?}"),
                line,
            }),
        }
    }

    /// `struct Name { member member ... }`.
    pub(crate) fn parse_struct(&mut self) -> Result<Vec<Op>> {
        let line = self.current_line();
        self.reject_scope(Scope::Struct, "a struct declaration", "struct scope", line)?;
        self.reject_scope(Scope::Function, "a struct declaration", "a function", line)?;
        self.reject_scope(Scope::Main, "a struct declaration", "MAIN", line)?;
        self.advance();
        let name = match self.current().clone() {
            TokenKind::Ident(id) => {
                self.advance();
                id
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a struct name".to_string(),
                    found: format!("{other:?}"),
                    line,
                })
            }
        };
        self.symbols.get_mut(name).datatype = DataType::StructVar { struct_name: name };

        let mut ops = vec![Op::new(OpCode::StructDecl { name }, line)];
        self.skip_newlines();
        self.expect(TokenKind::LBrace, "'{' after struct name")?;
        self.skip_newlines();

        let mut members = Vec::new();
        self.scope_stack.push(Scope::Struct);
        while !matches!(self.current(), TokenKind::RBrace) {
            if self.at_end() {
                self.scope_stack.pop();
                return Err(ParseError::UnmatchedBrace { line: self.current_line() });
            }
            // Member lists aren't statement lists, so `fun`/`struct` here
            // would otherwise fall straight to "expected a struct member
            // name" instead of the scope error the original raises.
            // `Scope::Struct` is already on top, so both calls below are
            // guaranteed to return their scope error, never `Ok`.
            if matches!(self.current(), TokenKind::KwFun) {
                if let Err(err) = self.parse_function() {
                    self.scope_stack.pop();
                    return Err(err);
                }
            }
            if matches!(self.current(), TokenKind::KwStruct) {
                if let Err(err) = self.parse_struct() {
                    self.scope_stack.pop();
                    return Err(err);
                }
            }
            let member_line = self.current_line();
            let member_id = match self.current().clone() {
                TokenKind::Ident(id) => {
                    self.advance();
                    id
                }
                other => {
                    self.scope_stack.pop();
                    return Err(ParseError::UnexpectedToken {
                        expected: "a struct member name".to_string(),
                        found: format!("{other:?}"),
                        line: member_line,
                    });
                }
            };
            members.push(member_id);
            self.skip_newlines();
        }
        self.scope_stack.pop();
        self.advance();

        self.symbols.get_mut(name).meta = Meta::StructMembers(members);
        ops.push(Op::new(OpCode::StructScopeOver, self.current_line()));
        Ok(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simc_lex::lex_file;
    use simc_util::SymbolTable;
    use std::path::PathBuf;

    fn parse(source: &str) -> Vec<Op> {
        let mut symbols = SymbolTable::new();
        let (tokens, _) = lex_file(source, &PathBuf::from("."), &mut symbols).unwrap();
        Parser::new(tokens, &mut symbols).parse().unwrap()
    }

    #[test]
    fn function_with_defaults_parses() {
        let ops = parse("fun add(x, y = 1) { return x + y }\n");
        match &ops[0].code {
            OpCode::FuncDecl { params, .. } => assert_eq!(params.len(), 2),
            other => panic!("expected FuncDecl, got {other:?}"),
        }
    }

    #[test]
    fn out_of_order_default_is_rejected() {
        let mut symbols = SymbolTable::new();
        let (tokens, _) =
            lex_file("fun add(x = 1, y)\n{ return x }\n", &PathBuf::from("."), &mut symbols)
                .unwrap();
        let err = Parser::new(tokens, &mut symbols).parse().unwrap_err();
        assert!(matches!(err, ParseError::OutOfOrderDefault { .. }));
    }

    #[test]
    fn brace_less_function_body_gets_a_synthesized_scope() {
        let ops = parse("fun greet() print(\"hi\")\n");
        assert!(matches!(ops[1].code, OpCode::ScopeBegin));
        assert!(matches!(ops.last().unwrap().code, OpCode::ScopeOver));
    }

    #[test]
    fn struct_declaration_records_members() {
        let ops = parse("struct Point {\n    x\n    y\n}\n");
        assert!(matches!(ops[0].code, OpCode::StructDecl { .. }));
        assert!(matches!(ops.last().unwrap().code, OpCode::StructScopeOver));
    }

    fn parse_err(source: &str) -> ParseError {
        let mut symbols = SymbolTable::new();
        let (tokens, _) = lex_file(source, &PathBuf::from("."), &mut symbols).unwrap();
        Parser::new(tokens, &mut symbols).parse().unwrap_err()
    }

    #[test]
    fn nested_function_is_rejected() {
        let err = parse_err("fun outer() { fun inner() { return 1 } return inner() }\n");
        assert!(matches!(err, ParseError::ForbiddenInScope { .. }));
    }

    #[test]
    fn function_inside_main_is_rejected() {
        let err = parse_err("MAIN\nfun inner() { return 1 }\nEND_MAIN\n");
        assert!(matches!(err, ParseError::ForbiddenInScope { .. }));
    }

    #[test]
    fn function_inside_struct_is_rejected() {
        let err = parse_err("struct Point {\n    fun inner() { return 1 }\n}\n");
        assert!(matches!(err, ParseError::ForbiddenInScope { .. }));
    }

    #[test]
    fn struct_inside_struct_is_rejected() {
        let err = parse_err("struct Outer {\n    struct Inner {\n        x\n    }\n}\n");
        assert!(matches!(err, ParseError::ForbiddenInScope { .. }));
    }

    #[test]
    fn struct_inside_function_is_rejected() {
        let err = parse_err("fun outer() { struct Point { x } return 1 }\n");
        assert!(matches!(err, ParseError::ForbiddenInScope { .. }));
    }

    #[test]
    fn struct_inside_main_is_rejected() {
        let err = parse_err("MAIN\nstruct Point { x }\nEND_MAIN\n");
        assert!(matches!(err, ParseError::ForbiddenInScope { .. }));
    }

    #[test]
    fn top_level_function_and_struct_still_parse() {
        let ops = parse("struct Point {\n    x\n}\nfun add(x, y) { return x + y }\n");
        assert!(matches!(ops[0].code, OpCode::StructDecl { .. }));
        assert!(ops.iter().any(|op| matches!(op.code, OpCode::FuncDecl { .. })));
    }
}
