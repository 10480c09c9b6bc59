//! Expression parsing (§4.3): operands chained by operators into a single
//! rendered C-text fragment, with the result's widening `Precedence`
//! tracked alongside it rather than re-derived later.

use simc_util::{DataType, Meta, Precedence, SymbolId};

use crate::error::{ParseError, Result};
use crate::types::ParsedExpr;
use crate::{Parser, TokenKind};

/// Binds every infix operator this language has to its C spelling. `**`
/// is handled separately in `parse_expr` because it does not have a C
/// spelling of its own — it lowers to `pow(lhs, rhs)`.
fn infix_c_str(kind: &TokenKind) -> Option<&'static str> {
    Some(match kind {
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::Equal => "==",
        TokenKind::NotEqual => "!=",
        TokenKind::GreaterThan => ">",
        TokenKind::LessThan => "<",
        TokenKind::GreaterThanEqual => ">=",
        TokenKind::LessThanEqual => "<=",
        TokenKind::And => "&&",
        TokenKind::Or => "||",
        TokenKind::BitwiseAnd => "&",
        TokenKind::BitwiseOr => "|",
        TokenKind::BitwiseXor => "^",
        TokenKind::LeftShift => "<<",
        TokenKind::RightShift => ">>",
        _ => return None,
    })
}

impl<'sym> Parser<'sym> {
    /// Parses one expression: a primary, then zero or more `operator
    /// primary` pairs. Stops at the first token that cannot continue an
    /// expression — the caller is responsible for checking what follows
    /// (a `)`, a `,`, a newline, `call_end`, ...).
    pub(crate) fn parse_expr(&mut self, context: &'static str) -> Result<ParsedExpr> {
        let line = self.current_line();
        let mut lhs = self.parse_primary(context)?;

        loop {
            if let TokenKind::Power = self.current() {
                self.advance();
                let rhs = self.parse_primary(context)?;
                lhs = ParsedExpr::new(
                    format!("pow({}, {})", lhs.text, rhs.text),
                    widen(lhs.precedence, rhs.precedence),
                    rhs.next,
                );
                continue;
            }
            let kind = self.current().clone();
            let Some(op) = infix_c_str(&kind) else { break };
            self.advance();
            let rhs = self.parse_primary(context)?;
            if matches!(kind, TokenKind::BitwiseXor) && is_string_precedence(lhs.precedence, rhs.precedence) {
                return Err(ParseError::InvalidOperatorForType { op: "^", line });
            }
            lhs = ParsedExpr::new(
                format!("{} {} {}", lhs.text, op, rhs.text),
                widen(lhs.precedence, rhs.precedence),
                rhs.next,
            );
        }

        if lhs.text.is_empty() {
            return Err(ParseError::EmptyExpression { line });
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self, context: &'static str) -> Result<ParsedExpr> {
        let line = self.current_line();
        match self.current().clone() {
            TokenKind::Minus => {
                self.advance();
                let inner = self.parse_primary(context)?;
                Ok(ParsedExpr::new(format!("-{}", inner.text), inner.precedence, self.pos))
            }
            TokenKind::AddressOf => {
                self.advance();
                let inner = self.parse_primary(context)?;
                Ok(ParsedExpr::new(format!("&{}", inner.text), inner.precedence, self.pos))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr(context)?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(ParsedExpr::new(format!("({})", inner.text), inner.precedence, self.pos))
            }
            TokenKind::TypeCast(cast) => {
                self.advance();
                self.expect(TokenKind::LParen, "'(' after cast")?;
                let inner = self.parse_expr(context)?;
                self.expect(TokenKind::RParen, "')' after cast")?;
                let text = format!("({}) ({})", cast.as_c_type(), inner.text);
                let prec = cast.as_datatype().precedence().unwrap_or(Precedence::Int);
                Ok(ParsedExpr::new(text, prec, self.pos))
            }
            TokenKind::Number(id) | TokenKind::Bool(id) | TokenKind::CharLit(id) => {
                self.advance();
                let entry = self.symbols.get(id);
                let prec = entry.datatype.precedence().unwrap_or(Precedence::Int);
                Ok(ParsedExpr::new(entry.value.clone(), prec, self.pos))
            }
            TokenKind::StringLit(id) => {
                self.advance();
                let (text, extra_args) = self.render_string_literal(id);
                let mut full = format!("\"{}\"", text);
                for arg in extra_args {
                    full.push_str(", ");
                    full.push_str(&arg);
                }
                Ok(ParsedExpr::new(full, Precedence::CharPtr, self.pos))
            }
            TokenKind::KwInput => self.parse_input_call(line),
            TokenKind::Ident(id) => {
                self.advance();
                if matches!(self.current(), TokenKind::LParen) {
                    self.parse_call_expr(id, line)
                } else if matches!(self.current(), TokenKind::LBracket) {
                    self.parse_index_expr(id)
                } else {
                    let entry = self.symbols.get(id);
                    let prec = entry.datatype.precedence().unwrap_or(Precedence::Int);
                    Ok(ParsedExpr::new(entry.value.clone(), prec, self.pos))
                }
            }
            _ => Err(ParseError::EmptyExpression { line }),
        }
    }

    /// A string literal's `{name}` interpolation markers are replaced
    /// with `name`'s `printf` format specifier, and `name` itself is
    /// returned as a trailing positional argument (§4.3).
    fn render_string_literal(&self, id: SymbolId) -> (String, Vec<String>) {
        let raw = self.symbols.get(id).value.clone();
        let mut out = String::with_capacity(raw.len());
        let mut args = Vec::new();
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '{' {
                out.push(c);
                continue;
            }
            let mut name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                name.push(c);
            }
            match self.symbols.lookup_name(&name) {
                Some(var_id) => {
                    let prec = self.symbols.get(var_id).datatype.precedence();
                    out.push_str(format_specifier(prec));
                    args.push(name);
                }
                None => {
                    out.push('{');
                    out.push_str(&name);
                    out.push('}');
                }
            }
        }
        (out, args)
    }

    /// `input("prompt")` or `input("prompt", 'd')` (§4.3). Detected
    /// structurally here rather than by building text and searching it
    /// for a sentinel, unlike the scheme this lowering was modeled on.
    fn parse_input_call(&mut self, line: u32) -> Result<ParsedExpr> {
        self.advance();
        self.expect(TokenKind::LParen, "'(' after input")?;
        let prompt_id = match self.current().clone() {
            TokenKind::StringLit(id) => {
                self.advance();
                id
            }
            _ => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a string prompt".to_string(),
                    found: format!("{:?}", self.current()),
                    line,
                })
            }
        };
        let dtype_code = if matches!(self.current(), TokenKind::Comma) {
            self.advance();
            match self.current().clone() {
                TokenKind::CharLit(id) => {
                    self.advance();
                    self.symbols.get(id).value.chars().next().unwrap_or('s')
                }
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "a dtype char literal".to_string(),
                        found: format!("{:?}", self.current()),
                        line,
                    })
                }
            }
        } else {
            's'
        };
        self.expect(TokenKind::RParen, "')' after input(...)")?;

        let prompt = self.symbols.get(prompt_id).value.clone();
        let prec = match dtype_code {
            'i' => Precedence::Int,
            'f' => Precedence::Float,
            'd' => Precedence::Double,
            _ => Precedence::CharPtr,
        };
        // The text form is only used when an `input(...)` is embedded in a
        // larger expression than a bare assignment; `stmt.rs` matches on
        // the raw token pattern directly for `var x = input(...)`.
        Ok(ParsedExpr::new(format!("{prompt}---{dtype_code}"), prec, self.pos))
    }

    fn parse_call_expr(&mut self, name: SymbolId, line: u32) -> Result<ParsedExpr> {
        let args = self.parse_call_args(name, line)?;
        let ret_prec = match &self.symbols.get(name).datatype {
            DataType::Deferred(_) | DataType::Var | DataType::NotKnown => Precedence::Int,
            other => other.precedence().unwrap_or(Precedence::Int),
        };
        let func_name = self.symbols.get(name).value.clone();
        let text = format!("{}({})", func_name, args.join(", "));
        Ok(ParsedExpr::new(text, ret_prec, self.pos))
    }

    /// Parses `(arg, arg, ...)`, checking arity against the function's
    /// recorded parameters and filling in trailing defaults (§4.3).
    pub(crate) fn parse_call_args(&mut self, name: SymbolId, line: u32) -> Result<Vec<String>> {
        self.expect(TokenKind::LParen, "'(' after function name")?;
        let mut args = Vec::new();
        if !matches!(self.current(), TokenKind::RParen) {
            loop {
                let parsed = self.parse_expr("function argument")?;
                args.push(parsed.text);
                if matches!(self.current(), TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')' after call arguments")?;

        let params = match &self.symbols.get(name).meta {
            Meta::Function { params } => params.clone(),
            _ => return Ok(args),
        };
        let required = params.iter().take_while(|p| p.default.is_none()).count();
        if args.len() < required || args.len() > params.len() {
            return Err(ParseError::ArityMismatch {
                name: self.symbols.get(name).value.clone(),
                expected: params.len(),
                got: args.len(),
                line,
            });
        }
        for param in params.iter().skip(args.len()) {
            let default_id = param.default.expect("missing defaults already rejected above");
            args.push(self.symbols.get(default_id).value.clone());
        }
        Ok(args)
    }

    fn parse_index_expr(&mut self, name: SymbolId) -> Result<ParsedExpr> {
        let line = self.current_line();
        self.advance();
        let index = self.parse_expr("array index")?;
        self.expect(TokenKind::RBracket, "']' after array index")?;

        if matches!(
            index.precedence,
            Precedence::Float | Precedence::Double | Precedence::CharPtr | Precedence::StringConst
        ) {
            return Err(ParseError::NonIntegerArrayIndex { line });
        }
        if let (Ok(i), Meta::ArraySize(size)) = (index.text.parse::<i64>(), &self.symbols.get(name).meta) {
            let size = *size;
            if i < 0 || i as usize >= size {
                return Err(ParseError::ArrayIndexOutOfBounds {
                    name: self.symbols.get(name).value.clone(),
                    index: i,
                    size,
                    line,
                });
            }
        }

        let array_name = self.symbols.get(name).value.clone();
        let elem_prec = self.symbols.get(name).datatype.precedence().unwrap_or(Precedence::Int);
        Ok(ParsedExpr::new(format!("{}[{}]", array_name, index.text), elem_prec, self.pos))
    }
}

fn widen(a: Precedence, b: Precedence) -> Precedence {
    if a >= b { a } else { b }
}

fn is_string_precedence(a: Precedence, b: Precedence) -> bool {
    matches!(a, Precedence::StringConst | Precedence::CharPtr)
        || matches!(b, Precedence::StringConst | Precedence::CharPtr)
}

fn format_specifier(prec: Option<Precedence>) -> &'static str {
    match prec {
        Some(Precedence::StringConst) | Some(Precedence::CharPtr) | None => "%s",
        Some(Precedence::Char) => "%c",
        Some(Precedence::Int) => "%d",
        Some(Precedence::Float) => "%f",
        Some(Precedence::Double) => "%lf",
        Some(Precedence::Bool) => "%d",
    }
}
