//! Parser: token stream to [`Program`].
//!
//! Recursive descent, one function per precedence level, lowest first:
//! conditional, `or`, `and`, `not`, comparison, `|`, `^`, `&`, shifts,
//! `+ -`, `* / // %`, unary `- ~`, `**`, postfix (call, subscript,
//! attribute), atoms.

use crate::ast::*;
use crate::frontend::ParseError;
use crate::lexer::{FStringSegment, Lexer, Span, Token};

type PResult<T> = Result<T, ParseError>;

pub struct Parser {
    tokens: Vec<(Token, Span)>,
    chars: Vec<char>,
    pos: usize,
}

/// Parse a complete program.
pub fn parse_program(source: &str) -> PResult<Program> {
    Parser::new(source)?.parse_program()
}

/// Parse a single expression (used for f-string fields).
pub fn parse_expression(source: &str) -> PResult<Expr> {
    let mut parser = Parser::new(source.trim())?;
    let expr = parser.parse_expr_list()?;
    if !parser.is(&Token::Eof) {
        return Err(parser.unexpected());
    }
    Ok(expr)
}

impl Parser {
    pub fn new(source: &str) -> PResult<Self> {
        Ok(Self {
            tokens: Lexer::new(source).tokenize()?,
            chars: source.chars().collect(),
            pos: 0,
        })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Token helpers
    // ═══════════════════════════════════════════════════════════════════

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .map(|(t, _)| t)
            .unwrap_or(&Token::Eof)
    }

    fn peek_at(&self, n: usize) -> &Token {
        self.tokens
            .get(self.pos + n)
            .map(|(t, _)| t)
            .unwrap_or(&Token::Eof)
    }

    fn span(&self) -> Option<Span> {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(_, s)| *s)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn is(&self, t: &Token) -> bool {
        self.peek() == t
    }

    fn eat(&mut self, t: &Token) -> bool {
        if self.is(t) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, t: Token, what: &str) -> PResult<()> {
        if self.eat(&t) {
            Ok(())
        } else {
            Err(self.error(format!("expected {}", what)))
        }
    }

    /// Error at the current token, carrying its source text.
    fn error(&self, message: impl Into<String>) -> ParseError {
        let mut err = ParseError::new(message);
        if let Some(span) = self.span() {
            let snippet: String = if span.end > span.start {
                self.chars[span.start..span.end].iter().collect()
            } else {
                "end of input".to_string()
            };
            err = err.with_location(span.location()).with_snippet(snippet);
        }
        err
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Token::Reserved(kw) => self.error(format!("'{}' is not supported", kw)),
            Token::Eof => self.error("unexpected end of input"),
            _ => self.error("invalid syntax"),
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Token::Newline | Token::Semicolon) {
            self.advance();
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════

    pub fn parse_program(mut self) -> PResult<Program> {
        let mut body = Vec::new();
        self.skip_separators();
        while !self.is(&Token::Eof) {
            body.push(self.parse_stmt()?);
            if !matches!(self.peek(), Token::Newline | Token::Semicolon | Token::Eof) {
                return Err(self.unexpected());
            }
            self.skip_separators();
        }
        Ok(Program { body })
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        if self.eat(&Token::Return) {
            let value = if matches!(self.peek(), Token::Newline | Token::Semicolon | Token::Eof) {
                None
            } else {
                Some(self.parse_expr_list()?)
            };
            return Ok(Stmt::Return(StmtReturn { value }));
        }

        let target_span = self.span();
        let expr = self.parse_expr_list()?;

        match self.peek().clone() {
            Token::Assign => {
                let target = self.assign_target(expr, target_span)?;
                self.advance();
                let value = self.parse_expr_list()?;
                if self.is(&Token::Assign) {
                    return Err(self.error("chained assignment is not supported"));
                }
                Ok(Stmt::Assign(StmtAssign { target, value }))
            }
            Token::AugAssign(op) => {
                let target = self.assign_target(expr, target_span)?;
                self.advance();
                let value = self.parse_expr_list()?;
                Ok(Stmt::AugAssign(StmtAugAssign { target, op, value }))
            }
            _ => Ok(Stmt::Expr(expr)),
        }
    }

    fn assign_target(&self, expr: Expr, span: Option<Span>) -> PResult<String> {
        match expr {
            Expr::Name(name) => Ok(name.id),
            other => {
                let mut err = ParseError::new(format!("cannot assign to {}", other.kind_name()));
                if let Some(span) = span {
                    err = err.with_location(span.location());
                }
                Err(err)
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════

    /// `a, b` at statement level builds a tuple.
    fn parse_expr_list(&mut self) -> PResult<Expr> {
        let first = self.parse_expr()?;
        if !self.is(&Token::Comma) {
            return Ok(first);
        }
        let mut elts = vec![first];
        while self.eat(&Token::Comma) {
            if matches!(
                self.peek(),
                Token::Newline | Token::Semicolon | Token::Eof | Token::Assign | Token::RParen
            ) {
                break;
            }
            elts.push(self.parse_expr()?);
        }
        Ok(Expr::Tuple(ExprTuple { elts }))
    }

    fn parse_expr(&mut self) -> PResult<Expr> {
        let body = self.parse_or()?;
        if self.eat(&Token::If) {
            let test = self.parse_or()?;
            self.expect(Token::Else, "'else' in conditional expression")?;
            let orelse = self.parse_expr()?;
            return Ok(Expr::IfExp(ExprIfExp {
                test: Box::new(test),
                body: Box::new(body),
                orelse: Box::new(orelse),
            }));
        }
        Ok(body)
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat(&Token::Or) {
            let rhs = self.parse_and()?;
            lhs = Expr::BoolOp(ExprBoolOp {
                left: Box::new(lhs),
                op: BoolOp::Or,
                right: Box::new(rhs),
            });
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_not()?;
        while self.eat(&Token::And) {
            let rhs = self.parse_not()?;
            lhs = Expr::BoolOp(ExprBoolOp {
                left: Box::new(lhs),
                op: BoolOp::And,
                right: Box::new(rhs),
            });
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> PResult<Expr> {
        if self.eat(&Token::Not) {
            let operand = self.parse_not()?;
            return Ok(Expr::UnaryOp(ExprUnaryOp {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            }));
        }
        self.parse_comparison()
    }

    fn compare_op(&mut self) -> Option<CompareOp> {
        let op = match self.peek() {
            Token::EqEq => CompareOp::Eq,
            Token::NotEq => CompareOp::NotEq,
            Token::Lt => CompareOp::Lt,
            Token::LtE => CompareOp::LtE,
            Token::Gt => CompareOp::Gt,
            Token::GtE => CompareOp::GtE,
            Token::In => CompareOp::In,
            Token::Not if self.peek_at(1) == &Token::In => {
                self.advance();
                CompareOp::NotIn
            }
            Token::Is if self.peek_at(1) == &Token::Not => {
                self.advance();
                CompareOp::IsNot
            }
            Token::Is => CompareOp::Is,
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    fn parse_comparison(&mut self) -> PResult<Expr> {
        let left = self.parse_bitor()?;
        let Some(op) = self.compare_op() else {
            return Ok(left);
        };
        let right = self.parse_bitor()?;
        if self.compare_op().is_some() {
            return Err(self.error("chained comparisons are not supported"));
        }
        Ok(Expr::Compare(ExprCompare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }))
    }

    fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
        Expr::BinOp(ExprBinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn parse_bitor(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_bitxor()?;
        while self.eat(&Token::Pipe) {
            let rhs = self.parse_bitxor()?;
            lhs = Self::binary(lhs, BinOp::BitOr, rhs);
        }
        Ok(lhs)
    }

    fn parse_bitxor(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_bitand()?;
        while self.eat(&Token::Caret) {
            let rhs = self.parse_bitand()?;
            lhs = Self::binary(lhs, BinOp::BitXor, rhs);
        }
        Ok(lhs)
    }

    fn parse_bitand(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_shift()?;
        while self.eat(&Token::Amp) {
            let rhs = self.parse_shift()?;
            lhs = Self::binary(lhs, BinOp::BitAnd, rhs);
        }
        Ok(lhs)
    }

    fn parse_shift(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_arith()?;
        loop {
            let op = if self.eat(&Token::LShift) {
                BinOp::LShift
            } else if self.eat(&Token::RShift) {
                BinOp::RShift
            } else {
                break;
            };
            let rhs = self.parse_arith()?;
            lhs = Self::binary(lhs, op, rhs);
        }
        Ok(lhs)
    }

    fn parse_arith(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = if self.eat(&Token::Plus) {
                BinOp::Add
            } else if self.eat(&Token::Minus) {
                BinOp::Sub
            } else {
                break;
            };
            let rhs = self.parse_term()?;
            lhs = Self::binary(lhs, op, rhs);
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = if self.eat(&Token::Star) {
                BinOp::Mult
            } else if self.eat(&Token::Slash) {
                BinOp::Div
            } else if self.eat(&Token::DoubleSlash) {
                BinOp::FloorDiv
            } else if self.eat(&Token::Percent) {
                BinOp::Mod
            } else {
                break;
            };
            let rhs = self.parse_factor()?;
            lhs = Self::binary(lhs, op, rhs);
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> PResult<Expr> {
        let op = if self.eat(&Token::Minus) {
            UnaryOp::Neg
        } else if self.eat(&Token::Tilde) {
            UnaryOp::Invert
        } else {
            return self.parse_power();
        };
        let operand = self.parse_factor()?;
        Ok(Expr::UnaryOp(ExprUnaryOp {
            op,
            operand: Box::new(operand),
        }))
    }

    /// `**` binds tighter than unary minus on its left and is right-associative.
    fn parse_power(&mut self) -> PResult<Expr> {
        let base = self.parse_postfix()?;
        if self.eat(&Token::DoubleStar) {
            let exponent = self.parse_factor()?;
            return Ok(Self::binary(base, BinOp::Pow, exponent));
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut e = self.parse_atom()?;
        loop {
            if self.eat(&Token::LParen) {
                let args = self.parse_call_args()?;
                e = Expr::Call(ExprCall {
                    func: Box::new(e),
                    args,
                });
            } else if self.eat(&Token::Dot) {
                let attr = match self.advance() {
                    Token::Name(name) => name,
                    _ => {
                        self.pos -= 1;
                        return Err(self.error("expected attribute name after '.'"));
                    }
                };
                e = Expr::Attribute(ExprAttribute {
                    value: Box::new(e),
                    attr,
                });
            } else if self.eat(&Token::LBracket) {
                let index = self.parse_subscript()?;
                self.expect(Token::RBracket, "']'")?;
                e = Expr::Subscript(ExprSubscript {
                    value: Box::new(e),
                    index: Box::new(index),
                });
            } else {
                break;
            }
        }
        Ok(e)
    }

    fn parse_call_args(&mut self) -> PResult<Vec<Expr>> {
        let mut args = Vec::new();
        loop {
            if self.eat(&Token::RParen) {
                break;
            }
            if matches!(self.peek(), Token::Star | Token::DoubleStar) {
                return Err(self.error("argument unpacking is not supported"));
            }
            if matches!(self.peek(), Token::Name(_)) && self.peek_at(1) == &Token::Assign {
                return Err(self.error("keyword arguments are not supported"));
            }
            args.push(self.parse_expr()?);
            if self.is(&Token::For) {
                return Err(self.error("generator expressions are not supported"));
            }
            if !self.eat(&Token::Comma) {
                self.expect(Token::RParen, "',' or ')'")?;
                break;
            }
        }
        Ok(args)
    }

    fn parse_subscript(&mut self) -> PResult<Expr> {
        let lower = if self.is(&Token::Colon) {
            None
        } else {
            let index = self.parse_expr()?;
            if !self.is(&Token::Colon) {
                return Ok(index);
            }
            Some(Box::new(index))
        };

        self.expect(Token::Colon, "':'")?;
        let upper = self.parse_slice_bound()?;
        let step = if self.eat(&Token::Colon) {
            self.parse_slice_bound()?
        } else {
            None
        };
        Ok(Expr::Slice(ExprSlice { lower, upper, step }))
    }

    fn parse_slice_bound(&mut self) -> PResult<Option<Box<Expr>>> {
        if matches!(self.peek(), Token::Colon | Token::RBracket) {
            return Ok(None);
        }
        Ok(Some(Box::new(self.parse_expr()?)))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Atoms
    // ═══════════════════════════════════════════════════════════════════

    fn parse_atom(&mut self) -> PResult<Expr> {
        match self.peek().clone() {
            Token::Int(n) => {
                self.advance();
                Ok(Expr::Constant(Constant::Int(n)))
            }
            Token::Float(n) => {
                self.advance();
                Ok(Expr::Constant(Constant::Float(n)))
            }
            Token::True => {
                self.advance();
                Ok(Expr::Constant(Constant::Bool(true)))
            }
            Token::False => {
                self.advance();
                Ok(Expr::Constant(Constant::Bool(false)))
            }
            Token::None => {
                self.advance();
                Ok(Expr::Constant(Constant::None))
            }
            Token::Name(id) => {
                self.advance();
                Ok(Expr::Name(ExprName { id }))
            }
            Token::Str(_) | Token::FString(_) => self.parse_strings(),
            Token::LParen => {
                self.advance();
                self.parse_paren()
            }
            Token::LBracket => {
                self.advance();
                self.parse_list()
            }
            Token::LBrace => {
                self.advance();
                self.parse_dict()
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Adjacent string literals concatenate; any f-string among them makes
    /// the whole run an f-string.
    fn parse_strings(&mut self) -> PResult<Expr> {
        let start = self.span();
        let mut segments = Vec::new();
        let mut formatted = false;
        loop {
            match self.peek().clone() {
                Token::Str(s) => segments.push(FStringSegment::Literal(s)),
                Token::FString(parts) => {
                    formatted = true;
                    segments.extend(parts);
                }
                _ => break,
            }
            self.advance();
        }

        if !formatted {
            let text = segments
                .into_iter()
                .map(|seg| match seg {
                    FStringSegment::Literal(s) | FStringSegment::Expr(s) => s,
                })
                .collect::<String>();
            return Ok(Expr::Constant(Constant::Str(text)));
        }

        let mut parts: Vec<FStringPart> = Vec::new();
        for seg in segments {
            match seg {
                FStringSegment::Literal(s) => match parts.last_mut() {
                    Some(FStringPart::Literal(prev)) => prev.push_str(&s),
                    _ => parts.push(FStringPart::Literal(s)),
                },
                FStringSegment::Expr(src) => {
                    let expr = parse_expression(&src).map_err(|mut err| {
                        err.message = format!("f-string: {}", err.message);
                        if let Some(span) = start {
                            err.location = Some(span.location());
                        }
                        err
                    })?;
                    parts.push(FStringPart::Expr(Box::new(expr)));
                }
            }
        }
        Ok(Expr::FString(ExprFString { parts }))
    }

    fn parse_paren(&mut self) -> PResult<Expr> {
        if self.eat(&Token::RParen) {
            return Ok(Expr::Tuple(ExprTuple { elts: vec![] }));
        }
        let first = self.parse_expr()?;
        if self.is(&Token::For) {
            return Err(self.error("generator expressions are not supported"));
        }
        if self.eat(&Token::RParen) {
            return Ok(first);
        }
        let mut elts = vec![first];
        while self.eat(&Token::Comma) {
            if self.is(&Token::RParen) {
                break;
            }
            elts.push(self.parse_expr()?);
        }
        self.expect(Token::RParen, "')'")?;
        Ok(Expr::Tuple(ExprTuple { elts }))
    }

    fn parse_list(&mut self) -> PResult<Expr> {
        if self.eat(&Token::RBracket) {
            return Ok(Expr::List(ExprList { elts: vec![] }));
        }
        let first = self.parse_expr()?;
        if self.eat(&Token::For) {
            let generator = self.parse_comprehension()?;
            self.expect(Token::RBracket, "']'")?;
            return Ok(Expr::ListComp(ExprListComp {
                elt: Box::new(first),
                generator,
            }));
        }
        let mut elts = vec![first];
        while self.eat(&Token::Comma) {
            if self.is(&Token::RBracket) {
                break;
            }
            elts.push(self.parse_expr()?);
        }
        self.expect(Token::RBracket, "']'")?;
        Ok(Expr::List(ExprList { elts }))
    }

    /// After `for`: `target in iter (if cond)*`. A second `for` is rejected.
    fn parse_comprehension(&mut self) -> PResult<Comprehension> {
        let target = self.parse_target()?;
        self.expect(Token::In, "'in'")?;
        let iter = self.parse_or()?;
        let mut ifs = Vec::new();
        while self.eat(&Token::If) {
            ifs.push(self.parse_or()?);
        }
        if self.is(&Token::For) {
            return Err(self.error("only one 'for' clause is supported in a comprehension"));
        }
        Ok(Comprehension {
            target,
            iter: Box::new(iter),
            ifs,
        })
    }

    fn parse_target(&mut self) -> PResult<Target> {
        let parenthesized = self.eat(&Token::LParen);
        let first = self.expect_name()?;
        let target = if self.eat(&Token::Comma) {
            let second = self.expect_name()?;
            if self.is(&Token::Comma) {
                return Err(self.error("comprehension targets support at most two names"));
            }
            Target::Pair(first, second)
        } else {
            Target::Name(first)
        };
        if parenthesized {
            self.expect(Token::RParen, "')'")?;
        }
        Ok(target)
    }

    fn expect_name(&mut self) -> PResult<String> {
        match self.peek().clone() {
            Token::Name(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("expected a name")),
        }
    }

    fn parse_dict(&mut self) -> PResult<Expr> {
        let mut entries = Vec::new();
        loop {
            if self.eat(&Token::RBrace) {
                break;
            }
            let key = self.parse_expr()?;
            if !self.is(&Token::Colon) {
                return Err(self.error("set displays are not supported"));
            }
            self.advance();
            let value = self.parse_expr()?;
            if self.is(&Token::For) {
                return Err(self.error("dict comprehensions are not supported"));
            }
            entries.push((key, value));
            if !self.eat(&Token::Comma) {
                self.expect(Token::RBrace, "',' or '}'")?;
                break;
            }
        }
        Ok(Expr::Dict(ExprDict { entries }))
    }
}
