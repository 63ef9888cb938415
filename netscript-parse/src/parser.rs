#![forbid(unsafe_code)]

use std::mem;

use netscript_ast::{
    span_between, AssignOp, AssignStmt, BinOp, Block, CallArg, Expr, ExprKind, FuncDef, Ident,
    IfStmt, Program, Span, Stmt, UnaryOp, WhileStmt,
};
use netscript_lex::{Token, TokenKind};

use crate::error::ParseError;

pub struct Parser<'a> {
    tokens: &'a [Token],
    idx: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, idx: 0 }
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut defs = Vec::new();
        loop {
            self.skip_newlines();
            if self.at(TokenKind::Eof) {
                break;
            }
            defs.push(self.parse_def()?);
        }
        Ok(Program { defs })
    }

    fn parse_def(&mut self) -> Result<FuncDef, ParseError> {
        let start = self.expect(TokenKind::KwDef)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let params = self.parse_ident_list(TokenKind::RParen)?;
        self.expect(TokenKind::RParen)?;

        let returns = if self.at(TokenKind::Arrow) {
            self.expect_any()?;
            if self.at(TokenKind::LParen) {
                self.expect_any()?;
                let returns = self.parse_ident_list(TokenKind::RParen)?;
                self.expect(TokenKind::RParen)?;
                returns
            } else {
                vec![self.expect_ident()?]
            }
        } else {
            Vec::new()
        };

        self.expect(TokenKind::Colon)?;
        let body = self.parse_block()?;
        let span = join(start.span, body.span);
        Ok(FuncDef {
            span,
            name,
            params,
            returns,
            body,
        })
    }

    fn parse_ident_list(&mut self, close: TokenKind) -> Result<Vec<Ident>, ParseError> {
        let mut idents = Vec::new();
        if self.at(close.clone()) {
            return Ok(idents);
        }
        loop {
            idents.push(self.expect_ident()?);
            if self.at(TokenKind::Comma) {
                self.expect_any()?;
                if self.at(close.clone()) {
                    break;
                }
                continue;
            }
            break;
        }
        Ok(idents)
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        // After ':', require NEWLINE INDENT ... DEDENT
        self.expect(TokenKind::Newline)?;
        let indent_tok = self.expect(TokenKind::Indent)?;

        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            if self.at(TokenKind::Dedent) {
                let dedent = self.expect_any()?;
                let end = stmts.last().map(Stmt::span).unwrap_or(dedent.span);
                return Ok(Block {
                    span: join(indent_tok.span, end),
                    stmts,
                });
            }
            if self.at(TokenKind::Eof) {
                return Err(ParseError {
                    message: "unterminated block; expected dedent".to_string(),
                    span: indent_tok.span,
                });
            }
            stmts.push(self.parse_stmt()?);
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::KwIf) => Ok(Stmt::If(self.parse_if_stmt()?)),
            Some(TokenKind::KwWhile) => Ok(Stmt::While(self.parse_while_stmt()?)),
            Some(TokenKind::KwDef) => Err(ParseError {
                message: "nested function definitions are not supported".to_string(),
                span: self.peek_span().unwrap_or_else(|| span_between(0, 0)),
            }),
            Some(TokenKind::Ident(_)) if self.is_assign_start() => {
                Ok(Stmt::Assign(self.parse_assign_stmt()?))
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect_stmt_terminator()?;
                Ok(Stmt::ExprStmt(expr))
            }
        }
    }

    /// `ident (, ident)* (= | op=)`
    fn is_assign_start(&self) -> bool {
        let mut n = 0;
        loop {
            if !matches!(self.peek_kind_n(n), Some(TokenKind::Ident(_))) {
                return false;
            }
            match self.peek_kind_n(n + 1) {
                Some(TokenKind::Comma) => n += 2,
                Some(
                    TokenKind::Eq
                    | TokenKind::PlusEq
                    | TokenKind::MinusEq
                    | TokenKind::StarEq
                    | TokenKind::SlashEq,
                ) => return true,
                _ => return false,
            }
        }
    }

    fn parse_assign_stmt(&mut self) -> Result<AssignStmt, ParseError> {
        let mut targets = vec![self.expect_ident()?];
        while self.at(TokenKind::Comma) {
            self.expect_any()?;
            targets.push(self.expect_ident()?);
        }

        let op_tok = self.expect_any()?;
        let op = match op_tok.kind {
            TokenKind::Eq => AssignOp::Plain,
            TokenKind::PlusEq => AssignOp::Reduce(BinOp::Add),
            TokenKind::MinusEq => AssignOp::Reduce(BinOp::Sub),
            TokenKind::StarEq => AssignOp::Reduce(BinOp::Mul),
            TokenKind::SlashEq => AssignOp::Reduce(BinOp::Div),
            _ => {
                return Err(ParseError {
                    message: "expected '=' or a compound assignment".to_string(),
                    span: op_tok.span,
                });
            }
        };

        let expr = self.parse_expr()?;
        self.expect_stmt_terminator()?;
        let span = join(targets[0].span, expr.span);
        Ok(AssignStmt {
            span,
            targets,
            op,
            expr,
        })
    }

    fn parse_if_stmt(&mut self) -> Result<IfStmt, ParseError> {
        let start = self.expect(TokenKind::KwIf)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let then_block = self.parse_block()?;

        self.skip_newlines();
        let else_block = if self.at(TokenKind::KwElse) {
            self.expect_any()?;
            self.expect(TokenKind::Colon)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        let end_span = else_block
            .as_ref()
            .map(|b| b.span)
            .unwrap_or(then_block.span);
        let span = join(start.span, end_span);
        Ok(IfStmt {
            span,
            cond,
            then_block,
            else_block,
        })
    }

    fn parse_while_stmt(&mut self) -> Result<WhileStmt, ParseError> {
        let start = self.expect(TokenKind::KwWhile)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let body = self.parse_block()?;
        let span = join(start.span, body.span);
        Ok(WhileStmt { span, cond, body })
    }

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_ternary_expr()
    }

    pub fn parse_expr_eof(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        // Allow trailing newlines.
        self.skip_newlines();
        if !self.at(TokenKind::Eof) {
            return Err(ParseError {
                message: "expected end of input".to_string(),
                span: self.peek_span().unwrap_or_else(|| span_between(0, 0)),
            });
        }
        Ok(expr)
    }

    /// `a if c else b`, right-associative.
    fn parse_ternary_expr(&mut self) -> Result<Expr, ParseError> {
        let then_expr = self.parse_or_expr()?;
        if !self.at(TokenKind::KwIf) {
            return Ok(then_expr);
        }
        self.expect_any()?;
        let cond = self.parse_or_expr()?;
        self.expect(TokenKind::KwElse)?;
        let else_expr = self.parse_ternary_expr()?;
        let span = join(then_expr.span, else_expr.span);
        Ok(Expr {
            span,
            kind: ExprKind::Cond {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
        })
    }

    fn parse_or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and_expr()?;
        while self.at(TokenKind::KwOr) {
            self.expect_any()?;
            let right = self.parse_and_expr()?;
            left = binary(left, BinOp::Or, right);
        }
        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not_expr()?;
        while self.at(TokenKind::KwAnd) {
            self.expect_any()?;
            let right = self.parse_not_expr()?;
            left = binary(left, BinOp::And, right);
        }
        Ok(left)
    }

    fn parse_not_expr(&mut self) -> Result<Expr, ParseError> {
        if self.at(TokenKind::KwNot) {
            let t = self.expect_any()?;
            let expr = self.parse_not_expr()?;
            let span = join(t.span, expr.span);
            return Ok(Expr {
                span,
                kind: ExprKind::Unary {
                    op: UnaryOp::Not,
                    expr: Box::new(expr),
                },
            });
        }
        self.parse_cmp_expr()
    }

    fn parse_cmp_expr(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_add_expr()?;
        let Some(op) = self.peek_cmp_op() else {
            return Ok(left);
        };
        self.expect_any()?;
        let right = self.parse_add_expr()?;
        let expr = binary(left, op, right);

        // `a < b < c` would silently mean `(a < b) < c`; make it explicit.
        if self.peek_cmp_op().is_some() {
            let span = self.peek_span().unwrap_or(expr.span);
            return Err(ParseError {
                message: "chained comparisons are not supported; use parentheses or boolean operators"
                    .to_string(),
                span,
            });
        }

        Ok(expr)
    }

    fn peek_cmp_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            Some(TokenKind::EqEq) => Some(BinOp::Eq),
            Some(TokenKind::Neq) => Some(BinOp::Ne),
            Some(TokenKind::Lt) => Some(BinOp::Lt),
            Some(TokenKind::Gt) => Some(BinOp::Gt),
            Some(TokenKind::Le) => Some(BinOp::Le),
            Some(TokenKind::Ge) => Some(BinOp::Ge),
            _ => None,
        }
    }

    fn parse_add_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_mul_expr()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => break,
            };
            self.expect_any()?;
            let right = self.parse_mul_expr()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_mul_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_cast_expr()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                _ => break,
            };
            self.expect_any()?;
            let right = self.parse_cast_expr()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_cast_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_unary_expr()?;
        while self.at(TokenKind::KwAs) {
            self.expect_any()?;
            let ty = self.expect_ident()?;
            let span = join(expr.span, ty.span);
            expr = Expr {
                span,
                kind: ExprKind::Cast {
                    expr: Box::new(expr),
                    ty,
                },
            };
        }
        Ok(expr)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, ParseError> {
        if self.at(TokenKind::Minus) {
            let t = self.expect_any()?;
            let expr = self.parse_unary_expr()?;
            let span = join(t.span, expr.span);
            return Ok(Expr {
                span,
                kind: ExprKind::Unary {
                    op: UnaryOp::Neg,
                    expr: Box::new(expr),
                },
            });
        }
        self.parse_postfix_expr()
    }

    fn parse_postfix_expr(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_primary_expr()?;
        let ExprKind::Ident(callee) = &expr.kind else {
            return Ok(expr);
        };
        if !self.at(TokenKind::LParen) {
            return Ok(expr);
        }

        let callee = callee.clone();
        self.expect(TokenKind::LParen)?;
        let args = self.parse_args()?;
        let rp = self.expect(TokenKind::RParen)?;
        Ok(Expr {
            span: join(expr.span, rp.span),
            kind: ExprKind::Call { callee, args },
        })
    }

    fn parse_args(&mut self) -> Result<Vec<CallArg>, ParseError> {
        let mut args: Vec<CallArg> = Vec::new();
        if self.at(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            // Keyword arg: Ident '=' expr
            if matches!(self.peek_kind(), Some(TokenKind::Ident(_)))
                && self.peek_kind_n(1).is_some_and(|k| matches!(k, TokenKind::Eq))
            {
                let name = self.expect_ident()?;
                self.expect(TokenKind::Eq)?;
                let value = self.parse_expr()?;
                args.push(CallArg::Named { name, value });
            } else {
                let expr = self.parse_expr()?;
                args.push(CallArg::Positional(expr));
            }

            if self.at(TokenKind::Comma) {
                self.expect_any()?;
                if self.at(TokenKind::RParen) {
                    break;
                }
                continue;
            }
            break;
        }
        Ok(args)
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, ParseError> {
        let tok = self.expect_any()?;

        match tok.kind {
            TokenKind::Ident(name) => Ok(Expr {
                span: tok.span,
                kind: ExprKind::Ident(Ident {
                    span: tok.span,
                    node: name,
                }),
            }),
            TokenKind::Number { value, suffix } => Ok(Expr {
                span: tok.span,
                kind: ExprKind::Const { value, suffix },
            }),
            TokenKind::KwTrue | TokenKind::KwFalse => {
                let value = if matches!(tok.kind, TokenKind::KwTrue) { 1.0 } else { 0.0 };
                Ok(Expr {
                    span: tok.span,
                    kind: ExprKind::Const {
                        value,
                        suffix: "b".to_string(),
                    },
                })
            }
            TokenKind::LParen => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                let mut items = Vec::new();
                while !self.at(TokenKind::RBracket) {
                    items.push(self.parse_expr()?);
                    if !self.at(TokenKind::Comma) {
                        break;
                    }
                    self.expect_any()?;
                }
                let rb = self.expect(TokenKind::RBracket)?;
                Ok(Expr {
                    span: join(tok.span, rb.span),
                    kind: ExprKind::List(items),
                })
            }
            _ => Err(ParseError {
                message: "expected an expression".to_string(),
                span: tok.span,
            }),
        }
    }

    fn skip_newlines(&mut self) {
        while self.at(TokenKind::Newline) {
            self.idx += 1;
        }
    }

    fn expect_stmt_terminator(&mut self) -> Result<(), ParseError> {
        if self.at(TokenKind::Newline) {
            self.idx += 1;
            Ok(())
        } else if self.at(TokenKind::Eof) || self.at(TokenKind::Dedent) {
            Ok(())
        } else {
            Err(ParseError {
                message: "expected end of line".to_string(),
                span: self.peek_span().unwrap_or_else(|| span_between(0, 0)),
            })
        }
    }

    fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        let tok = self.expect_any()?;
        match tok.kind {
            TokenKind::Ident(name) => Ok(Ident {
                span: tok.span,
                node: name,
            }),
            _ => Err(ParseError {
                message: "expected identifier".to_string(),
                span: tok.span,
            }),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let tok = self.expect_any()?;
        if mem::discriminant(&tok.kind) == mem::discriminant(&expected) {
            Ok(tok)
        } else {
            Err(ParseError {
                message: format!("expected {expected:?}"),
                span: tok.span,
            })
        }
    }

    fn expect_any(&mut self) -> Result<Token, ParseError> {
        self.next().ok_or_else(|| ParseError {
            message: "unexpected end of input".to_string(),
            span: span_between(0, 0),
        })
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind()
            .is_some_and(|k| mem::discriminant(k) == mem::discriminant(&kind))
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.idx)?.clone();
        self.idx += 1;
        Some(tok)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.idx).map(|t| &t.kind)
    }

    fn peek_kind_n(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.idx + n).map(|t| &t.kind)
    }

    fn peek_span(&self) -> Option<Span> {
        self.tokens.get(self.idx).map(|t| t.span)
    }
}

fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    let span = join(left.span, right.span);
    Expr {
        span,
        kind: ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
    }
}

fn join(a: Span, b: Span) -> Span {
    let a0: usize = a.offset();
    let b0: usize = b.offset();
    let b1 = b0 + b.len();
    if b0 >= a0 {
        span_between(a0, b1.max(a0 + a.len()))
    } else {
        let a1 = a0 + a.len();
        span_between(b0, a1)
    }
}
