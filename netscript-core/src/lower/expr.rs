#![forbid(unsafe_code)]

use netscript_ast::{BinOp, CallArg, Expr, ExprKind, Ident, Span, UnaryOp};
use netscript_graph::schema::{
    ADD, AND, ATTR_BROADCAST, ATTR_DTYPE, ATTR_SHAPE, ATTR_TO, ATTR_VALUE, CAST, CONDITIONAL,
    CONSTANT_FILL, COPY, DIV, EQ, GE, GT, LE, LT, MUL, NE, NEGATIVE, NOT, OR, SUB,
};
use netscript_graph::{Attribute, DataType, Operation};

use super::attr::encode_attribute;
use super::FunctionCompiler;
use crate::{cast_dtype, integer_literal, literal_dtype, CompileError, Intrinsic};

fn binary_op_name(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => ADD,
        BinOp::Sub => SUB,
        BinOp::Mul => MUL,
        BinOp::Div => DIV,
        BinOp::Eq => EQ,
        BinOp::Ne => NE,
        BinOp::Lt => LT,
        BinOp::Gt => GT,
        BinOp::Le => LE,
        BinOp::Ge => GE,
        BinOp::And => AND,
        BinOp::Or => OR,
    }
}

fn unary_op_name(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => NEGATIVE,
        UnaryOp::Not => NOT,
    }
}

impl FunctionCompiler<'_> {
    /// Name of the value `expr` evaluates to. Identifiers resolve to their
    /// current binding without emitting anything.
    pub(super) fn value(&mut self, expr: &Expr) -> Result<String, CompileError> {
        if let ExprKind::Ident(ident) = &expr.kind {
            return self.env.resolve(ident);
        }
        let idx = self.emit(expr)?;
        Ok(self.first_output(idx))
    }

    fn values<'e>(
        &mut self,
        exprs: impl IntoIterator<Item = &'e Expr>,
    ) -> Result<Vec<String>, CompileError> {
        exprs.into_iter().map(|e| self.value(e)).collect()
    }

    /// Emits the operation producing `expr` into the current graph and
    /// returns its index. The operation always has exactly one fresh output.
    pub(super) fn emit(&mut self, expr: &Expr) -> Result<usize, CompileError> {
        match &expr.kind {
            ExprKind::Ident(ident) => {
                let input = self.env.resolve(ident)?;
                let out = self.fresh();
                Ok(self.push_op(Operation::new(COPY).with_input(input).with_output(out)))
            }
            ExprKind::Const { value, suffix } => {
                let out = self.fresh();
                self.emit_const(*value, suffix, out, expr.span)
            }
            ExprKind::List(_) => Err(CompileError::UnsupportedConstruct {
                message: "list literals are only allowed as keyword argument values".into(),
                span: expr.span,
            }),
            ExprKind::Unary { op, expr: operand } => {
                let inputs = self.values([&**operand])?;
                Ok(self.emit_operator(unary_op_name(*op), inputs))
            }
            ExprKind::Binary { left, op, right } => {
                let inputs = self.values([&**left, &**right])?;
                Ok(self.emit_operator(binary_op_name(*op), inputs))
            }
            ExprKind::Cond {
                cond,
                then_expr,
                else_expr,
            } => {
                let inputs = self.values([&**cond, &**then_expr, &**else_expr])?;
                Ok(self.emit_operator(CONDITIONAL, inputs))
            }
            ExprKind::Call { callee, args } => match Intrinsic::lookup(&callee.node) {
                Some(intrinsic) => self.emit_intrinsic(intrinsic, args, expr.span),
                None => self.emit_call(callee, args),
            },
            ExprKind::Cast { expr: operand, ty } => {
                let dtype = cast_dtype(&ty.node).ok_or_else(|| CompileError::UnknownType {
                    name: ty.node.clone(),
                    span: ty.span,
                })?;
                let input = self.value(operand)?;
                let out = self.fresh();
                Ok(self.push_op(
                    Operation::new(CAST)
                        .with_input(input)
                        .with_output(out)
                        .with_attr(Attribute::int(ATTR_TO, dtype.code())),
                ))
            }
        }
    }

    /// Operator-table operations all carry `broadcast = 1`.
    fn emit_operator(&mut self, op_type: &str, inputs: Vec<String>) -> usize {
        let out = self.fresh();
        let op = Operation {
            inputs,
            ..Operation::new(op_type)
        };
        self.push_op(
            op.with_output(out)
                .with_attr(Attribute::int(ATTR_BROADCAST, 1)),
        )
    }

    fn emit_call(&mut self, callee: &Ident, args: &[CallArg]) -> Result<usize, CompileError> {
        let positional = args.iter().filter_map(|arg| match arg {
            CallArg::Positional(e) => Some(e),
            CallArg::Named { .. } => None,
        });
        let inputs = self.values(positional)?;

        let attrs = args
            .iter()
            .filter_map(|arg| match arg {
                CallArg::Named { name, value } => Some(encode_attribute(name, value)),
                CallArg::Positional(_) => None,
            })
            .collect::<Result<Vec<_>, _>>()?;

        let out = self.fresh();
        let op = Operation {
            inputs,
            attrs,
            ..Operation::new(callee.node.as_str())
        };
        Ok(self.push_op(op.with_output(out)))
    }

    /// Single-element constant of the type named by `suffix`.
    pub(super) fn emit_const(
        &mut self,
        value: f64,
        suffix: &str,
        output: String,
        span: Span,
    ) -> Result<usize, CompileError> {
        let dtype = literal_dtype(suffix).ok_or_else(|| CompileError::MalformedLiteral {
            suffix: suffix.to_string(),
            span,
        })?;
        let value_attr = match dtype {
            DataType::Float => Attribute::float(ATTR_VALUE, value as f32),
            DataType::Bool => Attribute::int(ATTR_VALUE, i64::from(value != 0.0)),
            DataType::Int32 | DataType::Int64 => {
                let int = integer_literal(value, dtype).ok_or(CompileError::LiteralOutOfRange {
                    value,
                    ty: if dtype == DataType::Int32 { "int32" } else { "int64" },
                    span,
                })?;
                Attribute::int(ATTR_VALUE, int)
            }
        };
        Ok(self.push_op(
            Operation::new(CONSTANT_FILL)
                .with_output(output)
                .with_attr(Attribute::int(ATTR_DTYPE, dtype.code()))
                .with_attr(value_attr)
                .with_attr(Attribute::ints(ATTR_SHAPE, vec![1])),
        ))
    }
}
