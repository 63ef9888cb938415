#![forbid(unsafe_code)]

use netscript_ast::{Expr, ExprKind, Ident, Span, UnaryOp};
use netscript_graph::{Attribute, DataType};

use crate::{integer_literal, literal_dtype, CompileError};

/// A keyword-argument literal after folding a leading minus.
struct Literal<'e> {
    value: f64,
    suffix: &'e str,
    span: Span,
}

impl Literal<'_> {
    fn is_float(&self) -> bool {
        self.suffix == "f"
    }

    /// Integer attributes are stored as int64 whatever the suffix.
    fn as_int(&self) -> Result<i64, CompileError> {
        if self.suffix == "b" {
            return Ok(i64::from(self.value != 0.0));
        }
        integer_literal(self.value, DataType::Int64).ok_or(CompileError::LiteralOutOfRange {
            value: self.value,
            ty: "int64",
            span: self.span,
        })
    }
}

fn literal(expr: &Expr) -> Option<Literal<'_>> {
    match &expr.kind {
        ExprKind::Const { value, suffix } => Some(Literal {
            value: *value,
            suffix,
            span: expr.span,
        }),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            expr: inner,
        } => literal(inner).map(|lit| Literal {
            value: -lit.value,
            span: expr.span,
            ..lit
        }),
        _ => None,
    }
}

/// Encodes `name=value` as an operation attribute. Only numeric literals and
/// lists of numeric literals have an encoding.
pub(super) fn encode_attribute(name: &Ident, value: &Expr) -> Result<Attribute, CompileError> {
    let unsupported = |message: &str, span| CompileError::UnsupportedAttribute {
        attr: name.node.clone(),
        message: message.to_string(),
        span,
    };

    if let ExprKind::List(items) = &value.kind {
        let mut lits = Vec::with_capacity(items.len());
        for item in items {
            let lit = literal(item)
                .ok_or_else(|| unsupported("list elements must be numeric literals", item.span))?;
            check_suffix(&lit, item)?;
            lits.push(lit);
        }
        let floats = lits.iter().filter(|l| l.is_float()).count();
        return if floats == 0 {
            Ok(Attribute::ints(
                name.node.clone(),
                lits.iter().map(Literal::as_int).collect::<Result<_, _>>()?,
            ))
        } else if floats == lits.len() {
            Ok(Attribute::floats(
                name.node.clone(),
                lits.iter().map(|l| l.value as f32).collect(),
            ))
        } else {
            Err(unsupported("list mixes float and integer literals", value.span))
        };
    }

    let lit = literal(value).ok_or_else(|| {
        unsupported(
            "expected a numeric literal or a list of numeric literals",
            value.span,
        )
    })?;
    check_suffix(&lit, value)?;
    if lit.is_float() {
        Ok(Attribute::float(name.node.clone(), lit.value as f32))
    } else {
        Ok(Attribute::int(name.node.clone(), lit.as_int()?))
    }
}

fn check_suffix(lit: &Literal<'_>, expr: &Expr) -> Result<(), CompileError> {
    match literal_dtype(lit.suffix) {
        Some(_) => Ok(()),
        None => Err(CompileError::MalformedLiteral {
            suffix: lit.suffix.to_string(),
            span: expr.span,
        }),
    }
}
