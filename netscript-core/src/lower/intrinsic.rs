#![forbid(unsafe_code)]

use netscript_ast::{CallArg, Expr, Ident, Span};
use netscript_graph::schema::{ATTR_INPUT_AS_SHAPE, ATTR_SHAPE, ATTR_VALUE, CONSTANT_FILL};
use netscript_graph::{Attribute, Operation};

use super::attr::encode_attribute;
use super::FunctionCompiler;
use crate::{CompileError, Intrinsic};

impl FunctionCompiler<'_> {
    /// Expands `zeros`, `ones`, `zeros_like` and `ones_like` into one
    /// `ConstantFill`. The call shape is validated before any operand is
    /// lowered.
    pub(super) fn emit_intrinsic(
        &mut self,
        intrinsic: Intrinsic,
        args: &[CallArg],
        span: Span,
    ) -> Result<usize, CompileError> {
        let arity = |message: &str| CompileError::IntrinsicArity {
            name: intrinsic.name().to_string(),
            message: message.to_string(),
            span,
        };

        let mut operands: Vec<&Expr> = Vec::new();
        let mut shapes: Vec<(&Ident, &Expr)> = Vec::new();
        for arg in args {
            match arg {
                CallArg::Positional(e) => operands.push(e),
                CallArg::Named { name, value }
                    if name.node == ATTR_SHAPE && !intrinsic.is_like() =>
                {
                    shapes.push((name, value))
                }
                CallArg::Named { name, .. } => {
                    return Err(CompileError::UnrecognizedAttribute {
                        name: intrinsic.name().to_string(),
                        attr: name.node.clone(),
                        span: name.span,
                    });
                }
            }
        }

        if operands.len() > 1 {
            return Err(arity("accepts 0 or 1 inputs"));
        }
        if intrinsic.is_like() {
            if operands.len() != 1 {
                return Err(arity("requires 1 input"));
            }
        } else if operands.len() + shapes.len() != 1 {
            return Err(arity("requires either 1 input or 1 shape attribute"));
        }

        let mut op = Operation::new(CONSTANT_FILL);
        if let Some(operand) = operands.first() {
            let input = self.value(operand)?;
            op = op
                .with_input(input)
                .with_attr(Attribute::int(ATTR_INPUT_AS_SHAPE, intrinsic.input_as_shape()));
        } else if let Some((name, value)) = shapes.first() {
            op = op.with_attr(encode_attribute(name, value)?);
        }

        let out = self.fresh();
        Ok(self.push_op(
            op.with_attr(Attribute::float(ATTR_VALUE, intrinsic.fill_value()))
                .with_output(out),
        ))
    }
}
