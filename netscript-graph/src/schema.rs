#![forbid(unsafe_code)]

//! Operator types and attribute names understood by the execution engine.

pub const ADD: &str = "Add";
pub const SUB: &str = "Sub";
pub const NEGATIVE: &str = "Negative";
pub const MUL: &str = "Mul";
pub const DIV: &str = "Div";
pub const EQ: &str = "EQ";
pub const NE: &str = "NE";
pub const LT: &str = "LT";
pub const GT: &str = "GT";
pub const LE: &str = "LE";
pub const GE: &str = "GE";
pub const AND: &str = "And";
pub const OR: &str = "Or";
pub const NOT: &str = "Not";
pub const CONDITIONAL: &str = "Conditional";

pub const COPY: &str = "Copy";
pub const CAST: &str = "Cast";
pub const CONSTANT_FILL: &str = "ConstantFill";
pub const IF: &str = "If";
pub const WHILE: &str = "While";

pub const ATTR_BROADCAST: &str = "broadcast";
pub const ATTR_TO: &str = "to";
pub const ATTR_DTYPE: &str = "dtype";
pub const ATTR_VALUE: &str = "value";
pub const ATTR_SHAPE: &str = "shape";
pub const ATTR_INPUT_AS_SHAPE: &str = "input_as_shape";

pub const THEN_NET: &str = "then_net";
pub const ELSE_NET: &str = "else_net";
pub const COND_NET: &str = "cond_net";
pub const LOOP_NET: &str = "loop_net";

/// Prefix of compiler-generated value names. `$` cannot appear in a source
/// identifier, so generated names never collide with user names.
pub const FRESH_SIGIL: char = '$';

pub fn is_fresh_name(name: &str) -> bool {
    name.starts_with(FRESH_SIGIL)
}
