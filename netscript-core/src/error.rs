#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use miette::Diagnostic;
use netscript_ast::Span;
use netscript_parse::ParseError;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CompileError {
    #[error("undefined value '{name}'")]
    #[diagnostic(code(netscript::unbound_identifier))]
    UnboundIdentifier {
        name: String,
        #[label("not bound here")]
        span: Span,
    },

    #[error("unknown literal type suffix '{suffix}'")]
    #[diagnostic(
        code(netscript::malformed_literal),
        help("use one of `f`, `i`, `LL`, `b`")
    )]
    MalformedLiteral {
        suffix: String,
        #[label]
        span: Span,
    },

    #[error("literal {value} is out of range for {ty}")]
    #[diagnostic(code(netscript::literal_out_of_range))]
    LiteralOutOfRange {
        value: f64,
        ty: &'static str,
        #[label]
        span: Span,
    },

    #[error("unknown type '{name}'")]
    #[diagnostic(
        code(netscript::unknown_type),
        help("cast targets are `float`, `int`, `long`, `bool`")
    )]
    UnknownType {
        name: String,
        #[label]
        span: Span,
    },

    #[error("reductions are only allowed with a single variable on the left-hand side (found {count})")]
    #[diagnostic(code(netscript::multi_target_reduction))]
    MultiTargetReduction {
        count: usize,
        #[label]
        span: Span,
    },

    #[error("built-in '{name}' {message}")]
    #[diagnostic(code(netscript::intrinsic_arity))]
    IntrinsicArity {
        name: String,
        message: String,
        #[label]
        span: Span,
    },

    #[error("unrecognized attribute '{attr}' for built-in '{name}'")]
    #[diagnostic(code(netscript::unrecognized_attribute))]
    UnrecognizedAttribute {
        name: String,
        attr: String,
        #[label]
        span: Span,
    },

    #[error("unsupported value for attribute '{attr}': {message}")]
    #[diagnostic(code(netscript::unsupported_attribute))]
    UnsupportedAttribute {
        attr: String,
        message: String,
        #[label]
        span: Span,
    },

    #[error("function '{name}' is already defined")]
    #[diagnostic(code(netscript::duplicate_definition))]
    DuplicateDefinition {
        name: String,
        #[label("redefined here")]
        span: Span,
    },

    #[error("undefined function '{name}'")]
    #[diagnostic(code(netscript::undefined_function))]
    UndefinedFunction {
        name: String,
        #[label]
        span: Option<Span>,
    },

    #[error("unsupported construct: {message}")]
    #[diagnostic(code(netscript::unsupported_construct))]
    UnsupportedConstruct {
        message: String,
        #[label]
        span: Span,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] ParseError),

    #[error("execution engine rejected '{name}': {message}")]
    #[diagnostic(code(netscript::engine))]
    Engine { name: String, message: String },
}

impl CompileError {
    /// Source position of the offending node, when there is one.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::UnboundIdentifier { span, .. }
            | CompileError::MalformedLiteral { span, .. }
            | CompileError::LiteralOutOfRange { span, .. }
            | CompileError::UnknownType { span, .. }
            | CompileError::MultiTargetReduction { span, .. }
            | CompileError::IntrinsicArity { span, .. }
            | CompileError::UnrecognizedAttribute { span, .. }
            | CompileError::UnsupportedAttribute { span, .. }
            | CompileError::DuplicateDefinition { span, .. }
            | CompileError::UnsupportedConstruct { span, .. } => Some(*span),
            CompileError::UndefinedFunction { span, .. } => *span,
            CompileError::Syntax(err) => Some(err.span),
            CompileError::Engine { .. } => None,
        }
    }
}
