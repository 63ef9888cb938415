#![forbid(unsafe_code)]

mod env;
mod error;
mod fresh;
mod intrinsic;
mod lower;
mod types;
mod unit;

pub use env::Environment;
pub use error::CompileError;
pub use fresh::NameGen;
pub use intrinsic::Intrinsic;
pub use types::{cast_dtype, integer_literal, literal_dtype};
pub use unit::{CompilationUnit, ExecutionEngine};
