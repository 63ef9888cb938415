#![allow(dead_code)]

use netscript_core::{CompilationUnit, CompileError};
use netscript_graph::{AttrValue, Graph, Operation};

/// Compiles `src` and returns the graph of its only (or first) function.
pub fn compile(src: &str) -> Graph {
    let mut unit = CompilationUnit::new();
    unit.define(src).unwrap_or_else(|e| panic!("define failed: {e:?}\n{src}"));
    let name = unit.function_names()[0].to_string();
    unit.get(&name).cloned().unwrap()
}

pub fn compile_err(src: &str) -> CompileError {
    let mut unit = CompilationUnit::new();
    match unit.define(src) {
        Ok(()) => panic!("expected an error for:\n{src}"),
        Err(e) => e,
    }
}

pub fn types(graph: &Graph) -> Vec<&str> {
    graph.ops.iter().map(|op| op.op_type.as_str()).collect()
}

pub fn int_attr(op: &Operation, name: &str) -> Option<i64> {
    match op.attr(name) {
        Some(AttrValue::Int(v)) => Some(*v),
        _ => None,
    }
}

pub fn float_attr(op: &Operation, name: &str) -> Option<f32> {
    match op.attr(name) {
        Some(AttrValue::Float(v)) => Some(*v),
        _ => None,
    }
}
