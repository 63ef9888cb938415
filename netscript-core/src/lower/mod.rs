#![forbid(unsafe_code)]

mod attr;
mod expr;
mod intrinsic;
mod stmt;

use std::collections::HashMap;

use netscript_ast::FuncDef;
use netscript_graph::{Attribute, Graph, Operation};
use tracing::trace;

use crate::{CompileError, Environment, NameGen};

/// Lowers one function definition into a top-level graph.
///
/// Operations are appended to the innermost graph under construction:
/// `top` while lowering the function body, the last entry of `nested` while
/// lowering a branch, loop condition or loop body. Emitting returns the index
/// of the new operation in that graph so callers can widen, rename or clear
/// its outputs afterwards.
pub(crate) struct FunctionCompiler<'u> {
    names: &'u mut NameGen,
    env: Environment,
    top: Graph,
    nested: Vec<Graph>,
}

impl<'u> FunctionCompiler<'u> {
    pub(crate) fn new(names: &'u mut NameGen, name: &str) -> Self {
        Self {
            names,
            env: Environment::new(),
            top: Graph::new(name),
            nested: Vec::new(),
        }
    }

    pub(crate) fn compile(mut self, def: &FuncDef) -> Result<Graph, CompileError> {
        // Parameters and declared returns are graph-external names used verbatim.
        for p in &def.params {
            self.env.bind(&p.node, &p.node);
            self.top.external_inputs.push(p.node.clone());
        }
        for r in &def.returns {
            self.env.bind(&r.node, &r.node);
            self.top.external_outputs.push(r.node.clone());
        }

        self.lower_block(&def.body)?;
        Ok(self.top)
    }

    fn cur(&mut self) -> &mut Graph {
        match self.nested.last_mut() {
            Some(g) => g,
            None => &mut self.top,
        }
    }

    fn fresh(&mut self) -> String {
        self.names.fresh()
    }

    fn push_op(&mut self, op: Operation) -> usize {
        let graph = self.cur();
        trace!(
            graph = %graph.name,
            op_type = %op.op_type,
            inputs = ?op.inputs,
            outputs = ?op.outputs,
            "emit"
        );
        graph.push(op)
    }

    fn op_mut(&mut self, idx: usize) -> &mut Operation {
        &mut self.cur().ops[idx]
    }

    fn first_output(&mut self, idx: usize) -> String {
        self.op_mut(idx).outputs.first().cloned().unwrap_or_default()
    }

    /// Lowers `body` into a fresh sub-graph named `name` with its own
    /// environment frame, then hands back the finished graph together with
    /// the bindings made inside it. Callers merge those bindings only after
    /// every sibling sub-graph is lowered.
    fn lower_subgraph(
        &mut self,
        name: &str,
        body: impl FnOnce(&mut Self) -> Result<(), CompileError>,
    ) -> Result<(Graph, HashMap<String, String>), CompileError> {
        self.nested.push(Graph::new(name));
        self.env.push_frame();
        let result = body(self);
        let bindings = self.env.pop_frame();
        let graph = self.nested.pop().unwrap_or_default();
        result.map(|()| (graph, bindings))
    }

    fn attach_subgraph(&mut self, idx: usize, name: &str, graph: Graph) {
        self.op_mut(idx).attrs.push(Attribute::graph(name, graph));
    }
}
