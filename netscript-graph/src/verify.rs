#![forbid(unsafe_code)]

use std::collections::HashSet;

use miette::Diagnostic;
use thiserror::Error;

use crate::schema::{is_fresh_name, COND_NET, WHILE};
use crate::{Graph, Operation};

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("graph '{graph}': operation #{index} ({op_type}) reads '{name}' before it is defined")]
    #[diagnostic(code(netscript::graph::forward_reference))]
    ForwardReference {
        graph: String,
        index: usize,
        op_type: String,
        name: String,
    },

    #[error("graph '{graph}': fresh value '{name}' is produced more than once")]
    #[diagnostic(code(netscript::graph::duplicate_fresh))]
    DuplicateFreshName { graph: String, name: String },

    #[error("graph '{graph}': operation #{index} ({op_type}) has an unnamed output")]
    #[diagnostic(code(netscript::graph::unnamed_output))]
    UnnamedOutput {
        graph: String,
        index: usize,
        op_type: String,
    },
}

/// Checks that a compiled graph is well formed:
/// - every input is an external name or the output of a strictly earlier
///   operation in the same graph or in an enclosing one (as of the control
///   operation that owns the sub-graph); user names written inside a
///   sub-graph become visible to the operations after its control operation,
/// - no fresh name is produced twice anywhere in the tree,
/// - no output name is empty.
///
/// The one sanctioned redefinition is a `While` loop variable, which the last
/// operation of `cond_net` writes on every iteration.
pub fn verify_graph(graph: &Graph) -> Result<(), GraphError> {
    let mut visible: HashSet<&str> = graph
        .external_inputs
        .iter()
        .chain(&graph.external_outputs)
        .map(String::as_str)
        .collect();
    let mut fresh = HashSet::new();
    check_graph(graph, &mut visible, &mut fresh, None)
}

fn check_graph<'g>(
    graph: &'g Graph,
    visible: &mut HashSet<&'g str>,
    fresh: &mut HashSet<&'g str>,
    loop_var: Option<&str>,
) -> Result<(), GraphError> {
    let last = graph.ops.len().saturating_sub(1);
    for (index, op) in graph.ops.iter().enumerate() {
        for name in &op.inputs {
            if !visible.contains(name.as_str()) {
                return Err(GraphError::ForwardReference {
                    graph: graph.name.clone(),
                    index,
                    op_type: op.op_type.clone(),
                    name: name.clone(),
                });
            }
        }

        let written = check_subgraphs(op, visible, fresh)?;
        visible.extend(written);

        for name in &op.outputs {
            if name.is_empty() {
                return Err(GraphError::UnnamedOutput {
                    graph: graph.name.clone(),
                    index,
                    op_type: op.op_type.clone(),
                });
            }
            let rewrites_loop_var = index == last && loop_var == Some(name.as_str());
            if is_fresh_name(name) && !fresh.insert(name.as_str()) && !rewrites_loop_var {
                return Err(GraphError::DuplicateFreshName {
                    graph: graph.name.clone(),
                    name: name.clone(),
                });
            }
            visible.insert(name.as_str());
        }
    }
    Ok(())
}

/// Checks every sub-graph of `op` against the scope as of `op` and returns
/// the user names they write. Fresh names stay local to their sub-graph.
fn check_subgraphs<'g>(
    op: &'g Operation,
    visible: &HashSet<&'g str>,
    fresh: &mut HashSet<&'g str>,
) -> Result<Vec<&'g str>, GraphError> {
    let mut written = Vec::new();
    for (attr, sub) in op.subgraphs() {
        let loop_var = if op.op_type == WHILE && attr == COND_NET {
            op.inputs.first().map(String::as_str)
        } else {
            None
        };
        // Siblings start from the same scope.
        let mut scope = visible.clone();
        check_graph(sub, &mut scope, fresh, loop_var)?;
        written.extend(
            scope
                .into_iter()
                .filter(|name| !is_fresh_name(name) && !visible.contains(name)),
        );
    }
    Ok(written)
}
