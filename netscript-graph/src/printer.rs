#![forbid(unsafe_code)]

use std::fmt::Write;

use crate::{AttrValue, Graph, Operation};

/// Renders a graph as indented text, one operation per line:
///
/// ```text
/// graph f(a) -> (b):
///   $t0 = ConstantFill() {dtype: 2, value: 1, shape: [1]}
///   b = Add(a, $t0) {broadcast: 1}
/// ```
pub fn format_graph(graph: &Graph) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "graph {}({}) -> ({}):",
        graph.name,
        graph.external_inputs.join(", "),
        graph.external_outputs.join(", ")
    );
    write_ops(&mut out, graph, 1);
    out
}

fn write_ops(out: &mut String, graph: &Graph, depth: usize) {
    if graph.ops.is_empty() {
        indent(out, depth);
        out.push_str("pass\n");
        return;
    }
    for op in &graph.ops {
        write_op(out, op, depth);
    }
}

fn write_op(out: &mut String, op: &Operation, depth: usize) {
    indent(out, depth);
    if !op.outputs.is_empty() {
        out.push_str(&op.outputs.join(", "));
        out.push_str(" = ");
    }
    let _ = write!(out, "{}({})", op.op_type, op.inputs.join(", "));

    let scalars: Vec<String> = op
        .attrs
        .iter()
        .filter_map(|a| scalar_text(&a.value).map(|v| format!("{}: {v}", a.name)))
        .collect();
    if !scalars.is_empty() {
        let _ = write!(out, " {{{}}}", scalars.join(", "));
    }

    let mut subgraphs = op.subgraphs().peekable();
    if subgraphs.peek().is_some() {
        out.push(':');
    }
    out.push('\n');
    for (name, sub) in subgraphs {
        indent(out, depth + 1);
        let _ = writeln!(out, "{name}:");
        write_ops(out, sub, depth + 2);
    }
}

fn scalar_text(value: &AttrValue) -> Option<String> {
    match value {
        AttrValue::Float(v) => Some(format!("{v:?}")),
        AttrValue::Int(v) => Some(v.to_string()),
        AttrValue::Floats(vs) => Some(format!("{vs:?}")),
        AttrValue::Ints(vs) => Some(format!("{vs:?}")),
        AttrValue::Graph(_) => None,
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Attribute;

    #[test]
    fn prints_nested_graphs() {
        let mut then_net = Graph::new("then_net");
        then_net.push(
            Operation::new("ConstantFill")
                .with_output("a")
                .with_attr(Attribute::float("value", 1.0))
                .with_attr(Attribute::ints("shape", vec![1])),
        );
        let mut g = Graph::new("f");
        g.external_inputs.push("c".into());
        g.external_outputs.push("a".into());
        g.push(
            Operation::new("If")
                .with_input("c")
                .with_attr(Attribute::graph("then_net", then_net)),
        );

        let text = format_graph(&g);
        assert_eq!(
            text,
            "graph f(c) -> (a):\n  If(c):\n    then_net:\n      a = ConstantFill() {value: 1.0, shape: [1]}\n"
        );
    }

    #[test]
    fn empty_graph_prints_pass() {
        let text = format_graph(&Graph::new("g"));
        assert_eq!(text, "graph g() -> ():\n  pass\n");
    }
}
