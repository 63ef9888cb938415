use std::collections::HashSet;

use netscript_core::CompilationUnit;
use netscript_graph::{schema::is_fresh_name, verify_graph, Graph};
use proptest::{
    prelude::{any, prop},
    test_runner::{Config, TestCaseError, TestRunner},
};

const VARS: [&str; 3] = ["a", "b", "c"];
const OPS: [&str; 6] = ["+", "-", "*", "/", "<", "=="];

fn pick<'a>(items: &[&'a str], n: u32) -> &'a str {
    items[n as usize % items.len()]
}

fn expr_from(n: u32) -> String {
    let lhs = pick(&VARS, n);
    let rhs = pick(&VARS, n / 3);
    match n % 7 {
        0 => format!("{lhs} {} {rhs}", pick(&OPS, n / 9)),
        1 => format!("{}", n % 10),
        2 => format!("{lhs} if {rhs} else {}", pick(&VARS, n / 5)),
        3 => format!("zeros_like({lhs})"),
        4 => format!("-{lhs} * {}.5", n % 4),
        5 => format!("({lhs} + {rhs}) as float"),
        _ => format!("Scale({lhs}, scale={}f)", n % 3),
    }
}

/// Builds a small function body from `ops`. Only parameters are ever read,
/// so every generated script compiles.
fn script_from_ops(ops: &[u32]) -> String {
    let mut src = String::from("def gen(a, b, c) -> (a):\n");
    for (i, &n) in ops.iter().enumerate() {
        let target = pick(&["a", "b", "c", "_"], n / 11);
        let indent = "    ";
        match (n / 7) % 6 {
            0 | 1 => src.push_str(&format!("{indent}{target} = {}\n", expr_from(n))),
            2 => {
                let t = if target == "_" { "a" } else { target };
                src.push_str(&format!("{indent}{t} += {}\n", expr_from(n / 2)));
            }
            3 => {
                src.push_str(&format!("{indent}if {}:\n", expr_from(n)));
                src.push_str(&format!("{indent}    {target} = {}\n", expr_from(n / 2)));
                if i % 2 == 0 {
                    src.push_str(&format!("{indent}else:\n"));
                    src.push_str(&format!("{indent}    _ = {}\n", expr_from(n / 3)));
                }
            }
            4 => {
                src.push_str(&format!("{indent}while {}:\n", expr_from(n / 5)));
                src.push_str(&format!("{indent}    {target} = {}\n", expr_from(n)));
            }
            _ => src.push_str(&format!("{indent}Print({})\n", pick(&VARS, n))),
        }
    }
    if ops.is_empty() {
        src.push_str("    a = b\n");
    }
    src
}

fn compile(src: &str) -> Result<Graph, TestCaseError> {
    let mut unit = CompilationUnit::new();
    unit.define(src)
        .map_err(|e| TestCaseError::fail(format!("{e}\n{src}")))?;
    unit.get("gen")
        .cloned()
        .ok_or_else(|| TestCaseError::fail("gen not registered"))
}

#[test]
fn generated_scripts_are_well_formed() {
    let mut runner = TestRunner::new(Config {
        cases: 128,
        ..Config::default()
    });
    let strat = prop::collection::vec(any::<u32>(), 0..12);

    runner
        .run(&strat, |ops| {
            let src = script_from_ops(&ops);
            let graph = compile(&src)?;
            verify_graph(&graph).map_err(|e| TestCaseError::fail(format!("{e}\n{src}")))?;
            Ok(())
        })
        .unwrap();
}

#[test]
fn discard_targets_are_never_read() {
    let mut runner = TestRunner::new(Config {
        cases: 64,
        ..Config::default()
    });
    let strat = prop::collection::vec(any::<u32>(), 1..10);

    runner
        .run(&strat, |ops| {
            let mut src = String::from("def gen(a, b, c) -> (a):\n");
            for &n in &ops {
                let lhs = pick(&VARS, n);
                let rhs = pick(&VARS, n / 3);
                let stmt = match n % 4 {
                    0 => format!("_ = {lhs} {} {rhs}", pick(&OPS, n / 5)),
                    1 => format!("_ = zeros_like({lhs})"),
                    2 => format!("_, _ = Split({lhs}, axis=0)"),
                    _ => format!("_ = Scale({lhs}, {rhs}, k=[1, 2])"),
                };
                src.push_str("    ");
                src.push_str(&stmt);
                src.push('\n');
            }
            let graph = compile(&src)?;

            // Every statement lowers to one operation whose outputs are all discards.
            if graph.ops.len() != ops.len() {
                return Err(TestCaseError::fail(format!("op count mismatch\n{src}")));
            }
            let mut outputs = HashSet::new();
            for op in &graph.ops {
                for out in &op.outputs {
                    if !is_fresh_name(out) || !outputs.insert(out.clone()) {
                        return Err(TestCaseError::fail(format!("bad discard '{out}'\n{src}")));
                    }
                }
            }
            for op in &graph.ops {
                if let Some(read) = op.inputs.iter().find(|i| outputs.contains(*i)) {
                    return Err(TestCaseError::fail(format!("discard '{read}' was read\n{src}")));
                }
            }
            Ok(())
        })
        .unwrap();
}
