use netscript_graph::{Attribute, Graph, Operation};

#[test]
fn graph_serialises_with_nested_subgraphs() {
    let mut loop_net = Graph::new("loop_net");
    loop_net.push(Operation::new("Add").with_input("a").with_input("$t1").with_output("a"));

    let mut g = Graph::new("count");
    g.external_inputs.push("a".into());
    g.push(
        Operation::new("While")
            .with_input("$t0")
            .with_attr(Attribute::int("broadcast", 1))
            .with_attr(Attribute::graph("loop_net", loop_net)),
    );

    let json = serde_json::to_value(&g).unwrap();
    assert_eq!(json["name"], "count");
    assert_eq!(json["external_inputs"][0], "a");
    assert!(json.get("external_outputs").is_none());

    let op = &json["ops"][0];
    assert_eq!(op["op_type"], "While");
    assert_eq!(op["attrs"][0]["value"]["int"], 1);
    let body = &op["attrs"][1]["value"]["graph"];
    assert_eq!(body["name"], "loop_net");
    assert_eq!(body["ops"][0]["outputs"][0], "a");
    // Operations without attributes omit the key.
    assert!(body["ops"][0].get("attrs").is_none());
}
