#![forbid(unsafe_code)]

use serde::Serialize;

/// Element type tags, numbered the way the execution engine's tensor protocol numbers them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Float,
    Int32,
    Bool,
    Int64,
}

impl DataType {
    pub fn code(self) -> i64 {
        match self {
            DataType::Float => 1,
            DataType::Int32 => 2,
            DataType::Bool => 5,
            DataType::Int64 => 10,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(DataType::Float),
            2 => Some(DataType::Int32),
            5 => Some(DataType::Bool),
            10 => Some(DataType::Int64),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValue {
    Float(f32),
    Int(i64),
    Floats(Vec<f32>),
    Ints(Vec<i64>),
    Graph(Graph),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttrValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn int(name: impl Into<String>, v: i64) -> Self {
        Self::new(name, AttrValue::Int(v))
    }

    pub fn float(name: impl Into<String>, v: f32) -> Self {
        Self::new(name, AttrValue::Float(v))
    }

    pub fn ints(name: impl Into<String>, v: Vec<i64>) -> Self {
        Self::new(name, AttrValue::Ints(v))
    }

    pub fn floats(name: impl Into<String>, v: Vec<f32>) -> Self {
        Self::new(name, AttrValue::Floats(v))
    }

    pub fn graph(name: impl Into<String>, g: Graph) -> Self {
        Self::new(name, AttrValue::Graph(g))
    }
}

/// One node of a graph. Outputs start with one entry and may be widened by
/// multi-target assignment or cleared by an expression statement.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Operation {
    pub op_type: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<Attribute>,
}

impl Operation {
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            attrs: Vec::new(),
        }
    }

    pub fn with_input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    pub fn with_attr(mut self, attr: Attribute) -> Self {
        self.attrs.push(attr);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    pub fn subgraph(&self, name: &str) -> Option<&Graph> {
        match self.attr(name) {
            Some(AttrValue::Graph(g)) => Some(g),
            _ => None,
        }
    }

    /// Sub-graph attributes in declaration order.
    pub fn subgraphs(&self) -> impl Iterator<Item = (&str, &Graph)> {
        self.attrs.iter().filter_map(|a| match &a.value {
            AttrValue::Graph(g) => Some((a.name.as_str(), g)),
            _ => None,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Graph {
    pub name: String,
    pub ops: Vec<Operation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_inputs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_outputs: Vec<String>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends `op` and returns its index.
    pub fn push(&mut self, op: Operation) -> usize {
        self.ops.push(op);
        self.ops.len() - 1
    }

    pub fn last(&self) -> Option<&Operation> {
        self.ops.last()
    }

    /// Visits every operation, descending into sub-graph attributes right
    /// after the operation that owns them. `depth` is 0 for this graph.
    pub fn walk<'g>(&'g self, f: &mut impl FnMut(&'g Operation, usize)) {
        self.walk_at(0, f);
    }

    fn walk_at<'g>(&'g self, depth: usize, f: &mut impl FnMut(&'g Operation, usize)) {
        for op in &self.ops {
            f(op, depth);
            for (_, sub) in op.subgraphs() {
                sub.walk_at(depth + 1, f);
            }
        }
    }

    /// Operation count including nested sub-graphs.
    pub fn total_ops(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |_, _| n += 1);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph {
        let mut then_net = Graph::new("then_net");
        then_net.push(Operation::new("Copy").with_input("x").with_output("y"));

        let mut g = Graph::new("f");
        g.external_inputs.push("x".into());
        g.push(Operation::new("Not").with_input("x").with_output("$t0"));
        g.push(
            Operation::new("If")
                .with_input("$t0")
                .with_attr(Attribute::graph("then_net", then_net)),
        );
        g
    }

    #[test]
    fn walk_descends_into_subgraphs() {
        let g = sample();
        let mut seen = Vec::new();
        g.walk(&mut |op, depth| seen.push((op.op_type.as_str(), depth)));
        assert_eq!(seen, vec![("Not", 0), ("If", 0), ("Copy", 1)]);
        assert_eq!(g.total_ops(), 3);
    }

    #[test]
    fn attribute_lookup() {
        let g = sample();
        let op = &g.ops[1];
        assert!(op.subgraph("then_net").is_some());
        assert!(op.subgraph("else_net").is_none());
        assert_eq!(op.subgraphs().count(), 1);
    }

    #[test]
    fn dtype_codes() {
        for dt in [DataType::Float, DataType::Int32, DataType::Bool, DataType::Int64] {
            assert_eq!(DataType::from_code(dt.code()), Some(dt));
        }
        assert_eq!(DataType::Int64.code(), 10);
        assert_eq!(DataType::from_code(3), None);
    }
}
