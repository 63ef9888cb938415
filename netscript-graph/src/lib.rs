#![forbid(unsafe_code)]

pub mod graph;
pub mod schema;

pub mod printer;
pub mod verify;

pub use graph::*;
pub use printer::format_graph;
pub use verify::{verify_graph, GraphError};
