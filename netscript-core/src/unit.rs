#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt::Display;

use netscript_ast::Program;
use netscript_graph::Graph;
use tracing::{debug, info};

use crate::lower::FunctionCompiler;
use crate::{CompileError, NameGen};

/// The runtime that turns a compiled graph into something runnable.
pub trait ExecutionEngine {
    /// Named tensor storage the graph reads and writes at run time.
    type Storage;
    type Net;
    type Error: Display;

    fn create_net(&mut self, graph: &Graph, storage: &mut Self::Storage)
        -> Result<Self::Net, Self::Error>;
}

/// A registry of compiled function graphs.
///
/// Fresh value names come from one counter shared by every function compiled
/// through the unit, so generated names never repeat across functions.
#[derive(Debug, Default)]
pub struct CompilationUnit {
    functions: BTreeMap<String, Graph>,
    names: NameGen,
}

impl CompilationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `src` and compiles every function in it.
    pub fn define(&mut self, src: &str) -> Result<(), CompileError> {
        let program = netscript_parse::parse_source(src)?;
        self.define_program(&program)
    }

    /// Compiles every function of an already parsed program. Either all of
    /// them are registered or, on the first error, none is.
    pub fn define_program(&mut self, program: &Program) -> Result<(), CompileError> {
        let checkpoint = self.names.clone();
        match self.compile_all(program) {
            Ok(staged) => {
                info!(functions = staged.len(), "defined functions");
                for graph in staged {
                    self.functions.insert(graph.name.clone(), graph);
                }
                Ok(())
            }
            Err(err) => {
                self.names = checkpoint;
                Err(err)
            }
        }
    }

    fn compile_all(&mut self, program: &Program) -> Result<Vec<Graph>, CompileError> {
        let mut staged: Vec<Graph> = Vec::with_capacity(program.defs.len());
        for def in &program.defs {
            let name = &def.name.node;
            if self.functions.contains_key(name) || staged.iter().any(|g| &g.name == name) {
                return Err(CompileError::DuplicateDefinition {
                    name: name.clone(),
                    span: def.name.span,
                });
            }
            let graph = FunctionCompiler::new(&mut self.names, name).compile(def)?;
            debug!(function = %name, ops = graph.total_ops(), "compiled function");
            staged.push(graph);
        }
        Ok(staged)
    }

    /// Hands the graph registered as `name` to `engine`.
    pub fn instantiate<E: ExecutionEngine>(
        &self,
        engine: &mut E,
        storage: &mut E::Storage,
        name: &str,
    ) -> Result<E::Net, CompileError> {
        let graph = self
            .functions
            .get(name)
            .ok_or_else(|| CompileError::UndefinedFunction {
                name: name.to_string(),
                span: None,
            })?;
        debug!(function = %name, "instantiate");
        engine
            .create_net(graph, storage)
            .map_err(|e| CompileError::Engine {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&Graph> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered function names in sorted order.
    pub fn function_names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }

    pub fn graphs(&self) -> impl Iterator<Item = &Graph> {
        self.functions.values()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
