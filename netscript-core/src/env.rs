#![forbid(unsafe_code)]

use std::collections::HashMap;

use netscript_ast::Ident;

use crate::CompileError;

/// Maps source identifiers to the graph value currently holding them.
///
/// One frame is live per graph being lowered: the function body owns the
/// base frame and every `then_net`/`else_net`/`cond_net`/`loop_net` pushes
/// its own. Lookups search innermost first and bindings always land in the
/// innermost frame, so sibling branches never see each other's bindings.
/// A popped frame is handed back to the caller, which merges it into the
/// enclosing frame once every branch of the control statement is lowered.
#[derive(Clone, Debug)]
pub struct Environment {
    frames: Vec<HashMap<String, String>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, ident: impl Into<String>, value: impl Into<String>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(ident.into(), value.into());
        }
    }

    pub fn lookup(&self, ident: &str) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(ident))
            .map(String::as_str)
    }

    pub fn resolve(&self, ident: &Ident) -> Result<String, CompileError> {
        self.lookup(&ident.node)
            .map(str::to_string)
            .ok_or_else(|| CompileError::UnboundIdentifier {
                name: ident.node.clone(),
                span: ident.span,
            })
    }

    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Removes the innermost frame and returns its bindings. The base frame
    /// is never popped.
    pub fn pop_frame(&mut self) -> HashMap<String, String> {
        if self.frames.len() > 1 {
            self.frames.pop().unwrap_or_default()
        } else {
            HashMap::new()
        }
    }

    /// Copies `bindings` into the innermost frame.
    pub fn merge(&mut self, bindings: HashMap<String, String>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.extend(bindings);
        }
    }
}
