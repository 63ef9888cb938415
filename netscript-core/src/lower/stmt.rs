#![forbid(unsafe_code)]

use netscript_ast::{AssignOp, AssignStmt, BinOp, Block, Expr, ExprKind, IfStmt, Stmt, WhileStmt};
use netscript_graph::schema::{COND_NET, ELSE_NET, IF, LOOP_NET, THEN_NET, WHILE};
use netscript_graph::Operation;

use super::FunctionCompiler;
use crate::CompileError;

impl FunctionCompiler<'_> {
    pub(super) fn lower_block(&mut self, block: &Block) -> Result<(), CompileError> {
        for stmt in &block.stmts {
            self.lower_stmt(stmt)?;
        }
        Ok(())
    }

    fn lower_stmt(&mut self, stmt: &Stmt) -> Result<(), CompileError> {
        match stmt {
            Stmt::Assign(a) => self.lower_assign(a),
            Stmt::If(i) => self.lower_if(i),
            Stmt::While(w) => self.lower_while(w),
            Stmt::ExprStmt(expr) => {
                let idx = self.emit(expr)?;
                self.op_mut(idx).outputs.clear();
                Ok(())
            }
        }
    }

    fn lower_assign(&mut self, a: &AssignStmt) -> Result<(), CompileError> {
        let idx = match a.op {
            AssignOp::Plain => self.emit(&a.expr)?,
            AssignOp::Reduce(op) => {
                let [target] = a.targets.as_slice() else {
                    return Err(CompileError::MultiTargetReduction {
                        count: a.targets.len(),
                        span: a.span,
                    });
                };
                if !matches!(op, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div) {
                    return Err(CompileError::UnsupportedConstruct {
                        message: format!("reduction with non-arithmetic operator {op:?}"),
                        span: a.span,
                    });
                }
                // `x op= e` lowers exactly like `x = x op e`.
                let desugared = Expr {
                    span: a.span,
                    kind: ExprKind::Binary {
                        left: Box::new(Expr {
                            span: target.span,
                            kind: ExprKind::Ident(target.clone()),
                        }),
                        op,
                        right: Box::new(a.expr.clone()),
                    },
                };
                self.emit(&desugared)?
            }
        };

        let mut names = Vec::with_capacity(a.targets.len());
        for target in &a.targets {
            if target.is_discard() {
                names.push(self.fresh());
            } else {
                self.env.bind(&target.node, &target.node);
                names.push(target.node.clone());
            }
        }

        let op = self.op_mut(idx);
        if op.outputs.len() < names.len() {
            op.outputs.resize(names.len(), String::new());
        }
        for (slot, name) in op.outputs.iter_mut().zip(names) {
            *slot = name;
        }
        Ok(())
    }

    fn lower_if(&mut self, i: &IfStmt) -> Result<(), CompileError> {
        let cond = self.value(&i.cond)?;
        let idx = self.push_op(Operation::new(IF).with_input(cond));

        let (then_net, then_bound) =
            self.lower_subgraph(THEN_NET, |c| c.lower_block(&i.then_block))?;
        self.attach_subgraph(idx, THEN_NET, then_net);

        if let Some(else_block) = &i.else_block {
            let (else_net, else_bound) =
                self.lower_subgraph(ELSE_NET, |c| c.lower_block(else_block))?;
            self.attach_subgraph(idx, ELSE_NET, else_net);
            self.env.merge(else_bound);
        }
        // Names bound in either branch stay readable after the `If`.
        self.env.merge(then_bound);
        Ok(())
    }

    /// The loop variable is defined before the `While` operation and
    /// rewritten by the last operation of `cond_net` on every iteration.
    fn lower_while(&mut self, w: &WhileStmt) -> Result<(), CompileError> {
        let loop_var = self.fresh();
        self.emit_const(0.0, "i", loop_var.clone(), w.span)?;
        let idx = self.push_op(Operation::new(WHILE));

        let (cond_net, _) = self.lower_subgraph(COND_NET, |c| {
            let cond_idx = c.emit(&w.cond)?;
            if let Some(out) = c.op_mut(cond_idx).outputs.first_mut() {
                *out = loop_var.clone();
            }
            Ok(())
        })?;
        self.attach_subgraph(idx, COND_NET, cond_net);
        self.op_mut(idx).inputs.push(loop_var);

        let (loop_net, body_bound) = self.lower_subgraph(LOOP_NET, |c| c.lower_block(&w.body))?;
        self.attach_subgraph(idx, LOOP_NET, loop_net);
        self.env.merge(body_bound);
        Ok(())
    }
}
