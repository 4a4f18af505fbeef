use std::io::Write;
use std::rc::Rc;

use lachs::Span;

use crate::ast::Program;
use crate::ast::expression::{BinOpKind, BinaryOp, Expression, FunctionCall, Ident};
use crate::ast::statement::{Block, FunctionDecl, Statement};
use crate::scope::{ScopeId, ScopeKind, Scopes};

use super::config::Config;
use super::error::RuntimeError;
use super::value::{Builtin, Closure, RValue};

pub type EvalResult<T> = Result<T, RuntimeError>;

/// Live scope count at which closure cycles are first collected
const FIRST_COLLECTION: usize = 64;

/// How a statement finished
enum Flow {
    Normal,
    Return(RValue),
}

/// Tree-walking evaluator.
///
/// Owns the scope arena for one run. Program output (`print`) goes to `W`.
pub struct Interpreter<W: Write> {
    scopes: Scopes<RValue>,
    global: ScopeId,
    config: Config,
    depth: usize,
    /// Live scope count that triggers the next [`Scopes::collect`]
    next_collection: usize,
    peak_scopes: usize,
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(config: Config, out: W) -> Self {
        let mut scopes = Scopes::new();
        let global = scopes.global();
        // a fresh global scope accepts any var
        let declared = scopes.declare_var(global, "print", RValue::Builtin(Builtin::Print));
        debug_assert_eq!(declared, Ok(true));

        Self {
            scopes,
            global,
            config,
            depth: 0,
            next_collection: FIRST_COLLECTION,
            peak_scopes: 1,
            out,
        }
    }

    pub fn scopes(&self) -> &Scopes<RValue> {
        &self.scopes
    }

    pub fn global(&self) -> ScopeId {
        self.global
    }

    /// Largest number of scopes alive at once so far
    pub fn peak_scopes(&self) -> usize {
        self.peak_scopes
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run every top-level statement in the global scope.
    ///
    /// A top-level `return` ends the program.
    pub fn run(&mut self, program: &Program) -> EvalResult<()> {
        let global = self.global;
        if let Flow::Return(_) = self.exec_statements(&program.statements, global)? {
            log::debug!("top-level return, stopping");
        }
        self.scopes.collect();
        self.out.flush()?;
        Ok(())
    }

    fn exec_statements(&mut self, statements: &[Statement], scope: ScopeId) -> EvalResult<Flow> {
        for statement in statements {
            if let Flow::Return(value) = self.exec(statement, scope)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn exec(&mut self, statement: &Statement, scope: ScopeId) -> EvalResult<Flow> {
        match statement {
            Statement::Declaration(decl) => {
                let value = match &decl.value {
                    Some(expr) => self.eval(expr, scope)?,
                    None => RValue::Undefined,
                };
                if !self
                    .scopes
                    .declare(decl.kind, scope, &decl.name.value, value)?
                {
                    return Err(RuntimeError::already_declared(
                        &decl.name.value,
                        decl.name.position.clone(),
                    ));
                }
            }
            Statement::Assignment(assignment) => {
                let value = self.eval(&assignment.value, scope)?;
                let name = &assignment.name;
                match self.scopes.search_mut(scope, &name.value)? {
                    None => {
                        return Err(RuntimeError::not_defined(
                            &name.value,
                            name.position.clone(),
                        ));
                    }
                    Some(binding) if binding.is_const() => {
                        return Err(RuntimeError::const_assignment(
                            &name.value,
                            assignment.position.clone(),
                        ));
                    }
                    Some(binding) => {
                        binding.set(value);
                    }
                }
            }
            Statement::Function(decl) => self.declare_function(decl, scope)?,
            Statement::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval(expr, scope)?,
                    None => RValue::Undefined,
                };
                return Ok(Flow::Return(value));
            }
            Statement::If(stmt) => {
                if self.eval(&stmt.condition, scope)?.is_truthy() {
                    return self.exec_block(&stmt.then_block, scope, false);
                }
                if let Some(else_branch) = &stmt.else_branch {
                    return self.exec(else_branch, scope);
                }
            }
            Statement::While(stmt) => {
                while self.eval(&stmt.condition, scope)?.is_truthy() {
                    if let Flow::Return(value) = self.exec_block(&stmt.body, scope, false)? {
                        return Ok(Flow::Return(value));
                    }
                }
            }
            Statement::Block(block) => return self.exec_block(block, scope, false),
            Statement::Expression(expr) => {
                self.eval(expr, scope)?;
            }
        }
        Ok(Flow::Normal)
    }

    /// Run `block` in a fresh block scope.
    ///
    /// When `body` is set the block is the body of the construct that created
    /// `scope`; if that scope is invasive the statements run in it directly.
    fn exec_block(&mut self, block: &Block, scope: ScopeId, body: bool) -> EvalResult<Flow> {
        if body && self.scopes.scope(scope)?.is_invasive() {
            return self.exec_statements(&block.statements, scope);
        }

        let block_scope = self.scopes.create(ScopeKind::Block, Some(scope), false);
        self.peak_scopes = self.peak_scopes.max(self.scopes.len());
        let result = self.exec_statements(&block.statements, block_scope);
        self.release(block_scope)?;
        result
    }

    /// Release a finished scope, collecting closure cycles once enough
    /// scopes have piled up since the last collection
    fn release(&mut self, scope: ScopeId) -> EvalResult<()> {
        self.scopes.release(scope)?;
        if self.scopes.len() >= self.next_collection {
            let freed = self.scopes.collect();
            self.next_collection = (self.scopes.len() * 2).max(FIRST_COLLECTION);
            log::debug!(
                "freed {} scopes, next collection at {}",
                freed,
                self.next_collection
            );
        }
        Ok(())
    }

    /// Bind a function declaration as a `var`, closing over `scope`
    fn declare_function(&mut self, decl: &Rc<FunctionDecl>, scope: ScopeId) -> EvalResult<()> {
        let closure = Closure {
            decl: Rc::clone(decl),
            capture: self.scopes.capture(scope)?,
        };
        self.scopes
            .declare_var(scope, &decl.name.value, RValue::Function(closure))?;
        Ok(())
    }

    pub fn eval(&mut self, expr: &Expression, scope: ScopeId) -> EvalResult<RValue> {
        match expr {
            Expression::Ident(ident) => self.lookup(ident, scope),
            Expression::Number(n) => Ok(RValue::Number(n.value)),
            Expression::String(s) => Ok(RValue::String(s.value.clone())),
            Expression::Boolean(b) => Ok(RValue::Bool(b.value)),
            Expression::BinaryOp(BinaryOp {
                op,
                left,
                right,
                position,
            }) => {
                let left = self.eval(left, scope)?;
                let right = self.eval(right, scope)?;
                binary(*op, left, right, position)
            }
            Expression::FunctionCall(call) => self.call(call, scope),
        }
    }

    fn lookup(&self, ident: &Ident, scope: ScopeId) -> EvalResult<RValue> {
        self.scopes
            .search(scope, &ident.value)?
            .map(|binding| binding.value().clone())
            .ok_or_else(|| RuntimeError::not_defined(&ident.value, ident.position.clone()))
    }

    fn call(&mut self, call: &FunctionCall, scope: ScopeId) -> EvalResult<RValue> {
        let callee = self.lookup(&call.func, scope)?;
        let args = call
            .args
            .iter()
            .map(|arg| self.eval(arg, scope))
            .collect::<EvalResult<Vec<_>>>()?;

        match callee {
            RValue::Builtin(Builtin::Print) => {
                let line = args
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(self.out, "{}", line)?;
                Ok(RValue::Undefined)
            }
            RValue::Function(closure) => self.call_closure(&closure, args, &call.position),
            other => Err(RuntimeError::NotCallable {
                name: call.func.value.clone(),
                found: other.type_name(),
                span: call.position.clone(),
            }),
        }
    }

    fn call_closure(
        &mut self,
        closure: &Closure,
        args: Vec<RValue>,
        position: &Span,
    ) -> EvalResult<RValue> {
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.config.max_call_depth,
                span: position.clone(),
            });
        }

        log::trace!("call {} at depth {}", closure.decl.name.value, self.depth);
        let frame = self
            .scopes
            .create(ScopeKind::Function, Some(closure.scope()), true);
        self.peak_scopes = self.peak_scopes.max(self.scopes.len());

        self.depth += 1;
        let result = self.run_frame(&closure.decl, frame, args);
        self.depth -= 1;

        self.release(frame)?;
        result
    }

    fn run_frame(
        &mut self,
        decl: &FunctionDecl,
        frame: ScopeId,
        args: Vec<RValue>,
    ) -> EvalResult<RValue> {
        let mut args = args.into_iter();
        for param in &decl.params {
            let value = args.next().unwrap_or(RValue::Undefined);
            if !self.scopes.declare_let(frame, &param.value, value)? {
                return Err(RuntimeError::already_declared(
                    &param.value,
                    param.position.clone(),
                ));
            }
        }

        match self.exec_block(&decl.body, frame, true)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(RValue::Undefined),
        }
    }
}

fn binary(op: BinOpKind, left: RValue, right: RValue, position: &Span) -> EvalResult<RValue> {
    let value = match (op, left, right) {
        (BinOpKind::Eq, left, right) => RValue::Bool(left.strict_equals(&right)),
        (BinOpKind::NotEq, left, right) => RValue::Bool(!left.strict_equals(&right)),
        (BinOpKind::Add, RValue::Number(a), RValue::Number(b)) => RValue::Number(a + b),
        (BinOpKind::Add, left @ RValue::String(_), right)
        | (BinOpKind::Add, left, right @ RValue::String(_)) => {
            RValue::String(format!("{}{}", left, right))
        }
        (BinOpKind::Sub, RValue::Number(a), RValue::Number(b)) => RValue::Number(a - b),
        (BinOpKind::Mul, RValue::Number(a), RValue::Number(b)) => RValue::Number(a * b),
        (BinOpKind::Div, RValue::Number(a), RValue::Number(b)) => RValue::Number(a / b),
        (BinOpKind::Lt, RValue::Number(a), RValue::Number(b)) => RValue::Bool(a < b),
        (BinOpKind::Gt, RValue::Number(a), RValue::Number(b)) => RValue::Bool(a > b),
        (op, left, right) => {
            return Err(RuntimeError::TypeMismatch {
                op,
                left: left.type_name(),
                right: right.type_name(),
                span: position.clone(),
            });
        }
    };
    Ok(value)
}
