//! # Runtime Error Definitions
//!
//! Errors raised while evaluating a parsed program. The scope model reports
//! redeclarations as `false` and unresolved names as `None`; this is where
//! those outcomes become user-facing diagnostics:
//!
//! - A `let`/`const` name declared twice in one scope (`AlreadyDeclared`)
//! - An identifier that no enclosing scope binds (`NotDefined`)
//! - An assignment to a `const` binding (`ConstAssignment`)
//!
//! All variants that stem from the source carry its span, and the `Display`
//! implementation renders it the same way parse errors are rendered.

use std::fmt;
use std::io;

use lachs::Span;

use crate::ast::expression::BinOpKind;
use crate::scope::ScopeError;

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// `let` or `const` of a name that is already bound in the same scope
    AlreadyDeclared { name: String, span: Span },
    /// Reference to a name that no scope in the chain binds
    NotDefined { name: String, span: Span },
    /// Assignment to a binding declared with `const`
    ConstAssignment { name: String, span: Span },
    /// Call of a value that is not a function
    NotCallable {
        name: String,
        found: &'static str,
        span: Span,
    },
    /// Operator applied to operands it does not support
    TypeMismatch {
        op: BinOpKind,
        left: &'static str,
        right: &'static str,
        span: Span,
    },
    /// Too many nested calls
    CallDepthExceeded { limit: usize, span: Span },
    /// The evaluator used the scope arena incorrectly
    Scope(ScopeError),
    /// Writing program output failed
    Output(String),
}

impl RuntimeError {
    pub fn already_declared(name: impl Into<String>, span: Span) -> Self {
        RuntimeError::AlreadyDeclared {
            name: name.into(),
            span,
        }
    }

    pub fn not_defined(name: impl Into<String>, span: Span) -> Self {
        RuntimeError::NotDefined {
            name: name.into(),
            span,
        }
    }

    pub fn const_assignment(name: impl Into<String>, span: Span) -> Self {
        RuntimeError::ConstAssignment {
            name: name.into(),
            span,
        }
    }

    fn message(&self) -> String {
        match self {
            RuntimeError::AlreadyDeclared { name, .. } => {
                format!("Identifier '{}' has already been declared", name)
            }
            RuntimeError::NotDefined { name, .. } => format!("{} is not defined", name),
            RuntimeError::ConstAssignment { name, .. } => {
                format!("Assignment to constant variable '{}'", name)
            }
            RuntimeError::NotCallable { name, found, .. } => {
                format!("{} is not a function (found {})", name, found)
            }
            RuntimeError::TypeMismatch {
                op, left, right, ..
            } => format!(
                "cannot apply '{}' to {} and {}",
                op.symbol(),
                left,
                right
            ),
            RuntimeError::CallDepthExceeded { limit, .. } => {
                format!("maximum call depth of {} exceeded", limit)
            }
            RuntimeError::Scope(err) => err.to_string(),
            RuntimeError::Output(err) => format!("failed to write output: {}", err),
        }
    }

    fn span(&self) -> Option<&Span> {
        match self {
            RuntimeError::AlreadyDeclared { span, .. }
            | RuntimeError::NotDefined { span, .. }
            | RuntimeError::ConstAssignment { span, .. }
            | RuntimeError::NotCallable { span, .. }
            | RuntimeError::TypeMismatch { span, .. }
            | RuntimeError::CallDepthExceeded { span, .. } => Some(span),
            RuntimeError::Scope(_) | RuntimeError::Output(_) => None,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = self.message();
        match self.span() {
            Some(span) if !span.source.is_empty() => write!(f, "{}", span.to_string(&msg)),
            _ => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ScopeError> for RuntimeError {
    fn from(err: ScopeError) -> Self {
        RuntimeError::Scope(err)
    }
}

impl From<io::Error> for RuntimeError {
    fn from(err: io::Error) -> Self {
        RuntimeError::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_without_source_falls_back_to_plain_text() {
        let err = RuntimeError::not_defined("x", Span::default());
        assert_eq!(err.to_string(), "Runtime error: x is not defined");
    }

    #[test]
    fn test_already_declared_message() {
        let err = RuntimeError::already_declared("count", Span::default());
        assert_eq!(
            err.to_string(),
            "Runtime error: Identifier 'count' has already been declared"
        );
    }
}
