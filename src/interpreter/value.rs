use std::fmt;
use std::rc::Rc;

use crate::ast::statement::FunctionDecl;
use crate::scope::{Capture, Captures, ScopeId};

/// A function value: its declaration plus the scope it was declared in
#[derive(Debug, Clone)]
pub struct Closure {
    pub decl: Rc<FunctionDecl>,
    pub capture: Capture,
}

impl Closure {
    /// The scope the function body runs in, as parent of each call frame
    pub fn scope(&self) -> ScopeId {
        self.capture.scope()
    }
}

/// Builtin function identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Print,
}

/// Runtime value representation
#[derive(Debug, Clone)]
pub enum RValue {
    Undefined,
    Number(f64),
    String(String),
    Bool(bool),
    Function(Closure),
    Builtin(Builtin),
}

impl RValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            RValue::Undefined => "undefined",
            RValue::Number(_) => "number",
            RValue::String(_) => "string",
            RValue::Bool(_) => "boolean",
            RValue::Function(_) | RValue::Builtin(_) => "function",
        }
    }

    /// `false`, `0`, `NaN`, `""` and `undefined` are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            RValue::Undefined => false,
            RValue::Number(n) => *n != 0.0 && !n.is_nan(),
            RValue::String(s) => !s.is_empty(),
            RValue::Bool(b) => *b,
            RValue::Function(_) | RValue::Builtin(_) => true,
        }
    }

    /// Equality without coercion. Closures are equal only when created by
    /// the same declaration in the same scope.
    pub fn strict_equals(&self, other: &RValue) -> bool {
        match (self, other) {
            (RValue::Undefined, RValue::Undefined) => true,
            (RValue::Number(a), RValue::Number(b)) => a == b,
            (RValue::String(a), RValue::String(b)) => a == b,
            (RValue::Bool(a), RValue::Bool(b)) => a == b,
            (RValue::Function(a), RValue::Function(b)) => {
                Rc::ptr_eq(&a.decl, &b.decl) && a.scope() == b.scope()
            }
            (RValue::Builtin(a), RValue::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

impl Captures for RValue {
    fn captured_scope(&self) -> Option<ScopeId> {
        match self {
            RValue::Function(closure) => Some(closure.scope()),
            _ => None,
        }
    }
}

impl fmt::Display for RValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RValue::Undefined => f.write_str("undefined"),
            RValue::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            RValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            RValue::Number(n) => write!(f, "{}", n),
            RValue::String(s) => f.write_str(s),
            RValue::Bool(b) => write!(f, "{}", b),
            RValue::Function(closure) => write!(f, "[function {}]", closure.decl.name.value),
            RValue::Builtin(Builtin::Print) => f.write_str("[function print]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display() {
        assert_eq!(RValue::Number(3.0).to_string(), "3");
        assert_eq!(RValue::Number(-0.5).to_string(), "-0.5");
        assert_eq!(RValue::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(RValue::Number(f64::INFINITY).to_string(), "Infinity");
    }

    #[test]
    fn test_truthiness() {
        assert!(!RValue::Undefined.is_truthy());
        assert!(!RValue::Number(0.0).is_truthy());
        assert!(!RValue::Number(f64::NAN).is_truthy());
        assert!(!RValue::String(String::new()).is_truthy());
        assert!(RValue::String("0".to_string()).is_truthy());
        assert!(RValue::Builtin(Builtin::Print).is_truthy());
    }

    #[test]
    fn test_strict_equals_does_not_coerce() {
        assert!(RValue::Number(1.0).strict_equals(&RValue::Number(1.0)));
        assert!(!RValue::Number(1.0).strict_equals(&RValue::String("1".to_string())));
        assert!(!RValue::Number(f64::NAN).strict_equals(&RValue::Number(f64::NAN)));
        assert!(RValue::Undefined.strict_equals(&RValue::Undefined));
    }
}
