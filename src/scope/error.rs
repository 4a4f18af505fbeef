use std::fmt;

use super::chain::ScopeId;

/// Misuse of the scope arena by the embedding evaluator.
///
/// Redeclarations and unresolved names are not errors at this level: they
/// come back as `false` and `None` respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// The handle refers to a scope that has been released
    DanglingScope(ScopeId),
    /// A declaration keyword other than `var`, `let` or `const`
    UnknownDeclarationKind(String),
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScopeError::DanglingScope(id) => write!(f, "{} has already been released", id),
            ScopeError::UnknownDeclarationKind(kind) => {
                write!(f, "unknown declaration kind '{}'", kind)
            }
        }
    }
}

impl std::error::Error for ScopeError {}
