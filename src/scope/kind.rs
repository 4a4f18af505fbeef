use std::fmt;
use std::str::FromStr;

use super::error::ScopeError;

/// The construct that introduced a scope.
///
/// Only the function boundary matters to the declaration rules: it is where
/// `var` declarations stop hoisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

impl ScopeKind {
    pub fn is_function_boundary(self) -> bool {
        matches!(self, ScopeKind::Function)
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScopeKind::Global => "global",
            ScopeKind::Function => "function",
            ScopeKind::Block => "block",
        })
    }
}

/// The keyword a binding was declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn keyword(self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }

    /// `let` and `const` bind in the current scope only
    pub fn is_block_scoped(self) -> bool {
        !matches!(self, DeclarationKind::Var)
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for DeclarationKind {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "var" => Ok(DeclarationKind::Var),
            "let" => Ok(DeclarationKind::Let),
            "const" => Ok(DeclarationKind::Const),
            other => Err(ScopeError::UnknownDeclarationKind(other.to_string())),
        }
    }
}
