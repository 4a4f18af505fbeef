use std::mem;

use super::kind::DeclarationKind;

/// A declared identifier's storage cell.
///
/// The value is opaque here. Updating it through [`Binding::set`] is allowed
/// for every kind, `const` included; rejecting assignment to a constant is
/// left to the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding<V> {
    kind: DeclarationKind,
    value: V,
}

impl<V> Binding<V> {
    pub fn new(kind: DeclarationKind, value: V) -> Self {
        Self { kind, value }
    }

    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    pub fn is_const(&self) -> bool {
        self.kind == DeclarationKind::Const
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Replace the stored value, returning the previous one
    pub fn set(&mut self, value: V) -> V {
        mem::replace(&mut self.value, value)
    }

    pub fn into_value(self) -> V {
        self.value
    }
}
