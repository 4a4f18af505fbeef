//! Variable environments for the interpreter
//!
//! This module decides, for every identifier reference, which binding it
//! refers to, and enforces where `var`, `let` and `const` declarations land.
//!
//! # Architecture
//!
//! - `Scopes`: Arena owning every lexical environment of a run
//! - `Scope`: One environment (binding table, kind, parent link, invasive flag)
//! - `ScopeId`: Generation-checked handle into the arena
//! - `Binding`: A declaration kind paired with a stored value
//! - `Capture`: A closure's counted hold on the scope it was declared in
//!
//! A scope only knows its parent, never its children, so any number of
//! sibling blocks can share one function scope as parent. Parent links are
//! handles rather than references: a closure may keep a child scope alive
//! after the frame that created it has finished.
//!
//! # Declaration rules
//!
//! - `var` walks up to the nearest function scope (or the root) and binds
//!   there; redeclaring is always allowed and the last write wins.
//! - `let` and `const` bind in the scope they are declared in and fail
//!   (returning `false`) if the name is already bound there.
//!
//! Lookup checks the scope itself, then each parent in turn.
//!
//! # Lifetime
//!
//! The evaluator releases a scope when the construct that created it
//! finishes. The scope is freed once it also has no live child scope and no
//! outstanding [`Capture`]. Closures stored inside the very scopes they
//! capture form cycles that counting cannot see; [`Scopes::collect`] frees
//! those by tracing from the scopes still in use.

mod binding;
mod capture;
mod chain;
mod error;
mod kind;

pub use binding::Binding;
pub use capture::{Capture, Captures};
pub use chain::{Ancestors, Scope, ScopeId, Scopes};
pub use error::ScopeError;
pub use kind::{DeclarationKind, ScopeKind};
