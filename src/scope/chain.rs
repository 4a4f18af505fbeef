use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::mem;
use std::rc::Rc;

use generational_arena::{Arena, Index};

use super::binding::Binding;
use super::capture::{Capture, Captures, DropQueue};
use super::error::ScopeError;
use super::kind::{DeclarationKind, ScopeKind};

type ScopeResult<T> = Result<T, ScopeError>;

/// Generation-checked handle to a [`Scope`] owned by a [`Scopes`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(Index);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (index, generation) = self.0.into_raw_parts();
        write!(f, "scope #{}.{}", index, generation)
    }
}

/// A single lexical environment
#[derive(Debug)]
pub struct Scope<V> {
    kind: ScopeKind,
    /// Enclosing scope (None for the root)
    parent: Option<ScopeId>,
    bindings: HashMap<String, Binding<V>>,
    invasive: bool,
    /// Shared with every [`Capture`] of this scope
    anchor: Rc<()>,
    /// Set once the construct that created this scope has finished
    released: bool,
    /// Number of live scopes whose parent is this one
    children: usize,
}

impl<V> Scope<V> {
    fn new(kind: ScopeKind, parent: Option<ScopeId>, invasive: bool) -> Self {
        Scope {
            kind,
            parent,
            bindings: HashMap::new(),
            invasive,
            anchor: Rc::new(()),
            released: false,
            children: 0,
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Whether the body block of the construct that created this scope may
    /// run directly in it instead of allocating a scope of its own.
    ///
    /// Stored for the evaluator; nothing in this module reads it.
    pub fn is_invasive(&self) -> bool {
        self.invasive
    }

    /// Number of live [`Capture`]s of this scope
    pub fn holders(&self) -> usize {
        Rc::strong_count(&self.anchor) - 1
    }

    pub fn is_captured(&self) -> bool {
        self.holders() > 0
    }

    /// Whether [`Scopes::release`] was called for this scope
    pub fn is_released(&self) -> bool {
        self.released
    }

    fn is_free(&self) -> bool {
        self.released && self.children == 0 && self.holders() == 0
    }

    /// Look up a binding in this scope only
    pub fn get(&self, name: &str) -> Option<&Binding<V>> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Names bound directly in this scope, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Arena owning every scope of an evaluation.
///
/// All declaration and lookup operations take the [`ScopeId`] of the scope
/// the evaluator is currently in. A handle becomes dangling once its scope is
/// released; using it afterwards yields [`ScopeError::DanglingScope`].
///
/// A released scope is freed once nothing needs it any more: no live child
/// scope and no [`Capture`] held by a closure.
#[derive(Debug)]
pub struct Scopes<V> {
    arena: Arena<Scope<V>>,
    dropped: DropQueue,
}

impl<V> Scopes<V> {
    pub fn new() -> Self {
        Scopes {
            arena: Arena::new(),
            dropped: DropQueue::default(),
        }
    }

    /// Create a parentless global scope
    pub fn global(&mut self) -> ScopeId {
        self.create(ScopeKind::Global, None, false)
    }

    /// Create a new, empty scope.
    ///
    /// No validation is done. A non-root scope created without a parent (or
    /// with a dangling one) behaves like a root in every later operation.
    pub fn create(&mut self, kind: ScopeKind, parent: Option<ScopeId>, invasive: bool) -> ScopeId {
        self.settle();
        if let Some(scope) = parent.and_then(|p| self.arena.get_mut(p.0)) {
            scope.children += 1;
        }
        let id = ScopeId(self.arena.insert(Scope::new(kind, parent, invasive)));
        log::trace!("created {} {} (parent: {:?})", kind, id, parent);
        id
    }

    pub fn scope(&self, id: ScopeId) -> ScopeResult<&Scope<V>> {
        self.arena.get(id.0).ok_or(ScopeError::DanglingScope(id))
    }

    fn scope_mut(&mut self, id: ScopeId) -> ScopeResult<&mut Scope<V>> {
        self.arena.get_mut(id.0).ok_or(ScopeError::DanglingScope(id))
    }

    /// Whether `id` still refers to a live scope
    pub fn contains(&self, id: ScopeId) -> bool {
        self.arena.contains(id.0)
    }

    /// Number of live scopes
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Iterate over `id` and its enclosing scopes, innermost first
    pub fn ancestors(&self, id: ScopeId) -> ScopeResult<Ancestors<'_, V>> {
        self.scope(id)?;
        Ok(Ancestors {
            scopes: self,
            next: Some(id),
        })
    }

    /// Number of parent links between `id` and the root
    pub fn depth(&self, id: ScopeId) -> ScopeResult<usize> {
        Ok(self.ancestors(id)?.count() - 1)
    }

    /// The scope a `var` declared in `id` lands in: the nearest function
    /// scope, or the root when there is none.
    pub fn hoist_target(&self, id: ScopeId) -> ScopeResult<ScopeId> {
        let mut target = id;
        for (current, scope) in self.ancestors(id)? {
            target = current;
            if scope.kind.is_function_boundary() {
                break;
            }
        }
        Ok(target)
    }

    /// Declare `name` as a `var`.
    ///
    /// Always succeeds. An existing binding of the same name in the target
    /// scope is replaced, whatever kind it was declared with.
    pub fn declare_var(
        &mut self,
        scope: ScopeId,
        name: impl Into<String>,
        value: V,
    ) -> ScopeResult<bool> {
        let target = self.hoist_target(scope)?;
        let name = name.into();
        log::trace!("var {} -> {} (declared in {})", name, target, scope);
        self.scope_mut(target)?
            .bindings
            .insert(name, Binding::new(DeclarationKind::Var, value));
        Ok(true)
    }

    /// Declare `name` as a `let` in `scope`; `false` if it is already bound there
    pub fn declare_let(
        &mut self,
        scope: ScopeId,
        name: impl Into<String>,
        value: V,
    ) -> ScopeResult<bool> {
        self.declare_lexical(DeclarationKind::Let, scope, name.into(), value)
    }

    /// Declare `name` as a `const` in `scope`; `false` if it is already bound there
    pub fn declare_const(
        &mut self,
        scope: ScopeId,
        name: impl Into<String>,
        value: V,
    ) -> ScopeResult<bool> {
        self.declare_lexical(DeclarationKind::Const, scope, name.into(), value)
    }

    fn declare_lexical(
        &mut self,
        kind: DeclarationKind,
        scope: ScopeId,
        name: String,
        value: V,
    ) -> ScopeResult<bool> {
        match self.scope_mut(scope)?.bindings.entry(name) {
            Entry::Occupied(entry) => {
                log::debug!("{} is already declared in {}", entry.key(), scope);
                Ok(false)
            }
            Entry::Vacant(entry) => {
                log::trace!("{} {} -> {}", kind, entry.key(), scope);
                entry.insert(Binding::new(kind, value));
                Ok(true)
            }
        }
    }

    /// Declare `name` with the rules of `kind`
    pub fn declare(
        &mut self,
        kind: DeclarationKind,
        scope: ScopeId,
        name: impl Into<String>,
        value: V,
    ) -> ScopeResult<bool> {
        if kind.is_block_scoped() {
            self.declare_lexical(kind, scope, name.into(), value)
        } else {
            self.declare_var(scope, name, value)
        }
    }

    /// The scope holding the nearest binding of `name`, starting at `scope`
    pub fn resolve(&self, scope: ScopeId, name: &str) -> ScopeResult<Option<ScopeId>> {
        Ok(self
            .ancestors(scope)?
            .find(|(_, current)| current.contains(name))
            .map(|(id, _)| id))
    }

    /// Resolve `name` by searching from `scope` outwards
    pub fn search(&self, scope: ScopeId, name: &str) -> ScopeResult<Option<&Binding<V>>> {
        Ok(self
            .ancestors(scope)?
            .find_map(|(_, current)| current.get(name)))
    }

    /// Like [`Scopes::search`], but the returned handle writes through to
    /// the stored binding.
    pub fn search_mut(
        &mut self,
        scope: ScopeId,
        name: &str,
    ) -> ScopeResult<Option<&mut Binding<V>>> {
        let Some(owner) = self.resolve(scope, name)? else {
            return Ok(None);
        };
        Ok(self.scope_mut(owner)?.bindings.get_mut(name))
    }

    /// Hold `scope` for a closure.
    ///
    /// The scope (and through it, its parent chain) stays alive after
    /// [`Scopes::release`] for as long as the returned capture or any clone
    /// of it exists.
    pub fn capture(&self, scope: ScopeId) -> ScopeResult<Capture> {
        let anchor = &self.scope(scope)?.anchor;
        Ok(Capture::new(scope, anchor, &self.dropped))
    }

    /// Mark `scope` as finished by the construct that created it, and free
    /// it unless a child scope or a capture still needs it.
    ///
    /// Returns whether the scope was freed right away.
    pub fn release(&mut self, scope: ScopeId) -> ScopeResult<bool> {
        self.scope_mut(scope)?.released = true;
        self.settle();
        if !self.contains(scope) {
            return Ok(true);
        }
        if self.free(scope) {
            return Ok(true);
        }
        log::trace!("keeping {} alive", scope);
        Ok(false)
    }

    /// Free `scope` if it is released and unused, then do the same for each
    /// parent it was keeping alive.
    fn free(&mut self, scope: ScopeId) -> bool {
        let mut next = Some(scope);
        let mut freed_first = false;
        while let Some(id) = next.take() {
            if !self.arena.get(id.0).is_some_and(Scope::is_free) {
                break;
            }
            // dropping the bindings may queue further scopes
            let Some(removed) = self.arena.remove(id.0) else {
                break;
            };
            log::trace!("released {}", id);
            freed_first |= id == scope;
            if let Some(parent) = removed.parent {
                if let Some(current) = self.arena.get_mut(parent.0) {
                    current.children -= 1;
                    next = Some(parent);
                }
            }
        }
        freed_first
    }

    /// Recheck every scope that lost a capture since the last call
    fn settle(&mut self) {
        loop {
            let pending = mem::take(&mut *self.dropped.borrow_mut());
            if pending.is_empty() {
                return;
            }
            for id in pending {
                self.free(id);
            }
        }
    }
}

impl<V: Captures> Scopes<V> {
    /// Free released scopes that are only kept alive by each other.
    ///
    /// A closure stored in a binding of the scope it captures holds that
    /// scope forever as far as counting goes. Here a scope counts as in use
    /// only when it is not yet released, or when some capture of it lives
    /// outside the arena; everything reachable from those through parent
    /// links and stored closures survives. Returns the number of freed
    /// scopes.
    pub fn collect(&mut self) -> usize {
        self.settle();

        let mut outside: HashMap<ScopeId, usize> = self
            .arena
            .iter()
            .map(|(index, scope)| (ScopeId(index), scope.holders()))
            .collect();
        for (_, scope) in self.arena.iter() {
            for binding in scope.bindings.values() {
                if let Some(count) = binding
                    .value()
                    .captured_scope()
                    .and_then(|id| outside.get_mut(&id))
                {
                    *count = count.saturating_sub(1);
                }
            }
        }

        let mut pending: Vec<ScopeId> = self
            .arena
            .iter()
            .map(|(index, scope)| (ScopeId(index), scope))
            .filter(|(id, scope)| !scope.released || outside.get(id).is_some_and(|n| *n > 0))
            .map(|(id, _)| id)
            .collect();
        let mut reachable = HashSet::new();
        while let Some(id) = pending.pop() {
            if !reachable.insert(id) {
                continue;
            }
            let Some(scope) = self.arena.get(id.0) else {
                continue;
            };
            pending.extend(scope.parent);
            pending.extend(
                scope
                    .bindings
                    .values()
                    .filter_map(|binding| binding.value().captured_scope()),
            );
        }

        let garbage: Vec<ScopeId> = self
            .arena
            .iter()
            .map(|(index, _)| ScopeId(index))
            .filter(|id| !reachable.contains(id))
            .collect();
        let mut dead = Vec::with_capacity(garbage.len());
        for id in &garbage {
            if let Some(scope) = self.arena.remove(id.0) {
                if let Some(parent) = scope.parent.and_then(|p| self.arena.get_mut(p.0)) {
                    parent.children -= 1;
                }
                dead.push(scope);
            }
        }
        // bindings may hold captures of each other; drop them only once
        // every scope of the cycle is out of the arena
        drop(dead);
        self.settle();

        log::debug!("collected {} unreachable scopes", garbage.len());
        garbage.len()
    }
}

impl<V> Default for Scopes<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a scope chain, see [`Scopes::ancestors`]
pub struct Ancestors<'a, V> {
    scopes: &'a Scopes<V>,
    next: Option<ScopeId>,
}

impl<'a, V> Iterator for Ancestors<'a, V> {
    type Item = (ScopeId, &'a Scope<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let scope = self.scopes.arena.get(id.0)?;
        self.next = scope.parent;
        Some((id, scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function_in(scopes: &mut Scopes<i32>, parent: ScopeId) -> ScopeId {
        scopes.create(ScopeKind::Function, Some(parent), true)
    }

    fn block_in(scopes: &mut Scopes<i32>, parent: ScopeId) -> ScopeId {
        scopes.create(ScopeKind::Block, Some(parent), false)
    }

    fn value_of(
        scopes: &Scopes<i32>,
        scope: ScopeId,
        name: &str,
    ) -> Option<(DeclarationKind, i32)> {
        scopes
            .search(scope, name)
            .unwrap()
            .map(|binding| (binding.kind(), *binding.value()))
    }

    #[test]
    fn test_let_and_const_are_found_after_declaration() {
        let mut scopes = Scopes::new();
        let global = scopes.global();

        assert!(scopes.declare_let(global, "a", 1).unwrap());
        assert!(scopes.declare_const(global, "b", 2).unwrap());

        assert_eq!(value_of(&scopes, global, "a"), Some((DeclarationKind::Let, 1)));
        assert_eq!(value_of(&scopes, global, "b"), Some((DeclarationKind::Const, 2)));
    }

    #[test]
    fn test_redeclaring_let_fails_and_keeps_first_value() {
        let mut scopes = Scopes::new();
        let global = scopes.global();

        assert!(scopes.declare_let(global, "x", 1).unwrap());
        assert!(!scopes.declare_let(global, "x", 2).unwrap());
        assert!(!scopes.declare_const(global, "x", 3).unwrap());

        assert_eq!(value_of(&scopes, global, "x"), Some((DeclarationKind::Let, 1)));
    }

    #[test]
    fn test_let_after_var_in_same_scope_conflicts() {
        let mut scopes = Scopes::new();
        let global = scopes.global();

        assert!(scopes.declare_var(global, "x", 1).unwrap());
        assert!(!scopes.declare_let(global, "x", 2).unwrap());
    }

    #[test]
    fn test_var_replaces_lexical_binding_in_target_scope() {
        let mut scopes = Scopes::new();
        let global = scopes.global();

        assert!(scopes.declare_const(global, "x", 1).unwrap());
        assert!(scopes.declare_var(global, "x", 2).unwrap());

        assert_eq!(value_of(&scopes, global, "x"), Some((DeclarationKind::Var, 2)));
    }

    #[test]
    fn test_var_hoists_past_blocks_to_function() {
        let mut scopes = Scopes::new();
        let global = scopes.global();
        let function = function_in(&mut scopes, global);
        let outer = block_in(&mut scopes, function);
        let inner = block_in(&mut scopes, outer);

        assert!(scopes.declare_var(inner, "tmp", 5).unwrap());

        assert!(scopes.scope(function).unwrap().contains("tmp"));
        assert!(!scopes.scope(inner).unwrap().contains("tmp"));
        assert!(!scopes.scope(outer).unwrap().contains("tmp"));
        assert!(!scopes.scope(global).unwrap().contains("tmp"));
        assert_eq!(value_of(&scopes, function, "tmp"), Some((DeclarationKind::Var, 5)));
    }

    #[test]
    fn test_var_without_function_lands_in_root() {
        let mut scopes = Scopes::new();
        let global = scopes.global();
        let block = block_in(&mut scopes, global);

        scopes.declare_var(block, "x", 1).unwrap();
        scopes.declare_var(global, "x", 2).unwrap();

        assert_eq!(scopes.scope(global).unwrap().len(), 1);
        assert!(scopes.scope(block).unwrap().is_empty());
        assert_eq!(value_of(&scopes, block, "x"), Some((DeclarationKind::Var, 2)));
    }

    #[test]
    fn test_search_prefers_nearest_binding() {
        let mut scopes = Scopes::new();
        let root = scopes.global();
        let a = block_in(&mut scopes, root);
        let b = block_in(&mut scopes, a);

        scopes.declare_let(root, "x", 1).unwrap();
        assert_eq!(value_of(&scopes, b, "x"), Some((DeclarationKind::Let, 1)));

        scopes.declare_let(a, "x", 2).unwrap();
        assert_eq!(value_of(&scopes, b, "x"), Some((DeclarationKind::Let, 2)));
        assert_eq!(scopes.resolve(b, "x").unwrap(), Some(a));
        assert_eq!(value_of(&scopes, root, "x"), Some((DeclarationKind::Let, 1)));
    }

    #[test]
    fn test_search_undeclared_from_root_is_none() {
        let mut scopes: Scopes<i32> = Scopes::new();
        let global = scopes.global();

        assert!(scopes.search(global, "missing").unwrap().is_none());
        assert_eq!(scopes.resolve(global, "missing").unwrap(), None);
    }

    #[test]
    fn test_search_mut_writes_through() {
        let mut scopes = Scopes::new();
        let global = scopes.global();
        let block = block_in(&mut scopes, global);
        scopes.declare_let(global, "counter", 0).unwrap();

        if let Some(binding) = scopes.search_mut(block, "counter").unwrap() {
            binding.set(41);
            *binding.value_mut() += 1;
        }

        assert_eq!(value_of(&scopes, global, "counter"), Some((DeclarationKind::Let, 42)));
    }

    #[test]
    fn test_declare_dispatches_on_kind() {
        let mut scopes = Scopes::new();
        let global = scopes.global();
        let function = function_in(&mut scopes, global);
        let block = block_in(&mut scopes, function);

        assert!(scopes.declare(DeclarationKind::Var, block, "v", 1).unwrap());
        assert!(scopes.declare(DeclarationKind::Let, block, "l", 2).unwrap());
        assert!(scopes.declare(DeclarationKind::Const, block, "c", 3).unwrap());
        assert!(!scopes.declare(DeclarationKind::Const, block, "l", 4).unwrap());

        assert_eq!(scopes.resolve(block, "v").unwrap(), Some(function));
        assert_eq!(scopes.resolve(block, "l").unwrap(), Some(block));
        assert_eq!(scopes.resolve(block, "c").unwrap(), Some(block));
    }

    #[test]
    fn test_shadowing_across_function_boundary() {
        let mut scopes = Scopes::new();
        let g = scopes.global();
        assert!(scopes.declare_var(g, "count", 0).unwrap());

        let f = scopes.create(ScopeKind::Function, Some(g), false);
        assert!(scopes.declare_let(f, "count", 1).unwrap());

        assert_eq!(value_of(&scopes, g, "count"), Some((DeclarationKind::Var, 0)));
        assert_eq!(value_of(&scopes, f, "count"), Some((DeclarationKind::Let, 1)));
    }

    #[test]
    fn test_depth_and_ancestors() {
        let mut scopes: Scopes<i32> = Scopes::new();
        let global = scopes.global();
        let function = function_in(&mut scopes, global);
        let block = block_in(&mut scopes, function);

        assert_eq!(scopes.depth(global).unwrap(), 0);
        assert_eq!(scopes.depth(block).unwrap(), 2);

        let chain: Vec<_> = scopes.ancestors(block).unwrap().map(|(id, _)| id).collect();
        assert_eq!(chain, vec![block, function, global]);
    }

    #[test]
    fn test_invasive_flag_is_stored() {
        let mut scopes: Scopes<i32> = Scopes::new();
        let global = scopes.global();
        let function = function_in(&mut scopes, global);

        assert!(scopes.scope(function).unwrap().is_invasive());
        assert!(!scopes.scope(global).unwrap().is_invasive());
    }

    #[test]
    fn test_released_scope_is_dangling() {
        let mut scopes: Scopes<i32> = Scopes::new();
        let global = scopes.global();
        let block = block_in(&mut scopes, global);

        assert!(scopes.release(block).unwrap());
        assert!(!scopes.contains(block));
        assert_eq!(
            scopes.declare_let(block, "x", 1),
            Err(ScopeError::DanglingScope(block))
        );
        assert!(scopes.search(block, "x").is_err());

        // the slot is reused under a new generation
        let reused = block_in(&mut scopes, global);
        assert_ne!(reused, block);
        assert!(scopes.scope(block).is_err());
    }

    #[test]
    fn test_scope_with_live_children_survives_release() {
        let mut scopes: Scopes<i32> = Scopes::new();
        let global = scopes.global();
        let function = function_in(&mut scopes, global);
        let block = block_in(&mut scopes, function);

        assert!(!scopes.release(function).unwrap());
        assert!(scopes.contains(function));

        // freeing the last child frees the released parent with it
        assert!(scopes.release(block).unwrap());
        assert!(!scopes.contains(function));
        assert_eq!(scopes.len(), 1);
    }

    #[test]
    fn test_captured_chain_survives_release() {
        let mut scopes: Scopes<i32> = Scopes::new();
        let global = scopes.global();
        let function = function_in(&mut scopes, global);
        let block = block_in(&mut scopes, function);
        scopes.declare_let(block, "kept", 7).unwrap();

        let capture = scopes.capture(block).unwrap();

        assert!(!scopes.release(block).unwrap());
        assert!(!scopes.release(function).unwrap());
        assert!(scopes.scope(block).unwrap().is_captured());
        assert_eq!(value_of(&scopes, block, "kept"), Some((DeclarationKind::Let, 7)));

        drop(capture);
        // the next arena operation notices the dropped capture
        let sibling = block_in(&mut scopes, global);
        scopes.release(sibling).unwrap();
        assert!(!scopes.contains(block));
        assert!(!scopes.contains(function));
        assert_eq!(scopes.len(), 1);
    }

    #[test]
    fn test_every_clone_of_a_capture_holds_the_scope() {
        let mut scopes: Scopes<i32> = Scopes::new();
        let global = scopes.global();
        let function = function_in(&mut scopes, global);

        let first = scopes.capture(function).unwrap();
        let second = first.clone();
        assert_eq!(scopes.scope(function).unwrap().holders(), 2);
        assert!(!scopes.release(function).unwrap());

        drop(first);
        assert!(!scopes.release(function).unwrap());
        drop(second);
        assert!(scopes.release(function).unwrap());
        assert_eq!(scopes.len(), 1);
    }

    #[test]
    fn test_frames_whose_captures_are_dropped_do_not_accumulate() {
        let mut scopes: Scopes<i32> = Scopes::new();
        let global = scopes.global();

        for _ in 0..1000 {
            let frame = function_in(&mut scopes, global);
            let capture = scopes.capture(frame).unwrap();
            scopes.declare_var(frame, "inner", 0).unwrap();
            scopes.release(frame).unwrap();
            drop(capture);
        }

        let last = block_in(&mut scopes, global);
        scopes.release(last).unwrap();
        assert_eq!(scopes.len(), 1);
    }

    /// A value that may close over a scope
    #[derive(Debug, Clone)]
    enum Slot {
        Plain(i32),
        Closure(Capture),
    }

    impl Captures for Slot {
        fn captured_scope(&self) -> Option<ScopeId> {
            match self {
                Slot::Plain(_) => None,
                Slot::Closure(capture) => Some(capture.scope()),
            }
        }
    }

    #[test]
    fn test_collect_frees_scopes_holding_their_own_closures() {
        let mut scopes: Scopes<Slot> = Scopes::new();
        let global = scopes.global();

        for _ in 0..100 {
            let frame = scopes.create(ScopeKind::Function, Some(global), true);
            let inner = Slot::Closure(scopes.capture(frame).unwrap());
            scopes.declare_var(frame, "inner", inner).unwrap();
            assert!(!scopes.release(frame).unwrap());
        }
        assert_eq!(scopes.len(), 101);

        assert_eq!(scopes.collect(), 100);
        assert_eq!(scopes.len(), 1);
    }

    #[test]
    fn test_collect_keeps_scopes_captured_from_outside() {
        let mut scopes: Scopes<Slot> = Scopes::new();
        let global = scopes.global();

        let frame = scopes.create(ScopeKind::Function, Some(global), true);
        let block = scopes.create(ScopeKind::Block, Some(frame), false);
        scopes.declare_let(block, "count", Slot::Plain(3)).unwrap();
        let inner = Slot::Closure(scopes.capture(block).unwrap());
        scopes.declare_var(block, "inner", inner.clone()).unwrap();
        scopes.release(block).unwrap();
        scopes.release(frame).unwrap();

        // `inner` escaped: the copy held here keeps block and frame alive
        assert_eq!(scopes.collect(), 0);
        assert!(scopes.contains(block));
        assert!(scopes.contains(frame));
        assert!(matches!(
            scopes.search(block, "count").unwrap().map(Binding::value),
            Some(Slot::Plain(3))
        ));

        drop(inner);
        assert_eq!(scopes.collect(), 2);
        assert_eq!(scopes.len(), 1);
    }

    #[test]
    fn test_collect_follows_closures_stored_in_live_scopes() {
        let mut scopes: Scopes<Slot> = Scopes::new();
        let global = scopes.global();

        let frame = scopes.create(ScopeKind::Function, Some(global), true);
        let inner = Slot::Closure(scopes.capture(frame).unwrap());
        scopes.declare_var(frame, "inner", inner.clone()).unwrap();
        scopes.declare_var(global, "kept", inner).unwrap();
        scopes.release(frame).unwrap();

        assert_eq!(scopes.collect(), 0);
        assert!(scopes.contains(frame));

        scopes.declare_var(global, "kept", Slot::Plain(0)).unwrap();
        assert_eq!(scopes.collect(), 1);
        assert!(!scopes.contains(frame));
    }

    #[test]
    fn test_dangling_parent_behaves_like_root() {
        let mut scopes: Scopes<i32> = Scopes::new();
        let global = scopes.global();
        let stale = block_in(&mut scopes, global);
        scopes.release(stale).unwrap();

        let orphan = block_in(&mut scopes, stale);
        assert!(scopes.declare_var(orphan, "x", 1).unwrap());
        assert_eq!(scopes.hoist_target(orphan).unwrap(), orphan);
        assert_eq!(scopes.depth(orphan).unwrap(), 0);
    }
}
