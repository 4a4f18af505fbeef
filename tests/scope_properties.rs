// Property-based tests for the declaration and resolution rules
//
// These tests verify:
// - let/const bind once per scope and keep the first value
// - var always lands in the nearest function scope (or the root)
// - lookup returns the innermost binding on the chain

use proptest::prelude::*;
use varenv::scope::{DeclarationKind, ScopeId, ScopeKind, Scopes};

fn scope_kind() -> impl Strategy<Value = ScopeKind> {
    prop_oneof![Just(ScopeKind::Function), Just(ScopeKind::Block)]
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,6}"
}

/// Build root -> kinds[0] -> kinds[1] -> ..., returning every scope, root first
fn build_chain(scopes: &mut Scopes<u32>, kinds: &[ScopeKind]) -> Vec<ScopeId> {
    let mut chain = vec![scopes.global()];
    for kind in kinds {
        let parent = *chain.last().unwrap();
        chain.push(scopes.create(*kind, Some(parent), false));
    }
    chain
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn lexical_declarations_bind_once(
        name in identifier(),
        first in any::<u32>(),
        second in any::<u32>(),
        is_const in any::<bool>(),
    ) {
        let mut scopes = Scopes::new();
        let root = scopes.global();
        let kind = if is_const { DeclarationKind::Const } else { DeclarationKind::Let };

        prop_assert_eq!(scopes.declare(kind, root, name.as_str(), first), Ok(true));
        let found = scopes.search(root, &name).unwrap().map(|b| *b.value());
        prop_assert_eq!(found, Some(first));

        prop_assert_eq!(scopes.declare_let(root, name.as_str(), second), Ok(false));
        prop_assert_eq!(scopes.declare_const(root, name.as_str(), second), Ok(false));
        let found = scopes.search(root, &name).unwrap().map(|b| *b.value());
        prop_assert_eq!(found, Some(first));
    }

    #[test]
    fn var_lands_in_nearest_function_or_root(
        kinds in prop::collection::vec(scope_kind(), 0..8),
        level in any::<prop::sample::Index>(),
        values in prop::collection::vec(any::<u32>(), 1..4),
    ) {
        let mut scopes = Scopes::new();
        let chain = build_chain(&mut scopes, &kinds);
        let level = level.index(chain.len());

        // chain[i] for i >= 1 has kind kinds[i - 1]
        let expected = (1..=level)
            .rev()
            .find(|&i| kinds[i - 1] == ScopeKind::Function)
            .unwrap_or(0);

        for value in &values {
            prop_assert_eq!(scopes.declare_var(chain[level], "v", *value), Ok(true));
        }

        for (i, id) in chain.iter().enumerate() {
            prop_assert_eq!(scopes.scope(*id).unwrap().contains("v"), i == expected);
        }
        let stored = scopes.scope(chain[expected]).unwrap().get("v").map(|b| *b.value());
        prop_assert_eq!(stored, values.last().copied());
        prop_assert_eq!(scopes.hoist_target(chain[level]), Ok(chain[expected]));
    }

    #[test]
    fn lookup_returns_innermost_binding(
        kinds in prop::collection::vec(scope_kind(), 1..8),
        declared in prop::collection::vec(any::<bool>(), 9),
    ) {
        let mut scopes = Scopes::new();
        let chain = build_chain(&mut scopes, &kinds);

        for (i, id) in chain.iter().enumerate() {
            if declared[i] {
                prop_assert_eq!(scopes.declare_let(*id, "x", i as u32), Ok(true));
            }
        }

        let innermost = chain.len() - 1;
        let expected = (0..=innermost).rev().find(|&i| declared[i]).map(|i| i as u32);
        let found = scopes.search(chain[innermost], "x").unwrap().map(|b| *b.value());
        prop_assert_eq!(found, expected);
        prop_assert_eq!(scopes.depth(chain[innermost]), Ok(innermost));
    }
}
