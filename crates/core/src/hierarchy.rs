//! Parent-chain validation for self-referencing hierarchies.
//!
//! Chart accounts, cost centers, and product categories are all parent-id
//! trees. Nothing structural prevents a malformed parent cycle, so every
//! reparent must run through [`ensure_acyclic`] before being persisted.

use core::hash::Hash;
use std::collections::HashSet;

use crate::error::{DomainError, DomainResult};

/// Verify that attaching `node` under `proposed_parent` keeps the structure a
/// forest.
///
/// `parent_of` resolves a node to its current parent (None for roots). The
/// walk starts at the proposed parent and follows the chain upward; seeing
/// `node` again, or revisiting any node, means a cycle and is rejected.
pub fn ensure_acyclic<Id, F>(node: Id, proposed_parent: Option<Id>, parent_of: F) -> DomainResult<()>
where
    Id: Copy + Eq + Hash,
    F: Fn(Id) -> Option<Id>,
{
    let Some(parent) = proposed_parent else {
        return Ok(());
    };

    if parent == node {
        return Err(DomainError::invariant("node cannot be its own parent"));
    }

    let mut seen = HashSet::new();
    seen.insert(node);

    let mut current = Some(parent);
    while let Some(id) = current {
        if !seen.insert(id) {
            return Err(DomainError::invariant(
                "assigning this parent would create a cycle",
            ));
        }
        current = parent_of(id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(edges: &HashMap<u32, u32>) -> impl Fn(u32) -> Option<u32> + '_ {
        move |id| edges.get(&id).copied()
    }

    #[test]
    fn root_assignment_is_fine() {
        let edges = HashMap::new();
        assert!(ensure_acyclic(1u32, None, lookup(&edges)).is_ok());
    }

    #[test]
    fn chain_without_cycle_is_fine() {
        // 3 -> 2 -> 1
        let edges = HashMap::from([(3, 2), (2, 1)]);
        assert!(ensure_acyclic(4u32, Some(3), lookup(&edges)).is_ok());
    }

    #[test]
    fn direct_self_parent_is_rejected() {
        let edges = HashMap::new();
        let err = ensure_acyclic(1u32, Some(1), lookup(&edges)).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn reparenting_under_own_descendant_is_rejected() {
        // 3 -> 2 -> 1; moving 1 under 3 would close the loop.
        let edges = HashMap::from([(3, 2), (2, 1)]);
        let err = ensure_acyclic(1u32, Some(3), lookup(&edges)).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn pre_existing_cycle_elsewhere_is_still_detected() {
        // 2 -> 3 -> 2 is already malformed; walking it must terminate.
        let edges = HashMap::from([(2, 3), (3, 2)]);
        let err = ensure_acyclic(1u32, Some(2), lookup(&edges)).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }
}
