//! Parent/child hierarchy checks for accounts and cost centers.
//!
//! Hierarchies are stored flat, one parent pointer per row. Callers load the
//! tenant's `id -> parent` map and ask whether a proposed parent is allowed.

use std::collections::HashMap;
use std::hash::Hash;

/// Maximum number of ancestor hops walked before giving up.
pub const MAX_HIERARCHY_DEPTH: usize = 64;

/// Why a parent assignment was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyViolation {
    /// The proposed parent does not exist.
    MissingParent,
    /// The node would become its own ancestor.
    Cycle,
    /// The ancestor chain exceeds [`MAX_HIERARCHY_DEPTH`].
    TooDeep,
}

/// Checks that making `parent` the parent of `node` keeps the hierarchy a
/// forest.
///
/// `node` is `None` for a record that does not exist yet. `parents` maps every
/// existing node of the tenant to its current parent.
pub fn check_parent<I>(
    node: Option<I>,
    parent: I,
    parents: &HashMap<I, Option<I>>,
) -> Result<(), HierarchyViolation>
where
    I: Copy + Eq + Hash,
{
    if !parents.contains_key(&parent) {
        return Err(HierarchyViolation::MissingParent);
    }

    let mut current = Some(parent);
    let mut hops = 0;
    while let Some(id) = current {
        if Some(id) == node {
            return Err(HierarchyViolation::Cycle);
        }
        hops += 1;
        if hops > MAX_HIERARCHY_DEPTH {
            return Err(HierarchyViolation::TooDeep);
        }
        current = parents.get(&id).copied().flatten();
    }
    Ok(())
}
