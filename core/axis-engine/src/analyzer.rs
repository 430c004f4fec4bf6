//! FILENAME: core/axis-engine/src/analyzer.rs
//! Level Visibility Analyzer - which levels an axis currently shows.
//!
//! Read-only. Works on any tree shape: members are gathered from every union
//! branch and every CrossJoin operand, so an asymmetric drill (one branch
//! deeper than another) reports the union of the depths reached.

use std::collections::BTreeSet;

use crate::catalog::{Level, MemberCatalog};
use crate::error::{AxisError, AxisResult};
use crate::tree::AxisTree;

/// Distinct depths at which `hierarchy` has members on the axis, ascending.
/// Includes levels the catalog hides.
pub fn represented_depths(tree: &AxisTree, hierarchy: &str) -> BTreeSet<usize> {
    tree.members_of(hierarchy)
        .iter()
        .map(|member| member.depth)
        .collect()
}

/// Visible levels of one hierarchy, ascending depth, no duplicates.
pub fn find_visible_levels_in_hierarchy<C: MemberCatalog + ?Sized>(
    tree: &AxisTree,
    catalog: &C,
    hierarchy: &str,
) -> AxisResult<Vec<Level>> {
    let depths = represented_depths(tree, hierarchy);
    if depths.is_empty() {
        return Err(AxisError::HierarchyNotFoundOnAxis(hierarchy.to_string()));
    }

    let levels = catalog.levels_of(hierarchy)?;
    Ok(depths
        .into_iter()
        .filter_map(|depth| levels.get(depth))
        .filter(|level| catalog.is_visible(level))
        .cloned()
        .collect())
}

/// Visible levels of the whole axis: hierarchies left to right, each
/// hierarchy's levels by ascending depth.
pub fn find_visible_levels<C: MemberCatalog + ?Sized>(
    tree: &AxisTree,
    catalog: &C,
) -> AxisResult<Vec<Level>> {
    let mut levels = Vec::new();
    for hierarchy in tree.hierarchies() {
        levels.extend(find_visible_levels_in_hierarchy(tree, catalog, &hierarchy)?);
    }
    Ok(levels)
}
