//! FILENAME: core/axis-engine/src/mutator.rs
//! Level Position Mutator - adds, removes and places levels on one axis.
//!
//! Every operation reads the axis into a selection snapshot (one entry per
//! hierarchy, in axis order, holding that hierarchy's distinct members),
//! edits the snapshot and rebuilds a normalized tree from it:
//!
//! ```text
//! CrossJoin({h1 members}, CrossJoin({h2 members}, {h3 members}))
//! ```
//!
//! with each member list sorted parent-before-child. The input tree is never
//! touched; a failed call leaves the caller with exactly what it had.

use crate::analyzer::{find_visible_levels_in_hierarchy, represented_depths};
use crate::builder::{build_set_literal, dedupe_members, MemberSetBuilder};
use crate::catalog::{Level, Member, MemberCatalog};
use crate::config::HierarchizeMode;
use crate::error::{AxisError, AxisResult};
use crate::logging::{log_debug, AXIS};
use crate::tree::AxisTree;

/// One hierarchy's share of an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchySelection {
    pub hierarchy: String,
    pub members: Vec<Member>,
}

/// Reads the per-hierarchy selection of an axis, hierarchies in axis order.
pub fn selection_snapshot(tree: &AxisTree) -> Vec<HierarchySelection> {
    tree.hierarchies()
        .into_iter()
        .map(|hierarchy| {
            let members = tree.members_of(&hierarchy);
            HierarchySelection { hierarchy, members }
        })
        .collect()
}

pub struct LevelPositionMutator<'a, C: MemberCatalog + ?Sized> {
    catalog: &'a C,
    builder: MemberSetBuilder<'a, C>,
    mode: HierarchizeMode,
}

impl<'a, C: MemberCatalog + ?Sized> LevelPositionMutator<'a, C> {
    pub fn new(catalog: &'a C, mode: HierarchizeMode) -> Self {
        LevelPositionMutator {
            catalog,
            builder: MemberSetBuilder::new(catalog),
            mode,
        }
    }

    // ========================================================================
    // ADD
    // ========================================================================

    /// Adds `level` to the axis.
    ///
    /// If the level's hierarchy is already on the axis, its selection is
    /// drilled down (or rolled up) to `level` in place and `position` only
    /// has to be in range. Otherwise a new operand with every member of
    /// `level` is inserted at `position`; a negative position appends.
    pub fn add_level(
        &mut self,
        tree: &AxisTree,
        level: &Level,
        position: isize,
    ) -> AxisResult<AxisTree> {
        let mut selections = selection_snapshot(tree);
        let count = selections.len();
        if position > count as isize {
            return Err(AxisError::InvalidPosition {
                position,
                hierarchy_count: count,
            });
        }

        match selections
            .iter()
            .position(|selection| selection.hierarchy == level.hierarchy)
        {
            Some(existing) => {
                let selection = &mut selections[existing];
                let expanded = self.builder.expand_to_level(&selection.members, level)?;
                log_debug!(
                    AXIS,
                    "drilling {} to {}: {} new members",
                    selection.hierarchy,
                    level.name,
                    expanded.len()
                );
                selection.members.extend(expanded);
            }
            None => {
                let members = self.builder.members_at_level(level, None)?;
                let index = usize::try_from(position).unwrap_or(count);
                log_debug!(
                    AXIS,
                    "inserting {} at operand {} with {} members",
                    level.hierarchy,
                    index,
                    members.len()
                );
                selections.insert(
                    index,
                    HierarchySelection {
                        hierarchy: level.hierarchy.clone(),
                        members,
                    },
                );
            }
        }

        self.rebuild(selections, tree.hierarchize())
    }

    // ========================================================================
    // REMOVE
    // ========================================================================

    /// Removes the members of `level` from the axis.
    ///
    /// Removing the deepest represented level rolls its members up to the
    /// next shallower represented level, so the parents they were drilled
    /// from stay on the axis. A hierarchy left with no members loses its
    /// operand.
    pub fn remove_level(&mut self, tree: &AxisTree, level: &Level) -> AxisResult<AxisTree> {
        let visible = find_visible_levels_in_hierarchy(tree, self.catalog, &level.hierarchy)
            .map_err(|err| match err {
                AxisError::HierarchyNotFoundOnAxis(_) => {
                    AxisError::LevelNotFound(level.unique_name())
                }
                other => other,
            })?;
        if !visible.contains(level) {
            return Err(AxisError::LevelNotFound(level.unique_name()));
        }

        let mut selections = selection_snapshot(tree);
        let index = selections
            .iter()
            .position(|selection| selection.hierarchy == level.hierarchy)
            .ok_or_else(|| AxisError::LevelNotFound(level.unique_name()))?;

        let depths = represented_depths(tree, &level.hierarchy);
        let is_deepest = depths.last() == Some(&level.depth);
        let roll_up_depth = depths.range(..level.depth).next_back().copied();

        let (removed, mut kept): (Vec<Member>, Vec<Member>) = selections[index]
            .members
            .drain(..)
            .partition(|member| member.depth == level.depth);

        if let (true, Some(depth)) = (is_deepest, roll_up_depth) {
            for member in &removed {
                if let Some(ancestor) = self.builder.ancestor_at(member, depth)? {
                    kept.push(ancestor);
                }
            }
        }
        log_debug!(
            AXIS,
            "removed {} members of {}, {} remain",
            removed.len(),
            level.unique_name(),
            kept.len()
        );

        let kept = dedupe_members(kept);
        if kept.is_empty() {
            selections.remove(index);
        } else {
            selections[index].members = kept;
        }
        if selections.is_empty() {
            return Err(AxisError::EmptyAxis);
        }

        self.rebuild(selections, tree.hierarchize())
    }

    // ========================================================================
    // PLACE
    // ========================================================================

    /// Replaces the axis with exactly `levels`. Hierarchies appear in order
    /// of their first level in the list; within a hierarchy the shallowest
    /// level supplies all of its members and deeper ones drill into them.
    pub fn place_levels(&mut self, tree: &AxisTree, levels: &[Level]) -> AxisResult<AxisTree> {
        if levels.is_empty() {
            return Err(AxisError::EmptyAxis);
        }

        let mut grouped: Vec<(String, Vec<&Level>)> = Vec::new();
        for level in levels {
            match grouped
                .iter()
                .position(|(hierarchy, _)| *hierarchy == level.hierarchy)
            {
                Some(existing) => grouped[existing].1.push(level),
                None => grouped.push((level.hierarchy.clone(), vec![level])),
            }
        }

        let mut selections = Vec::with_capacity(grouped.len());
        for (hierarchy, mut group) in grouped {
            group.sort_by_key(|level| level.depth);
            group.dedup_by_key(|level| level.depth);

            let Some((first, deeper)) = group.split_first() else {
                continue;
            };
            let mut members = self.builder.members_at_level(first, None)?;
            for level in deeper {
                let expanded = self.builder.expand_to_level(&members, level)?;
                members.extend(expanded);
            }
            selections.push(HierarchySelection { hierarchy, members });
        }

        self.rebuild(selections, tree.hierarchize())
    }

    // ========================================================================
    // REBUILD
    // ========================================================================

    fn rebuild(
        &mut self,
        selections: Vec<HierarchySelection>,
        previous_hierarchize: bool,
    ) -> AxisResult<AxisTree> {
        let mut tree = AxisTree::empty();
        let mut operands = Vec::with_capacity(selections.len());
        for selection in selections {
            let members = self
                .builder
                .sort_hierarchically(dedupe_members(selection.members))?;
            operands.push(tree.add_node(build_set_literal(members)));
        }

        let root = tree.cross_join_chain(&operands).ok_or(AxisError::EmptyAxis)?;
        tree.set_root(Some(root));
        tree.set_hierarchize(self.mode.apply(previous_hierarchize));
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::config::RenderOptions;
    use crate::resolve::resolve_axis;
    use crate::serializer::render_axis;
    use mdx_parser::parse_set;

    fn catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        catalog.add_hierarchy("Product", &["(All)", "Family", "Department"]);
        let all = catalog.add_member("Product", None, "All Products").unwrap();
        let drink = catalog.add_member("Product", Some(&all), "Drink").unwrap();
        let food = catalog.add_member("Product", Some(&all), "Food").unwrap();
        catalog.add_member("Product", Some(&drink), "Beverages").unwrap();
        catalog.add_member("Product", Some(&drink), "Dairy").unwrap();
        catalog.add_member("Product", Some(&food), "Produce").unwrap();

        catalog.add_hierarchy("Gender", &["(All)", "Gender"]);
        let all = catalog.add_member("Gender", None, "All Gender").unwrap();
        catalog.add_member("Gender", Some(&all), "F").unwrap();
        catalog.add_member("Gender", Some(&all), "M").unwrap();

        catalog.add_hierarchy("Store", &["(All)"]);
        catalog.add_member("Store", None, "All Stores").unwrap();
        catalog
    }

    fn axis(catalog: &InMemoryCatalog, text: &str) -> AxisTree {
        resolve_axis(&parse_set(text).unwrap(), catalog).unwrap()
    }

    fn render(tree: &AxisTree) -> String {
        render_axis(tree, &RenderOptions::default())
    }

    fn level(catalog: &InMemoryCatalog, hierarchy: &str, name: &str) -> Level {
        catalog.level(hierarchy, name).unwrap()
    }

    #[test]
    fn test_add_new_hierarchy_at_each_position() {
        let catalog = catalog();
        let tree = axis(&catalog, "CrossJoin({[Product].[All Products]}, {[Store].[All Stores]})");
        let gender = level(&catalog, "Gender", "Gender");
        let mut mutator = LevelPositionMutator::new(&catalog, HierarchizeMode::Preserve);

        let first = mutator.add_level(&tree, &gender, 0).unwrap();
        assert_eq!(
            render(&first),
            "CrossJoin({[Gender].[All Gender].[F], [Gender].[All Gender].[M]}, CrossJoin({[Product].[All Products]}, {[Store].[All Stores]}))"
        );

        let middle = mutator.add_level(&tree, &gender, 1).unwrap();
        assert_eq!(
            render(&middle),
            "CrossJoin({[Product].[All Products]}, CrossJoin({[Gender].[All Gender].[F], [Gender].[All Gender].[M]}, {[Store].[All Stores]}))"
        );

        let last = mutator.add_level(&tree, &gender, 2).unwrap();
        let appended = mutator.add_level(&tree, &gender, -1).unwrap();
        assert_eq!(render(&last), render(&appended));
        assert_eq!(
            render(&last),
            "CrossJoin({[Product].[All Products]}, CrossJoin({[Store].[All Stores]}, {[Gender].[All Gender].[F], [Gender].[All Gender].[M]}))"
        );
    }

    #[test]
    fn test_position_past_end_is_rejected() {
        let catalog = catalog();
        let tree = axis(&catalog, "{[Product].[All Products]}");
        let mut mutator = LevelPositionMutator::new(&catalog, HierarchizeMode::Preserve);
        let err = mutator
            .add_level(&tree, &level(&catalog, "Gender", "Gender"), 2)
            .unwrap_err();
        assert!(matches!(
            err,
            AxisError::InvalidPosition {
                position: 2,
                hierarchy_count: 1
            }
        ));

        // Also checked when the hierarchy is already present.
        let err = mutator
            .add_level(&tree, &level(&catalog, "Product", "Family"), 5)
            .unwrap_err();
        assert!(matches!(err, AxisError::InvalidPosition { .. }));
    }

    #[test]
    fn test_add_to_existing_hierarchy_drills_in_place() {
        let catalog = catalog();
        let tree = axis(
            &catalog,
            "Hierarchize(CrossJoin({[Gender].[All Gender]}, {[Product].[All Products], [Product].[Drink]}))",
        );
        let mut mutator = LevelPositionMutator::new(&catalog, HierarchizeMode::Preserve);
        let drilled = mutator
            .add_level(&tree, &level(&catalog, "Product", "Department"), 0)
            .unwrap();
        assert_eq!(
            render(&drilled),
            "Hierarchize(CrossJoin({[Gender].[All Gender]}, {[Product].[All Products], [Product].[All Products].[Drink], [Product].[All Products].[Drink].[Beverages], [Product].[All Products].[Drink].[Dairy]}))"
        );
    }

    #[test]
    fn test_add_then_remove_restores_text() {
        let catalog = catalog();
        let tree = axis(
            &catalog,
            "CrossJoin({[Product].[All Products], [Product].[Drink], [Product].[Food]}, {[Gender].[All Gender]})",
        );
        let department = level(&catalog, "Product", "Department");
        let mut mutator = LevelPositionMutator::new(&catalog, HierarchizeMode::Preserve);

        let drilled = mutator.add_level(&tree, &department, 0).unwrap();
        assert_ne!(render(&drilled), render(&tree));
        let restored = mutator.remove_level(&drilled, &department).unwrap();
        assert_eq!(render(&restored), render(&tree));
    }

    #[test]
    fn test_remove_deepest_level_rolls_up_to_parents() {
        let catalog = catalog();
        // Food was never drilled; Dairy sits below an unselected Drink.
        let tree = axis(
            &catalog,
            "{[Product].[All Products], [Product].[Food], [Product].[Drink].[Dairy]}",
        );
        let mut mutator = LevelPositionMutator::new(&catalog, HierarchizeMode::Preserve);
        let rolled = mutator
            .remove_level(&tree, &level(&catalog, "Product", "Department"))
            .unwrap();
        assert_eq!(
            render(&rolled),
            "{[Product].[All Products], [Product].[All Products].[Drink], [Product].[All Products].[Food]}"
        );
    }

    #[test]
    fn test_remove_middle_level_keeps_finer_members() {
        let catalog = catalog();
        let tree = axis(
            &catalog,
            "{[Product].[All Products], [Product].[Drink], [Product].[Drink].[Dairy]}",
        );
        let mut mutator = LevelPositionMutator::new(&catalog, HierarchizeMode::Preserve);
        let removed = mutator
            .remove_level(&tree, &level(&catalog, "Product", "Family"))
            .unwrap();
        assert_eq!(
            render(&removed),
            "{[Product].[All Products], [Product].[All Products].[Drink].[Dairy]}"
        );
    }

    #[test]
    fn test_remove_only_level_drops_operand() {
        let catalog = catalog();
        let tree = axis(
            &catalog,
            "CrossJoin({[Product].[All Products]}, {[Gender].[F], [Gender].[M]})",
        );
        let mut mutator = LevelPositionMutator::new(&catalog, HierarchizeMode::Preserve);
        let removed = mutator
            .remove_level(&tree, &level(&catalog, "Gender", "Gender"))
            .unwrap();
        assert_eq!(render(&removed), "{[Product].[All Products]}");

        let err = mutator
            .remove_level(&removed, &level(&catalog, "Product", "(All)"))
            .unwrap_err();
        assert!(matches!(err, AxisError::EmptyAxis));
    }

    #[test]
    fn test_remove_absent_level_is_not_found() {
        let catalog = catalog();
        let tree = axis(&catalog, "{[Product].[All Products]}");
        let mut mutator = LevelPositionMutator::new(&catalog, HierarchizeMode::Preserve);

        let err = mutator
            .remove_level(&tree, &level(&catalog, "Product", "Family"))
            .unwrap_err();
        assert!(matches!(err, AxisError::LevelNotFound(name) if name == "[Product].[Family]"));

        let err = mutator
            .remove_level(&tree, &level(&catalog, "Gender", "Gender"))
            .unwrap_err();
        assert!(matches!(err, AxisError::LevelNotFound(_)));
    }

    #[test]
    fn test_remove_collapses_tuple_union() {
        let catalog = catalog();
        let tree = axis(
            &catalog,
            "Union({([Product].[All Products], [Gender].[All Gender])}, CrossJoin({[Product].[Food]}, {[Gender].[F]}))",
        );
        let mut mutator = LevelPositionMutator::new(&catalog, HierarchizeMode::Preserve);
        let removed = mutator
            .remove_level(&tree, &level(&catalog, "Product", "(All)"))
            .unwrap();
        assert_eq!(
            render(&removed),
            "CrossJoin({[Product].[All Products].[Food]}, {[Gender].[All Gender], [Gender].[All Gender].[F]})"
        );
    }

    #[test]
    fn test_place_levels_resets_axis() {
        let catalog = catalog();
        let tree = axis(&catalog, "Hierarchize({[Store].[All Stores]})");
        let levels = vec![
            level(&catalog, "Gender", "(All)"),
            level(&catalog, "Product", "Family"),
            level(&catalog, "Gender", "Gender"),
        ];
        let mut mutator = LevelPositionMutator::new(&catalog, HierarchizeMode::Preserve);
        let placed = mutator.place_levels(&tree, &levels).unwrap();
        assert_eq!(
            render(&placed),
            "Hierarchize(CrossJoin({[Gender].[All Gender], [Gender].[All Gender].[F], [Gender].[All Gender].[M]}, {[Product].[All Products].[Drink], [Product].[All Products].[Food]}))"
        );
    }

    #[test]
    fn test_place_levels_matches_repeated_appends() {
        let catalog = catalog();
        let product = level(&catalog, "Product", "Family");
        let gender = level(&catalog, "Gender", "Gender");
        let mut mutator = LevelPositionMutator::new(&catalog, HierarchizeMode::Preserve);

        let placed = mutator
            .place_levels(&AxisTree::empty(), &[product.clone(), gender.clone()])
            .unwrap();
        let first = mutator.add_level(&AxisTree::empty(), &product, -1).unwrap();
        let both = mutator.add_level(&first, &gender, -1).unwrap();
        assert_eq!(render(&placed), render(&both));
    }

    #[test]
    fn test_place_no_levels_is_empty_axis() {
        let catalog = catalog();
        let mut mutator = LevelPositionMutator::new(&catalog, HierarchizeMode::Preserve);
        let err = mutator.place_levels(&AxisTree::empty(), &[]).unwrap_err();
        assert!(matches!(err, AxisError::EmptyAxis));
    }

    #[test]
    fn test_hierarchize_modes() {
        let catalog = catalog();
        let tree = axis(&catalog, "Hierarchize({[Product].[All Products]})");
        let family = level(&catalog, "Product", "Family");

        let never = LevelPositionMutator::new(&catalog, HierarchizeMode::Never)
            .add_level(&tree, &family, -1)
            .unwrap();
        assert!(!never.hierarchize());

        let plain = axis(&catalog, "{[Product].[All Products]}");
        let always = LevelPositionMutator::new(&catalog, HierarchizeMode::Always)
            .add_level(&plain, &family, -1)
            .unwrap();
        assert!(always.hierarchize());
    }

    #[test]
    fn test_catalog_outage_fails_without_result() {
        let catalog = catalog();
        let tree = axis(&catalog, "{[Product].[All Products]}");
        let family = level(&catalog, "Product", "Family");
        let broken = catalog.clone().with_outage("timeout");
        let err = LevelPositionMutator::new(&broken, HierarchizeMode::Preserve)
            .add_level(&tree, &family, -1)
            .unwrap_err();
        assert!(matches!(err, AxisError::CatalogUnavailable(_)));
        assert_eq!(render(&tree), "{[Product].[All Products]}");
    }
}
