//! FILENAME: core/axis-engine/src/transform.rs
//! PlaceLevelsOnAxes - level placement on the axes of a query model.
//!
//! Each mutation runs against a borrowed view of the current axis and
//! produces a new tree. Only a successful result reaches the model, through
//! `QueryModel::replace_axis`, which installs the tree and its text at once.
//! On error the model (trees and text) is exactly as before the call.

use mdx_parser::AxisName;

use crate::analyzer;
use crate::catalog::{Level, MemberCatalog};
use crate::config::TransformOptions;
use crate::error::{AxisError, AxisResult};
use crate::logging::{log_enter, log_exit, log_info, log_warn, AXIS};
use crate::mutator::LevelPositionMutator;
use crate::query::QueryModel;
use crate::tree::AxisTree;

pub struct PlaceLevelsOnAxes<'a, C: MemberCatalog + ?Sized> {
    model: &'a mut QueryModel,
    catalog: &'a C,
    options: TransformOptions,
}

impl<'a, C: MemberCatalog + ?Sized> PlaceLevelsOnAxes<'a, C> {
    pub fn new(model: &'a mut QueryModel, catalog: &'a C) -> Self {
        Self::with_options(model, catalog, TransformOptions::default())
    }

    pub fn with_options(model: &'a mut QueryModel, catalog: &'a C, options: TransformOptions) -> Self {
        PlaceLevelsOnAxes {
            model,
            catalog,
            options,
        }
    }

    pub fn model(&self) -> &QueryModel {
        self.model
    }

    pub fn current_mdx(&self) -> &str {
        self.model.current_mdx()
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Visible levels of `hierarchy` on whichever axis holds it.
    pub fn find_visible_levels_in(&self, hierarchy: &str) -> AxisResult<Vec<Level>> {
        let tree = self
            .model
            .axes()
            .find(|(_, tree)| tree.hierarchies().iter().any(|h| h == hierarchy))
            .map(|(_, tree)| tree)
            .ok_or_else(|| AxisError::HierarchyNotFoundOnAxis(hierarchy.to_string()))?;
        analyzer::find_visible_levels_in_hierarchy(tree, self.catalog, hierarchy)
    }

    /// Visible levels of `axis`; an axis the query does not use has none.
    pub fn find_visible_levels(&self, axis: AxisName) -> AxisResult<Vec<Level>> {
        match self.model.axis_tree(axis) {
            Some(tree) => analyzer::find_visible_levels(tree, self.catalog),
            None => Ok(Vec::new()),
        }
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Adds `level` to `axis`. See [`LevelPositionMutator::add_level`].
    pub fn add_level(&mut self, axis: AxisName, level: &Level, position: isize) -> AxisResult<()> {
        log_enter!(AXIS, "add_level", "{} {} at {}", axis, level.unique_name(), position);
        self.commit("add_level", axis, |mutator, tree| {
            mutator.add_level(tree, level, position)
        })
    }

    /// Removes `level` from `axis`. See [`LevelPositionMutator::remove_level`].
    pub fn remove_level(&mut self, axis: AxisName, level: &Level) -> AxisResult<()> {
        log_enter!(AXIS, "remove_level", "{} {}", axis, level.unique_name());
        self.commit("remove_level", axis, |mutator, tree| {
            mutator.remove_level(tree, level)
        })
    }

    /// Replaces `axis` with exactly `levels`.
    pub fn place_levels(&mut self, axis: AxisName, levels: &[Level]) -> AxisResult<()> {
        log_enter!(AXIS, "place_levels", "{} with {} levels", axis, levels.len());
        self.commit("place_levels", axis, |mutator, tree| {
            mutator.place_levels(tree, levels)
        })
    }

    fn commit<F>(&mut self, operation: &str, axis: AxisName, mutate: F) -> AxisResult<()>
    where
        F: FnOnce(&mut LevelPositionMutator<'a, C>, &AxisTree) -> AxisResult<AxisTree>,
    {
        let empty = AxisTree::empty();
        let current = self.model.axis_tree(axis).unwrap_or(&empty);
        let mut mutator = LevelPositionMutator::new(self.catalog, self.options.hierarchize);

        match mutate(&mut mutator, current) {
            Ok(tree) => {
                self.model.replace_axis(axis, tree);
                log_info!(AXIS, "{} on {}: {}", operation, axis, self.model.current_mdx());
                log_exit!(AXIS, operation);
                Ok(())
            }
            Err(err) => {
                log_warn!(AXIS, "{} on {} failed: {}", operation, axis, err);
                Err(err)
            }
        }
    }
}
