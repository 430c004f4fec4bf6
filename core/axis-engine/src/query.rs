//! FILENAME: core/axis-engine/src/query.rs
//! Query model - a parsed SELECT statement with resolved axes.
//!
//! The model owns one [`AxisTree`] per axis and the MDX text rendered from
//! them. Tree and text change together through [`QueryModel::replace_axis`];
//! nothing else writes either, so `current_mdx()` always describes the trees.

use std::collections::BTreeMap;

use mdx_parser::{parse_statement, AxisName, Slicer};

use crate::catalog::MemberCatalog;
use crate::config::{RenderOptions, TransformOptions};
use crate::error::AxisResult;
use crate::logging::{log_debug, log_info, PARSE};
use crate::resolve::resolve_axis;
use crate::serializer::render_query;
use crate::tree::AxisTree;

#[derive(Debug, Clone)]
pub struct QueryModel {
    cube: String,
    axes: BTreeMap<AxisName, AxisTree>,
    slicer: Option<Slicer>,
    render: RenderOptions,
    mdx: String,
}

impl QueryModel {
    /// Parses `text` and resolves every axis against `catalog`.
    ///
    /// The stored text is re-rendered from the resolved trees, so it uses
    /// full unique names even when `text` used short references.
    pub fn parse<C: MemberCatalog + ?Sized>(
        text: &str,
        catalog: &C,
        options: &TransformOptions,
    ) -> AxisResult<Self> {
        let statement = parse_statement(text)?;

        let mut axes = BTreeMap::new();
        for clause in &statement.axes {
            let tree = resolve_axis(&clause.set, catalog)?;
            log_debug!(PARSE, "axis {} resolved", clause.axis);
            axes.insert(clause.axis, tree);
        }

        let mut model = QueryModel {
            cube: statement.cube,
            axes,
            slicer: statement.slicer,
            render: options.render.clone(),
            mdx: String::new(),
        };
        model.mdx = model.render();
        log_info!(PARSE, "query on [{}] with {} axes", model.cube, model.axes.len());
        Ok(model)
    }

    pub fn cube(&self) -> &str {
        &self.cube
    }

    pub fn slicer(&self) -> Option<&Slicer> {
        self.slicer.as_ref()
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    /// The query text matching the current trees.
    pub fn current_mdx(&self) -> &str {
        &self.mdx
    }

    /// The tree on `axis`, if the query uses that axis.
    pub fn axis_tree(&self, axis: AxisName) -> Option<&AxisTree> {
        self.axes.get(&axis)
    }

    /// Axes in ordinal order.
    pub fn axes(&self) -> impl Iterator<Item = (AxisName, &AxisTree)> {
        self.axes.iter().map(|(axis, tree)| (*axis, tree))
    }

    /// Installs `tree` on `axis` and re-renders the text.
    pub fn replace_axis(&mut self, axis: AxisName, tree: AxisTree) {
        self.axes.insert(axis, tree);
        self.mdx = self.render();
    }

    /// Renders the whole statement from the current trees.
    pub fn render(&self) -> String {
        render_query(self)
    }
}
