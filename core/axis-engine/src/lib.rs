//! FILENAME: core/axis-engine/src/lib.rs
//! Axis level placement for MDX queries.
//!
//! Adds, removes and reorders hierarchy levels on the axes of a
//! `SELECT ... FROM` statement and writes the result back as MDX text. All
//! cube metadata comes from a [`MemberCatalog`] supplied by the host.
//!
//! Layers:
//! - `catalog`: Metadata types and the catalog adapter (WHERE members come from)
//! - `tree`, `resolve`: The axis expression and how text becomes one
//! - `analyzer`, `builder`, `mutator`: Reading and rewriting an axis (HOW levels move)
//! - `serializer`, `query`: Text output and the statement it belongs to
//! - `transform`: The `PlaceLevelsOnAxes` entry point

mod logging;

pub mod analyzer;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod mutator;
pub mod query;
pub mod resolve;
pub mod serializer;
pub mod transform;
pub mod tree;

pub use analyzer::{find_visible_levels, find_visible_levels_in_hierarchy};
pub use builder::{build_set_literal, MemberSetBuilder};
pub use catalog::{InMemoryCatalog, Level, Member, MemberCatalog};
pub use config::{FunctionCase, HierarchizeMode, RenderOptions, TransformOptions};
pub use error::{AxisError, AxisResult, CatalogError};
pub use mutator::{selection_snapshot, HierarchySelection, LevelPositionMutator};
pub use query::QueryModel;
pub use resolve::resolve_axis;
pub use serializer::{render_axis, render_query, render_statement};
pub use transform::PlaceLevelsOnAxes;
pub use tree::{AxisTree, JoinForm, Node, NodeId};

pub use mdx_parser::AxisName;
