//! FILENAME: core/axis-engine/src/error.rs

use thiserror::Error;

/// Failures reported by a member catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown hierarchy: {0}")]
    UnknownHierarchy(String),

    #[error("Unknown level: {0}")]
    UnknownLevel(String),
}

#[derive(Error, Debug)]
pub enum AxisError {
    #[error("Hierarchy {0} is not on the axis")]
    HierarchyNotFoundOnAxis(String),

    #[error("Level {0} is not visible on the axis")]
    LevelNotFound(String),

    #[error("Invalid position {position}: the axis holds {hierarchy_count} hierarchies")]
    InvalidPosition {
        position: isize,
        hierarchy_count: usize,
    },

    #[error("An axis needs at least one level")]
    EmptyAxis,

    #[error(transparent)]
    CatalogUnavailable(#[from] CatalogError),

    #[error(transparent)]
    Parse(#[from] mdx_parser::ParseError),

    #[error("Unknown member: {0}")]
    UnknownMember(String),

    #[error("Malformed set: {0}")]
    MalformedSet(String),

    #[error("Invalid options: {0}")]
    Config(#[from] serde_json::Error),
}

pub type AxisResult<T> = Result<T, AxisError>;
