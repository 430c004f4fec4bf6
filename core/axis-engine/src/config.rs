//! FILENAME: core/axis-engine/src/config.rs
//! Options controlling how mutated axes are written back.
//!
//! These are plain serde structs with defaults so a host can keep them in
//! its own settings file and hand over the JSON.

use serde::{Deserialize, Serialize};

use crate::error::AxisResult;

/// What to do with the Hierarchize wrapper when an axis is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HierarchizeMode {
    /// Keep the wrapper if the axis had it.
    #[default]
    Preserve,
    /// Always wrap.
    Always,
    /// Never wrap.
    Never,
}

impl HierarchizeMode {
    /// The flag a rewritten axis should carry, given the previous one.
    pub fn apply(self, previous: bool) -> bool {
        match self {
            HierarchizeMode::Preserve => previous,
            HierarchizeMode::Always => true,
            HierarchizeMode::Never => false,
        }
    }
}

/// Casing of set function names in generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FunctionCase {
    /// `CrossJoin`, `Union`, `Hierarchize`
    #[default]
    Pascal,
    /// `CROSSJOIN`, `UNION`, `HIERARCHIZE`
    Upper,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default)]
    pub function_case: FunctionCase,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformOptions {
    #[serde(default)]
    pub hierarchize: HierarchizeMode,

    #[serde(default)]
    pub render: RenderOptions,
}

impl TransformOptions {
    /// Reads options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> AxisResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
