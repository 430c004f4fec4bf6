//! FILENAME: core/axis-engine/src/catalog.rs
//! Member catalog: the read-only view of hierarchies, levels and members.
//!
//! The engine never owns metadata. Everything it knows about a cube comes
//! through [`MemberCatalog`], which may be backed by a remote server. Every
//! call can fail with a [`CatalogError`]; the engine does not retry and does
//! not cache results between operations.
//!
//! [`InMemoryCatalog`] is a complete implementation over in-process tables,
//! used for embedding, tests and benches.

use mdx_parser::{parse_set, MemberPath, SetExpr};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

// ============================================================================
// METADATA TYPES
// ============================================================================

/// One depth within a hierarchy. Depth 0 is the top ("All") level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Level {
    /// Name of the owning hierarchy, without brackets.
    pub hierarchy: String,

    /// Level name, e.g. "Product Family" or "(All)".
    pub name: String,

    /// Ordinal position within the hierarchy.
    pub depth: usize,
}

impl Level {
    /// `[Product].[Product Family]`
    pub fn unique_name(&self) -> String {
        MemberPath::new([self.hierarchy.as_str(), self.name.as_str()]).to_string()
    }
}

/// A catalog member. Identity is the unique name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    /// Full ancestor-chain name: `[Product].[All Products].[Drink]`.
    pub unique_name: String,

    /// Caption segment: `Drink`.
    pub name: String,

    /// Name of the owning hierarchy, without brackets.
    pub hierarchy: String,

    /// Depth of the member's level.
    pub depth: usize,

    /// Catalog-natural position within its level.
    pub ordinal: usize,

    /// Unique name of the parent member, `None` at depth 0.
    pub parent: Option<String>,
}

// ============================================================================
// CATALOG TRAIT
// ============================================================================

/// Read-only access to cube metadata.
pub trait MemberCatalog {
    /// Levels of a hierarchy, ordered by depth.
    fn levels_of(&self, hierarchy: &str) -> Result<Vec<Level>, CatalogError>;

    /// Members of `level` in catalog order. With an ancestor, only that
    /// ancestor's descendants at `level`.
    fn members_of(
        &self,
        level: &Level,
        ancestor: Option<&Member>,
    ) -> Result<Vec<Member>, CatalogError>;

    /// Whether the level takes part in visible-level reports.
    fn is_visible(&self, level: &Level) -> bool;

    /// Looks up a member by unique name.
    fn member(&self, unique_name: &str) -> Result<Option<Member>, CatalogError>;

    /// Finds a level of a hierarchy by name.
    fn level(&self, hierarchy: &str, name: &str) -> Result<Level, CatalogError> {
        self.levels_of(hierarchy)?
            .into_iter()
            .find(|level| level.name == name)
            .ok_or_else(|| CatalogError::UnknownLevel(format!("[{}].[{}]", hierarchy, name)))
    }
}

// ============================================================================
// IN-MEMORY CATALOG
// ============================================================================

#[derive(Debug, Clone)]
struct LevelEntry {
    name: String,
    visible: bool,
    /// Unique names in catalog order.
    members: Vec<String>,
}

#[derive(Debug, Clone)]
struct HierarchyEntry {
    name: String,
    levels: Vec<LevelEntry>,
}

/// A catalog held entirely in memory.
///
/// Members must be added parents first, and within a level in the order the
/// catalog should enumerate them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    hierarchies: Vec<HierarchyEntry>,
    members: FxHashMap<String, Member>,
    /// When set, every fallible call fails with `Unavailable`.
    outage: Option<String>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a hierarchy and its levels, top level first.
    pub fn add_hierarchy(&mut self, name: &str, levels: &[&str]) -> &mut Self {
        self.hierarchies.push(HierarchyEntry {
            name: name.to_string(),
            levels: levels
                .iter()
                .map(|level| LevelEntry {
                    name: level.to_string(),
                    visible: true,
                    members: Vec::new(),
                })
                .collect(),
        });
        self
    }

    /// Marks a level visible or hidden.
    pub fn set_level_visible(
        &mut self,
        hierarchy: &str,
        level: &str,
        visible: bool,
    ) -> Result<(), CatalogError> {
        let entry = self
            .hierarchy_entry_mut(hierarchy)?
            .levels
            .iter_mut()
            .find(|entry| entry.name == level)
            .ok_or_else(|| CatalogError::UnknownLevel(format!("[{}].[{}]", hierarchy, level)))?;
        entry.visible = visible;
        Ok(())
    }

    /// Adds a member under `parent` (a unique name), or at the top level when
    /// `parent` is `None`. Returns the new member's unique name.
    pub fn add_member(
        &mut self,
        hierarchy: &str,
        parent: Option<&str>,
        name: &str,
    ) -> Result<String, CatalogError> {
        let (depth, unique_name) = match parent {
            Some(parent_name) => {
                let parent_member = self.members.get(parent_name).ok_or_else(|| {
                    CatalogError::UnknownLevel(format!("parent {} is not in the catalog", parent_name))
                })?;
                let escaped = MemberPath::new([name]).to_string();
                (parent_member.depth + 1, format!("{}.{}", parent_name, escaped))
            }
            None => (0, MemberPath::new([hierarchy, name]).to_string()),
        };

        let level = self
            .hierarchy_entry_mut(hierarchy)?
            .levels
            .get_mut(depth)
            .ok_or_else(|| {
                CatalogError::UnknownLevel(format!("[{}] has no level at depth {}", hierarchy, depth))
            })?;
        let ordinal = level.members.len();
        level.members.push(unique_name.clone());

        self.members.insert(
            unique_name.clone(),
            Member {
                unique_name: unique_name.clone(),
                name: name.to_string(),
                hierarchy: hierarchy.to_string(),
                depth,
                ordinal,
                parent: parent.map(str::to_string),
            },
        );
        Ok(unique_name)
    }

    /// Returns a copy whose every lookup fails, for simulating a lost connection.
    pub fn with_outage(mut self, reason: &str) -> Self {
        self.outage = Some(reason.to_string());
        self
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        match &self.outage {
            Some(reason) => Err(CatalogError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn hierarchy_entry(&self, name: &str) -> Result<&HierarchyEntry, CatalogError> {
        self.hierarchies
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| CatalogError::UnknownHierarchy(name.to_string()))
    }

    fn hierarchy_entry_mut(&mut self, name: &str) -> Result<&mut HierarchyEntry, CatalogError> {
        self.hierarchies
            .iter_mut()
            .find(|entry| entry.name == name)
            .ok_or_else(|| CatalogError::UnknownHierarchy(name.to_string()))
    }

    fn is_descendant_of(&self, member: &Member, ancestor: &str) -> bool {
        let mut parent = member.parent.as_deref();
        while let Some(name) = parent {
            if name == ancestor {
                return true;
            }
            parent = self.members.get(name).and_then(|m| m.parent.as_deref());
        }
        false
    }

    /// Short references such as `[Product].[Drink]` omit the single top
    /// member. Rewrites them to the full unique name.
    fn expand_short_name(&self, unique_name: &str) -> Option<String> {
        let path = match parse_set(unique_name) {
            Ok(SetExpr::Member(path)) => path,
            _ => return None,
        };
        let hierarchy = self.hierarchy_entry(path.hierarchy()?).ok()?;
        let top = hierarchy.levels.first()?;
        if top.members.len() != 1 {
            return None;
        }
        let all_member = self.members.get(&top.members[0])?;
        if path.segments.get(1) == Some(&all_member.name) {
            return None;
        }

        let mut segments = path.segments.clone();
        segments.insert(1, all_member.name.clone());
        Some(MemberPath { segments }.to_string())
    }
}

impl MemberCatalog for InMemoryCatalog {
    fn levels_of(&self, hierarchy: &str) -> Result<Vec<Level>, CatalogError> {
        self.check_available()?;
        let entry = self.hierarchy_entry(hierarchy)?;
        Ok(entry
            .levels
            .iter()
            .enumerate()
            .map(|(depth, level)| Level {
                hierarchy: entry.name.clone(),
                name: level.name.clone(),
                depth,
            })
            .collect())
    }

    fn members_of(
        &self,
        level: &Level,
        ancestor: Option<&Member>,
    ) -> Result<Vec<Member>, CatalogError> {
        self.check_available()?;
        let entry = self
            .hierarchy_entry(&level.hierarchy)?
            .levels
            .get(level.depth)
            .ok_or_else(|| CatalogError::UnknownLevel(level.unique_name()))?;

        let members = entry
            .members
            .iter()
            .filter_map(|name| self.members.get(name))
            .filter(|member| match ancestor {
                Some(ancestor) => self.is_descendant_of(member, &ancestor.unique_name),
                None => true,
            })
            .cloned()
            .collect();
        Ok(members)
    }

    fn is_visible(&self, level: &Level) -> bool {
        self.hierarchy_entry(&level.hierarchy)
            .ok()
            .and_then(|entry| entry.levels.get(level.depth))
            .map(|entry| entry.visible)
            .unwrap_or(false)
    }

    fn member(&self, unique_name: &str) -> Result<Option<Member>, CatalogError> {
        self.check_available()?;
        if let Some(member) = self.members.get(unique_name) {
            return Ok(Some(member.clone()));
        }
        Ok(self
            .expand_short_name(unique_name)
            .and_then(|full| self.members.get(&full).cloned()))
    }
}
