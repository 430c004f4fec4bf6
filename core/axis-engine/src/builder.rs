//! FILENAME: core/axis-engine/src/builder.rs
//! Member Set Builder - produces the member lists spliced into an axis.
//!
//! Enumeration always goes through the catalog. The only state kept here is
//! a memo of hierarchical sort keys, which lives as long as the builder (one
//! mutation) and is never shared between calls.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::catalog::{Level, Member, MemberCatalog};
use crate::error::{AxisError, AxisResult};
use crate::tree::Node;

/// Catalog ordinals from the top member down to the member itself.
type HierarchyKey = SmallVec<[usize; 4]>;

/// Drops repeated members (by unique name), keeping the first occurrence.
pub fn dedupe_members<I: IntoIterator<Item = Member>>(members: I) -> Vec<Member> {
    let mut seen = FxHashSet::default();
    members
        .into_iter()
        .filter(|member| seen.insert(member.unique_name.clone()))
        .collect()
}

/// Builds a member-set node. No catalog access.
pub fn build_set_literal<I: IntoIterator<Item = Member>>(members: I) -> Node {
    Node::MemberSet(dedupe_members(members))
}

pub struct MemberSetBuilder<'a, C: MemberCatalog + ?Sized> {
    catalog: &'a C,
    keys: FxHashMap<String, HierarchyKey>,
}

impl<'a, C: MemberCatalog + ?Sized> MemberSetBuilder<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        MemberSetBuilder {
            catalog,
            keys: FxHashMap::default(),
        }
    }

    /// Members of `level` in catalog order, optionally restricted to the
    /// descendants of `ancestor`.
    pub fn members_at_level(
        &self,
        level: &Level,
        ancestor: Option<&Member>,
    ) -> AxisResult<Vec<Member>> {
        Ok(self.catalog.members_of(level, ancestor)?)
    }

    /// Members to add when `selected` is drilled to `level`.
    ///
    /// Anchors are the selected members at the deepest depth above `level`;
    /// every anchor contributes all of its descendants at `level`. When
    /// nothing selected is above `level`, the result is the distinct
    /// ancestors at `level` of the selected members instead.
    pub fn expand_to_level(&self, selected: &[Member], level: &Level) -> AxisResult<Vec<Member>> {
        let anchor_depth = selected
            .iter()
            .map(|member| member.depth)
            .filter(|&depth| depth < level.depth)
            .max();

        let mut expanded = Vec::new();
        match anchor_depth {
            Some(depth) => {
                for anchor in selected.iter().filter(|member| member.depth == depth) {
                    expanded.extend(self.members_at_level(level, Some(anchor))?);
                }
            }
            None => {
                for member in selected {
                    if let Some(ancestor) = self.ancestor_at(member, level.depth)? {
                        expanded.push(ancestor);
                    }
                }
            }
        }
        Ok(dedupe_members(expanded))
    }

    /// Walks parent links up to `depth`. Returns the member itself when it is
    /// already at `depth`, and `None` when it is shallower.
    pub fn ancestor_at(&self, member: &Member, depth: usize) -> AxisResult<Option<Member>> {
        if member.depth < depth {
            return Ok(None);
        }
        let mut current = member.clone();
        while current.depth > depth {
            current = self.parent_of(&current)?;
        }
        Ok(Some(current))
    }

    fn parent_of(&self, member: &Member) -> AxisResult<Member> {
        let parent = member
            .parent
            .as_deref()
            .ok_or_else(|| AxisError::UnknownMember(format!("parent of {}", member.unique_name)))?;
        self.catalog
            .member(parent)?
            .ok_or_else(|| AxisError::UnknownMember(parent.to_string()))
    }

    /// Sorts parent before child, siblings in catalog order.
    pub fn sort_hierarchically(&mut self, members: Vec<Member>) -> AxisResult<Vec<Member>> {
        let mut keyed = Vec::with_capacity(members.len());
        for member in members {
            let key = self.hierarchy_key(&member)?;
            keyed.push((key, member));
        }
        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(keyed.into_iter().map(|(_, member)| member).collect())
    }

    fn hierarchy_key(&mut self, member: &Member) -> AxisResult<HierarchyKey> {
        if let Some(key) = self.keys.get(&member.unique_name) {
            return Ok(key.clone());
        }

        // Climb until a memoized ancestor (or the top) is found.
        let mut chain = vec![member.clone()];
        let mut base = HierarchyKey::new();
        loop {
            let top = &chain[chain.len() - 1];
            if top.parent.is_none() {
                break;
            }
            let parent = self.parent_of(top)?;
            if let Some(key) = self.keys.get(&parent.unique_name) {
                base = key.clone();
                break;
            }
            chain.push(parent);
        }

        for link in chain.iter().rev() {
            base.push(link.ordinal);
            self.keys.insert(link.unique_name.clone(), base.clone());
        }
        Ok(base)
    }
}
