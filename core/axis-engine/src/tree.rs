//! FILENAME: core/axis-engine/src/tree.rs
//! Axis Expression Tree - the set algebra placed on one query axis.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Mutations
//! never patch a node in place; they build a fresh tree (see `mutator`),
//! so a subtree shared between union branches can't be changed behind
//! another branch's back.
//!
//! The Hierarchize wrapper is not a node. It is the `hierarchize` flag on
//! the tree, applied by the serializer around the root.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::catalog::Member;

/// Index of a node inside its tree's arena.
pub type NodeId = usize;

/// How a CrossJoin is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinForm {
    /// `CrossJoin(left, right)`
    Call,
    /// `{(a, b)}` - an exact single-member selection per hierarchy.
    Tuple,
}

/// A node of the axis expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Ordered members of a single hierarchy.
    MemberSet(Vec<Member>),

    /// Cartesian composition of two subtrees.
    CrossJoin {
        left: NodeId,
        right: NodeId,
        form: JoinForm,
    },

    /// Union of same-shaped branches, in order.
    Union(SmallVec<[NodeId; 2]>),
}

/// One axis's expression: an arena plus its root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    hierarchize: bool,
}

impl AxisTree {
    /// An axis with no expression.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    pub fn hierarchize(&self) -> bool {
        self.hierarchize
    }

    pub fn set_hierarchize(&mut self, hierarchize: bool) {
        self.hierarchize = hierarchize;
    }

    /// Returns the node for `id`.
    ///
    /// Ids are only ever produced by this tree's own constructors, so an
    /// out-of-range id is a programming error.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Number of nodes in the arena, reachable or not.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Appends a node to the arena and returns its id.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn member_set(&mut self, members: Vec<Member>) -> NodeId {
        self.add_node(Node::MemberSet(members))
    }

    pub fn cross_join(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.add_node(Node::CrossJoin {
            left,
            right,
            form: JoinForm::Call,
        })
    }

    pub fn tuple_join(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.add_node(Node::CrossJoin {
            left,
            right,
            form: JoinForm::Tuple,
        })
    }

    pub fn union<I: IntoIterator<Item = NodeId>>(&mut self, branches: I) -> NodeId {
        self.add_node(Node::Union(branches.into_iter().collect()))
    }

    /// Joins operands into a right-nested CrossJoin chain:
    /// `[a, b, c]` becomes `CrossJoin(a, CrossJoin(b, c))`.
    pub fn cross_join_chain(&mut self, operands: &[NodeId]) -> Option<NodeId> {
        let (&last, rest) = operands.split_last()?;
        Some(
            rest.iter()
                .rev()
                .fold(last, |right, &left| self.cross_join(left, right)),
        )
    }

    /// Hierarchy names in left-to-right order of first appearance.
    pub fn hierarchies(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        self.visit_member_sets(|members| {
            for member in members {
                if seen.insert(member.hierarchy.as_str()) {
                    order.push(member.hierarchy.clone());
                }
            }
        });
        order
    }

    /// Distinct members of one hierarchy, first-seen order.
    pub fn members_of(&self, hierarchy: &str) -> Vec<Member> {
        let mut seen = FxHashSet::default();
        let mut members = Vec::new();
        self.visit_member_sets(|set| {
            for member in set.iter().filter(|m| m.hierarchy == hierarchy) {
                if seen.insert(member.unique_name.as_str()) {
                    members.push(member.clone());
                }
            }
        });
        members
    }

    /// Calls `f` for every member set reachable from the root, in order:
    /// CrossJoin left before right, Union branches first to last.
    pub fn visit_member_sets<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a [Member]),
    {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            match &self.nodes[id] {
                Node::MemberSet(members) => f(members),
                Node::CrossJoin { left, right, .. } => {
                    stack.push(*right);
                    stack.push(*left);
                }
                Node::Union(branches) => stack.extend(branches.iter().rev().copied()),
            }
        }
    }

    /// Whether the subtree at `id` selects no members at all.
    pub fn selects_nothing(&self, id: NodeId) -> bool {
        match &self.nodes[id] {
            Node::MemberSet(members) => members.is_empty(),
            Node::CrossJoin { left, right, .. } => {
                self.selects_nothing(*left) || self.selects_nothing(*right)
            }
            Node::Union(branches) => branches.iter().all(|&branch| self.selects_nothing(branch)),
        }
    }
}
