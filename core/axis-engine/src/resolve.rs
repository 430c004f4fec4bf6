//! FILENAME: core/axis-engine/src/resolve.rs
//! Turns a parsed set expression into an axis tree.
//!
//! Member references and `.Children` are looked up in the catalog here, so
//! everything after this point works with catalog members only.

use mdx_parser::{MemberPath, SetElement, SetExpr, SetFunction};

use crate::builder::{dedupe_members, MemberSetBuilder};
use crate::catalog::{Member, MemberCatalog};
use crate::error::{AxisError, AxisResult};
use crate::logging::{log_debug, PARSE};
use crate::tree::{AxisTree, NodeId};

/// Resolves `expr` into a fresh tree. A top-level `Hierarchize` becomes the
/// tree's flag; nested ones are dropped as transparent.
pub fn resolve_axis<C: MemberCatalog + ?Sized>(
    expr: &SetExpr,
    catalog: &C,
) -> AxisResult<AxisTree> {
    let mut tree = AxisTree::empty();

    let mut body = expr;
    if let SetExpr::Call {
        function: SetFunction::Hierarchize,
        args,
    } = expr
    {
        tree.set_hierarchize(true);
        body = single_argument(args)?;
    }

    let mut resolver = Resolver {
        catalog,
        tree: &mut tree,
    };
    let root = resolver.resolve(body)?;
    tree.set_root(Some(root));
    log_debug!(PARSE, "resolved axis into {} nodes", tree.arena_len());
    Ok(tree)
}

struct Resolver<'a, C: MemberCatalog + ?Sized> {
    catalog: &'a C,
    tree: &'a mut AxisTree,
}

impl<C: MemberCatalog + ?Sized> Resolver<'_, C> {
    fn resolve(&mut self, expr: &SetExpr) -> AxisResult<NodeId> {
        match expr {
            SetExpr::Member(path) => {
                let member = self.lookup(path)?;
                Ok(self.tree.member_set(vec![member]))
            }
            SetExpr::Children(path) => {
                let children = self.children(path)?;
                Ok(self.tree.member_set(children))
            }
            SetExpr::Braced(elements) => self.resolve_braced(elements),
            SetExpr::Call { function, args } => self.resolve_call(*function, args),
        }
    }

    fn resolve_call(&mut self, function: SetFunction, args: &[SetExpr]) -> AxisResult<NodeId> {
        match function {
            SetFunction::Hierarchize => self.resolve(single_argument(args)?),
            SetFunction::CrossJoin => {
                let mut operands = Vec::with_capacity(args.len());
                for (index, arg) in args.iter().enumerate() {
                    let operand = self.resolve(arg)?;
                    if self.tree.selects_nothing(operand) {
                        return Err(AxisError::MalformedSet(format!(
                            "CrossJoin operand {} selects no members",
                            index + 1
                        )));
                    }
                    operands.push(operand);
                }
                self.tree
                    .cross_join_chain(&operands)
                    .ok_or_else(|| AxisError::MalformedSet("CrossJoin without operands".to_string()))
            }
            SetFunction::Union => {
                let mut branches = Vec::with_capacity(args.len());
                for arg in args {
                    branches.push(self.resolve(arg)?);
                }
                Ok(self.tree.union(branches))
            }
        }
    }

    fn resolve_braced(&mut self, elements: &[SetElement]) -> AxisResult<NodeId> {
        let tuple_count = elements
            .iter()
            .filter(|element| matches!(element, SetElement::Tuple(_)))
            .count();

        if tuple_count == 0 {
            let mut members = Vec::new();
            for element in elements {
                match element {
                    SetElement::Member(path) => members.push(self.lookup(path)?),
                    SetElement::Children(path) => members.extend(self.children(path)?),
                    SetElement::Tuple(_) => {}
                }
            }
            let members = dedupe_members(members);
            check_single_hierarchy(&members)?;
            return Ok(self.tree.member_set(members));
        }

        if tuple_count != elements.len() {
            return Err(AxisError::MalformedSet(
                "members and tuples mixed in one set".to_string(),
            ));
        }

        let mut branches = Vec::with_capacity(elements.len());
        for element in elements {
            if let SetElement::Tuple(paths) = element {
                branches.push(self.resolve_tuple(paths)?);
            }
        }
        match branches.as_slice() {
            [single] => Ok(*single),
            _ => Ok(self.tree.union(branches)),
        }
    }

    /// `(a, b, c)` becomes a right-nested tuple-form join of one-member sets.
    fn resolve_tuple(&mut self, paths: &[MemberPath]) -> AxisResult<NodeId> {
        let mut operands = Vec::with_capacity(paths.len());
        let mut hierarchies = Vec::with_capacity(paths.len());
        for path in paths {
            let member = self.lookup(path)?;
            if hierarchies.contains(&member.hierarchy) {
                return Err(AxisError::MalformedSet(format!(
                    "hierarchy {} appears twice in a tuple",
                    member.hierarchy
                )));
            }
            hierarchies.push(member.hierarchy.clone());
            operands.push(self.tree.member_set(vec![member]));
        }

        let (&last, rest) = operands
            .split_last()
            .ok_or_else(|| AxisError::MalformedSet("empty tuple".to_string()))?;
        Ok(rest
            .iter()
            .rev()
            .fold(last, |right, &left| self.tree.tuple_join(left, right)))
    }

    fn lookup(&self, path: &MemberPath) -> AxisResult<Member> {
        let name = path.to_string();
        self.catalog
            .member(&name)?
            .ok_or(AxisError::UnknownMember(name))
    }

    fn children(&self, path: &MemberPath) -> AxisResult<Vec<Member>> {
        let parent = self.lookup(path)?;
        let levels = self.catalog.levels_of(&parent.hierarchy)?;
        match levels.get(parent.depth + 1) {
            Some(child_level) => {
                MemberSetBuilder::new(self.catalog).members_at_level(child_level, Some(&parent))
            }
            None => Ok(Vec::new()),
        }
    }
}

fn single_argument(args: &[SetExpr]) -> AxisResult<&SetExpr> {
    match args {
        [only] => Ok(only),
        _ => Err(AxisError::MalformedSet(format!(
            "Hierarchize takes one set, found {}",
            args.len()
        ))),
    }
}

fn check_single_hierarchy(members: &[Member]) -> AxisResult<()> {
    if let Some(first) = members.first() {
        if let Some(other) = members.iter().find(|m| m.hierarchy != first.hierarchy) {
            return Err(AxisError::MalformedSet(format!(
                "set mixes hierarchies {} and {}",
                first.hierarchy, other.hierarchy
            )));
        }
    }
    Ok(())
}
