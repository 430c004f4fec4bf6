//! FILENAME: core/axis-engine/src/serializer.rs
//! Serializer - writes axis trees and whole statements back to MDX text.
//!
//! Pure functions: the same tree and options always give the same text.
//!
//! Shapes:
//! - MemberSet        -> `{a, b}`
//! - CrossJoin(Call)  -> `CrossJoin(l, r)`
//! - CrossJoin(Tuple) -> `{(a, b)}`
//! - Union(a, b, c)   -> `Union(Union(a, b), c)`
//! - hierarchize flag -> `Hierarchize(...)` around the root

use mdx_parser::{AxisName, MemberPath, Slicer};

use crate::catalog::Member;
use crate::config::{FunctionCase, RenderOptions};
use crate::query::QueryModel;
use crate::tree::{AxisTree, JoinForm, Node, NodeId};

fn function_name(name: &'static str, options: &RenderOptions) -> String {
    match options.function_case {
        FunctionCase::Pascal => name.to_string(),
        FunctionCase::Upper => name.to_ascii_uppercase(),
    }
}

/// Renders one axis expression. An empty axis renders as an empty string.
pub fn render_axis(tree: &AxisTree, options: &RenderOptions) -> String {
    let Some(root) = tree.root() else {
        return String::new();
    };

    let mut out = String::new();
    if tree.hierarchize() {
        out.push_str(&function_name("Hierarchize", options));
        out.push('(');
    }
    render_node(tree, root, options, &mut out);
    if tree.hierarchize() {
        out.push(')');
    }
    out
}

fn render_node(tree: &AxisTree, id: NodeId, options: &RenderOptions, out: &mut String) {
    match tree.node(id) {
        Node::MemberSet(members) => {
            out.push('{');
            push_members(members.iter(), out);
            out.push('}');
        }
        Node::CrossJoin {
            form: JoinForm::Tuple,
            ..
        } => {
            let mut members = Vec::new();
            collect_tuple_members(tree, id, &mut members);
            out.push_str("{(");
            push_members(members.into_iter(), out);
            out.push_str(")}");
        }
        Node::CrossJoin {
            left,
            right,
            form: JoinForm::Call,
        } => {
            out.push_str(&function_name("CrossJoin", options));
            out.push('(');
            render_node(tree, *left, options, out);
            out.push_str(", ");
            render_node(tree, *right, options, out);
            out.push(')');
        }
        Node::Union(branches) => {
            let Some((first, rest)) = branches.split_first() else {
                out.push_str("{}");
                return;
            };
            let union = function_name("Union", options);
            for _ in rest {
                out.push_str(&union);
                out.push('(');
            }
            render_node(tree, *first, options, out);
            for branch in rest {
                out.push_str(", ");
                render_node(tree, *branch, options, out);
                out.push(')');
            }
        }
    }
}

fn push_members<'a, I: Iterator<Item = &'a Member>>(members: I, out: &mut String) {
    for (i, member) in members.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&member.unique_name);
    }
}

/// Flattens a tuple-form join into its members, left to right.
fn collect_tuple_members<'a>(tree: &'a AxisTree, id: NodeId, out: &mut Vec<&'a Member>) {
    match tree.node(id) {
        Node::MemberSet(members) => out.extend(members.iter()),
        Node::CrossJoin { left, right, .. } => {
            collect_tuple_members(tree, *left, out);
            collect_tuple_members(tree, *right, out);
        }
        Node::Union(branches) => {
            for branch in branches {
                collect_tuple_members(tree, *branch, out);
            }
        }
    }
}

/// Renders `SELECT ... FROM [cube] [WHERE ...]`. Empty axes are skipped.
pub fn render_statement<'a, I>(
    axes: I,
    cube: &str,
    slicer: Option<&Slicer>,
    options: &RenderOptions,
) -> String
where
    I: IntoIterator<Item = (AxisName, &'a AxisTree)>,
{
    let clauses: Vec<String> = axes
        .into_iter()
        .filter(|(_, tree)| !tree.is_empty())
        .map(|(axis, tree)| format!("{} ON {}", render_axis(tree, options), axis))
        .collect();

    let mut out = format!(
        "SELECT {} FROM {}",
        clauses.join(", "),
        MemberPath::new([cube])
    );
    if let Some(slicer) = slicer {
        out.push_str(" WHERE ");
        out.push_str(&slicer.to_string());
    }
    out
}

/// Renders a whole query from its model, axes in ordinal order.
pub fn render_query(model: &QueryModel) -> String {
    render_statement(
        model.axes(),
        model.cube(),
        model.slicer(),
        model.render_options(),
    )
}
