//! FILENAME: core/mdx-parser/src/ast.rs
//! PURPOSE: Syntax tree for the MDX subset used on query axes.
//! CONTEXT: The Parser builds these nodes; the axis engine resolves them
//! against a member catalog. Nothing here knows about hierarchies or levels,
//! a member reference is just its bracketed name segments.
//!
//! SUPPORTED EXPRESSIONS:
//! - Member references: [Product].[All Products].[Drink]
//! - Children: [Product].[Drink].Children
//! - Brace sets of members or tuples: {[A].[x], [A].[y]}, {([A].[x], [B].[y])}
//! - Set functions: CrossJoin, Union, Hierarchize

use std::fmt;

/// A reference to a member by its name segments, e.g. `[Product].[Drink]`.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct MemberPath {
    pub segments: Vec<String>,
}

impl MemberPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemberPath {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The first segment, which names the hierarchy.
    pub fn hierarchy(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "[{}]", segment.replace(']', "]]"))?;
        }
        Ok(())
    }
}

/// Set-valued functions understood on an axis.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SetFunction {
    CrossJoin,
    Union,
    Hierarchize,
}

impl SetFunction {
    /// Looks up a function by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "CROSSJOIN" => Some(SetFunction::CrossJoin),
            "UNION" => Some(SetFunction::Union),
            "HIERARCHIZE" => Some(SetFunction::Hierarchize),
            _ => None,
        }
    }
}

/// One entry inside a brace set.
#[derive(Debug, PartialEq, Clone)]
pub enum SetElement {
    Member(MemberPath),
    Children(MemberPath),
    Tuple(Vec<MemberPath>),
}

/// A set expression placed on an axis.
#[derive(Debug, PartialEq, Clone)]
pub enum SetExpr {
    /// `{ ... }`
    Braced(Vec<SetElement>),
    /// A bare member used as a one-member set.
    Member(MemberPath),
    /// `member.Children`
    Children(MemberPath),
    /// `CrossJoin(a, b)`, `Union(a, b)`, `Hierarchize(a)`
    Call {
        function: SetFunction,
        args: Vec<SetExpr>,
    },
}

/// The query axes, by ordinal.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum AxisName {
    Columns,
    Rows,
    Pages,
    Chapters,
    Sections,
}

impl AxisName {
    pub const ALL: [AxisName; 5] = [
        AxisName::Columns,
        AxisName::Rows,
        AxisName::Pages,
        AxisName::Chapters,
        AxisName::Sections,
    ];

    pub fn from_ordinal(ordinal: u32) -> Option<Self> {
        AxisName::ALL.get(ordinal as usize).copied()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "COLUMNS" => Some(AxisName::Columns),
            "ROWS" => Some(AxisName::Rows),
            "PAGES" => Some(AxisName::Pages),
            "CHAPTERS" => Some(AxisName::Chapters),
            "SECTIONS" => Some(AxisName::Sections),
            _ => None,
        }
    }
}

impl fmt::Display for AxisName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisName::Columns => "COLUMNS",
            AxisName::Rows => "ROWS",
            AxisName::Pages => "PAGES",
            AxisName::Chapters => "CHAPTERS",
            AxisName::Sections => "SECTIONS",
        };
        f.write_str(name)
    }
}

/// `set ON ROWS`
#[derive(Debug, PartialEq, Clone)]
pub struct AxisClause {
    pub set: SetExpr,
    pub axis: AxisName,
}

/// The WHERE clause: a single member or a tuple.
#[derive(Debug, PartialEq, Clone)]
pub enum Slicer {
    Member(MemberPath),
    Tuple(Vec<MemberPath>),
}

impl fmt::Display for Slicer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slicer::Member(member) => write!(f, "{}", member),
            Slicer::Tuple(members) => {
                f.write_str("(")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", member)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A complete `SELECT ... FROM ... [WHERE ...]` statement.
#[derive(Debug, PartialEq, Clone)]
pub struct SelectStatement {
    pub axes: Vec<AxisClause>,
    pub cube: String,
    pub slicer: Option<Slicer>,
}
