//! FILENAME: core/mdx-parser/src/lib.rs
//! PURPOSE: Library root for the MDX subset parser.
//! CONTEXT: This crate exposes the lexer, parser and syntax tree needed to
//! read the axis clauses the axis engine writes. It knows nothing about the
//! member catalog; resolution happens in `axis-engine`.
//!
//! PIPELINE: MDX String --> Lexer --> Tokens --> Parser --> SelectStatement / SetExpr
//!
//! SUPPORTED FEATURES:
//! - SELECT ... ON COLUMNS/ROWS/PAGES/CHAPTERS/SECTIONS/AXIS(n) FROM [Cube] WHERE ...
//! - Member references with bracketed segments and `]]` escapes
//! - `member.Children`
//! - Brace sets of members or tuples
//! - CrossJoin, Union, Hierarchize

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;


// Re-export commonly used types for convenience
pub use ast::{
    AxisClause, AxisName, MemberPath, SelectStatement, SetElement, SetExpr, SetFunction, Slicer,
};
pub use lexer::Lexer;
pub use parser::{parse_set, parse_statement, ParseError, ParseResult, Parser};
pub use token::Token;
