//! FILENAME: core/mdx-parser/src/parser.rs
//! PURPOSE: Recursive descent parser that converts a stream of Tokens into a syntax tree.
//! CONTEXT: Second stage of the parsing pipeline. Only the statement shape the
//! axis engine emits is accepted; anything else is a ParseError.
//!
//! GRAMMAR (keywords case-insensitive):
//!   statement  --> SELECT axis ("," axis)* FROM BRACKETED [WHERE slicer]
//!   axis       --> set_expr ON axis_name
//!   axis_name  --> COLUMNS | ROWS | PAGES | CHAPTERS | SECTIONS | AXIS "(" NUMBER ")"
//!   set_expr   --> call | braced | member [".Children"]
//!   call       --> IDENTIFIER "(" set_expr ("," set_expr)* ")"
//!   braced     --> "{" [element ("," element)*] "}"
//!   element    --> member [".Children"] | tuple
//!   tuple      --> "(" member ("," member)* ")"
//!   slicer     --> member | tuple
//!   member     --> BRACKETED ("." BRACKETED)*

use crate::ast::{
    AxisClause, AxisName, MemberPath, SelectStatement, SetElement, SetExpr, SetFunction, Slicer,
};
use crate::lexer::Lexer;
use crate::token::Token;
use thiserror::Error;

/// Parser errors with descriptive messages.
#[derive(Debug, PartialEq, Clone, Error)]
#[error("Parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// A member reference optionally followed by `.Children`.
enum MemberOrChildren {
    Member(MemberPath),
    Children(MemberPath),
}

/// The Parser struct holds the lexer and current token state.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser from an input string.
    /// Automatically advances to the first token.
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
        }
    }

    /// Parses a complete SELECT statement.
    pub fn parse_statement(&mut self) -> ParseResult<SelectStatement> {
        self.expect_keyword("SELECT")?;

        let mut axes = Vec::new();
        loop {
            let set = self.parse_set_expr()?;
            self.expect_keyword("ON")?;
            let axis = self.parse_axis_name()?;
            if axes.iter().any(|clause: &AxisClause| clause.axis == axis) {
                return Err(ParseError::new(format!("Duplicate axis {}", axis)));
            }
            axes.push(AxisClause { set, axis });

            if self.current_token == Token::Comma {
                self.advance();
            } else {
                break;
            }
        }

        self.expect_keyword("FROM")?;
        let cube = match self.current_token.clone() {
            Token::Bracketed(name) => {
                self.advance();
                name
            }
            other => {
                return Err(ParseError::new(format!("Expected cube name, found {:?}", other)));
            }
        };

        let slicer = if self.current_token.is_keyword("WHERE") {
            self.advance();
            Some(self.parse_slicer()?)
        } else {
            None
        };

        self.expect_eof()?;

        Ok(SelectStatement { axes, cube, slicer })
    }

    /// Parses a standalone set expression (one axis clause body).
    pub fn parse_set(&mut self) -> ParseResult<SetExpr> {
        if self.current_token == Token::EOF {
            return Err(ParseError::new("Empty expression"));
        }
        let set = self.parse_set_expr()?;
        self.expect_eof()?;
        Ok(set)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    /// Checks if the current token matches the expected token.
    /// If it matches, advances and returns Ok. Otherwise returns an error.
    fn expect(&mut self, expected: Token) -> ParseResult<()> {
        if self.current_token == expected {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(format!(
                "Expected {:?}, found {:?}",
                expected, self.current_token
            )))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<()> {
        if self.current_token.is_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(format!(
                "Expected {}, found {:?}",
                keyword, self.current_token
            )))
        }
    }

    fn expect_eof(&self) -> ParseResult<()> {
        if self.current_token == Token::EOF {
            Ok(())
        } else {
            Err(ParseError::new(format!(
                "Unexpected token after expression: {:?}",
                self.current_token
            )))
        }
    }

    fn parse_axis_name(&mut self) -> ParseResult<AxisName> {
        let word = match &self.current_token {
            Token::Identifier(word) => word.clone(),
            other => {
                return Err(ParseError::new(format!("Expected axis name, found {:?}", other)));
            }
        };
        self.advance();

        if word.eq_ignore_ascii_case("AXIS") {
            self.expect(Token::LParen)?;
            let ordinal = match &self.current_token {
                Token::Number(n) => *n,
                other => {
                    return Err(ParseError::new(format!(
                        "Expected axis ordinal, found {:?}",
                        other
                    )));
                }
            };
            self.advance();
            self.expect(Token::RParen)?;
            return AxisName::from_ordinal(ordinal)
                .ok_or_else(|| ParseError::new(format!("Unsupported axis ordinal {}", ordinal)));
        }

        AxisName::from_name(&word).ok_or_else(|| ParseError::new(format!("Unknown axis {}", word)))
    }

    fn parse_set_expr(&mut self) -> ParseResult<SetExpr> {
        match self.current_token.clone() {
            Token::Identifier(name) => self.parse_call(&name),
            Token::LBrace => self.parse_braced(),
            Token::Bracketed(_) => match self.parse_member_or_children()? {
                MemberOrChildren::Member(path) => Ok(SetExpr::Member(path)),
                MemberOrChildren::Children(path) => Ok(SetExpr::Children(path)),
            },
            other => Err(ParseError::new(format!(
                "Expected set expression, found {:?}",
                other
            ))),
        }
    }

    /// Parses `Function(arg, ...)`. The current token is the function name.
    fn parse_call(&mut self, name: &str) -> ParseResult<SetExpr> {
        let function = SetFunction::from_name(name)
            .ok_or_else(|| ParseError::new(format!("Unsupported function {}", name)))?;
        self.advance();
        self.expect(Token::LParen)?;

        let mut args = vec![self.parse_set_expr()?];
        while self.current_token == Token::Comma {
            self.advance();
            args.push(self.parse_set_expr()?);
        }
        self.expect(Token::RParen)?;

        let arity_ok = match function {
            SetFunction::Hierarchize => args.len() == 1,
            SetFunction::CrossJoin | SetFunction::Union => args.len() >= 2,
        };
        if !arity_ok {
            return Err(ParseError::new(format!(
                "Wrong number of arguments for {:?}: {}",
                function,
                args.len()
            )));
        }

        Ok(SetExpr::Call { function, args })
    }

    fn parse_braced(&mut self) -> ParseResult<SetExpr> {
        self.expect(Token::LBrace)?;

        let mut elements = Vec::new();
        if self.current_token == Token::RBrace {
            self.advance();
            return Ok(SetExpr::Braced(elements));
        }

        loop {
            let element = if self.current_token == Token::LParen {
                SetElement::Tuple(self.parse_tuple()?)
            } else {
                match self.parse_member_or_children()? {
                    MemberOrChildren::Member(path) => SetElement::Member(path),
                    MemberOrChildren::Children(path) => SetElement::Children(path),
                }
            };
            elements.push(element);

            if self.current_token == Token::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(Token::RBrace)?;

        Ok(SetExpr::Braced(elements))
    }

    fn parse_tuple(&mut self) -> ParseResult<Vec<MemberPath>> {
        self.expect(Token::LParen)?;
        let mut members = vec![self.parse_member()?];
        while self.current_token == Token::Comma {
            self.advance();
            members.push(self.parse_member()?);
        }
        self.expect(Token::RParen)?;
        Ok(members)
    }

    fn parse_slicer(&mut self) -> ParseResult<Slicer> {
        if self.current_token == Token::LParen {
            Ok(Slicer::Tuple(self.parse_tuple()?))
        } else {
            Ok(Slicer::Member(self.parse_member()?))
        }
    }

    /// Parses a member reference that must not be followed by `.Children`.
    fn parse_member(&mut self) -> ParseResult<MemberPath> {
        match self.parse_member_or_children()? {
            MemberOrChildren::Member(path) => Ok(path),
            MemberOrChildren::Children(path) => Err(ParseError::new(format!(
                "{}.Children is not allowed here",
                path
            ))),
        }
    }

    fn parse_member_or_children(&mut self) -> ParseResult<MemberOrChildren> {
        let mut segments = match self.current_token.clone() {
            Token::Bracketed(name) => vec![name],
            other => {
                return Err(ParseError::new(format!(
                    "Expected member reference, found {:?}",
                    other
                )));
            }
        };
        self.advance();

        while self.current_token == Token::Dot {
            self.advance();
            match self.current_token.clone() {
                Token::Bracketed(name) => {
                    segments.push(name);
                    self.advance();
                }
                token if token.is_keyword("Children") => {
                    self.advance();
                    return Ok(MemberOrChildren::Children(MemberPath { segments }));
                }
                other => {
                    return Err(ParseError::new(format!(
                        "Expected name segment or Children, found {:?}",
                        other
                    )));
                }
            }
        }

        Ok(MemberOrChildren::Member(MemberPath { segments }))
    }
}

/// Parses a full MDX statement.
pub fn parse_statement(input: &str) -> ParseResult<SelectStatement> {
    Parser::new(input).parse_statement()
}

/// Parses a single set expression.
pub fn parse_set(input: &str) -> ParseResult<SetExpr> {
    Parser::new(input).parse_set()
}
