//! FILENAME: core/mdx-parser/src/token.rs
//! PURPOSE: Token definitions for the MDX lexer.
//! CONTEXT: Tokens are the atomic units produced by the lexer and consumed by the parser.

/// Tokens recognized by the MDX lexer.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    /// Bare word: keywords (SELECT, ON, FROM), function names, `Children`.
    /// Kept in its original casing; the parser compares case-insensitively.
    Identifier(String),
    /// Bracketed name segment: [All Products]. Stored without the brackets,
    /// with `]]` already unescaped to `]`.
    Bracketed(String),
    /// Unsigned integer, used by AXIS(n).
    Number(u32),

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Dot,

    // Special
    EOF,
    Illegal(char),
}

impl Token {
    /// True when this is an identifier equal to `keyword`, ignoring case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Identifier(word) if word.eq_ignore_ascii_case(keyword))
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Identifier(s) => write!(f, "{}", s),
            Token::Bracketed(s) => write!(f, "[{}]", s.replace(']', "]]")),
            Token::Number(n) => write!(f, "{}", n),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::EOF => write!(f, "EOF"),
            Token::Illegal(c) => write!(f, "ILLEGAL({})", c),
        }
    }
}
