//! FILENAME: core/mdx-parser/src/lexer.rs
//! PURPOSE: Scans raw MDX text and produces a stream of Tokens.
//! CONTEXT: First stage of the parsing pipeline. Handles whitespace skipping,
//! bracketed name segments (with `]]` escapes), bare words and the handful of
//! delimiters the axis subset needs.
//!
//! SUPPORTED SYMBOLS:
//! - Single char: ( ) { } , .
//! - Bracketed names: [Product], [Daily Paper, Radio], [a]]b]
//! - Words: SELECT, CrossJoin, Children, ...
//! - Unsigned integers (AXIS(2))

use crate::token::Token;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    /// Advances the lexer and returns the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.input.next() {
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,
            Some('{') => Token::LBrace,
            Some('}') => Token::RBrace,
            Some(',') => Token::Comma,
            Some('.') => Token::Dot,
            Some('[') => self.read_bracketed(),
            Some(ch) if ch.is_ascii_digit() => self.read_number(ch),
            Some(ch) if is_word_start(ch) => self.read_word(ch),
            None => Token::EOF,
            Some(ch) => Token::Illegal(ch),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }

    /// Reads a bracketed segment. The opening '[' is already consumed.
    fn read_bracketed(&mut self) -> Token {
        let mut result = String::new();
        while let Some(ch) = self.input.next() {
            if ch == ']' {
                // "]]" inside brackets is an escaped bracket
                if self.input.peek() == Some(&']') {
                    result.push(']');
                    self.input.next();
                } else {
                    return Token::Bracketed(result);
                }
            } else {
                result.push(ch);
            }
        }
        // Unterminated bracket
        Token::Illegal('[')
    }

    fn read_number(&mut self, first_char: char) -> Token {
        let mut digits = String::from(first_char);
        while let Some(&ch) = self.input.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            digits.push(ch);
            self.input.next();
        }

        match digits.parse::<u32>() {
            Ok(n) => Token::Number(n),
            Err(_) => Token::Illegal(first_char),
        }
    }

    fn read_word(&mut self, first_char: char) -> Token {
        let mut word = String::from(first_char);
        while let Some(&ch) = self.input.peek() {
            if is_word_start(ch) || ch.is_ascii_digit() {
                word.push(ch);
                self.input.next();
            } else {
                break;
            }
        }
        Token::Identifier(word)
    }
}

fn is_word_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields tokens up to, but not including, EOF.
    fn next(&mut self) -> Option<Token> {
        match self.next_token() {
            Token::EOF => None,
            token => Some(token),
        }
    }
}
