use std::fmt::{self, Display};

use kaformula_common::FormulaError;

use crate::cursor::Cursor;

/// Numeric literal payload. Arithmetic always promotes to `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Token {
    Eof,
    /// Unrecognised character or an integer literal that does not fit.
    Error,
    LParen,
    RParen,
    Semicolon,
    Number(Number),
    /// String literal contents, quotes stripped, no escapes.
    Str(String),
    Ident(String),

    // operators
    Pow,
    Inv,
    Not,
    Mul,
    Div,
    Mod,
    Per,
    Add,
    Sub,
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
    Or,
    Xor,
    And,
}

impl Token {
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::Pow
                | Token::Inv
                | Token::Not
                | Token::Mul
                | Token::Div
                | Token::Mod
                | Token::Per
                | Token::Add
                | Token::Sub
                | Token::Lt
                | Token::Le
                | Token::Eq
                | Token::Ne
                | Token::Ge
                | Token::Gt
                | Token::Or
                | Token::Xor
                | Token::And
        )
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => f.write_str("end of formula"),
            Token::Error => f.write_str("invalid token"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Semicolon => f.write_str("';'"),
            Token::Number(Number::Int(i)) => write!(f, "{i}"),
            Token::Number(Number::Float(x)) => write!(f, "{x}"),
            Token::Str(s) => write!(f, "'{s}'"),
            Token::Ident(s) => f.write_str(s),
            op => f.write_str(match op {
                Token::Pow => "**",
                Token::Inv => "~",
                Token::Not => "!",
                Token::Mul => "*",
                Token::Div => "/",
                Token::Mod => "%",
                Token::Per => "%%",
                Token::Add => "+",
                Token::Sub => "-",
                Token::Lt => "<",
                Token::Le => "<=",
                Token::Eq => "==",
                Token::Ne => "<>",
                Token::Ge => ">=",
                Token::Gt => ">",
                Token::Or => "|",
                Token::Xor => "^",
                _ => "&",
            }),
        }
    }
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '@'
}

#[inline]
fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '@'
}

#[inline]
fn is_decimal_separator(c: char) -> bool {
    c == '.' || c == ','
}

/// Pull lexer: one token per `next_token` call, no buffering.
#[derive(Debug, Clone)]
pub struct Lexer {
    cursor: Cursor,
    token_start: usize,
}

impl Lexer {
    /// `formula` is expected to be normalised already.
    pub fn new(formula: &str) -> Self {
        Self {
            cursor: Cursor::new(formula),
            token_start: 0,
        }
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// The parameter splitter scans the raw text directly.
    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// Char offset where the most recent token began.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    pub fn next_token(&mut self) -> Result<Token, FormulaError> {
        while self.cursor.current() == Some(' ') {
            self.cursor.advance();
        }
        self.token_start = self.cursor.position();

        let Some(c) = self.cursor.current() else {
            return Ok(Token::Eof);
        };

        if c == '\'' || c == '"' {
            return self.lex_string(c);
        }
        if c.is_ascii_digit() {
            return Ok(self.lex_number());
        }
        if is_ident_start(c) {
            return Ok(self.lex_ident());
        }
        Ok(self.lex_operator(c))
    }

    fn lex_string(&mut self, quote: char) -> Result<Token, FormulaError> {
        let start = self.cursor.position();
        self.cursor.advance();

        let mut text = String::new();
        loop {
            match self.cursor.current() {
                None => return Err(FormulaError::invalid_string(start)),
                Some(c) if c == quote => break,
                Some(c) => {
                    text.push(c);
                    self.cursor.advance();
                }
            }
        }
        self.cursor.advance();
        Ok(Token::Str(text))
    }

    fn lex_number(&mut self) -> Token {
        let mut int: Option<i64> = Some(0);
        while let Some(d) = self.cursor.current().and_then(|c| c.to_digit(10)) {
            int = int
                .and_then(|v| v.checked_mul(10))
                .and_then(|v| v.checked_add(d as i64));
            self.cursor.advance();
        }
        let Some(int) = int else {
            return Token::Error;
        };

        match self.cursor.current() {
            Some(c) if is_decimal_separator(c) => {
                self.cursor.advance();
                let mut value = int as f64;
                let mut weight = 1.0;
                while let Some(d) = self.cursor.current().and_then(|c| c.to_digit(10)) {
                    weight /= 10.0;
                    value += weight * d as f64;
                    self.cursor.advance();
                }
                Token::Number(Number::Float(value))
            }
            _ => Token::Number(Number::Int(int)),
        }
    }

    fn lex_ident(&mut self) -> Token {
        let start = self.cursor.position();
        while self.cursor.current().is_some_and(is_ident_part) {
            self.cursor.advance();
        }
        Token::Ident(self.cursor.slice(start, self.cursor.position()))
    }

    /// Consume `second` if it is the next char.
    fn eat(&mut self, second: char) -> bool {
        if self.cursor.current() == Some(second) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    fn lex_operator(&mut self, c: char) -> Token {
        self.cursor.advance();
        match c {
            '=' => {
                self.eat('=');
                Token::Eq
            }
            '+' => Token::Add,
            '-' => Token::Sub,
            '*' if self.eat('*') => Token::Pow,
            '*' => Token::Mul,
            '/' => Token::Div,
            '%' if self.eat('%') => Token::Per,
            '%' => Token::Mod,
            '~' => Token::Inv,
            '^' => Token::Xor,
            '&' => Token::And,
            '|' => Token::Or,
            '<' if self.eat('=') => Token::Le,
            '<' if self.eat('>') => Token::Ne,
            '<' => Token::Lt,
            '>' if self.eat('=') => Token::Ge,
            '>' if self.eat('<') => Token::Ne,
            '>' => Token::Gt,
            '!' if self.eat('=') => Token::Ne,
            '!' => Token::Not,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ';' => Token::Semicolon,
            _ => {
                self.cursor.step_back();
                Token::Error
            }
        }
    }
}

/// Lex a whole formula, stopping after the first `Eof`.
pub fn tokenize(formula: &str) -> Result<Vec<Token>, FormulaError> {
    let mut lexer = Lexer::new(formula);
    let mut out = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        let done = matches!(tok, Token::Eof | Token::Error);
        out.push(tok);
        if done {
            return Ok(out);
        }
    }
}
