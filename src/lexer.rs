//! Tokenizer for binding expressions.
//!
//! Produces the small token set the expression grammar needs: punctuation,
//! quoted strings (either quote style, with escapes), numbers and bare
//! identifiers. Every token carries the byte offset it started at.

use crate::error::ExpressionError;
use crate::value::Number;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Str(String),
    Num(Number),
    Ident(String),
}

impl Token {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Str(s) => format!("string {:?}", s),
            Token::Num(n) => format!("number {}", n),
            Token::Ident(name) => format!("identifier '{}'", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Tokenize the whole input.
    pub fn tokenize(src: &str) -> Result<Vec<Spanned>, ExpressionError> {
        let mut lexer = Lexer::new(src);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump();
        }
    }

    pub fn next_token(&mut self) -> Result<Option<Spanned>, ExpressionError> {
        self.skip_whitespace();
        let position = self.pos;
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        let token = match c {
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            ':' => self.single(Token::Colon),
            ',' => self.single(Token::Comma),
            '"' | '\'' => Token::Str(self.lex_string()?),
            c if starts_number(c, self.peek_second()) => Token::Num(self.lex_number()?),
            c if is_ident_start(c) => Token::Ident(self.lex_ident()),
            found => return Err(ExpressionError::UnexpectedChar { found, position }),
        };

        Ok(Some(Spanned { token, position }))
    }

    fn single(&mut self, token: Token) -> Token {
        self.bump();
        token
    }

    fn lex_ident(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_ident_continue(c) {
                break;
            }
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }

    fn lex_number(&mut self) -> Result<Number, ExpressionError> {
        let start = self.pos;
        let mut is_float = false;

        if matches!(self.peek(), Some('-') | Some('+')) {
            self.bump();
        }
        self.eat_digits();
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('-') | Some('+')) {
                self.bump();
            }
            self.eat_digits();
        }

        let text = &self.src[start..self.pos];
        let invalid = || ExpressionError::InvalidNumber {
            text: text.to_string(),
            position: start,
        };

        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Number::Int(i));
            }
        }
        text.parse::<f64>().map(Number::Float).map_err(|_| invalid())
    }

    fn eat_digits(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.bump();
        }
    }

    fn lex_string(&mut self) -> Result<String, ExpressionError> {
        let start = self.pos;
        let quote = self.bump().unwrap_or('"');
        let mut out = String::new();

        loop {
            let c = self
                .bump()
                .ok_or(ExpressionError::UnterminatedString { position: start })?;
            if c == quote {
                return Ok(out);
            }
            if c != '\\' {
                out.push(c);
                continue;
            }

            let escape_at = self.pos - 1;
            let escaped = self
                .bump()
                .ok_or(ExpressionError::UnterminatedString { position: start })?;
            match escaped {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                'b' => out.push('\u{0008}'),
                'f' => out.push('\u{000C}'),
                '\\' | '\'' | '"' | '/' => out.push(escaped),
                'u' => out.push(self.lex_unicode_escape(escape_at)?),
                other => {
                    return Err(ExpressionError::InvalidEscape {
                        found: other.to_string(),
                        position: escape_at,
                    })
                }
            }
        }
    }

    /// Reads the four hex digits after `\u`, pairing UTF-16 surrogates.
    fn lex_unicode_escape(&mut self, escape_at: usize) -> Result<char, ExpressionError> {
        let high = self.read_hex4(escape_at)?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or_else(|| self.bad_escape(escape_at));
        }

        if self.peek() != Some('\\') || self.peek_second() != Some('u') {
            return Err(self.bad_escape(escape_at));
        }
        self.bump();
        self.bump();
        let low = self.read_hex4(escape_at)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(self.bad_escape(escape_at));
        }
        let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(combined).ok_or_else(|| self.bad_escape(escape_at))
    }

    fn read_hex4(&mut self, escape_at: usize) -> Result<u32, ExpressionError> {
        let end = self.pos + 4;
        let digits = self
            .src
            .get(self.pos..end)
            .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| self.bad_escape(escape_at))?;
        let value = u32::from_str_radix(digits, 16).map_err(|_| self.bad_escape(escape_at))?;
        self.pos = end;
        Ok(value)
    }

    fn bad_escape(&self, escape_at: usize) -> ExpressionError {
        let end = (escape_at + 6).min(self.src.len());
        let found = self
            .src
            .get(escape_at + 1..end)
            .unwrap_or("u")
            .to_string();
        ExpressionError::InvalidEscape {
            found,
            position: escape_at,
        }
    }
}

fn starts_number(c: char, next: Option<char>) -> bool {
    match c {
        '0'..='9' => true,
        '-' | '+' => matches!(next, Some('0'..='9') | Some('.')),
        '.' => matches!(next, Some('0'..='9')),
        _ => false,
    }
}

pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
