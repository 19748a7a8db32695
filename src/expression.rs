//! Binding Expression Parser
//!
//! Turns the text of a binding attribute into a `ParsedValue`.
//!
//! ## Resolution Order
//!
//! Cheap prefix rules run first so markup authors can write bare words and
//! unquoted numbers without strict quoting:
//!
//! 1. empty input → no value
//! 2. `true` / `false` (any case) → boolean
//! 3. leading `{` → object literal
//! 4. leading `digits.` → float from that prefix
//! 5. leading digits → integer from that prefix
//! 6. leading word character → the whole text as a string
//! 7. anything else → general decoder (quoted strings, signed numbers, lists)
//!
//! Object literals and the general decoder share one recursive-descent parser
//! over the tokens produced by `lexer`. Nothing is ever evaluated. Literals
//! nest at most `MAX_DEPTH` levels.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Diagnostic, ExpressionError};
use crate::lexer::{Lexer, Spanned, Token};
use crate::value::{Number, ParsedValue, ValueMap};

lazy_static! {
    static ref TRUE_RE: Regex = Regex::new(r"(?i)^true$").unwrap();
    static ref FALSE_RE: Regex = Regex::new(r"(?i)^false$").unwrap();
    static ref FLOAT_PREFIX_RE: Regex = Regex::new(r"^[0-9]+\.[0-9]*").unwrap();
    static ref INT_PREFIX_RE: Regex = Regex::new(r"^[0-9]+").unwrap();
    static ref WORD_START_RE: Regex = Regex::new(r"^\w").unwrap();
}

/// Deepest nesting of `{ }` and `[ ]` the parser accepts.
pub const MAX_DEPTH: usize = 128;

/// Reserved key of the primary value in an expression list.
const PRIMARY_KEY: &str = "__value__";

// ═══════════════════════════════════════════════════════════════════════════════
// TOP-LEVEL VALUES
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse a single binding value, reporting malformed input as an error.
///
/// `None`, empty and whitespace-only input yield `Ok(None)`.
pub fn parse_value(raw: Option<&str>) -> Result<Option<ParsedValue>, ExpressionError> {
    let text = match raw.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(None),
    };

    if TRUE_RE.is_match(text) {
        return Ok(Some(ParsedValue::Boolean(true)));
    }
    if FALSE_RE.is_match(text) {
        return Ok(Some(ParsedValue::Boolean(false)));
    }
    if text.starts_with('{') {
        return Parser::new(text)?.parse_single().map(Some);
    }
    if let Some(m) = FLOAT_PREFIX_RE.find(text) {
        return parse_float_prefix(m.as_str()).map(Some);
    }
    if let Some(m) = INT_PREFIX_RE.find(text) {
        return parse_int_prefix(m.as_str()).map(Some);
    }
    if WORD_START_RE.is_match(text) {
        return Ok(Some(ParsedValue::String(text.to_string())));
    }

    Parser::new(text)?.parse_single().map(Some)
}

/// Parse a single binding value, recovering from malformed input.
///
/// A malformed expression is recorded in `diagnostics`, logged, and replaced
/// with an empty mapping, so a caller always gets a value to pass on.
pub fn parse_value_lenient(
    raw: Option<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ParsedValue> {
    match parse_value(raw) {
        Ok(value) => value,
        Err(e) => {
            let source = raw.unwrap_or_default();
            tracing::warn!(source, error = %e, "Invalid binding data");
            diagnostics.push(Diagnostic::malformed_expression(None, "", source, &e));
            Some(ParsedValue::empty_mapping())
        }
    }
}

/// `parse_value_lenient` for callers that only want the value.
pub fn parse(raw: Option<&str>) -> Option<ParsedValue> {
    parse_value_lenient(raw, &mut Vec::new())
}

fn parse_float_prefix(prefix: &str) -> Result<ParsedValue, ExpressionError> {
    prefix
        .parse::<f64>()
        .map(|f| ParsedValue::Number(Number::Float(f)))
        .map_err(|_| ExpressionError::InvalidNumber {
            text: prefix.to_string(),
            position: 0,
        })
}

fn parse_int_prefix(prefix: &str) -> Result<ParsedValue, ExpressionError> {
    match prefix.parse::<i64>() {
        Ok(i) => Ok(ParsedValue::Number(Number::Int(i))),
        // Out of i64 range, keep the magnitude as a float
        Err(_) => parse_float_prefix(prefix),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXPRESSION LISTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse the suffix of a binding marker: `expr ("," key ":" expr)*`.
///
/// Returns the primary (first, unnamed) value and the named additional
/// values. An empty suffix has no primary value. A `__value__` key is
/// reserved for the primary value and dropped from the additional values.
pub fn parse_expression_list(
    src: &str,
) -> Result<(Option<ParsedValue>, ValueMap), ExpressionError> {
    let mut parser = Parser::new(src)?;
    let mut values = ValueMap::new();

    if parser.at_end() {
        return Ok((None, values));
    }

    let primary = parser.parse_expr()?;
    while parser.eat(&Token::Comma) {
        let (key, value) = parser.parse_member()?;
        if key != PRIMARY_KEY {
            values.insert(key, value);
        }
    }
    parser.expect_end()?;

    Ok((Some(primary), values))
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECURSIVE DESCENT
// ═══════════════════════════════════════════════════════════════════════════════

struct Parser {
    tokens: Vec<Spanned>,
    index: usize,
    /// Open `{` / `[` literals.
    depth: usize,
}

impl Parser {
    fn new(src: &str) -> Result<Self, ExpressionError> {
        Ok(Self {
            tokens: Lexer::tokenize(src)?,
            index: 0,
            depth: 0,
        })
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.index)
    }

    fn next(&mut self, expected: &'static str) -> Result<Spanned, ExpressionError> {
        let token = self
            .tokens
            .get(self.index)
            .cloned()
            .ok_or(ExpressionError::UnexpectedEnd { expected })?;
        self.index += 1;
        Ok(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek().map(|s| &s.token) == Some(token) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), ExpressionError> {
        let spanned = self.next(expected)?;
        if spanned.token == token {
            Ok(())
        } else {
            Err(unexpected(expected, &spanned.token, spanned.position))
        }
    }

    fn expect_end(&self) -> Result<(), ExpressionError> {
        match self.peek() {
            None => Ok(()),
            Some(spanned) => Err(ExpressionError::TrailingInput {
                position: spanned.position,
            }),
        }
    }

    /// One complete value and nothing after it.
    fn parse_single(&mut self) -> Result<ParsedValue, ExpressionError> {
        let value = self.parse_expr()?;
        self.expect_end()?;
        Ok(value)
    }

    fn parse_expr(&mut self) -> Result<ParsedValue, ExpressionError> {
        let spanned = self.next("a value")?;
        match spanned.token {
            Token::LBrace => self.nested(spanned.position, Self::parse_object_body),
            Token::LBracket => self.nested(spanned.position, Self::parse_list_body),
            Token::Str(s) => Ok(ParsedValue::String(s)),
            Token::Num(n) => Ok(ParsedValue::Number(n)),
            Token::Ident(name) => Ok(identifier_value(name)),
            other => Err(unexpected("a value", &other, spanned.position)),
        }
    }

    /// Run `body` one literal level deeper, refusing to go past `MAX_DEPTH`.
    fn nested(
        &mut self,
        position: usize,
        body: fn(&mut Self) -> Result<ParsedValue, ExpressionError>,
    ) -> Result<ParsedValue, ExpressionError> {
        if self.depth == MAX_DEPTH {
            return Err(ExpressionError::NestingTooDeep {
                limit: MAX_DEPTH,
                position,
            });
        }
        self.depth += 1;
        let value = body(self);
        self.depth -= 1;
        value
    }

    /// Members of `{ ... }` after the opening brace.
    fn parse_object_body(&mut self) -> Result<ParsedValue, ExpressionError> {
        let mut map = ValueMap::new();
        if self.eat(&Token::RBrace) {
            return Ok(ParsedValue::Mapping(map));
        }

        loop {
            let (key, value) = self.parse_member()?;
            map.insert(key, value);

            let spanned = self.next("',' or '}'")?;
            match spanned.token {
                Token::Comma => continue,
                Token::RBrace => break,
                other => return Err(unexpected("',' or '}'", &other, spanned.position)),
            }
        }

        Ok(ParsedValue::Mapping(map))
    }

    /// Items of `[ ... ]` after the opening bracket.
    fn parse_list_body(&mut self) -> Result<ParsedValue, ExpressionError> {
        let mut items = Vec::new();
        if self.eat(&Token::RBracket) {
            return Ok(ParsedValue::List(items));
        }

        loop {
            items.push(self.parse_expr()?);

            let spanned = self.next("',' or ']'")?;
            match spanned.token {
                Token::Comma => continue,
                Token::RBracket => break,
                other => return Err(unexpected("',' or ']'", &other, spanned.position)),
            }
        }

        Ok(ParsedValue::List(items))
    }

    /// `key ":" expr`
    fn parse_member(&mut self) -> Result<(String, ParsedValue), ExpressionError> {
        let spanned = self.next("a key")?;
        let key = match spanned.token {
            Token::Ident(name) => name,
            Token::Str(s) => s,
            Token::Num(n) => n.to_string(),
            other => return Err(unexpected("a key", &other, spanned.position)),
        };
        self.expect(Token::Colon, "':'")?;
        let value = self.parse_expr()?;
        Ok((key, value))
    }
}

fn identifier_value(name: String) -> ParsedValue {
    if name.eq_ignore_ascii_case("true") {
        ParsedValue::Boolean(true)
    } else if name.eq_ignore_ascii_case("false") {
        ParsedValue::Boolean(false)
    } else if name == "null" {
        ParsedValue::Null
    } else {
        ParsedValue::String(name)
    }
}

fn unexpected(expected: &'static str, found: &Token, position: usize) -> ExpressionError {
    ExpressionError::UnexpectedToken {
        expected,
        found: found.describe(),
        position,
    }
}
