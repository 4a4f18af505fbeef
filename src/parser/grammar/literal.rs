//! Literal parsers for the script language

use crate::ast::expression::{Boolean, Ident, Number, StringLiteral};
use crate::lexer::Token;

use crate::parser::combinators::{BoxedParser, expect_false, expect_true};
use crate::parser::state::{ParseError, ParseState};

/// Record and return the error for a token that did not match `expected`
pub(super) fn unexpected<T>(state: &mut ParseState, expected: &str) -> Result<T, ParseError> {
    let err = match state.peek() {
        Some(tok) => ParseError::new("unexpected token")
            .expected(expected)
            .found(tok.describe())
            .at(tok.pos()),
        None => ParseError::new("unexpected end of input").expected(expected),
    };
    state.record_error(err.clone());
    Err(err)
}

/// Parse an identifier
pub fn ident() -> BoxedParser<Ident> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Ident(id)) => {
            let ident = Ident {
                value: id.value.clone(),
                position: id.position.clone(),
            };
            state.advance();
            Ok(ident)
        }
        _ => unexpected(state, "identifier"),
    })
}

/// Parse a number literal
pub fn number() -> BoxedParser<Number> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Number(num)) => {
            let position = num.position.clone();
            let value = num.value.parse::<f64>().map_err(|e| {
                ParseError::new(format!("invalid number literal: {}", e)).at(position.clone())
            })?;
            state.advance();
            Ok(Number { value, position })
        }
        _ => unexpected(state, "number"),
    })
}

/// Parse a string literal, resolving `\"`, `\\`, `\n` and `\t` escapes
pub fn string_literal() -> BoxedParser<StringLiteral> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::StringLiteral(s)) => {
            let raw = s.value.as_str();
            let inner = raw
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .unwrap_or(raw);
            let literal = StringLiteral {
                value: unescape(inner),
                position: s.position.clone(),
            };
            state.advance();
            Ok(literal)
        }
        _ => unexpected(state, "string"),
    })
}

fn unescape(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}

/// Parse `true` or `false`
pub fn boolean() -> BoxedParser<Boolean> {
    let truthy = expect_true()
        >> |t: Token| Boolean {
            value: true,
            position: t.pos(),
        };
    let falsy = expect_false()
        >> |t: Token| Boolean {
            value: false,
            position: t.pos(),
        };
    truthy | falsy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"a\"b\\c\nd"#), "a\"b\\c\nd");
        assert_eq!(unescape("plain"), "plain");
    }
}
