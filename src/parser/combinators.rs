use std::ops::{Add, BitOr, Mul, Shr, Sub};
use std::rc::Rc;

use crate::lexer::Token;

use super::state::{ParseError, ParseResult, ParseState, Parser};

type Rule<T> = Rc<dyn Fn(&mut ParseState) -> ParseResult<T>>;

/// A type-erased, cheaply clonable parser.
///
/// Grammar rules are composed with operators:
///
/// | Operator | Meaning |
/// |---|---|
/// | `a + b` | both, yields `(A, B)` |
/// | `a - b` | both, yields `A` |
/// | `a * b` | both, yields `B` |
/// | `a \| b` | `a`, or `b` from the same position if `a` fails |
/// | `a >> f` | `a`, mapped through `f` |
pub struct BoxedParser<T> {
    rule: Rule<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            rule: Rc::clone(&self.rule),
        }
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        BoxedParser {
            rule: Rc::new(move |state| parser.parse(state)),
        }
    }

    /// Report failures of this parser as "expected `name`"
    pub fn label(self, name: &'static str) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| {
            self.parse(state).map_err(|mut err| {
                err.expected = vec![name.to_string()];
                state.record_error(err.clone());
                err
            })
        })
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        (self.rule)(state)
    }
}

impl<T: 'static, U: 'static> Add<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<(T, U)>;

    fn add(self, rhs: BoxedParser<U>) -> Self::Output {
        BoxedParser::new(move |state: &mut ParseState| {
            let left = self.parse(state)?;
            Ok((left, rhs.parse(state)?))
        })
    }
}

impl<T: 'static, U: 'static> Sub<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn sub(self, rhs: BoxedParser<U>) -> Self::Output {
        (self + rhs) >> |(left, _): (T, U)| left
    }
}

impl<T: 'static, U: 'static> Mul<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn mul(self, rhs: BoxedParser<U>) -> Self::Output {
        (self + rhs) >> |(_, right): (T, U)| right
    }
}

impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        BoxedParser::new(move |state: &mut ParseState| {
            let pos = state.position();
            self.parse(state).or_else(|_| {
                // the failed branch already recorded its error
                state.restore(pos);
                rhs.parse(state)
            })
        })
    }
}

impl<T: 'static, U: 'static, F: Fn(T) -> U + 'static> Shr<F> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, f: F) -> Self::Output {
        BoxedParser::new(move |state: &mut ParseState| self.parse(state).map(&f))
    }
}

/// Consume one token matching `predicate`, recording a failure as
/// "expected `expected`" at the current position.
fn token_with_error<F: Fn(&Token) -> bool + 'static>(
    predicate: F,
    expected: &'static str,
) -> BoxedParser<Token> {
    BoxedParser::new(move |state: &mut ParseState| {
        let err = match state.peek() {
            Some(tok) if predicate(tok) => {
                let tok = tok.clone();
                state.advance();
                return Ok(tok);
            }
            Some(tok) => ParseError::new("unexpected token")
                .expected(expected)
                .found(tok.describe())
                .at(tok.pos()),
            None => ParseError::new("unexpected end of input").expected(expected),
        };
        state.record_error(err.clone());
        Err(err)
    })
}

macro_rules! expect_tokens {
    ($($name:ident => $variant:ident, $text:literal;)*) => {
        $(
            pub fn $name() -> BoxedParser<Token> {
                token_with_error(|t| matches!(t, Token::$variant(_)), $text)
            }
        )*
    };
}

expect_tokens! {
    expect_function => Function, "'function'";
    expect_return => Return, "'return'";
    expect_if => If, "'if'";
    expect_else => Else, "'else'";
    expect_while => While, "'while'";
    expect_true => True, "'true'";
    expect_false => False, "'false'";
    expect_equals => Equals, "'='";
    expect_double_equals => DoubleEquals, "'=='";
    expect_not_equals => NotEquals, "'!='";
    expect_plus => Plus, "'+'";
    expect_minus => Minus, "'-'";
    expect_star => Star, "'*'";
    expect_slash => Slash, "'/'";
    expect_less_than => LessThan, "'<'";
    expect_greater_than => GreaterThan, "'>'";
    expect_comma => Comma, "','";
    expect_semicolon => Semicolon, "';'";
    expect_lparen => LParen, "'('";
    expect_rparen => RParen, "')'";
    expect_lbrace => LBrace, "'{'";
    expect_rbrace => RBrace, "'}'";
}

/// Zero or more. Stops at the first failure and rewinds past it.
pub fn many<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut items = Vec::new();
        loop {
            let pos = state.position();
            match parser.parse(state) {
                Ok(item) => items.push(item),
                Err(_) => {
                    state.restore(pos);
                    return Ok(items);
                }
            }
        }
    })
}

pub fn optional<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Option<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let pos = state.position();
        match parser.parse(state) {
            Ok(item) => Ok(Some(item)),
            Err(_) => {
                state.restore(pos);
                Ok(None)
            }
        }
    })
}
