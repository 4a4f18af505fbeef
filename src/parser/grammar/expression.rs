//! Expression parsers for the script language
//!
//! Precedence, loosest first: comparison, additive, multiplicative, primary.
//! All binary operators are left-associative.

use crate::ast::expression::{BinOpKind, BinaryOp, Expression, FunctionCall};
use crate::lexer::Token;

use crate::parser::combinators::{
    BoxedParser, expect_comma, expect_double_equals, expect_greater_than, expect_less_than,
    expect_lparen, expect_minus, expect_not_equals, expect_plus, expect_rparen, expect_slash,
    expect_star, optional,
};
use crate::parser::state::{ParseState, Parser};

use super::literal::{boolean, ident, number, string_literal, unexpected};

/// expression := additive (("==" | "!=" | "<" | ">") additive)*
pub fn expression() -> BoxedParser<Expression> {
    binary_chain(additive, comparison_operator)
}

/// additive := term (("+" | "-") term)*
fn additive() -> BoxedParser<Expression> {
    binary_chain(term, additive_operator)
}

/// term := primary (("*" | "/") primary)*
fn term() -> BoxedParser<Expression> {
    binary_chain(primary, multiplicative_operator)
}

fn comparison_operator() -> BoxedParser<BinOpKind> {
    (expect_double_equals() >> |_: Token| BinOpKind::Eq)
        | (expect_not_equals() >> |_: Token| BinOpKind::NotEq)
        | (expect_less_than() >> |_: Token| BinOpKind::Lt)
        | (expect_greater_than() >> |_: Token| BinOpKind::Gt)
}

fn additive_operator() -> BoxedParser<BinOpKind> {
    (expect_plus() >> |_: Token| BinOpKind::Add) | (expect_minus() >> |_: Token| BinOpKind::Sub)
}

fn multiplicative_operator() -> BoxedParser<BinOpKind> {
    (expect_star() >> |_: Token| BinOpKind::Mul) | (expect_slash() >> |_: Token| BinOpKind::Div)
}

/// Fold `operand (operator operand)*` into a left-leaning tree.
///
/// Both arguments are constructors so that the recursion through
/// parenthesized expressions only happens while parsing.
fn binary_chain(
    operand: fn() -> BoxedParser<Expression>,
    operator: fn() -> BoxedParser<BinOpKind>,
) -> BoxedParser<Expression> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut left = operand().parse(state)?;

        while let Some(op) = optional(operator()).parse(state)? {
            let right = operand().parse(state)?;
            let position = left.position().merge(&right.position());
            left = Expression::BinaryOp(BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            });
        }

        Ok(left)
    })
}

/// primary := number | string | boolean | function_call | ident | "(" expression ")"
pub fn primary() -> BoxedParser<Expression> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Number(_)) => (number() >> Expression::Number).parse(state),
        Some(Token::StringLiteral(_)) => (string_literal() >> Expression::String).parse(state),
        Some(Token::True(_) | Token::False(_)) => (boolean() >> Expression::Boolean).parse(state),
        Some(Token::Ident(_)) => (function_call() | (ident() >> Expression::Ident)).parse(state),
        Some(Token::LParen(_)) => (expect_lparen() * expression() - expect_rparen()).parse(state),
        _ => unexpected(state, "expression"),
    })
}

/// call_args := expression ("," expression)*
fn call_args() -> BoxedParser<Vec<Expression>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let first = expression().parse(state)?;
        let mut args = vec![first];

        while optional(expect_comma()).parse(state)?.is_some() {
            args.push(expression().parse(state)?);
        }

        Ok(args)
    })
}

/// function_call := ident "(" [call_args] ")"
pub fn function_call() -> BoxedParser<Expression> {
    BoxedParser::new(move |state: &mut ParseState| {
        let func = ident().parse(state)?;
        expect_lparen().parse(state)?;

        let pos = state.position();
        let (args, end) = match expect_rparen().parse(state) {
            Ok(end) => (vec![], end),
            Err(_) => {
                state.restore(pos);
                let args = call_args().parse(state)?;
                (args, expect_rparen().parse(state)?)
            }
        };

        Ok(Expression::FunctionCall(FunctionCall {
            position: func.position.merge(&end.pos()),
            func,
            args,
        }))
    })
}
