//! Grammar module for the script language
//!
//! This module contains all the parsing rules organized by category:
//! - `literal`: Identifiers, numbers, strings, booleans
//! - `expression`: Operators, calls, parenthesized expressions
//! - `statement`: Declarations, assignments, functions, control flow, blocks

mod expression;
mod literal;
mod statement;

use crate::ast::Program;
use crate::lexer::Token;

use super::state::{ParseError, ParseState, Parser};

pub use expression::expression;
pub use statement::statement;

/// Skip past the statement that failed to parse: up to and including the
/// next `;` or `}`, or to the end of input.
fn synchronize(state: &mut ParseState) {
    while let Some(token) = state.advance() {
        if matches!(token, Token::Semicolon(_) | Token::RBrace(_)) {
            break;
        }
    }
}

/// program := statement*
///
/// Parsing continues after a malformed statement so that one run reports
/// every statement that failed. The program is only returned when there
/// were no errors.
pub fn parse(state: &mut ParseState) -> (Option<Program>, Vec<ParseError>) {
    let mut statements = Vec::new();
    let mut errors = Vec::new();

    while state.has_next() {
        let pos = state.position();
        state.clear_errors();

        match statement().parse(state) {
            Ok(stmt) => statements.push(stmt),
            Err(err) => {
                errors.push(state.take_furthest_error().unwrap_or(err));
                state.restore(pos);
                synchronize(state);
            }
        }
    }

    if errors.is_empty() {
        (Some(Program { statements }), errors)
    } else {
        (None, errors)
    }
}
