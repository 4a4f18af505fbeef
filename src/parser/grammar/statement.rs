//! Statement parsers for the script language

use std::rc::Rc;

use crate::ast::expression::Ident;
use crate::ast::statement::{
    Assignment, Block, Declaration, FunctionDecl, If, Return, Statement, While,
};
use crate::lexer::Token;
use crate::scope::DeclarationKind;

use crate::parser::combinators::{
    BoxedParser, expect_comma, expect_else, expect_equals, expect_function, expect_if,
    expect_lbrace, expect_lparen, expect_rbrace, expect_return, expect_rparen, expect_semicolon,
    expect_while, many, optional,
};
use crate::parser::state::{ParseError, ParseState, Parser};

use super::expression::expression;
use super::literal::{ident, unexpected};

/// declaration := ("var" | "let" | "const") ident ["=" expression] ";"
pub fn declaration() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let (kind, start) = match state.peek() {
            Some(Token::Var(t)) => (DeclarationKind::Var, t.position.clone()),
            Some(Token::Let(t)) => (DeclarationKind::Let, t.position.clone()),
            Some(Token::Const(t)) => (DeclarationKind::Const, t.position.clone()),
            _ => return unexpected(state, "declaration"),
        };
        state.advance();

        let name = ident().label("variable name").parse(state)?;
        let value = optional(expect_equals() * expression()).parse(state)?;
        let end = expect_semicolon().parse(state)?;

        if kind == DeclarationKind::Const && value.is_none() {
            let err = ParseError::new("missing initializer in const declaration").at(name.position);
            state.record_error(err.clone());
            return Err(err);
        }

        Ok(Statement::Declaration(Declaration {
            kind,
            name,
            value,
            position: start.merge(&end.pos()),
        }))
    })
}

/// assignment := ident "=" expression ";"
pub fn assignment() -> BoxedParser<Statement> {
    ((ident() - expect_equals()) + expression() + expect_semicolon())
        >> |((name, value), end): ((Ident, _), Token)| {
            let position = name.position.merge(&end.pos());
            Statement::Assignment(Assignment {
                name,
                value: Box::new(value),
                position,
            })
        }
}

/// block := "{" statement* "}"
pub fn block() -> BoxedParser<Block> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_lbrace().parse(state)?;
        let statements = many(statement()).parse(state)?;
        let end = expect_rbrace().parse(state)?;
        Ok(Block {
            statements,
            position: start.pos().merge(&end.pos()),
        })
    })
}

/// params := [ident ("," ident)*]
fn params() -> BoxedParser<Vec<Ident>> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut params = Vec::new();
        if let Some(first) = optional(ident()).parse(state)? {
            params.push(first);
            while optional(expect_comma()).parse(state)?.is_some() {
                params.push(ident().label("parameter name").parse(state)?);
            }
        }
        Ok(params)
    })
}

/// function := "function" ident "(" params ")" block
pub fn function_declaration() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_function().parse(state)?;
        let name = ident().label("function name").parse(state)?;
        expect_lparen().parse(state)?;
        let params = params().parse(state)?;
        expect_rparen().parse(state)?;
        let body = block().parse(state)?;

        Ok(Statement::Function(Rc::new(FunctionDecl {
            position: start.pos().merge(&body.position),
            name,
            params,
            body,
        })))
    })
}

/// return := "return" [expression] ";"
pub fn return_statement() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_return().parse(state)?;
        let value = optional(expression()).parse(state)?;
        let end = expect_semicolon().parse(state)?;
        Ok(Statement::Return(Return {
            value,
            position: start.pos().merge(&end.pos()),
        }))
    })
}

/// if := "if" "(" expression ")" block ["else" (block | if)]
pub fn if_statement() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_if().parse(state)?;
        let condition = (expect_lparen() * expression() - expect_rparen()).parse(state)?;
        let then_block = block().parse(state)?;

        let else_branch = match optional(expect_else()).parse(state)? {
            Some(_) => match state.peek() {
                Some(Token::If(_)) => Some(if_statement().parse(state)?),
                _ => Some(Statement::Block(block().parse(state)?)),
            },
            None => None,
        };

        let end = match &else_branch {
            Some(Statement::If(nested)) => nested.position.clone(),
            Some(Statement::Block(b)) => b.position.clone(),
            _ => then_block.position.clone(),
        };

        Ok(Statement::If(If {
            condition,
            then_block,
            else_branch: else_branch.map(Box::new),
            position: start.pos().merge(&end),
        }))
    })
}

/// while := "while" "(" expression ")" block
pub fn while_statement() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| {
        let start = expect_while().parse(state)?;
        let condition = (expect_lparen() * expression() - expect_rparen()).parse(state)?;
        let body = block().parse(state)?;
        Ok(Statement::While(While {
            condition,
            position: start.pos().merge(&body.position),
            body,
        }))
    })
}

/// statement := declaration | function | return | if | while | block | assignment | expression ";"
pub fn statement() -> BoxedParser<Statement> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Var(_) | Token::Let(_) | Token::Const(_)) => declaration().parse(state),
        Some(Token::Function(_)) => function_declaration().parse(state),
        Some(Token::Return(_)) => return_statement().parse(state),
        Some(Token::If(_)) => if_statement().parse(state),
        Some(Token::While(_)) => while_statement().parse(state),
        Some(Token::LBrace(_)) => (block() >> Statement::Block).parse(state),
        _ => (assignment() | ((expression() - expect_semicolon()) >> Statement::Expression))
            .parse(state),
    })
}
