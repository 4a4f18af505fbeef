use std::rc::Rc;

use lachs::Span;

use crate::ast::expression::{Expression, Ident};
use crate::scope::DeclarationKind;

#[derive(Debug, Clone)]
pub enum Statement {
    Declaration(Declaration),
    Assignment(Assignment),
    Function(Rc<FunctionDecl>),
    Return(Return),
    If(If),
    While(While),
    Block(Block),
    Expression(Expression),
}

/// `var` / `let` / `const` with an optional initializer
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: Ident,
    pub value: Option<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub name: Ident,
    pub value: Box<Expression>,
    pub position: Span,
}

/// A named function; shared between the AST and the closures created from it
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Return {
    pub value: Option<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct If {
    pub condition: Expression,
    pub then_block: Block,
    pub else_branch: Option<Box<Statement>>,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct While {
    pub condition: Expression,
    pub body: Block,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub position: Span,
}
