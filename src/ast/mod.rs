use statement::Statement;

pub mod expression;
pub mod statement;

/// A parsed script: the statements of the global scope, in order
#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Statement>,
}
