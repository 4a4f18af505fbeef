use lachs::Span;

#[derive(Debug, Clone)]
pub enum Expression {
    Ident(Ident),
    Number(Number),
    String(StringLiteral),
    Boolean(Boolean),
    FunctionCall(FunctionCall),
    BinaryOp(BinaryOp),
}

impl Expression {
    pub fn position(&self) -> Span {
        match self {
            Expression::Ident(i) => i.position.clone(),
            Expression::Number(n) => n.position.clone(),
            Expression::String(s) => s.position.clone(),
            Expression::Boolean(b) => b.position.clone(),
            Expression::FunctionCall(f) => f.position.clone(),
            Expression::BinaryOp(b) => b.position.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ident {
    pub value: String,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Number {
    pub value: f64,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub value: String,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Boolean {
    pub value: bool,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub func: Ident,
    pub args: Vec<Expression>,
    pub position: Span,
}

/// Binary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Gt,
}

impl BinOpKind {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Eq => "==",
            BinOpKind::NotEq => "!=",
            BinOpKind::Lt => "<",
            BinOpKind::Gt => ">",
        }
    }
}

/// Binary operation expression
#[derive(Debug, Clone)]
pub struct BinaryOp {
    pub op: BinOpKind,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub position: Span,
}
