use std::fmt::{self, Display};

use crate::lexer::prelude::{Token, TokenKind};

/// The parsed form of one source unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// An indented block. Not a statement itself; if-arms, loop bodies and
/// function bodies all reuse it.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Var(VarDeclaration),
    Fun(FunDeclaration),
    If(IfStatement),
    While(WhileStatement),
    Return(ReturnStatement),
    Expr(ExprStatement),
}

impl Statement {
    /// The token runtime diagnostics for this statement point at.
    pub fn token(&self) -> &Token {
        match self {
            Statement::Var(statement) => &statement.name,
            Statement::Fun(statement) => &statement.name,
            Statement::If(statement) => statement.condition.token(),
            Statement::While(statement) => statement.condition.token(),
            Statement::Return(statement) => &statement.keyword,
            Statement::Expr(statement) => statement.expression.token(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclaration {
    pub name: Token,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunDeclaration {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub consequence: Body,
    pub erm_branches: Vec<(Expression, Body)>,
    pub alternative: Option<Body>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Body,
    /// Runs exactly once, after the condition turns false.
    pub alternative: Option<Body>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub keyword: Token,
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStatement {
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Binary(Box<BinaryExpression>),
    Unary(Box<UnaryExpression>),
    Assign(Box<AssignExpression>),
    Call(Box<CallExpression>),
    Literal(LiteralExpression),
    Identifier(IdentifierExpression),
}

impl Expression {
    /// The token runtime diagnostics for this expression point at.
    pub fn token(&self) -> &Token {
        match self {
            Expression::Binary(expression) => &expression.operator,
            Expression::Unary(expression) => &expression.operator,
            Expression::Assign(expression) => &expression.name,
            Expression::Call(expression) => &expression.paren,
            Expression::Literal(expression) => &expression.token,
            Expression::Identifier(expression) => &expression.token,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub left: Expression,
    pub operator: Token,
    pub right: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: Token,
    pub operand: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpression {
    pub name: Token,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Expression,
    pub paren: Token,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpression {
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpression {
    pub token: Token,
}

impl IdentifierExpression {
    pub fn name(&self) -> &str {
        &self.token.lexeme
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Binary(expression) => write!(
                f,
                "({} {} {})",
                expression.left, expression.operator, expression.right
            ),
            Expression::Unary(expression) => match expression.operator.kind {
                TokenKind::Nolin => write!(f, "nolin({})", expression.operand),
                TokenKind::Not => write!(f, "(not {})", expression.operand),
                _ => write!(f, "({}{})", expression.operator, expression.operand),
            },
            Expression::Assign(expression) => {
                write!(f, "{} = {}", expression.name, expression.value)
            }
            Expression::Call(expression) => {
                let arguments = expression
                    .arguments
                    .iter()
                    .map(|argument| argument.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");

                write!(f, "{}({})", expression.callee, arguments)
            }
            Expression::Literal(expression) => write!(f, "{}", expression.token),
            Expression::Identifier(expression) => write!(f, "{}", expression.token),
        }
    }
}

impl Program {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        for (index, statement) in self.statements.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            statement.fmt_indented(f, level)?;
        }
        Ok(())
    }
}

impl Body {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        for (index, statement) in self.statements.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            statement.fmt_indented(f, level)?;
        }
        Ok(())
    }
}

impl Statement {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        let pad = "    ".repeat(level);

        match self {
            Statement::Var(statement) => match &statement.initializer {
                Some(initializer) => write!(f, "{pad}no {} = {}", statement.name, initializer),
                None => write!(f, "{pad}no {}", statement.name),
            },
            Statement::Fun(statement) => {
                let params = statement
                    .params
                    .iter()
                    .map(|param| param.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");

                writeln!(f, "{pad}greg {}({})", statement.name, params)?;
                statement.body.fmt_indented(f, level + 1)
            }
            Statement::If(statement) => {
                writeln!(f, "{pad}if {}", statement.condition)?;
                statement.consequence.fmt_indented(f, level + 1)?;

                for (condition, body) in &statement.erm_branches {
                    writeln!(f, "\n{pad}erm {condition}")?;
                    body.fmt_indented(f, level + 1)?;
                }

                if let Some(alternative) = &statement.alternative {
                    writeln!(f, "\n{pad}hermph")?;
                    alternative.fmt_indented(f, level + 1)?;
                }

                Ok(())
            }
            Statement::While(statement) => {
                writeln!(f, "{pad}while {}", statement.condition)?;
                statement.body.fmt_indented(f, level + 1)?;

                if let Some(alternative) = &statement.alternative {
                    writeln!(f, "\n{pad}hermph")?;
                    alternative.fmt_indented(f, level + 1)?;
                }

                Ok(())
            }
            Statement::Return(statement) => match &statement.value {
                Some(value) => write!(f, "{pad}return {value}"),
                None => write!(f, "{pad}return"),
            },
            Statement::Expr(statement) => write!(f, "{pad}{}", statement.expression),
        }
    }
}
