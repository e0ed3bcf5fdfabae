use crate::{
    lexer::prelude::{Token, TokenKind},
    parser::prelude::{
        AssignExpression, BinaryExpression, Body, CallExpression, ExprStatement, Expression,
        FunDeclaration, IdentifierExpression, IfStatement, LiteralExpression, ParseError,
        ParseErrorType, Program, ReturnStatement, Statement, UnaryExpression, VarDeclaration,
        WhileStatement,
    },
    utils::prelude::SrcSpan,
};

pub const MAX_PARAMETERS: usize = 255;

/// Parses a whole token stream into a program.
///
/// Defective statements are recorded and skipped so that every statement
/// in the unit gets a chance to report. Any recorded defect fails the
/// whole parse; a program is only produced from a clean pass.
pub fn parse(tokens: Vec<Token>, unit: &str) -> Result<Program, Vec<ParseError>> {
    let mut parser = Parser::new(tokens, unit);
    let program = parser.parse_program();

    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(parser.errors)
    }
}

struct Parser {
    tokens: Vec<Token>,
    unit: String,
    current: usize,
    errors: Vec<ParseError>,
    fun_depth: u32,
}

impl Parser {
    fn new(tokens: Vec<Token>, unit: &str) -> Self {
        Parser {
            tokens,
            unit: unit.to_string(),
            current: 0,
            errors: Vec::new(),
            fun_depth: 0,
        }
    }

    fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.at_end() {
            if let Some(statement) = self.statement_or_recover() {
                statements.push(statement);
            }
        }

        Program { statements }
    }

    /// Panic-mode boundary. A defect inside a statement is recorded here
    /// and the parser resynchronizes at the next line.
    fn statement_or_recover(&mut self) -> Option<Statement> {
        match self.statement() {
            Ok(statement) => Some(statement),
            Err(error) => {
                self.errors.push(error);
                self.next_statement();
                None
            }
        }
    }

    /// Skips forward past the next NEWLINE. DEDENTs directly follow a
    /// NEWLINE, so this never swallows a block boundary.
    fn next_statement(&mut self) {
        while !self.at_end() {
            let newline = self.next_is(&TokenKind::Newline);
            self.advance();
            if newline {
                return;
            }
        }
    }

    fn statement(&mut self) -> Result<Statement, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::No) => self.var_decl(),
            Some(TokenKind::Greg) => self.fun_decl(),
            _ => self.cmpd_stmt(),
        }
    }

    fn var_decl(&mut self) -> Result<Statement, ParseError> {
        self.expect_one(TokenKind::No)?;
        let name = self.expect_ident()?;

        let initializer = if self.next_is(&TokenKind::Assign) {
            self.advance();
            Some(self.expression()?)
        } else {
            None
        };

        self.expect_one(TokenKind::Newline)?;

        Ok(Statement::Var(VarDeclaration { name, initializer }))
    }

    fn fun_decl(&mut self) -> Result<Statement, ParseError> {
        self.expect_one(TokenKind::Greg)?;
        let name = self.expect_ident()?;

        self.expect_one(TokenKind::LParen)?;
        let mut params = Vec::new();

        if !self.next_is(&TokenKind::RParen) {
            loop {
                let param = self.expect_ident()?;
                if params.len() >= MAX_PARAMETERS {
                    self.errors
                        .push(self.error_at(ParseErrorType::TooManyParameters, &param));
                } else {
                    params.push(param);
                }

                if !self.next_is(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }

        self.expect_one(TokenKind::RParen)?;
        self.expect_one(TokenKind::Newline)?;

        self.fun_depth += 1;
        let body = self.body();
        self.fun_depth -= 1;

        Ok(Statement::Fun(FunDeclaration {
            name,
            params,
            body: body?,
        }))
    }

    fn cmpd_stmt(&mut self) -> Result<Statement, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::If) => self.if_stmt(),
            Some(TokenKind::While) => self.while_loop(),
            _ => self.std_stmt(),
        }
    }

    fn if_stmt(&mut self) -> Result<Statement, ParseError> {
        self.expect_one(TokenKind::If)?;
        let condition = self.expression()?;
        self.expect_one(TokenKind::Newline)?;
        let consequence = self.body()?;

        let mut erm_branches = Vec::new();
        while self.next_is(&TokenKind::Erm) {
            self.advance();
            let condition = self.expression()?;
            self.expect_one(TokenKind::Newline)?;
            erm_branches.push((condition, self.body()?));
        }

        let alternative = if self.next_is(&TokenKind::Hermph) {
            self.advance();
            self.expect_one(TokenKind::Newline)?;
            Some(self.body()?)
        } else {
            None
        };

        Ok(Statement::If(IfStatement {
            condition,
            consequence,
            erm_branches,
            alternative,
        }))
    }

    fn while_loop(&mut self) -> Result<Statement, ParseError> {
        self.expect_one(TokenKind::While)?;
        let condition = self.expression()?;
        self.expect_one(TokenKind::Newline)?;
        let body = self.body()?;

        let alternative = if self.next_is(&TokenKind::Hermph) {
            self.advance();
            self.expect_one(TokenKind::Newline)?;
            Some(self.body()?)
        } else {
            None
        };

        Ok(Statement::While(WhileStatement {
            condition,
            body,
            alternative,
        }))
    }

    fn std_stmt(&mut self) -> Result<Statement, ParseError> {
        if self.next_is(&TokenKind::Return) {
            return self.return_stmt();
        }

        let expression = self.expression()?;
        self.expect_one(TokenKind::Newline)?;

        Ok(Statement::Expr(ExprStatement { expression }))
    }

    fn return_stmt(&mut self) -> Result<Statement, ParseError> {
        let keyword = self.expect_one(TokenKind::Return)?;

        if self.fun_depth == 0 {
            return Err(self.error_at(ParseErrorType::ReturnOutsideFunction, &keyword));
        }

        let value = if self.next_is(&TokenKind::Newline) {
            None
        } else {
            Some(self.expression()?)
        };

        self.expect_one(TokenKind::Newline)?;

        Ok(Statement::Return(ReturnStatement { keyword, value }))
    }

    fn body(&mut self) -> Result<Body, ParseError> {
        self.expect_one(TokenKind::Indent)?;

        let mut statements = Vec::new();
        while !self.at_end() {
            if self.next_is(&TokenKind::Dedent) {
                self.advance();
                break;
            }

            if let Some(statement) = self.statement_or_recover() {
                statements.push(statement);
            }
        }

        Ok(Body { statements })
    }

    fn expression(&mut self) -> Result<Expression, ParseError> {
        self.assign_expr()
    }

    fn assign_expr(&mut self) -> Result<Expression, ParseError> {
        let target = self.or_expr()?;

        if self.next_is(&TokenKind::Assign) {
            let equals = self.advance();

            return match target {
                Expression::Identifier(identifier) => {
                    let value = self.assign_expr()?;
                    Ok(Expression::Assign(Box::new(AssignExpression {
                        name: identifier.token,
                        value,
                    })))
                }
                target => Err(self.error_at(
                    ParseErrorType::InvalidAssignmentTarget {
                        target: target.to_string(),
                    },
                    &equals,
                )),
            };
        }

        Ok(target)
    }

    fn or_expr(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.and_expr()?;

        while self.next_is(&TokenKind::Or) {
            let operator = self.advance();
            let right = self.and_expr()?;
            left = binary(left, operator, right);
        }

        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.not_expr()?;

        while self.next_is(&TokenKind::And) {
            let operator = self.advance();
            let right = self.not_expr()?;
            left = binary(left, operator, right);
        }

        Ok(left)
    }

    fn not_expr(&mut self) -> Result<Expression, ParseError> {
        if self.next_is(&TokenKind::Not) {
            let operator = self.advance();
            let operand = self.not_expr()?;
            return Ok(Expression::Unary(Box::new(UnaryExpression {
                operator,
                operand,
            })));
        }

        self.equality_expr()
    }

    fn equality_expr(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.relational_expr()?;

        while self.next_is(&TokenKind::Equal) || self.next_is(&TokenKind::NotEqual) {
            let operator = self.advance();
            // `a == not b` reads naturally, so the right side re-enters
            // the `not` level.
            let right = self.not_expr()?;
            left = binary(left, operator, right);
        }

        Ok(left)
    }

    fn relational_expr(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.additive_expr()?;

        while self.next_is(&TokenKind::LessThan)
            || self.next_is(&TokenKind::LessThanOrEqual)
            || self.next_is(&TokenKind::GreaterThan)
            || self.next_is(&TokenKind::GreaterThanOrEqual)
        {
            let operator = self.advance();
            let right = self.additive_expr()?;
            left = binary(left, operator, right);
        }

        Ok(left)
    }

    fn additive_expr(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.multiplicative_expr()?;

        while self.next_is(&TokenKind::Plus) || self.next_is(&TokenKind::Minus) {
            let operator = self.advance();
            let right = self.multiplicative_expr()?;
            left = binary(left, operator, right);
        }

        Ok(left)
    }

    fn multiplicative_expr(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.sign_expr()?;

        while self.next_is(&TokenKind::Mult)
            || self.next_is(&TokenKind::Div)
            || self.next_is(&TokenKind::Mod)
        {
            let operator = self.advance();
            let right = self.sign_expr()?;
            left = binary(left, operator, right);
        }

        Ok(left)
    }

    fn sign_expr(&mut self) -> Result<Expression, ParseError> {
        if self.next_is(&TokenKind::Minus) || self.next_is(&TokenKind::Plus) {
            let operator = self.advance();
            let operand = self.sign_expr()?;
            return Ok(Expression::Unary(Box::new(UnaryExpression {
                operator,
                operand,
            })));
        }

        self.exponent_expr()
    }

    fn exponent_expr(&mut self) -> Result<Expression, ParseError> {
        let left = self.call_expr()?;

        // The right operand re-enters the sign level, which makes `**`
        // right-associative and lets it bind a signed exponent.
        if self.next_is(&TokenKind::Pow) {
            let operator = self.advance();
            let right = self.sign_expr()?;
            return Ok(binary(left, operator, right));
        }

        Ok(left)
    }

    fn call_expr(&mut self) -> Result<Expression, ParseError> {
        let mut expression = self.factor()?;

        while self.next_is(&TokenKind::LParen) {
            self.advance();
            let mut arguments = Vec::new();

            if !self.next_is(&TokenKind::RParen) {
                loop {
                    let argument = self.expression()?;
                    if arguments.len() >= MAX_PARAMETERS {
                        self.errors.push(self.error_at(
                            ParseErrorType::TooManyArguments,
                            argument.token(),
                        ));
                    } else {
                        arguments.push(argument);
                    }

                    if !self.next_is(&TokenKind::Comma) {
                        break;
                    }
                    self.advance();
                }
            }

            let paren = self.expect_one(TokenKind::RParen)?;
            expression = Expression::Call(Box::new(CallExpression {
                callee: expression,
                paren,
                arguments,
            }));
        }

        Ok(expression)
    }

    fn factor(&mut self) -> Result<Expression, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.eof_error());
        };

        if token.kind.is_literal() {
            let token = self.advance();
            return Ok(Expression::Literal(LiteralExpression { token }));
        }

        match token.kind {
            TokenKind::Ident(_) => {
                let token = self.advance();
                Ok(Expression::Identifier(IdentifierExpression { token }))
            }
            TokenKind::Nolin => {
                let operator = self.advance();
                self.expect_one(TokenKind::LParen)?;
                let operand = self.expression()?;
                self.expect_one(TokenKind::RParen)?;
                Ok(Expression::Unary(Box::new(UnaryExpression {
                    operator,
                    operand,
                })))
            }
            TokenKind::LParen => {
                self.advance();
                let expression = self.expression()?;
                self.expect_one(TokenKind::RParen)?;
                Ok(expression)
            }
            TokenKind::Eof => Err(self.eof_error()),
            // The offending token stays put so resynchronization decides
            // what to do with it.
            _ => {
                let token = token.clone();
                Err(self.error_at(
                    ParseErrorType::UnexpectedToken {
                        token: token.clone(),
                        expected: vec!["an expression".to_string()],
                    },
                    &token,
                ))
            }
        }
    }

    fn expect_one(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.peek() {
            Some(token) if token.kind == kind => Ok(self.advance()),
            Some(token) if token.kind == TokenKind::Eof => Err(self.eof_error()),
            Some(token) => {
                let token = token.clone();
                Err(self.error_at(
                    ParseErrorType::UnexpectedToken {
                        token: token.clone(),
                        expected: vec![format!("`{}`", kind.as_literal())],
                    },
                    &token,
                ))
            }
            None => Err(self.eof_error()),
        }
    }

    fn expect_ident(&mut self) -> Result<Token, ParseError> {
        match self.peek() {
            Some(token) if matches!(token.kind, TokenKind::Ident(_)) => Ok(self.advance()),
            Some(token) if token.kind == TokenKind::Eof => Err(self.eof_error()),
            Some(token) => {
                let token = token.clone();
                Err(self.error_at(
                    ParseErrorType::UnexpectedToken {
                        token: token.clone(),
                        expected: vec!["an identifier".to_string()],
                    },
                    &token,
                ))
            }
            None => Err(self.eof_error()),
        }
    }

    fn error_at(&self, error: ParseErrorType, token: &Token) -> ParseError {
        ParseError {
            error,
            line: token.line,
            unit: self.unit.clone(),
            span: token.span,
        }
    }

    fn eof_error(&self) -> ParseError {
        let (line, span) = match self.tokens.last() {
            Some(token) => (token.line, token.span),
            None => (1, SrcSpan::new(0, 0)),
        };

        ParseError {
            error: ParseErrorType::UnexpectedEof,
            line,
            unit: self.unit.clone(),
            span,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|token| &token.kind)
    }

    fn next_is(&self, kind: &TokenKind) -> bool {
        self.peek().map(|token| &token.kind == kind).unwrap_or(false)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if !self.at_end() {
            self.current += 1;
        }
        token
    }

    /// EOF counts as the end; the parser never steps past it, so panic
    /// mode cannot spin on a truncated stream.
    fn at_end(&self) -> bool {
        match self.peek() {
            Some(token) => token.kind == TokenKind::Eof,
            None => true,
        }
    }
}

fn binary(left: Expression, operator: Token, right: Expression) -> Expression {
    Expression::Binary(Box::new(BinaryExpression {
        left,
        operator,
        right,
    }))
}
