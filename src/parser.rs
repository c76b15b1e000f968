// ABOUTME: Pratt (operator-precedence) parser turning tokens into a Program

use crate::ast::{AssignOp, Expression, Location, PostfixOp, Program, Statement};
use crate::error::SonarError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Or,
    And,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    #[allow(dead_code)]
    Postfix,
    Call,
    Index,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Or => Precedence::Or,
        TokenKind::And => Precedence::And,
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt | TokenKind::Lte | TokenKind::Gte => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
        TokenKind::Lparen => Precedence::Call,
        TokenKind::Lbracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

fn is_assign_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Assign
            | TokenKind::PlusAssign
            | TokenKind::MinusAssign
            | TokenKind::AsteriskAssign
            | TokenKind::SlashAssign
    )
}

pub struct Parser {
    lexer: Lexer,
    cur: Token,
    peek: Token,
    errors: Vec<SonarError>,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        let mut lexer = Lexer::new(input);
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Parser {
            lexer,
            cur,
            peek,
            errors: Vec::new(),
        }
    }

    fn next_token(&mut self) {
        std::mem::swap(&mut self.cur, &mut self.peek);
        self.peek = self.lexer.next_token();
    }

    fn loc(&self) -> Location {
        Location::new(self.cur.line, self.cur.column)
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(SonarError::syntax_at(message, self.loc()));
    }

    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek.kind == kind {
            self.next_token();
            true
        } else {
            self.error(format!(
                "expected next token to be {:?}, got {:?} ('{}') instead",
                kind, self.peek.kind, self.peek.literal
            ));
            false
        }
    }

    /// Parses the whole input, accumulating all errors instead of stopping
    /// at the first one. Returns `Ok(Program)` if no errors were produced,
    /// else `Err(errors)` with every error gathered along the way.
    pub fn parse_program(mut self) -> Result<Program, Vec<SonarError>> {
        let mut statements = Vec::new();
        while self.cur.kind != TokenKind::Eof {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
            self.next_token();
        }

        if self.errors.is_empty() {
            Ok(Program { statements })
        } else {
            Err(self.errors)
        }
    }

    /// Skips tokens until a plausible statement boundary (a semicolon, or
    /// the start of a new statement keyword, or EOF) so parsing can resume
    /// and additional errors can still be collected.
    fn synchronize(&mut self) {
        loop {
            match self.cur.kind {
                TokenKind::Semicolon | TokenKind::Eof => return,
                TokenKind::Let
                | TokenKind::Return
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Break
                | TokenKind::Continue => return,
                _ => self.next_token(),
            }
        }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Break => {
                let loc = self.loc();
                Some(Statement::Break { loc })
            }
            TokenKind::Continue => {
                let loc = self.loc();
                Some(Statement::Continue { loc })
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let loc = self.loc();
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur.literal.clone();
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Statement::Let { name, value, loc })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let loc = self.loc();
        if matches!(self.peek.kind, TokenKind::Semicolon | TokenKind::Eof)
            || self.starts_new_statement(self.peek.kind)
        {
            self.next_token();
            return Some(Statement::Return { value: None, loc });
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Statement::Return {
            value: Some(value),
            loc,
        })
    }

    fn starts_new_statement(&self, kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Let
                | TokenKind::Return
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Rbrace
        )
    }

    fn parse_while_statement(&mut self) -> Option<Statement> {
        let loc = self.loc();
        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }
        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let body = self.parse_block_statement()?;
        Some(Statement::While {
            condition,
            body: Box::new(body),
            loc,
        })
    }

    fn parse_for_statement(&mut self) -> Option<Statement> {
        let loc = self.loc();
        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let counter = self.cur.literal.clone();
        if !self.expect_peek(TokenKind::Comma) {
            return None;
        }
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let value = self.cur.literal.clone();
        if !self.expect_peek(TokenKind::In) {
            return None;
        }
        self.next_token();
        let iterable = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }
        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let body = self.parse_block_statement()?;
        Some(Statement::For {
            counter,
            value,
            iterable,
            body: Box::new(body),
            loc,
        })
    }

    fn parse_block_statement(&mut self) -> Option<Statement> {
        let loc = self.loc();
        let mut statements = Vec::new();
        self.next_token();
        while self.cur.kind != TokenKind::Rbrace && self.cur.kind != TokenKind::Eof {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
            self.next_token();
        }
        if self.cur.kind != TokenKind::Rbrace {
            self.error("expected '}' to close block, got EOF instead");
        }
        Some(Statement::Block { statements, loc })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let loc = self.loc();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Statement::Expression { value, loc })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        if precedence == Precedence::Lowest
            && self.cur.kind == TokenKind::Ident
            && is_assign_op(self.peek.kind)
        {
            return self.parse_assignment_expression();
        }

        let mut left = self.parse_prefix()?;

        while matches!(left, Expression::Identifier { .. } | Expression::IntegerLit { .. })
            && matches!(self.peek.kind, TokenKind::PlusPlus | TokenKind::MinusMinus)
        {
            left = self.parse_postfix(left)?;
        }

        while self.peek.kind != TokenKind::Semicolon && precedence < precedence_of(self.peek.kind)
        {
            left = match self.peek.kind {
                TokenKind::Lparen => {
                    self.next_token();
                    self.parse_call_expression(left)?
                }
                TokenKind::Lbracket => {
                    self.next_token();
                    self.parse_index_expression(left)?
                }
                _ => {
                    self.next_token();
                    self.parse_infix_expression(left)?
                }
            };
        }

        if precedence == Precedence::Lowest
            && matches!(left, Expression::IndexExpr { .. })
            && self.peek.kind == TokenKind::Assign
        {
            self.next_token();
            let loc = self.loc();
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            if let Expression::IndexExpr { left: target, index } = left {
                left = Expression::IndexAssign {
                    target,
                    key: index,
                    value: Box::new(value),
                    loc,
                };
            }
        }

        Some(left)
    }

    fn parse_assignment_expression(&mut self) -> Option<Expression> {
        let loc = self.loc();
        let name = self.cur.literal.clone();
        self.next_token();
        let operator = match self.cur.kind {
            TokenKind::Assign => AssignOp::Assign,
            TokenKind::PlusAssign => AssignOp::Plus,
            TokenKind::MinusAssign => AssignOp::Minus,
            TokenKind::AsteriskAssign => AssignOp::Asterisk,
            TokenKind::SlashAssign => AssignOp::Slash,
            other => {
                self.error(format!("unexpected assignment operator {:?}", other));
                return None;
            }
        };
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        Some(Expression::Assignment {
            name,
            operator,
            value: Box::new(value),
            loc,
        })
    }

    fn parse_postfix(&mut self, operand: Expression) -> Option<Expression> {
        self.next_token();
        let loc = operand.loc();
        let operator = match self.cur.kind {
            TokenKind::PlusPlus => PostfixOp::Increment,
            TokenKind::MinusMinus => PostfixOp::Decrement,
            _ => return Some(operand),
        };
        Some(Expression::Postfix {
            operand: Box::new(operand),
            operator,
            loc,
        })
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        let loc = self.loc();
        match self.cur.kind {
            TokenKind::Int => {
                let value: i64 = self.cur.literal.parse().ok().or_else(|| {
                    self.errors.push(SonarError::syntax_at(
                        format!("could not parse '{}' as integer", self.cur.literal),
                        loc,
                    ));
                    None
                })?;
                Some(Expression::IntegerLit { value, loc })
            }
            TokenKind::Float => {
                let value: f64 = self.cur.literal.parse().ok().or_else(|| {
                    self.errors.push(SonarError::syntax_at(
                        format!("could not parse '{}' as float", self.cur.literal),
                        loc,
                    ));
                    None
                })?;
                Some(Expression::FloatLit { value, loc })
            }
            TokenKind::String => Some(Expression::StringLit {
                value: self.cur.literal.clone(),
                loc,
            }),
            TokenKind::True => Some(Expression::BooleanLit { value: true, loc }),
            TokenKind::False => Some(Expression::BooleanLit { value: false, loc }),
            TokenKind::Ident => Some(Expression::Identifier {
                name: self.cur.literal.clone(),
                loc,
            }),
            TokenKind::Bang | TokenKind::Minus => {
                let operator = self.cur.literal.clone();
                self.next_token();
                let right = self.parse_expression(Precedence::Prefix)?;
                Some(Expression::Prefix {
                    operator,
                    right: Box::new(right),
                    loc,
                })
            }
            TokenKind::Lparen => {
                self.next_token();
                let expr = self.parse_expression(Precedence::Lowest)?;
                if !self.expect_peek(TokenKind::Rparen) {
                    return None;
                }
                Some(expr)
            }
            TokenKind::Lbracket => self.parse_array_literal(loc),
            TokenKind::Lbrace => self.parse_hash_literal(loc),
            TokenKind::Function => self.parse_function_literal(loc),
            TokenKind::If => self.parse_if_expression(loc),
            other => {
                self.error(format!(
                    "no prefix parse rule for {:?} ('{}')",
                    other, self.cur.literal
                ));
                None
            }
        }
    }

    fn parse_array_literal(&mut self, loc: Location) -> Option<Expression> {
        let elements = self.parse_expression_list(TokenKind::Rbracket)?;
        Some(Expression::ArrayLit { elements, loc })
    }

    fn parse_hash_literal(&mut self, loc: Location) -> Option<Expression> {
        let mut pairs = Vec::new();
        if self.peek.kind == TokenKind::Rbrace {
            self.next_token();
            return Some(Expression::HashLit { pairs, loc });
        }
        self.next_token();
        loop {
            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));
            if self.peek.kind == TokenKind::Comma {
                self.next_token();
                self.next_token();
            } else {
                break;
            }
        }
        if !self.expect_peek(TokenKind::Rbrace) {
            return None;
        }
        Some(Expression::HashLit { pairs, loc })
    }

    fn parse_function_literal(&mut self, loc: Location) -> Option<Expression> {
        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let body = self.parse_block_statement()?;
        Some(Expression::FunctionLit {
            parameters,
            body: Box::new(body),
            loc,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<String>> {
        let mut params = Vec::new();
        if self.peek.kind == TokenKind::Rparen {
            self.next_token();
            return Some(params);
        }
        self.next_token();
        params.push(self.cur.literal.clone());
        while self.peek.kind == TokenKind::Comma {
            self.next_token();
            self.next_token();
            params.push(self.cur.literal.clone());
        }
        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }
        Some(params)
    }

    fn parse_if_expression(&mut self, loc: Location) -> Option<Expression> {
        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }
        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let consequence = self.parse_block_statement()?;
        let alternative = if self.peek.kind == TokenKind::Else {
            self.next_token();
            if !self.expect_peek(TokenKind::Lbrace) {
                return None;
            }
            Some(Box::new(self.parse_block_statement()?))
        } else {
            None
        };
        Some(Expression::If {
            condition: Box::new(condition),
            consequence: Box::new(consequence),
            alternative,
            loc,
        })
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let loc = function.loc();
        let arguments = self.parse_expression_list(TokenKind::Rparen)?;
        Some(Expression::Call {
            function: Box::new(function),
            arguments,
            loc,
        })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let loc = left.loc();
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Rbracket) {
            return None;
        }
        Some(Expression::IndexExpr {
            left: Box::new(left),
            index: Box::new(index),
            loc,
        })
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek.kind == end {
            self.next_token();
            return Some(list);
        }
        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek.kind == TokenKind::Comma {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let loc = left.loc();
        let operator = self.cur.literal.clone();
        let precedence = precedence_of(self.cur.kind);
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            loc,
        })
    }
}

/// Parses `input` into a complete Program, or all accumulated syntax errors.
pub fn parse(input: &str) -> Result<Program, Vec<SonarError>> {
    Parser::new(input).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Program {
        parse(src).unwrap_or_else(|errs| panic!("parse errors for {src:?}: {errs:?}"))
    }

    #[test]
    fn parses_let_statement() {
        let program = parse_ok("let x = 5;");
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(program.statements[0], Statement::Let { .. }));
    }

    #[test]
    fn parses_operator_precedence() {
        let program = parse_ok("1 + 2 * 3;");
        match &program.statements[0] {
            Statement::Expression { value, .. } => match value {
                Expression::Infix { operator, right, .. } => {
                    assert_eq!(operator, "+");
                    assert!(matches!(**right, Expression::Infix { .. }));
                }
                _ => panic!("expected infix"),
            },
            _ => panic!("expected expression statement"),
        }
    }

    #[test]
    fn parses_assignment_and_compound_assignment() {
        let program = parse_ok("x = 1; y += 2;");
        assert!(matches!(
            program.statements[0],
            Statement::Expression {
                value: Expression::Assignment {
                    operator: AssignOp::Assign,
                    ..
                },
                ..
            }
        ));
        assert!(matches!(
            program.statements[1],
            Statement::Expression {
                value: Expression::Assignment {
                    operator: AssignOp::Plus,
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn parses_index_assignment() {
        let program = parse_ok("a[0] = 5;");
        assert!(matches!(
            program.statements[0],
            Statement::Expression {
                value: Expression::IndexAssign { .. },
                ..
            }
        ));
    }

    #[test]
    fn parses_for_statement() {
        let program = parse_ok("for (i, v in arr) { x }");
        match &program.statements[0] {
            Statement::For { counter, value, .. } => {
                assert_eq!(counter, "i");
                assert_eq!(value, "v");
            }
            _ => panic!("expected for statement"),
        }
    }

    #[test]
    fn parses_function_literal_and_call() {
        let program = parse_ok("let add = func(a, b) { a + b }; add(1, 2);");
        assert_eq!(program.statements.len(), 2);
        match &program.statements[1] {
            Statement::Expression {
                value: Expression::Call { arguments, .. },
                ..
            } => assert_eq!(arguments.len(), 2),
            _ => panic!("expected call"),
        }
    }

    #[test]
    fn parses_postfix_only_on_identifier() {
        let program = parse_ok("i++;");
        assert!(matches!(
            program.statements[0],
            Statement::Expression {
                value: Expression::Postfix { .. },
                ..
            }
        ));
    }

    #[test]
    fn parses_array_and_index() {
        let program = parse_ok("let a = [1, 2, 3]; a[0];");
        assert!(matches!(
            program.statements[1],
            Statement::Expression {
                value: Expression::IndexExpr { .. },
                ..
            }
        ));
    }

    #[test]
    fn parses_hash_literal() {
        let program = parse_ok("{\"a\": 1, \"b\": 2};");
        match &program.statements[0] {
            Statement::Expression {
                value: Expression::HashLit { pairs, .. },
                ..
            } => assert_eq!(pairs.len(), 2),
            _ => panic!("expected hash literal"),
        }
    }

    #[test]
    fn accumulates_multiple_errors() {
        let errs = parse("let = ; let also = ;").unwrap_err();
        assert!(errs.len() >= 2);
    }

    #[test]
    fn if_expression_without_else() {
        let program = parse_ok("if (true) { 1 }");
        assert!(matches!(
            program.statements[0],
            Statement::Expression {
                value: Expression::If { alternative: None, .. },
                ..
            }
        ));
    }
}
