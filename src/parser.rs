use crate::ast::{BlockStatement, CaseArm, Expression, Identifier, Program, Statement};
use crate::lexer::{Lexer, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Cond,
    Assign,
    Ternary,
    Equals,
    RegexpMatch,
    LessGreater,
    Sum,
    Product,
    Power,
    Mod,
    Prefix,
    Call,
    DotDot,
    Index,
}

fn token_precedence(kind: &TokenKind) -> Precedence {
    match kind {
        TokenKind::Question => Precedence::Ternary,
        TokenKind::Assign => Precedence::Assign,
        TokenKind::DotDot => Precedence::DotDot,
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::LtEquals | TokenKind::Gt | TokenKind::GtEquals => {
            Precedence::LessGreater
        }
        TokenKind::Contains | TokenKind::NotContains => Precedence::RegexpMatch,
        TokenKind::Plus | TokenKind::PlusEquals | TokenKind::Minus | TokenKind::MinusEquals => {
            Precedence::Sum
        }
        TokenKind::Slash
        | TokenKind::SlashEquals
        | TokenKind::Asterisk
        | TokenKind::AsteriskEquals => Precedence::Product,
        TokenKind::Pow => Precedence::Power,
        TokenKind::Mod => Precedence::Mod,
        TokenKind::And | TokenKind::Or => Precedence::Cond,
        TokenKind::LParen | TokenKind::Period => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

pub struct Parser {
    lexer: Lexer,
    prev_token: Token,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<String>,
    tern: bool,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        let mut parser = Self {
            lexer,
            prev_token: Token::eof(),
            cur_token: Token::eof(),
            peek_token: Token::eof(),
            errors: Vec::new(),
            tern: false,
        };
        parser.next_token();
        parser.next_token();
        parser
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.prev_token =
            std::mem::replace(&mut self.cur_token, std::mem::replace(&mut self.peek_token, next));
    }

    fn cur_token_is(&self, kind: &TokenKind) -> bool {
        self.cur_token.kind == *kind
    }

    fn peek_token_is(&self, kind: &TokenKind) -> bool {
        self.peek_token.kind == *kind
    }

    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token_is(&kind) {
            self.next_token();
            true
        } else {
            self.peek_error(&kind);
            false
        }
    }

    fn peek_error(&mut self, expected: &TokenKind) {
        self.errors.push(format!(
            "expected next token to be {}, got {} instead around line {}",
            expected,
            self.cur_token.kind,
            self.lexer.current_line()
        ));
    }

    fn peek_precedence(&self) -> Precedence {
        token_precedence(&self.peek_token.kind)
    }

    fn cur_precedence(&self) -> Precedence {
        token_precedence(&self.cur_token.kind)
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.cur_token_is(&TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }
        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Const => self.parse_const_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        };
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest);
        while !self.cur_token_is(&TokenKind::Semicolon) {
            if self.cur_token_is(&TokenKind::Eof) {
                self.errors.push("unterminated let statement".to_string());
                return None;
            }
            self.next_token();
        }
        Some(Statement::Let {
            token,
            name,
            value: value?,
        })
    }

    fn parse_const_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        };
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest);
        while !self.cur_token_is(&TokenKind::Semicolon) {
            if self.cur_token_is(&TokenKind::Eof) {
                self.errors.push("unterminated const statement".to_string());
                return None;
            }
            self.next_token();
        }
        Some(Statement::Const {
            token,
            name,
            value: value?,
        })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest);
        while !self.cur_token_is(&TokenKind::Semicolon) {
            if self.cur_token_is(&TokenKind::Eof) {
                self.errors
                    .push("unterminated return statement".to_string());
                return None;
            }
            self.next_token();
        }
        Some(Statement::Return {
            token,
            value: value?,
        })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        let expression = self.parse_expression(Precedence::Lowest);
        while self.peek_token_is(&TokenKind::Semicolon) {
            self.next_token();
        }
        Some(Statement::Expression {
            token,
            expression: expression?,
        })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        if matches!(
            self.cur_token.kind,
            TokenKind::PlusPlus | TokenKind::MinusMinus
        ) {
            return Some(self.parse_postfix_expression());
        }

        let mut left = self.parse_prefix()?;

        while !self.peek_token_is(&TokenKind::Semicolon) && precedence < self.peek_precedence() {
            if !has_infix(&self.peek_token.kind) {
                return Some(left);
            }
            self.next_token();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.cur_token.kind {
            TokenKind::Ident => Some(Expression::Ident(Identifier {
                token: self.cur_token.clone(),
                value: self.cur_token.literal.clone(),
            })),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Float => self.parse_float_literal(),
            TokenKind::Str => Some(Expression::Str {
                token: self.cur_token.clone(),
                value: self.cur_token.literal.clone(),
            }),
            TokenKind::Regexp => Some(self.parse_regexp_literal()),
            TokenKind::Backtick => Some(Expression::Backtick {
                token: self.cur_token.clone(),
                value: self.cur_token.literal.clone(),
            }),
            TokenKind::True | TokenKind::False => Some(Expression::Boolean {
                token: self.cur_token.clone(),
                value: self.cur_token_is(&TokenKind::True),
            }),
            TokenKind::Null => Some(Expression::Null {
                token: self.cur_token.clone(),
            }),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::For => self.parse_for_loop_expression(),
            TokenKind::Foreach => self.parse_foreach_expression(),
            TokenKind::Switch => self.parse_switch_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::DefineFunction => self.parse_function_definition(),
            TokenKind::Eof | TokenKind::Illegal => None,
            _ => {
                self.errors.push(format!(
                    "no prefix parse function for {} found around line {}",
                    self.cur_token.kind,
                    self.lexer.current_line()
                ));
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        match self.cur_token.kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Pow
            | TokenKind::Mod
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEquals
            | TokenKind::Gt
            | TokenKind::GtEquals
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Contains
            | TokenKind::NotContains
            | TokenKind::DotDot => self.parse_infix_expression(left),
            TokenKind::Assign
            | TokenKind::PlusEquals
            | TokenKind::MinusEquals
            | TokenKind::AsteriskEquals
            | TokenKind::SlashEquals => self.parse_assign_expression(left),
            TokenKind::Question => self.parse_ternary_expression(left),
            TokenKind::LParen => self.parse_call_expression(left),
            TokenKind::LBracket => self.parse_index_expression(left),
            TokenKind::Period => self.parse_method_call_expression(left),
            _ => Some(left),
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let literal = token.literal.as_str();

        let parsed = if let Some(hex) = literal.strip_prefix("0x") {
            i64::from_str_radix(hex, 16)
        } else if let Some(bin) = literal.strip_prefix("0b") {
            i64::from_str_radix(bin, 2)
        } else {
            literal.parse::<i64>()
        };

        match parsed {
            Ok(value) => Some(Expression::Integer { token, value }),
            Err(_) => {
                self.errors.push(format!(
                    "could not parse {:?} as integer around line {}",
                    literal,
                    self.lexer.current_line()
                ));
                None
            }
        }
    }

    fn parse_float_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        match token.literal.parse::<f64>() {
            Ok(value) => Some(Expression::Float { token, value }),
            Err(_) => {
                self.errors.push(format!(
                    "could not parse {:?} as float around line {}",
                    self.cur_token.literal,
                    self.lexer.current_line()
                ));
                None
            }
        }
    }

    fn parse_regexp_literal(&mut self) -> Expression {
        let token = self.cur_token.clone();
        let literal = token.literal.clone();
        let mut pattern = literal.clone();
        let mut flags = String::new();

        if let Some(rest) = literal.strip_prefix("(?") {
            for (offset, ch) in rest.char_indices() {
                if ch == ')' {
                    pattern = rest[offset + 1..].to_string();
                    break;
                }
                flags.push(ch);
            }
        }

        Expression::Regexp {
            token,
            pattern,
            flags,
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    fn parse_postfix_expression(&mut self) -> Expression {
        Expression::Postfix {
            token: self.prev_token.clone(),
            operator: self.cur_token.literal.clone(),
        }
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            token,
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_assign_expression(&mut self, target: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();

        let name = match target {
            Expression::Ident(ident) => ident,
            other => {
                self.errors.push(format!(
                    "expected assign token to be IDENT, got {} instead around line {}",
                    other,
                    self.lexer.current_line()
                ));
                return None;
            }
        };

        let operator = match token.kind {
            TokenKind::PlusEquals => "+=",
            TokenKind::MinusEquals => "-=",
            TokenKind::SlashEquals => "/=",
            TokenKind::AsteriskEquals => "*=",
            _ => "=",
        }
        .to_string();

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        Some(Expression::Assign {
            token,
            name,
            operator,
            value: Box::new(value),
        })
    }

    fn parse_ternary_expression(&mut self, condition: Expression) -> Option<Expression> {
        if self.tern {
            self.errors.push(format!(
                "nested ternary expressions are illegal, around line {}",
                self.lexer.current_line()
            ));
            return None;
        }

        self.tern = true;
        let token = self.cur_token.clone();
        self.next_token();
        let precedence = self.cur_precedence();
        let if_true = self.parse_expression(precedence);

        if if_true.is_none() || !self.expect_peek(TokenKind::Colon) {
            self.tern = false;
            return None;
        }

        self.next_token();
        let if_false = self.parse_expression(precedence);
        self.tern = false;

        Some(Expression::Ternary {
            token,
            condition: Box::new(condition),
            if_true: Box::new(if_true?),
            if_false: Box::new(if_false?),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expression)
    }

    fn parse_bracket_expression(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expression)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let condition = self.parse_bracket_expression()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement()?;

        let mut alternative = None;
        if self.peek_token_is(&TokenKind::Else) {
            self.next_token();

            if self.peek_token_is(&TokenKind::If) {
                // `else if` re-enters if-parsing inside a one-statement block.
                self.next_token();
                let nested_token = self.cur_token.clone();
                let nested = self.parse_if_expression()?;
                alternative = Some(BlockStatement {
                    token: nested_token.clone(),
                    statements: vec![Statement::Expression {
                        token: nested_token,
                        expression: nested,
                    }],
                });
            } else {
                if !self.expect_peek(TokenKind::LBrace) {
                    return None;
                }
                alternative = Some(self.parse_block_statement()?);
            }
        }

        Some(Expression::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_for_loop_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement()?;
        Some(Expression::For {
            token,
            condition: Box::new(condition),
            body,
        })
    }

    fn parse_foreach_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();

        self.next_token();
        let mut ident = self.cur_token.literal.clone();
        let mut index = None;

        if self.peek_token_is(&TokenKind::Comma) {
            self.next_token();

            if !self.peek_token_is(&TokenKind::Ident) {
                self.errors.push(format!(
                    "second argument to foreach must be ident, got {:?}",
                    self.peek_token
                ));
                return None;
            }
            self.next_token();

            // The first written name becomes the index slot.
            index = Some(ident);
            ident = self.cur_token.literal.clone();
        }

        if !self.expect_peek(TokenKind::In) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.next_token();
        let body = self.parse_block_statement()?;

        Some(Expression::Foreach {
            token,
            ident,
            index,
            value: Box::new(value),
            body,
        })
    }

    fn parse_switch_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let value = self.parse_bracket_expression()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        self.next_token();

        let mut choices = Vec::new();
        while !self.cur_token_is(&TokenKind::RBrace) {
            if self.cur_token_is(&TokenKind::Eof) {
                self.errors
                    .push("unterminated switch statement".to_string());
                return None;
            }

            let arm_token = self.cur_token.clone();
            let mut default = false;
            let mut exprs = Vec::new();

            if self.cur_token_is(&TokenKind::Default) {
                default = true;
            } else if self.cur_token_is(&TokenKind::Case) {
                self.next_token();
                if self.cur_token_is(&TokenKind::Default) {
                    default = true;
                } else {
                    exprs.push(self.parse_expression(Precedence::Lowest)?);
                    while self.peek_token_is(&TokenKind::Comma) {
                        self.next_token();
                        self.next_token();
                        exprs.push(self.parse_expression(Precedence::Lowest)?);
                    }
                }
            } else {
                self.errors.push(format!(
                    "expected case|default, got {}",
                    self.cur_token.kind
                ));
                return None;
            }

            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            let block = self.parse_block_statement()?;
            self.next_token();

            choices.push(CaseArm {
                token: arm_token,
                default,
                exprs,
                block,
            });
        }

        if choices.iter().filter(|c| c.default).count() > 1 {
            self.errors
                .push("A switch-statement should only have one default block".to_string());
            return None;
        }

        Some(Expression::Switch {
            token,
            value: Box::new(value),
            choices,
        })
    }

    fn parse_block_statement(&mut self) -> Option<BlockStatement> {
        let token = self.cur_token.clone();
        let mut statements = Vec::new();
        self.next_token();

        while !self.cur_token_is(&TokenKind::RBrace) {
            if self.cur_token_is(&TokenKind::Eof) {
                self.errors.push("unterminated block statement".to_string());
                return None;
            }
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        Some(BlockStatement { token, statements })
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let (defaults, parameters) = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement()?;
        Some(Expression::FunctionLiteral {
            token,
            parameters,
            defaults,
            body,
        })
    }

    fn parse_function_definition(&mut self) -> Option<Expression> {
        self.next_token();
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let (defaults, parameters) = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement()?;
        Some(Expression::FunctionDefine {
            token,
            parameters,
            defaults,
            body,
        })
    }

    #[allow(clippy::type_complexity)]
    fn parse_function_parameters(
        &mut self,
    ) -> Option<(Vec<(String, Expression)>, Vec<Identifier>)> {
        let mut defaults = Vec::new();
        let mut identifiers = Vec::new();

        if self.peek_token_is(&TokenKind::RParen) {
            self.next_token();
            return Some((defaults, identifiers));
        }
        self.next_token();

        while !self.cur_token_is(&TokenKind::RParen) {
            if self.cur_token_is(&TokenKind::Eof) {
                self.errors
                    .push("unterminated function parameters".to_string());
                return None;
            }
            let ident = Identifier {
                token: self.cur_token.clone(),
                value: self.cur_token.literal.clone(),
            };
            let name = ident.value.clone();
            identifiers.push(ident);
            self.next_token();

            if self.cur_token_is(&TokenKind::Assign) {
                self.next_token();
                let default = self.parse_expression(Precedence::Lowest)?;
                defaults.push((name, default));
                self.next_token();
            }
            if self.cur_token_is(&TokenKind::Comma) {
                self.next_token();
            }
        }

        Some((defaults, identifiers))
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expression::Array { token, elements })
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_token_is(&end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(&TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let mut pairs = Vec::new();

        while !self.peek_token_is(&TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_token_is(&TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }
        Some(Expression::Hash { token, pairs })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        Some(Expression::Index {
            token,
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expression::Call {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_method_call_expression(&mut self, object: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        self.next_token();
        let name = Expression::Ident(Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        });
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let call = self.parse_call_expression(name)?;
        Some(Expression::ObjectCall {
            token,
            object: Box::new(object),
            call: Box::new(call),
        })
    }
}

fn has_infix(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Pow
            | TokenKind::Mod
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEquals
            | TokenKind::Gt
            | TokenKind::GtEquals
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Contains
            | TokenKind::NotContains
            | TokenKind::DotDot
            | TokenKind::Assign
            | TokenKind::PlusEquals
            | TokenKind::MinusEquals
            | TokenKind::AsteriskEquals
            | TokenKind::SlashEquals
            | TokenKind::Question
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::Period
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        assert!(
            parser.errors().is_empty(),
            "unexpected parse errors for {:?}: {:?}",
            source,
            parser.errors()
        );
        program
    }

    fn parse_errors(source: &str) -> Vec<String> {
        let mut parser = Parser::new(Lexer::new(source));
        parser.parse_program();
        parser.errors().to_vec()
    }

    fn first_expression(program: &Program) -> &Expression {
        match &program.statements[0] {
            Statement::Expression { expression, .. } => expression,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn parses_let_and_const_statements() {
        let program = parse("LET x = 5; const K = 10;");
        assert_eq!(program.statements.len(), 2);
        match &program.statements[0] {
            Statement::Let { name, .. } => assert_eq!(name.value, "x"),
            other => panic!("expected let statement, got {:?}", other),
        }
        match &program.statements[1] {
            Statement::Const { name, .. } => assert_eq!(name.value, "K"),
            other => panic!("expected const statement, got {:?}", other),
        }
    }

    #[test]
    fn unterminated_let_statement_records_an_error() {
        let errors = parse_errors("LET x = 5");
        assert!(errors.iter().any(|e| e.contains("unterminated let")));
    }

    #[test]
    fn operator_precedence_groups_as_expected() {
        let cases = [
            ("1 + 2 * 3;", "((1 + (2 * 3)));"),
            ("(1 + 2) * 3;", "(((1 + 2) * 3));"),
            ("a + b % c;", "((a + (b % c)));"),
            ("2 ** 3 * 4;", "(((2 ** 3) * 4));"),
            ("a < b == c < d;", "(((a < b) == (c < d)));"),
            ("1 .. 5;", "((1 .. 5));"),
            ("!x == y;", "(((!x) == y));"),
            ("a ~= b && c ~= d;", "(((a ~= b) && (c ~= d)));"),
        ];
        for (source, expected) in cases {
            let program = parse(source);
            let rendered = format!("({});", first_expression(&program));
            assert_eq!(rendered, expected, "source: {}", source);
        }
    }

    #[test]
    fn postfix_increment_parses_as_its_own_statement() {
        let program = parse("i++;");
        assert_eq!(program.statements.len(), 2);
        match first_expression(&program) {
            Expression::Ident(ident) => assert_eq!(ident.value, "i"),
            other => panic!("expected identifier, got {:?}", other),
        }
        match &program.statements[1] {
            Statement::Expression {
                expression: Expression::Postfix { token, operator },
                ..
            } => {
                assert_eq!(token.literal, "i");
                assert_eq!(operator, "++");
            }
            other => panic!("expected postfix statement, got {:?}", other),
        }
    }

    #[test]
    fn ternary_expressions_cannot_nest() {
        let errors = parse_errors("a ? b ? c : d : e;");
        assert!(
            errors
                .iter()
                .any(|e| e.contains("nested ternary expressions are illegal")),
            "errors: {:?}",
            errors
        );
    }

    #[test]
    fn else_if_becomes_a_nested_block() {
        let program = parse("IF (a) { 1; } ELSE IF (b) { 2; } ELSE { 3; }");
        match first_expression(&program) {
            Expression::If { alternative, .. } => {
                let alt = alternative.as_ref().expect("alternative expected");
                assert_eq!(alt.statements.len(), 1);
                match &alt.statements[0] {
                    Statement::Expression {
                        expression: Expression::If { alternative, .. },
                        ..
                    } => assert!(alternative.is_some()),
                    other => panic!("expected nested if, got {:?}", other),
                }
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn foreach_swaps_the_written_identifier_order() {
        let program = parse("foreach i, x in items { x; }");
        match first_expression(&program) {
            Expression::Foreach { ident, index, .. } => {
                assert_eq!(index.as_deref(), Some("i"));
                assert_eq!(ident, "x");
            }
            other => panic!("expected foreach, got {:?}", other),
        }

        let program = parse("foreach x in items { x; }");
        match first_expression(&program) {
            Expression::Foreach { ident, index, .. } => {
                assert_eq!(ident, "x");
                assert!(index.is_none());
            }
            other => panic!("expected foreach, got {:?}", other),
        }
    }

    #[test]
    fn switch_accepts_expression_lists_per_case() {
        let program = parse("switch (x) { case 1, 2 { 1; } case /ab/ { 2; } default { 3; } }");
        match first_expression(&program) {
            Expression::Switch { choices, .. } => {
                assert_eq!(choices.len(), 3);
                assert_eq!(choices[0].exprs.len(), 2);
                assert!(!choices[0].default);
                assert!(matches!(choices[1].exprs[0], Expression::Regexp { .. }));
                assert!(choices[2].default);
            }
            other => panic!("expected switch, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_default_arms_are_rejected() {
        let errors = parse_errors("switch (x) { default { 1; } default { 2; } }");
        assert!(errors
            .iter()
            .any(|e| e.contains("only have one default block")));
    }

    #[test]
    fn function_literal_parses_parameter_defaults() {
        let program = parse("LET f = FN(n, m = 3) { RETURN n + m; };");
        match &program.statements[0] {
            Statement::Let { value, .. } => match value {
                Expression::FunctionLiteral {
                    parameters,
                    defaults,
                    ..
                } => {
                    let names: Vec<&str> =
                        parameters.iter().map(|p| p.value.as_str()).collect();
                    assert_eq!(names, vec!["n", "m"]);
                    assert_eq!(defaults.len(), 1);
                    assert_eq!(defaults[0].0, "m");
                }
                other => panic!("expected function literal, got {:?}", other),
            },
            other => panic!("expected let statement, got {:?}", other),
        }
    }

    #[test]
    fn function_definition_keeps_its_name_token() {
        let program = parse("FUNC add(a, b) { RETURN a + b; }");
        match first_expression(&program) {
            Expression::FunctionDefine { token, .. } => assert_eq!(token.literal, "add"),
            other => panic!("expected function definition, got {:?}", other),
        }
    }

    #[test]
    fn method_calls_wrap_a_call_expression() {
        let program = parse("name.len();");
        match first_expression(&program) {
            Expression::ObjectCall { object, call, .. } => {
                assert!(matches!(object.as_ref(), Expression::Ident(_)));
                match call.as_ref() {
                    Expression::Call { function, .. } => match function.as_ref() {
                        Expression::Ident(ident) => assert_eq!(ident.value, "len"),
                        other => panic!("expected method name, got {:?}", other),
                    },
                    other => panic!("expected call, got {:?}", other),
                }
            }
            other => panic!("expected object call, got {:?}", other),
        }
    }

    #[test]
    fn hash_literals_preserve_pair_order() {
        let program = parse("{\"a\": 1, \"b\": 2, 3: \"c\"};");
        match first_expression(&program) {
            Expression::Hash { pairs, .. } => assert_eq!(pairs.len(), 3),
            other => panic!("expected hash literal, got {:?}", other),
        }
    }

    #[test]
    fn integer_literals_accept_binary_and_hex_prefixes() {
        let program = parse("0b1010; 0x10;");
        match first_expression(&program) {
            Expression::Integer { value, .. } => assert_eq!(*value, 10),
            other => panic!("expected integer, got {:?}", other),
        }
        match &program.statements[1] {
            Statement::Expression {
                expression: Expression::Integer { value, .. },
                ..
            } => assert_eq!(*value, 16),
            other => panic!("expected integer, got {:?}", other),
        }
    }

    #[test]
    fn regexp_literals_split_pattern_and_flags() {
        let program = parse("LET r = /he(l+)o/im;");
        match &program.statements[0] {
            Statement::Let { value, .. } => match value {
                Expression::Regexp { pattern, flags, .. } => {
                    assert_eq!(pattern, "he(l+)o");
                    assert_eq!(flags, "im");
                }
                other => panic!("expected regexp literal, got {:?}", other),
            },
            other => panic!("expected let statement, got {:?}", other),
        }
    }

    #[test]
    fn missing_prefix_function_is_reported_with_a_line() {
        let errors = parse_errors("LET x = ];");
        assert!(errors
            .iter()
            .any(|e| e.contains("no prefix parse function for ]")));
    }

    #[test]
    fn assignment_targets_must_be_identifiers() {
        let errors = parse_errors("3 = 4;");
        assert!(errors
            .iter()
            .any(|e| e.contains("expected assign token to be IDENT")));
    }

    #[test]
    fn printed_programs_reparse_to_the_same_rendering() {
        let sources = [
            "LET x = 1 + 2 * 3;",
            "IF (x > 2) { PRINT(x); } ELSE { PRINT(0); };",
            "foreach i, e in [1, 2, 3] { PRINT(e); };",
            "FUNC add(a, b = 2) { RETURN a + b; };",
            "switch (x) { case 1, 2 { y; } default { z; } };",
            "LET h = {\"k\": [1, 2], 3: TRUE};",
        ];
        for source in sources {
            let first = parse(source).to_string();
            let second = parse(&first).to_string();
            assert_eq!(first, second, "source: {}", source);
        }
    }
}
