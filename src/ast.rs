use std::fmt;

use crate::lexer::Token;

#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone)]
pub enum Statement {
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Const {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Return {
        token: Token,
        value: Expression,
    },
    Expression {
        token: Token,
        expression: Expression,
    },
}

#[derive(Debug, Clone)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct CaseArm {
    pub token: Token,
    pub default: bool,
    pub exprs: Vec<Expression>,
    pub block: BlockStatement,
}

#[derive(Debug, Clone)]
pub enum Expression {
    Integer {
        token: Token,
        value: i64,
    },
    Float {
        token: Token,
        value: f64,
    },
    Boolean {
        token: Token,
        value: bool,
    },
    Null {
        token: Token,
    },
    Str {
        token: Token,
        value: String,
    },
    Regexp {
        token: Token,
        pattern: String,
        flags: String,
    },
    Backtick {
        token: Token,
        value: String,
    },
    Array {
        token: Token,
        elements: Vec<Expression>,
    },
    Hash {
        token: Token,
        pairs: Vec<(Expression, Expression)>,
    },
    Ident(Identifier),
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expression>,
    },
    Infix {
        token: Token,
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    // The token is the operand's identifier token; `x++` reaches the
    // parser as two statements and the operand is recovered from the
    // previous token.
    Postfix {
        token: Token,
        operator: String,
    },
    Assign {
        token: Token,
        name: Identifier,
        operator: String,
        value: Box<Expression>,
    },
    If {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    Ternary {
        token: Token,
        condition: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
    },
    For {
        token: Token,
        condition: Box<Expression>,
        body: BlockStatement,
    },
    Foreach {
        token: Token,
        ident: String,
        index: Option<String>,
        value: Box<Expression>,
        body: BlockStatement,
    },
    Switch {
        token: Token,
        value: Box<Expression>,
        choices: Vec<CaseArm>,
    },
    FunctionLiteral {
        token: Token,
        parameters: Vec<Identifier>,
        defaults: Vec<(String, Expression)>,
        body: BlockStatement,
    },
    // The token is the name token following FUNC.
    FunctionDefine {
        token: Token,
        parameters: Vec<Identifier>,
        defaults: Vec<(String, Expression)>,
        body: BlockStatement,
    },
    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Index {
        token: Token,
        left: Box<Expression>,
        index: Box<Expression>,
    },
    ObjectCall {
        token: Token,
        object: Box<Expression>,
        call: Box<Expression>,
    },
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.statements.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value, .. } => write!(f, "LET {} = {};", name, value),
            Statement::Const { name, value, .. } => write!(f, "const {} = {};", name, value),
            Statement::Return { value, .. } => write!(f, "RETURN {};", value),
            Statement::Expression { expression, .. } => write!(f, "{};", expression),
        }
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.statements.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

fn escape_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn join_params(parameters: &[Identifier], defaults: &[(String, Expression)]) -> String {
    parameters
        .iter()
        .map(|param| {
            match defaults.iter().find(|(name, _)| *name == param.value) {
                Some((_, default)) => format!("{} = {}", param.value, default),
                None => param.value.clone(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Integer { token, .. } => write!(f, "{}", token.literal),
            Expression::Float { token, .. } => write!(f, "{}", token.literal),
            Expression::Boolean { value, .. } => {
                write!(f, "{}", if *value { "TRUE" } else { "FALSE" })
            }
            Expression::Null { .. } => write!(f, "NIL"),
            Expression::Str { value, .. } => write!(f, "\"{}\"", escape_string(value)),
            Expression::Regexp { pattern, flags, .. } => write!(f, "/{}/{}", pattern, flags),
            Expression::Backtick { value, .. } => write!(f, "`{}`", value),
            Expression::Array { elements, .. } => {
                let rendered: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Expression::Hash { pairs, .. } => {
                let rendered: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Expression::Ident(ident) => write!(f, "{}", ident),
            Expression::Prefix {
                operator, right, ..
            } => write!(f, "({}{})", operator, right),
            Expression::Infix {
                operator,
                left,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::Postfix {
                token, operator, ..
            } => write!(f, "{}{}", token.literal, operator),
            Expression::Assign {
                name,
                operator,
                value,
                ..
            } => write!(f, "{} {} {}", name, operator, value),
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => match alternative {
                Some(alt) => write!(f, "IF ({}) {{ {} }} ELSE {{ {} }}", condition, consequence, alt),
                None => write!(f, "IF ({}) {{ {} }}", condition, consequence),
            },
            Expression::Ternary {
                condition,
                if_true,
                if_false,
                ..
            } => write!(f, "({} ? {} : {})", condition, if_true, if_false),
            Expression::For {
                condition, body, ..
            } => write!(f, "WHILE ({}) {{ {} }}", condition, body),
            Expression::Foreach {
                ident,
                index,
                value,
                body,
                ..
            } => match index {
                Some(index) => {
                    write!(f, "foreach {}, {} in {} {{ {} }}", index, ident, value, body)
                }
                None => write!(f, "foreach {} in {} {{ {} }}", ident, value, body),
            },
            Expression::Switch {
                value, choices, ..
            } => {
                write!(f, "switch ({}) {{ ", value)?;
                for arm in choices {
                    if arm.default {
                        write!(f, "default {{ {} }} ", arm.block)?;
                    } else {
                        let exprs: Vec<String> = arm.exprs.iter().map(|e| e.to_string()).collect();
                        write!(f, "case {} {{ {} }} ", exprs.join(", "), arm.block)?;
                    }
                }
                write!(f, "}}")
            }
            Expression::FunctionLiteral {
                parameters,
                defaults,
                body,
                ..
            } => write!(f, "FN({}) {{ {} }}", join_params(parameters, defaults), body),
            Expression::FunctionDefine {
                token,
                parameters,
                defaults,
                body,
            } => write!(
                f,
                "FUNC {}({}) {{ {} }}",
                token.literal,
                join_params(parameters, defaults),
                body
            ),
            Expression::Call {
                function,
                arguments,
                ..
            } => {
                let rendered: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", function, rendered.join(", "))
            }
            Expression::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
            Expression::ObjectCall { object, call, .. } => write!(f, "{}.{}", object, call),
        }
    }
}
