use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::process;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex, RwLock};

use regex::Regex;

use crate::ast::{BlockStatement, Expression, Program, Statement};
use crate::error::{LangError, LangResult};
use crate::object::{
    BuiltinFn, Environment, FunctionValue, HashKey, HashPair, Value,
};

// Process-wide state: the pragma set and the builtin registry. Both are
// populated during bring-up and shared by every evaluator.
static PRAGMAS: LazyLock<Mutex<BTreeSet<String>>> =
    LazyLock::new(|| Mutex::new(BTreeSet::new()));

static BUILTINS: LazyLock<RwLock<HashMap<String, BuiltinFn>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

pub fn register_builtin(name: &str, func: BuiltinFn) {
    BUILTINS
        .write()
        .expect("builtin registry poisoned")
        .insert(name.to_string(), func);
}

pub fn lookup_builtin(name: &str) -> Option<BuiltinFn> {
    BUILTINS
        .read()
        .expect("builtin registry poisoned")
        .get(name)
        .copied()
}

pub fn pragma_set(name: &str) {
    PRAGMAS
        .lock()
        .expect("pragma set poisoned")
        .insert(name.to_string());
}

pub fn pragma_clear(name: &str) {
    PRAGMAS.lock().expect("pragma set poisoned").remove(name);
}

pub fn pragma_enabled(name: &str) -> bool {
    PRAGMAS.lock().expect("pragma set poisoned").contains(name)
}

pub fn pragmas() -> Vec<String> {
    PRAGMAS
        .lock()
        .expect("pragma set poisoned")
        .iter()
        .cloned()
        .collect()
}

fn fail_if_strict() {
    if pragma_enabled("strict") {
        process::exit(1);
    }
}

// The host-visible cancellation signal. Tripping it makes the evaluator
// return an error from the next node it visits.
#[derive(Default, Debug)]
pub struct CancelFlag {
    tripped: AtomicBool,
    reason: Mutex<Option<String>>,
}

impl CancelFlag {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn trip(&self, reason: &str) {
        *self.reason.lock().expect("cancel reason poisoned") = Some(reason.to_string());
        self.tripped.store(true, Ordering::Release);
    }

    pub fn check(&self) -> Option<String> {
        if !self.tripped.load(Ordering::Acquire) {
            return None;
        }
        Some(
            self.reason
                .lock()
                .expect("cancel reason poisoned")
                .clone()
                .unwrap_or_else(|| "execution cancelled".to_string()),
        )
    }
}

static COMMAND_SPLITTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\s"']+|"([^"]*)"|'([^']*)'"#).expect("argv splitter"));

#[derive(Debug)]
pub struct Interpreter {
    global: Rc<Environment>,
    cancel: Arc<CancelFlag>,
}

impl Interpreter {
    pub fn new() -> Self {
        crate::builtins::install();
        Self {
            global: Environment::new(),
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_cancel_flag(cancel: Arc<CancelFlag>) -> Self {
        crate::builtins::install();
        Self {
            global: Environment::new(),
            cancel,
        }
    }

    // Evaluate against an existing scope; used by the `eval` builtin.
    pub fn with_environment(env: Rc<Environment>) -> Self {
        crate::builtins::install();
        Self {
            global: env,
            cancel: CancelFlag::new(),
        }
    }

    pub fn global(&self) -> &Rc<Environment> {
        &self.global
    }

    pub fn eval_program(&self, program: &Program) -> LangResult<Value> {
        let mut result = Value::Null;
        for statement in &program.statements {
            result = self.eval_statement(statement, Rc::clone(&self.global))?;
            if let Value::Return(inner) = result {
                return Ok(*inner);
            }
        }
        Ok(result)
    }

    fn check_cancelled(&self) -> LangResult<()> {
        match self.cancel.check() {
            Some(reason) => Err(LangError::Runtime(reason)),
            None => Ok(()),
        }
    }

    fn eval_statement(&self, statement: &Statement, env: Rc<Environment>) -> LangResult<Value> {
        self.check_cancelled()?;
        match statement {
            Statement::Let { name, value, .. } => {
                let value = self.eval_expression(value, Rc::clone(&env))?;
                env.define(&name.value, value.clone());
                Ok(value)
            }
            Statement::Const { name, value, .. } => {
                let value = self.eval_expression(value, Rc::clone(&env))?;
                env.define_const(&name.value, value.clone());
                Ok(value)
            }
            Statement::Return { value, .. } => {
                let value = self.eval_expression(value, env)?;
                Ok(Value::Return(Box::new(value)))
            }
            Statement::Expression { expression, .. } => self.eval_expression(expression, env),
        }
    }

    fn eval_block(&self, block: &BlockStatement, env: Rc<Environment>) -> LangResult<Value> {
        let mut result = Value::Null;
        for statement in &block.statements {
            result = self.eval_statement(statement, Rc::clone(&env))?;
            if let Value::Return(_) = result {
                return Ok(result);
            }
        }
        Ok(result)
    }

    fn eval_expression(&self, expression: &Expression, env: Rc<Environment>) -> LangResult<Value> {
        self.check_cancelled()?;
        match expression {
            Expression::Integer { value, .. } => Ok(Value::Integer(*value)),
            Expression::Float { value, .. } => Ok(Value::Float(*value)),
            Expression::Boolean { value, .. } => Ok(Value::Boolean(*value)),
            Expression::Null { .. } => Ok(Value::Null),
            Expression::Str { value, .. } => Ok(Value::Str(value.clone())),
            Expression::Regexp { pattern, flags, .. } => Ok(Value::Regexp {
                pattern: pattern.clone(),
                flags: flags.clone(),
            }),
            Expression::Backtick { value, .. } => self.run_backtick(value),
            Expression::Array { elements, .. } => {
                let values = self.eval_expressions(elements, &env)?;
                Ok(Value::Array(Rc::new(values)))
            }
            Expression::Hash { pairs, .. } => self.eval_hash_literal(pairs, env),
            Expression::Ident(ident) => self.eval_identifier(&ident.value, &env),
            Expression::Prefix {
                operator, right, ..
            } => {
                let right = self.eval_expression(right, env)?;
                eval_prefix_expression(operator, right)
            }
            Expression::Postfix { token, operator } => {
                self.eval_postfix_expression(&env, &token.literal, operator)
            }
            Expression::Infix {
                operator,
                left,
                right,
                ..
            } => {
                let left = self.eval_expression(left, Rc::clone(&env))?;
                let right = self.eval_expression(right, Rc::clone(&env))?;
                match self.eval_infix_expression(operator, left, right, &env) {
                    Ok(value) => Ok(value),
                    Err(err) => {
                        eprintln!("Error: {}", err);
                        fail_if_strict();
                        Err(err)
                    }
                }
            }
            Expression::Assign {
                name,
                operator,
                value,
                ..
            } => self.eval_assign_expression(&name.value, operator, value, env),
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => self.eval_if_expression(condition, consequence, alternative.as_ref(), env),
            Expression::Ternary {
                condition,
                if_true,
                if_false,
                ..
            } => {
                let condition = self.eval_expression(condition, Rc::clone(&env))?;
                if condition.is_truthy() {
                    self.eval_expression(if_true, env)
                } else {
                    self.eval_expression(if_false, env)
                }
            }
            Expression::For {
                condition, body, ..
            } => self.eval_for_loop(condition, body, env),
            Expression::Foreach {
                ident,
                index,
                value,
                body,
                ..
            } => self.eval_foreach(ident, index.as_deref(), value, body, env),
            Expression::Switch {
                value, choices, ..
            } => self.eval_switch(value, choices, env),
            Expression::FunctionLiteral {
                parameters,
                defaults,
                body,
                ..
            } => Ok(Value::Function(Rc::new(FunctionValue {
                parameters: parameters.clone(),
                defaults: defaults.clone(),
                body: body.clone(),
                env: Rc::clone(&env),
            }))),
            Expression::FunctionDefine {
                token,
                parameters,
                defaults,
                body,
            } => {
                let function = Value::Function(Rc::new(FunctionValue {
                    parameters: parameters.clone(),
                    defaults: defaults.clone(),
                    body: body.clone(),
                    env: Rc::clone(&env),
                }));
                env.define(&token.literal, function);
                Ok(Value::Null)
            }
            Expression::Call {
                function,
                arguments,
                ..
            } => {
                let callee = self.eval_expression(function, Rc::clone(&env))?;
                let args = self.eval_expressions(arguments, &env)?;
                match self.apply_function(&env, callee, args) {
                    Ok(value) => Ok(value),
                    Err(err) => {
                        eprintln!("Error calling `{}` : {}", function, err);
                        fail_if_strict();
                        Err(err)
                    }
                }
            }
            Expression::Index { left, index, .. } => {
                let left = self.eval_expression(left, Rc::clone(&env))?;
                let index = self.eval_expression(index, env)?;
                eval_index_expression(left, index)
            }
            Expression::ObjectCall { object, call, .. } => {
                match self.eval_object_call(object, call, &env) {
                    Ok(value) => Ok(value),
                    Err(err) => {
                        eprintln!("Error calling object-method {}", err);
                        fail_if_strict();
                        Err(err)
                    }
                }
            }
        }
    }

    fn eval_expressions(
        &self,
        expressions: &[Expression],
        env: &Rc<Environment>,
    ) -> LangResult<Vec<Value>> {
        let mut values = Vec::with_capacity(expressions.len());
        for expression in expressions {
            values.push(self.eval_expression(expression, Rc::clone(env))?);
        }
        Ok(values)
    }

    fn eval_identifier(&self, name: &str, env: &Rc<Environment>) -> LangResult<Value> {
        if let Some(value) = env.get(name) {
            return Ok(value);
        }
        if let Some(builtin) = lookup_builtin(name) {
            return Ok(Value::Builtin(builtin));
        }
        eprintln!("identifier not found: {}", name);
        fail_if_strict();
        Err(LangError::Runtime(format!("identifier not found: {}", name)))
    }

    fn eval_postfix_expression(
        &self,
        env: &Rc<Environment>,
        name: &str,
        operator: &str,
    ) -> LangResult<Value> {
        let value = env
            .get(name)
            .ok_or_else(|| LangError::Runtime(format!("{} is unknown", name)))?;
        match value {
            Value::Integer(current) => {
                let next = match operator {
                    "++" => current.wrapping_add(1),
                    _ => current.wrapping_sub(1),
                };
                env.assign(name, Value::Integer(next));
                Ok(Value::Integer(current))
            }
            _ => Err(LangError::Runtime(format!("{} is not an int", name))),
        }
    }

    fn eval_assign_expression(
        &self,
        name: &str,
        operator: &str,
        value: &Expression,
        env: Rc<Environment>,
    ) -> LangResult<Value> {
        let evaluated = self.eval_expression(value, Rc::clone(&env))?;

        match operator {
            "+=" | "-=" | "*=" | "/=" => {
                let current = env
                    .get(name)
                    .ok_or_else(|| LangError::Runtime(format!("{} is unknown", name)))?;
                let result =
                    match self.eval_infix_expression(operator, current, evaluated, &env) {
                        Ok(result) => result,
                        Err(err) => {
                            eprintln!("Error handling {} {}", operator, err);
                            return Err(err);
                        }
                    };
                env.assign(name, result.clone());
                Ok(result)
            }
            _ => {
                if pragma_enabled("strict") && !env.binds(name) {
                    eprintln!(
                        "Setting unknown variable '{}' is a bug under strict-pragma!",
                        name
                    );
                    process::exit(1);
                }
                env.assign(name, evaluated.clone());
                Ok(evaluated)
            }
        }
    }

    fn eval_if_expression(
        &self,
        condition: &Expression,
        consequence: &BlockStatement,
        alternative: Option<&BlockStatement>,
        env: Rc<Environment>,
    ) -> LangResult<Value> {
        // Regexp captures bound while testing the condition stay visible
        // inside the branches but never leak outside.
        let permit: Vec<String> = (1..32).map(|i| format!("${}", i)).collect();
        let scope = Environment::new_temporary_scope(env, permit);

        let condition = self.eval_expression(condition, Rc::clone(&scope))?;
        if condition.is_truthy() {
            self.eval_block(consequence, scope)
        } else if let Some(alternative) = alternative {
            self.eval_block(alternative, scope)
        } else {
            Ok(Value::Null)
        }
    }

    fn eval_for_loop(
        &self,
        condition: &Expression,
        body: &BlockStatement,
        env: Rc<Environment>,
    ) -> LangResult<Value> {
        loop {
            let condition = self.eval_expression(condition, Rc::clone(&env))?;
            if !condition.is_truthy() {
                break;
            }
            let result = self.eval_block(body, Rc::clone(&env))?;
            if let Value::Return(_) = result {
                return Ok(result);
            }
        }
        Ok(Value::Boolean(true))
    }

    fn eval_foreach(
        &self,
        ident: &str,
        index: Option<&str>,
        value: &Expression,
        body: &BlockStatement,
        env: Rc<Environment>,
    ) -> LangResult<Value> {
        let value = self.eval_expression(value, Rc::clone(&env))?;
        let mut iterator = value.iterator().ok_or_else(|| {
            LangError::Runtime(format!(
                "{} object doesn't implement the Iterable interface",
                value.type_name()
            ))
        })?;

        let mut permit = vec![ident.to_string()];
        if let Some(index) = index {
            permit.push(index.to_string());
        }
        let child = Environment::new_temporary_scope(env, permit);

        iterator.reset();
        while let Some((element, position)) = iterator.next() {
            child.assign(ident, element);
            if let Some(index) = index {
                child.assign(index, position);
            }

            let result = self.eval_block(body, Rc::clone(&child))?;
            if let Value::Return(_) = result {
                return Ok(result);
            }
        }

        Ok(Value::Null)
    }

    fn eval_switch(
        &self,
        value: &Expression,
        choices: &[crate::ast::CaseArm],
        env: Rc<Environment>,
    ) -> LangResult<Value> {
        let scrutinee = self.eval_expression(value, Rc::clone(&env))?;

        for arm in choices {
            if arm.default {
                continue;
            }
            for case in &arm.exprs {
                let candidate = self.eval_expression(case, Rc::clone(&env))?;

                if scrutinee.type_name() == candidate.type_name()
                    && scrutinee.inspect() == candidate.inspect()
                {
                    return self.eval_block(&arm.block, env);
                }

                if let Value::Regexp { .. } = candidate {
                    if let Value::Boolean(true) =
                        self.matches(scrutinee.clone(), candidate, &env)?
                    {
                        return self.eval_block(&arm.block, env);
                    }
                }
            }
        }

        for arm in choices {
            if arm.default {
                return self.eval_block(&arm.block, env);
            }
        }

        Ok(Value::Null)
    }

    fn eval_hash_literal(
        &self,
        pairs: &[(Expression, Expression)],
        env: Rc<Environment>,
    ) -> LangResult<Value> {
        let mut map: BTreeMap<HashKey, HashPair> = BTreeMap::new();
        for (key_expr, value_expr) in pairs {
            let key = self.eval_expression(key_expr, Rc::clone(&env))?;
            let hash_key = key.hash_key().ok_or_else(|| {
                LangError::Runtime(format!("unusable as hash key: {}", key.type_name()))
            })?;
            let value = self.eval_expression(value_expr, Rc::clone(&env))?;
            map.insert(hash_key, HashPair { key, value });
        }
        Ok(Value::Hash(Rc::new(map)))
    }

    fn eval_infix_expression(
        &self,
        operator: &str,
        left: Value,
        right: Value,
        env: &Rc<Environment>,
    ) -> LangResult<Value> {
        match operator {
            // Both operands are always evaluated before either is coerced.
            "&&" => return Ok(Value::Boolean(left.is_truthy() && right.is_truthy())),
            "||" => return Ok(Value::Boolean(left.is_truthy() || right.is_truthy())),
            "~=" => return self.matches(left, right, env),
            "!~" => return not_matches(left, right),
            _ => {}
        }

        match (&left, &right) {
            (Value::Integer(l), Value::Integer(r)) => {
                eval_integer_infix_expression(operator, *l, *r)
            }
            (Value::Float(l), Value::Float(r)) => {
                eval_float_infix_expression(operator, *l, *r, "FLOAT", "FLOAT")
            }
            (Value::Float(l), Value::Integer(r)) => {
                eval_float_infix_expression(operator, *l, *r as f64, "FLOAT", "INTEGER")
            }
            (Value::Integer(l), Value::Float(r)) => {
                eval_float_infix_expression(operator, *l as f64, *r, "INTEGER", "FLOAT")
            }
            (Value::Str(l), Value::Str(r)) => eval_string_infix_expression(operator, l, r),
            (Value::Boolean(_), Value::Boolean(_))
                if matches!(operator, "<" | "<=" | ">" | ">=") =>
            {
                eval_string_infix_expression(operator, &left.inspect(), &right.inspect())
            }
            _ => match operator {
                "==" => Ok(Value::Boolean(left.identity_eq(&right))),
                "!=" => Ok(Value::Boolean(!left.identity_eq(&right))),
                _ if left.type_name() != right.type_name() => Err(LangError::Runtime(format!(
                    "type mismatch: {} {} {}",
                    left.type_name(),
                    operator,
                    right.type_name()
                ))),
                _ => Err(LangError::Runtime(format!(
                    "unknown operator: {} {} {}",
                    left.type_name(),
                    operator,
                    right.type_name()
                ))),
            },
        }
    }

    fn matches(&self, left: Value, right: Value, env: &Rc<Environment>) -> LangResult<Value> {
        let subject = left.inspect();
        let (pattern, flags) = match right {
            Value::Regexp { pattern, flags } => (pattern, flags),
            other => {
                return Err(LangError::Runtime(format!(
                    "regexp required for regexp-match, given {}",
                    other.type_name()
                )))
            }
        };

        let source = if flags.is_empty() {
            pattern.clone()
        } else {
            format!("(?{}){}", flags, pattern)
        };

        let re = Regex::new(&source).map_err(|err| {
            LangError::Runtime(format!("error compiling regexp '{}': {}", pattern, err))
        })?;

        match re.captures(&subject) {
            Some(captures) => {
                // Captures become $1..$n in the enclosing scope.
                for i in 1..captures.len() {
                    let text = captures.get(i).map(|m| m.as_str()).unwrap_or("");
                    env.assign(&format!("${}", i), Value::Str(text.to_string()));
                }
                Ok(Value::Boolean(true))
            }
            None => Ok(Value::Boolean(false)),
        }
    }

    fn apply_function(
        &self,
        env: &Rc<Environment>,
        callee: Value,
        args: Vec<Value>,
    ) -> LangResult<Value> {
        match callee {
            Value::Function(function) => {
                let extended = self.extend_function_env(&function, args)?;
                let evaluated = self.eval_block(&function.body, extended)?;
                Ok(unwrap_return(evaluated))
            }
            Value::Builtin(builtin) => builtin(env, &args),
            other => Err(LangError::Runtime(format!(
                "not a function: {}",
                other.type_name()
            ))),
        }
    }

    // Defaults first (so they may build on one another), then positional
    // arguments; extra arguments are dropped, missing ones stay unbound.
    fn extend_function_env(
        &self,
        function: &FunctionValue,
        args: Vec<Value>,
    ) -> LangResult<Rc<Environment>> {
        let env = Environment::new_enclosed(Rc::clone(&function.env));
        for (name, default) in &function.defaults {
            let value = self.eval_expression(default, Rc::clone(&env))?;
            env.define(name, value);
        }
        for (position, parameter) in function.parameters.iter().enumerate() {
            if position < args.len() {
                env.define(&parameter.value, args[position].clone());
            }
        }
        Ok(env)
    }

    fn eval_object_call(
        &self,
        object: &Expression,
        call: &Expression,
        env: &Rc<Environment>,
    ) -> LangResult<Value> {
        let receiver = self.eval_expression(object, Rc::clone(env))?;

        let (method, arguments) = match call {
            Expression::Call {
                function,
                arguments,
                ..
            } => {
                let name = match function.as_ref() {
                    Expression::Ident(ident) => ident.value.clone(),
                    other => other.to_string(),
                };
                (name, arguments)
            }
            _ => {
                return Err(LangError::Runtime(
                    "Failed to invoke method".to_string(),
                ))
            }
        };

        let args = self.eval_expressions(arguments, env)?;

        if let Some(result) = receiver.invoke_method(&method, env, &args) {
            return result;
        }

        // Fall back to user definitions under `<type>.` then `object.`.
        let type_prefix = receiver.type_name().to_lowercase();
        for prefix in [type_prefix.as_str(), "object"] {
            let qualified = format!("{}.{}", prefix, method);
            if let Some(Value::Function(function)) = env.get(&qualified) {
                let extended = self.extend_function_env(&function, args.clone())?;
                extended.define("self", receiver.clone());
                let evaluated = self.eval_block(&function.body, extended)?;
                return Ok(unwrap_return(evaluated));
            }
        }

        Err(LangError::Runtime(format!(
            "Failed to invoke method: {}",
            method
        )))
    }

    fn run_backtick(&self, command: &str) -> LangResult<Value> {
        let argv = split_command(command);
        if argv.is_empty() {
            return Ok(Value::Null);
        }

        match process::Command::new(&argv[0]).args(&argv[1..]).output() {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();

                let mut pairs = BTreeMap::new();
                for (name, text) in [("stdout", stdout), ("stderr", stderr)] {
                    let key = Value::Str(name.to_string());
                    let hash_key = key.hash_key().expect("strings hash");
                    pairs.insert(
                        hash_key,
                        HashPair {
                            key,
                            value: Value::Str(text),
                        },
                    );
                }
                Ok(Value::Hash(Rc::new(pairs)))
            }
            Err(err) => {
                // A spawn failure is reported; a non-zero exit is not.
                eprintln!("Failed to run '{}' -> {}", command, err);
                Ok(Value::Null)
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn unwrap_return(value: Value) -> Value {
    match value {
        Value::Return(inner) => *inner,
        other => other,
    }
}

fn eval_prefix_expression(operator: &str, right: Value) -> LangResult<Value> {
    match operator {
        "!" => Ok(eval_bang_expression(right)),
        "-" => match right {
            Value::Integer(value) => Ok(Value::Integer(value.wrapping_neg())),
            Value::Float(value) => Ok(Value::Float(-value)),
            other => Err(LangError::Runtime(format!(
                "unknown operator: -{}",
                other.type_name()
            ))),
        },
        _ => Err(LangError::Runtime(format!(
            "unknown operator: {}{}",
            operator,
            right.type_name()
        ))),
    }
}

// `!` only folds the boolean singletons and null; every other concrete
// value negates to false.
fn eval_bang_expression(right: Value) -> Value {
    match right {
        Value::Boolean(true) => Value::Boolean(false),
        Value::Boolean(false) => Value::Boolean(true),
        Value::Null => Value::Boolean(true),
        _ => Value::Boolean(false),
    }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> LangResult<Value> {
    match operator {
        "+" | "+=" => Ok(Value::Integer(left.wrapping_add(right))),
        "-" | "-=" => Ok(Value::Integer(left.wrapping_sub(right))),
        "*" | "*=" => Ok(Value::Integer(left.wrapping_mul(right))),
        "/" | "/=" => {
            if right == 0 {
                Err(LangError::Runtime("division by zero".to_string()))
            } else {
                Ok(Value::Integer(left.wrapping_div(right)))
            }
        }
        "%" => {
            if right == 0 {
                Err(LangError::Runtime("modulo by zero".to_string()))
            } else {
                Ok(Value::Integer(left.wrapping_rem(right)))
            }
        }
        "**" => Ok(Value::Integer((left as f64).powf(right as f64) as i64)),
        "<" => Ok(Value::Boolean(left < right)),
        "<=" => Ok(Value::Boolean(left <= right)),
        ">" => Ok(Value::Boolean(left > right)),
        ">=" => Ok(Value::Boolean(left >= right)),
        "==" => Ok(Value::Boolean(left == right)),
        "!=" => Ok(Value::Boolean(left != right)),
        ".." => {
            // The closed range; empty when the bounds are inverted.
            let mut elements = Vec::new();
            if left <= right {
                elements.reserve((right - left + 1) as usize);
                for value in left..=right {
                    elements.push(Value::Integer(value));
                }
            }
            Ok(Value::Array(Rc::new(elements)))
        }
        _ => Err(LangError::Runtime(format!(
            "unknown operator: INTEGER {} INTEGER",
            operator
        ))),
    }
}

fn eval_float_infix_expression(
    operator: &str,
    left: f64,
    right: f64,
    left_type: &str,
    right_type: &str,
) -> LangResult<Value> {
    match operator {
        "+" | "+=" => Ok(Value::Float(left + right)),
        "-" | "-=" => Ok(Value::Float(left - right)),
        "*" | "*=" => Ok(Value::Float(left * right)),
        "/" | "/=" => Ok(Value::Float(left / right)),
        "**" => Ok(Value::Float(left.powf(right))),
        "<" => Ok(Value::Boolean(left < right)),
        "<=" => Ok(Value::Boolean(left <= right)),
        ">" => Ok(Value::Boolean(left > right)),
        ">=" => Ok(Value::Boolean(left >= right)),
        "==" => Ok(Value::Boolean(left == right)),
        "!=" => Ok(Value::Boolean(left != right)),
        _ => Err(LangError::Runtime(format!(
            "unknown operator: {} {} {}",
            left_type, operator, right_type
        ))),
    }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> LangResult<Value> {
    match operator {
        "==" => Ok(Value::Boolean(left == right)),
        "!=" => Ok(Value::Boolean(left != right)),
        ">=" => Ok(Value::Boolean(left >= right)),
        ">" => Ok(Value::Boolean(left > right)),
        "<=" => Ok(Value::Boolean(left <= right)),
        "<" => Ok(Value::Boolean(left < right)),
        "+" | "+=" => Ok(Value::Str(format!("{}{}", left, right))),
        _ => Err(LangError::Runtime(format!(
            "unknown operator: STRING {} STRING",
            operator
        ))),
    }
}

fn not_matches(left: Value, right: Value) -> LangResult<Value> {
    let subject = left.inspect();
    let (pattern, flags) = match right {
        Value::Regexp { pattern, flags } => (pattern, flags),
        other => {
            return Err(LangError::Runtime(format!(
                "regexp required for regexp-match, given {}",
                other.type_name()
            )))
        }
    };

    let source = if flags.is_empty() {
        pattern.clone()
    } else {
        format!("(?{}){}", flags, pattern)
    };

    let re = Regex::new(&source).map_err(|err| {
        LangError::Runtime(format!("error compiling regexp '{}': {}", pattern, err))
    })?;

    Ok(Value::Boolean(!re.is_match(&subject)))
}

fn eval_index_expression(left: Value, index: Value) -> LangResult<Value> {
    match (&left, &index) {
        (Value::Array(elements), Value::Integer(position)) => {
            if *position < 0 || *position as usize >= elements.len() {
                Ok(Value::Null)
            } else {
                Ok(elements[*position as usize].clone())
            }
        }
        (Value::Hash(pairs), _) => {
            let key = index.hash_key().ok_or_else(|| {
                LangError::Runtime(format!("unusable as hash key: {}", index.type_name()))
            })?;
            Ok(pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Value::Null))
        }
        (Value::Str(text), Value::Integer(position)) => {
            if *position < 0 {
                return Ok(Value::Null);
            }
            Ok(text
                .chars()
                .nth(*position as usize)
                .map(|ch| Value::Str(ch.to_string()))
                .unwrap_or(Value::Null))
        }
        _ => Err(LangError::Runtime(format!(
            "index operator not support:{}",
            left.type_name()
        ))),
    }
}

fn split_command(input: &str) -> Vec<String> {
    COMMAND_SPLITTER
        .find_iter(input)
        .map(|m| trim_quotes(m.as_str()).to_string())
        .collect()
}

fn trim_quotes(word: &str) -> &str {
    for quote in ['"', '\''] {
        if word.len() >= 2 && word.starts_with(quote) && word.ends_with(quote) {
            return &word[1..word.len() - 1];
        }
    }
    word
}
