use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::fs::OpenOptions;
use std::hash::Hasher;
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::process;
use std::rc::Rc;

use fnv::FnvHasher;

use crate::ast::{BlockStatement, Expression, Identifier};
use crate::error::{LangError, LangResult};

pub type BuiltinFn = fn(&Rc<Environment>, &[Value]) -> LangResult<Value>;

#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
    Str(String),
    Regexp { pattern: String, flags: String },
    Array(Rc<Vec<Value>>),
    Hash(Rc<BTreeMap<HashKey, HashPair>>),
    Function(Rc<FunctionValue>),
    Builtin(BuiltinFn),
    File(Rc<RefCell<FileValue>>),
    Return(Box<Value>),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashKey {
    kind: &'static str,
    value: u64,
}

#[derive(Clone)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

pub struct FunctionValue {
    pub parameters: Vec<Identifier>,
    pub defaults: Vec<(String, Expression)>,
    pub body: BlockStatement,
    pub env: Rc<Environment>,
}

fn fnv1a(text: &str) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(text.as_bytes());
    hasher.finish()
}

// ParseInt-style conversion: optional sign, then 0x/0b/0o prefix or decimal.
pub fn parse_prefixed_int(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let value = if let Some(hex) = digits.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = digits.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()?
    } else if let Some(oct) = digits.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };

    Some(if negative { -value } else { value })
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::Boolean(_) => "BOOLEAN",
            Value::Null => "NULL",
            Value::Str(_) => "STRING",
            Value::Regexp { .. } => "REGEXP",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::File(_) => "FILE",
            Value::Return(_) => "RETURN_VALUE",
        }
    }

    // The canonical textual rendering: used for printing, heterogeneous
    // comparisons, and regexp matching.
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::Boolean(value) => value.to_string(),
            Value::Null => "null".to_string(),
            Value::Str(value) => value.clone(),
            Value::Regexp { pattern, .. } => pattern.clone(),
            Value::Array(elements) => {
                let rendered: Vec<String> = elements.iter().map(|e| e.inspect()).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Hash(pairs) => {
                let rendered: Vec<String> = pairs
                    .values()
                    .map(|pair| format!("{}: {}", pair.key.inspect(), pair.value.inspect()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::Function(func) => {
                let parameters: Vec<String> =
                    func.parameters.iter().map(|p| p.value.clone()).collect();
                format!("fn({}) {{\n{}\n}}", parameters.join(", "), func.body)
            }
            Value::Builtin(_) => "builtin function".to_string(),
            Value::File(file) => format!("<file:{}>", file.borrow().filename),
            Value::Return(inner) => inner.inspect(),
        }
    }

    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(value) => Some(HashKey {
                kind: "INTEGER",
                value: *value as u64,
            }),
            Value::Boolean(value) => Some(HashKey {
                kind: "BOOLEAN",
                value: u64::from(*value),
            }),
            Value::Str(value) => Some(HashKey {
                kind: "STRING",
                value: fnv1a(value),
            }),
            Value::Float(_) => Some(HashKey {
                kind: "FLOAT",
                value: fnv1a(&self.inspect()),
            }),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(value) => *value,
            Value::Str(value) => !value.is_empty(),
            Value::Regexp { pattern, .. } => !pattern.is_empty(),
            Value::Integer(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::Array(elements) => !elements.is_empty(),
            Value::Hash(pairs) => !pairs.is_empty(),
            Value::Return(inner) => inner.is_truthy(),
            _ => true,
        }
    }

    // Equality for mismatched or non-scalar operands: value comparison for
    // the scalar types, handle identity for the rest.
    pub fn identity_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(l), Value::Integer(r)) => l == r,
            (Value::Float(l), Value::Float(r)) => l == r,
            (Value::Boolean(l), Value::Boolean(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Null, Value::Null) => true,
            (
                Value::Regexp { pattern: lp, flags: lf },
                Value::Regexp { pattern: rp, flags: rf },
            ) => lp == rp && lf == rf,
            (Value::Array(l), Value::Array(r)) => Rc::ptr_eq(l, r),
            (Value::Hash(l), Value::Hash(r)) => Rc::ptr_eq(l, r),
            (Value::Function(l), Value::Function(r)) => Rc::ptr_eq(l, r),
            (Value::File(l), Value::File(r)) => Rc::ptr_eq(l, r),
            (Value::Builtin(l), Value::Builtin(r)) => *l as usize == *r as usize,
            _ => false,
        }
    }

    pub fn iterator(&self) -> Option<ValueIterator> {
        match self {
            Value::Array(elements) => Some(ValueIterator::Array {
                elements: Rc::clone(elements),
                offset: 0,
            }),
            Value::Hash(pairs) => Some(ValueIterator::Hash {
                pairs: pairs.values().cloned().collect(),
                offset: 0,
            }),
            Value::Str(value) => Some(ValueIterator::Str {
                chars: value.chars().collect(),
                offset: 0,
            }),
            _ => None,
        }
    }

    // Built-in per-type methods. `None` means the receiver has no such
    // method and the caller should try the environment fallbacks.
    pub fn invoke_method(
        &self,
        method: &str,
        env: &Rc<Environment>,
        args: &[Value],
    ) -> Option<LangResult<Value>> {
        match self {
            Value::Str(value) => string_method(value, method, env),
            Value::Integer(value) => integer_method(*value, method, env),
            Value::Float(_) => match method {
                "methods" => Some(Ok(methods_array(&["methods"], env, "float."))),
                _ => None,
            },
            Value::Boolean(_) => match method {
                "methods" => Some(Ok(methods_array(&["methods"], env, "bool."))),
                _ => None,
            },
            Value::Array(elements) => match method {
                "len" => Some(Ok(Value::Integer(elements.len() as i64))),
                "methods" => Some(Ok(methods_array(&["len", "methods"], env, "array."))),
                _ => None,
            },
            Value::Hash(pairs) => match method {
                "keys" => {
                    let keys: Vec<Value> =
                        pairs.values().map(|pair| pair.key.clone()).collect();
                    Some(Ok(Value::Array(Rc::new(keys))))
                }
                "methods" => Some(Ok(methods_array(&["keys", "methods"], env, "hash."))),
                _ => None,
            },
            Value::Function(_) => match method {
                "methods" => Some(Ok(methods_array(&["methods"], env, "function."))),
                _ => None,
            },
            Value::Builtin(_) => match method {
                "methods" => Some(Ok(Value::Array(Rc::new(vec![Value::Str(
                    "methods".to_string(),
                )])))),
                _ => None,
            },
            Value::File(file) => file_method(file, method, env, args),
            _ => None,
        }
    }
}

fn string_method(
    value: &str,
    method: &str,
    env: &Rc<Environment>,
) -> Option<LangResult<Value>> {
    match method {
        "len" => Some(Ok(Value::Integer(value.chars().count() as i64))),
        "ord" => Some(Ok(Value::Integer(
            value.chars().next().map(|c| c as i64).unwrap_or(0),
        ))),
        "to_i" => Some(Ok(Value::Integer(
            parse_prefixed_int(value).unwrap_or(0),
        ))),
        "to_f" => Some(Ok(Value::Float(value.parse::<f64>().unwrap_or(0.0)))),
        "methods" => Some(Ok(methods_array(
            &["len", "methods", "ord", "to_i", "to_f"],
            env,
            "string.",
        ))),
        _ => None,
    }
}

fn integer_method(value: i64, method: &str, env: &Rc<Environment>) -> Option<LangResult<Value>> {
    match method {
        "chr" => {
            let ch = u32::try_from(value)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or('\u{fffd}');
            Some(Ok(Value::Str(ch.to_string())))
        }
        "methods" => Some(Ok(methods_array(&["chr", "methods"], env, "integer."))),
        _ => None,
    }
}

fn file_method(
    file: &Rc<RefCell<FileValue>>,
    method: &str,
    env: &Rc<Environment>,
    args: &[Value],
) -> Option<LangResult<Value>> {
    match method {
        "close" => {
            file.borrow_mut().close();
            Some(Ok(Value::Boolean(true)))
        }
        "read" => Some(Ok(Value::Str(file.borrow_mut().read_line()))),
        "lines" => {
            let lines: Vec<Value> = file
                .borrow_mut()
                .lines()
                .into_iter()
                .map(Value::Str)
                .collect();
            Some(Ok(Value::Array(Rc::new(lines))))
        }
        "rewind" => {
            file.borrow_mut().rewind();
            Some(Ok(Value::Boolean(true)))
        }
        "write" => {
            let Some(arg) = args.first() else {
                return Some(Err(LangError::Runtime(
                    "Missing argument to write()!".to_string(),
                )));
            };
            Some(Ok(Value::Boolean(file.borrow_mut().write(&arg.inspect()))))
        }
        "methods" => Some(Ok(methods_array(&["methods"], env, "file."))),
        _ => None,
    }
}

// Static method names merged with the environment's `<type>.` definitions.
fn methods_array(static_names: &[&str], env: &Rc<Environment>, prefix: &str) -> Value {
    let mut names: Vec<String> = static_names.iter().map(|s| s.to_string()).collect();
    for entry in env.names_with_prefix(prefix) {
        if let Some(offset) = entry.find('.') {
            names.push(entry[offset + 1..].to_string());
        }
    }
    names.sort();
    Value::Array(Rc::new(names.into_iter().map(Value::Str).collect()))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(value) => write!(f, "\"{}\"", value),
            Value::Function(_) => write!(f, "<fn>"),
            Value::Builtin(_) => write!(f, "<builtin>"),
            other => write!(f, "{}", other.inspect()),
        }
    }
}

pub enum ValueIterator {
    Array { elements: Rc<Vec<Value>>, offset: usize },
    Hash { pairs: Vec<HashPair>, offset: usize },
    Str { chars: Vec<char>, offset: usize },
}

impl ValueIterator {
    pub fn reset(&mut self) {
        match self {
            ValueIterator::Array { offset, .. } => *offset = 0,
            ValueIterator::Hash { offset, .. } => *offset = 0,
            ValueIterator::Str { offset, .. } => *offset = 0,
        }
    }

    // Yields (element, index) pairs until the traversal is exhausted.
    pub fn next(&mut self) -> Option<(Value, Value)> {
        match self {
            ValueIterator::Array { elements, offset } => {
                let element = elements.get(*offset)?.clone();
                let index = Value::Integer(*offset as i64);
                *offset += 1;
                Some((element, index))
            }
            ValueIterator::Hash { pairs, offset } => {
                let pair = pairs.get(*offset)?;
                let item = (pair.key.clone(), pair.value.clone());
                *offset += 1;
                Some(item)
            }
            ValueIterator::Str { chars, offset } => {
                let ch = chars.get(*offset)?;
                let item = (Value::Str(ch.to_string()), Value::Integer(*offset as i64));
                *offset += 1;
                Some(item)
            }
        }
    }
}

pub struct FileValue {
    pub filename: String,
    handle: Option<std::fs::File>,
    reader: Option<Box<dyn BufRead>>,
    writer: Option<Box<dyn Write>>,
}

impl FileValue {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            handle: None,
            reader: None,
            writer: None,
        }
    }

    pub fn open(&mut self, mode: &str) -> std::io::Result<()> {
        match self.filename.as_str() {
            "!STDIN!" => {
                self.reader = Some(Box::new(BufReader::new(std::io::stdin())));
                return Ok(());
            }
            "!STDOUT!" => {
                self.writer = Some(Box::new(BufWriter::new(std::io::stdout())));
                return Ok(());
            }
            "!STDERR!" => {
                self.writer = Some(Box::new(BufWriter::new(std::io::stderr())));
                return Ok(());
            }
            _ => {}
        }

        if mode == "w" {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.filename)?;
            self.writer = Some(Box::new(BufWriter::new(file.try_clone()?)));
            self.handle = Some(file);
        } else if mode.contains('w') && mode.contains('a') {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.filename)?;
            self.writer = Some(Box::new(BufWriter::new(file.try_clone()?)));
            self.handle = Some(file);
        } else {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .open(&self.filename)?;
            self.reader = Some(Box::new(BufReader::new(file.try_clone()?)));
            self.handle = Some(file);
        }
        Ok(())
    }

    pub fn close(&mut self) {
        self.handle = None;
        self.reader = None;
        self.writer = None;
    }

    // One line including its newline, or the empty string at EOF.
    pub fn read_line(&mut self) -> String {
        let Some(reader) = self.reader.as_mut() else {
            return String::new();
        };
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => String::new(),
            Ok(_) => line,
        }
    }

    pub fn lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_line();
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        lines
    }

    pub fn rewind(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            let _ = handle.seek(SeekFrom::Start(0));
            if self.reader.is_some() {
                if let Ok(clone) = handle.try_clone() {
                    self.reader = Some(Box::new(BufReader::new(clone)));
                }
            }
        }
    }

    pub fn write(&mut self, text: &str) -> bool {
        let Some(writer) = self.writer.as_mut() else {
            return false;
        };
        if writer.write_all(text.as_bytes()).is_err() {
            return false;
        }
        writer.flush().is_ok()
    }
}

#[derive(Debug)]
pub struct Environment {
    store: RefCell<HashMap<String, Value>>,
    readonly: RefCell<HashSet<String>>,
    permit: Vec<String>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            store: RefCell::new(HashMap::new()),
            readonly: RefCell::new(HashSet::new()),
            permit: Vec::new(),
            outer: None,
        })
    }

    pub fn new_enclosed(outer: Rc<Environment>) -> Rc<Self> {
        Rc::new(Self {
            store: RefCell::new(HashMap::new()),
            readonly: RefCell::new(HashSet::new()),
            permit: Vec::new(),
            outer: Some(outer),
        })
    }

    // A temporary scope: writes to permitted names bind here, all other
    // writes bubble to the parent.
    pub fn new_temporary_scope(outer: Rc<Environment>, permit: Vec<String>) -> Rc<Self> {
        Rc::new(Self {
            store: RefCell::new(HashMap::new()),
            readonly: RefCell::new(HashSet::new()),
            permit,
            outer: Some(outer),
        })
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.borrow().get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.get(name))
    }

    pub fn binds(&self, name: &str) -> bool {
        self.store.borrow().contains_key(name)
            || self.outer.as_ref().is_some_and(|outer| outer.binds(name))
    }

    // Binds in this scope, except that temporary scopes pass unpermitted
    // names to their parent.
    pub fn define(&self, name: &str, value: Value) {
        if !self.permit.is_empty() && !self.permit.iter().any(|p| p == name) {
            match &self.outer {
                Some(outer) => return outer.define(name, value),
                None => scope_inconsistency(),
            }
        }
        if self.store.borrow().contains_key(name) && self.readonly.borrow().contains(name) {
            constant_violation(name);
        }
        self.store.borrow_mut().insert(name.to_string(), value);
    }

    pub fn define_const(&self, name: &str, value: Value) {
        self.store.borrow_mut().insert(name.to_string(), value);
        self.readonly.borrow_mut().insert(name.to_string());
    }

    // `=` semantics: permitted names bind locally, otherwise the write
    // lands in the nearest scope that already binds the name, or here.
    pub fn assign(&self, name: &str, value: Value) {
        if self.store.borrow().contains_key(name) && self.readonly.borrow().contains(name) {
            constant_violation(name);
        }

        if !self.permit.is_empty() {
            if self.permit.iter().any(|p| p == name) {
                self.store.borrow_mut().insert(name.to_string(), value);
                return;
            }
            match &self.outer {
                Some(outer) => outer.assign(name, value),
                None => scope_inconsistency(),
            }
            return;
        }

        if self.store.borrow().contains_key(name) {
            self.store.borrow_mut().insert(name.to_string(), value);
            return;
        }

        match &self.outer {
            Some(outer) if outer.binds(name) => outer.assign(name, value),
            _ => {
                self.store.borrow_mut().insert(name.to_string(), value);
            }
        }
    }

    pub fn names_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut names = Vec::new();
        for key in self.store.borrow().keys() {
            if key.starts_with(prefix) || key.starts_with("object.") {
                names.push(key.clone());
            }
        }
        if let Some(outer) = &self.outer {
            names.extend(outer.names_with_prefix(prefix));
        }
        names
    }
}

fn constant_violation(name: &str) -> ! {
    eprintln!(
        "Attempting to modify '{}' denied; it was defined as a constant.",
        name
    );
    process::exit(3);
}

fn scope_inconsistency() -> ! {
    eprintln!("scoping weirdness; please report a bug");
    process::exit(5);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_boolean_hash_keys_are_stable() {
        assert_eq!(
            Value::Integer(7).hash_key(),
            Value::Integer(7).hash_key()
        );
        assert_eq!(
            Value::Boolean(true).hash_key(),
            Value::Boolean(true).hash_key()
        );
        assert_ne!(
            Value::Boolean(true).hash_key(),
            Value::Boolean(false).hash_key()
        );
    }

    #[test]
    fn string_hash_keys_compare_by_content() {
        let a = Value::Str("hello".to_string()).hash_key();
        let b = Value::Str("hello".to_string()).hash_key();
        let c = Value::Str("world".to_string()).hash_key();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn same_inspect_form_different_type_hashes_differently() {
        let number = Value::Integer(1).hash_key();
        let text = Value::Str("1".to_string()).hash_key();
        assert_ne!(number, text);
    }

    #[test]
    fn arrays_are_not_hashable() {
        assert!(Value::Array(Rc::new(vec![])).hash_key().is_none());
        assert!(Value::Null.hash_key().is_none());
    }

    #[test]
    fn truthiness_follows_the_coercion_table() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::Integer(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::Array(Rc::new(vec![])).is_truthy());
        assert!(Value::Integer(-1).is_truthy());
        assert!(Value::Str("x".to_string()).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
    }

    #[test]
    fn string_iteration_yields_code_points_with_positions() {
        let value = Value::Str("héllo".to_string());
        let mut iter = value.iterator().expect("strings iterate");
        let (first, index) = iter.next().expect("first element");
        assert_eq!(first.inspect(), "h");
        assert_eq!(index.inspect(), "0");
        let (second, index) = iter.next().expect("second element");
        assert_eq!(second.inspect(), "é");
        assert_eq!(index.inspect(), "1");
    }

    #[test]
    fn iteration_is_single_shot_until_reset() {
        let value = Value::Array(Rc::new(vec![Value::Integer(1), Value::Integer(2)]));
        let mut iter = value.iterator().expect("arrays iterate");
        assert!(iter.next().is_some());
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        iter.reset();
        let (element, index) = iter.next().expect("restarted");
        assert_eq!(element.inspect(), "1");
        assert_eq!(index.inspect(), "0");
    }

    #[test]
    fn environment_lookup_walks_the_parent_chain() {
        let global = Environment::new();
        global.define("x", Value::Integer(1));
        let child = Environment::new_enclosed(Rc::clone(&global));
        assert_eq!(child.get("x").map(|v| v.inspect()), Some("1".to_string()));
        assert!(child.get("missing").is_none());
    }

    #[test]
    fn assignment_updates_the_nearest_binding_scope() {
        let global = Environment::new();
        global.define("x", Value::Integer(1));
        let child = Environment::new_enclosed(Rc::clone(&global));
        child.assign("x", Value::Integer(2));
        assert_eq!(global.get("x").map(|v| v.inspect()), Some("2".to_string()));

        // Unbound names land in the assigning scope.
        child.assign("y", Value::Integer(3));
        assert!(global.get("y").is_none());
        assert_eq!(child.get("y").map(|v| v.inspect()), Some("3".to_string()));
    }

    #[test]
    fn temporary_scopes_keep_permitted_names_local() {
        let global = Environment::new();
        global.define("seen", Value::Integer(0));
        let scope =
            Environment::new_temporary_scope(Rc::clone(&global), vec!["$1".to_string()]);

        scope.assign("$1", Value::Str("captured".to_string()));
        scope.assign("seen", Value::Integer(9));

        assert!(global.get("$1").is_none());
        assert_eq!(
            scope.get("$1").map(|v| v.inspect()),
            Some("captured".to_string())
        );
        assert_eq!(global.get("seen").map(|v| v.inspect()), Some("9".to_string()));
    }

    #[test]
    fn let_inside_a_temporary_scope_bubbles_out() {
        let global = Environment::new();
        let scope =
            Environment::new_temporary_scope(Rc::clone(&global), vec!["e".to_string()]);
        scope.define("fresh", Value::Integer(5));
        assert_eq!(
            global.get("fresh").map(|v| v.inspect()),
            Some("5".to_string())
        );
    }

    #[test]
    fn names_with_prefix_sees_the_whole_chain() {
        let global = Environment::new();
        global.define("string.upper", Value::Null);
        global.define("object.dump", Value::Null);
        global.define("array.sum", Value::Null);
        let child = Environment::new_enclosed(Rc::clone(&global));

        let names = child.names_with_prefix("string.");
        assert!(names.contains(&"string.upper".to_string()));
        assert!(names.contains(&"object.dump".to_string()));
        assert!(!names.contains(&"array.sum".to_string()));
    }

    #[test]
    fn prefixed_integer_parsing_handles_bases() {
        assert_eq!(parse_prefixed_int("42"), Some(42));
        assert_eq!(parse_prefixed_int("0x2a"), Some(42));
        assert_eq!(parse_prefixed_int("0b101010"), Some(42));
        assert_eq!(parse_prefixed_int("-7"), Some(-7));
        assert_eq!(parse_prefixed_int("nope"), None);
    }
}
