use std::collections::BTreeMap;
use std::process;
use std::rc::Rc;
use std::sync::Once;
use std::time::UNIX_EPOCH;

use rand::Rng;

use crate::error::{LangError, LangResult};
use crate::interpreter::{self, register_builtin, Interpreter};
use crate::lexer::Lexer;
use crate::object::{parse_prefixed_int, Environment, FileValue, HashPair, Value};
use crate::parser::Parser;

// Registers the core builtins exactly once; collaborators may add more
// through `interpreter::register_builtin` during bring-up.
pub fn install() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        register_builtin("APPEND", append_fun);
        register_builtin("LEN", len_fun);
        register_builtin("PRINT", print_fun);
        register_builtin("chmod", chmod_fun);
        register_builtin("delete", delete_fun);
        register_builtin("eval", eval_fun);
        register_builtin("exit", exit_fun);
        register_builtin("int", int_fun);
        register_builtin("keys", keys_fun);
        register_builtin("match", match_fun);
        register_builtin("mkdir", mkdir_fun);
        register_builtin("open", open_fun);
        register_builtin("pragma", pragma_fun);
        register_builtin("printf", printf_fun);
        register_builtin("set", set_fun);
        register_builtin("sprintf", sprintf_fun);
        register_builtin("stat", stat_fun);
        register_builtin("string", string_fun);
        register_builtin("type", type_fun);
        register_builtin("unlink", unlink_fun);
        register_builtin("os.getenv", getenv_fun);
        register_builtin("os.setenv", setenv_fun);
        register_builtin("os.environment", environment_fun);
        register_builtin("directory.glob", glob_fun);
        register_builtin("math.abs", abs_fun);
        register_builtin("math.sqrt", sqrt_fun);
        register_builtin("math.random", random_fun);
    });
}

fn wrong_arguments(got: usize, want: &str) -> LangError {
    LangError::Runtime(format!(
        "wrong number of arguments. got={}, want={}",
        got, want
    ))
}

fn hash_from_pairs(entries: Vec<(Value, Value)>) -> Value {
    let mut map = BTreeMap::new();
    for (key, value) in entries {
        if let Some(hash_key) = key.hash_key() {
            map.insert(hash_key, HashPair { key, value });
        }
    }
    Value::Hash(Rc::new(map))
}

fn append_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 2 {
        return Err(wrong_arguments(args.len(), "2"));
    }
    match &args[0] {
        Value::Array(elements) => {
            let mut next = elements.as_ref().clone();
            next.push(args[1].clone());
            Ok(Value::Array(Rc::new(next)))
        }
        other => Err(LangError::Runtime(format!(
            "argument to `push` must be ARRAY, got={}",
            other.type_name()
        ))),
    }
}

fn len_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    match &args[0] {
        Value::Str(text) => Ok(Value::Integer(text.chars().count() as i64)),
        Value::Null => Ok(Value::Integer(0)),
        Value::Array(elements) => Ok(Value::Integer(elements.len() as i64)),
        other => Err(LangError::Runtime(format!(
            "argument to `len` not supported, got={}",
            other.type_name()
        ))),
    }
}

fn print_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    for arg in args {
        print!("{}", arg.inspect());
    }
    Ok(Value::Null)
}

fn chmod_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 2 {
        return Err(wrong_arguments(args.len(), "2"));
    }
    let path = args[0].inspect();
    let mode = match &args[1] {
        Value::Str(mode) => mode.clone(),
        other => {
            return Err(LangError::Runtime(format!(
                "Second argument must be string, got {:?}",
                other
            )))
        }
    };

    let Ok(bits) = u32::from_str_radix(&mode, 8) else {
        return Ok(Value::Boolean(false));
    };

    Ok(Value::Boolean(set_mode(&path, bits)))
}

#[cfg(unix)]
fn set_mode(path: &str, bits: u32) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(bits)).is_ok()
}

#[cfg(not(unix))]
fn set_mode(_path: &str, _bits: u32) -> bool {
    false
}

fn delete_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 2 {
        return Err(wrong_arguments(args.len(), "2"));
    }
    let pairs = match &args[0] {
        Value::Hash(pairs) => pairs,
        other => {
            return Err(LangError::Runtime(format!(
                "argument to `delete` must be HASH, got={}",
                other.type_name()
            )))
        }
    };
    let key = args[1].hash_key().ok_or_else(|| {
        LangError::Runtime(format!(
            "key `delete` into HASH must be Hashable, got={}",
            args[1].type_name()
        ))
    })?;

    let mut next = pairs.as_ref().clone();
    next.remove(&key);
    Ok(Value::Hash(Rc::new(next)))
}

fn eval_fun(env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    match &args[0] {
        Value::Str(code) => {
            let mut parser = Parser::new(Lexer::new(code));
            let program = parser.parse_program();
            if !parser.errors().is_empty() {
                eprintln!("Error parsing eval-string: {}", code);
                for message in parser.errors() {
                    eprintln!("\t{}", message);
                }
                process::exit(1);
            }
            Interpreter::with_environment(Rc::clone(env)).eval_program(&program)
        }
        other => Err(LangError::Runtime(format!(
            "argument to `eval` not supported, got={}",
            other.type_name()
        ))),
    }
}

fn exit_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    let code = match args.first() {
        Some(Value::Integer(value)) => *value as i32,
        Some(Value::Float(value)) => *value as i32,
        _ => 0,
    };
    process::exit(code);
}

fn int_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    match &args[0] {
        Value::Str(text) => parse_prefixed_int(text)
            .map(Value::Integer)
            .ok_or_else(|| {
                LangError::Runtime(format!("Converting string '{}' to int failed", text))
            }),
        Value::Boolean(value) => Ok(Value::Integer(i64::from(*value))),
        Value::Integer(value) => Ok(Value::Integer(*value)),
        Value::Float(value) => Ok(Value::Integer(*value as i64)),
        other => Err(LangError::Runtime(format!(
            "argument to `int` not supported, got={}",
            other.type_name()
        ))),
    }
}

fn keys_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    match &args[0] {
        Value::Hash(pairs) => {
            let keys: Vec<Value> = pairs.values().map(|pair| pair.key.clone()).collect();
            Ok(Value::Array(Rc::new(keys)))
        }
        other => Err(LangError::Runtime(format!(
            "argument to `keys` must be HASH, got={}",
            other.type_name()
        ))),
    }
}

// match(pattern, subject): Null on no match, else a hash of capture
// index to captured text.
fn match_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 2 {
        return Err(wrong_arguments(args.len(), "2"));
    }
    let (pattern, subject) = match (&args[0], &args[1]) {
        (Value::Str(pattern), Value::Str(subject)) => (pattern, subject),
        _ => {
            let offender = if matches!(args[0], Value::Str(_)) {
                &args[1]
            } else {
                &args[0]
            };
            return Err(LangError::Runtime(format!(
                "argument to `match` must be STRING, got {}",
                offender.type_name()
            )));
        }
    };

    let re = regex::Regex::new(pattern).map_err(|err| {
        LangError::Runtime(format!("error compiling regexp '{}': {}", pattern, err))
    })?;

    match re.captures(subject) {
        Some(captures) => {
            let mut entries = Vec::new();
            for i in 1..captures.len() {
                let text = captures.get(i).map(|m| m.as_str()).unwrap_or("");
                entries.push((
                    Value::Integer((i - 1) as i64),
                    Value::Str(text.to_string()),
                ));
            }
            Ok(hash_from_pairs(entries))
        }
        None => Ok(Value::Null),
    }
}

fn mkdir_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    match &args[0] {
        Value::Str(path) => Ok(Value::Boolean(std::fs::create_dir_all(path).is_ok())),
        other => Err(LangError::Runtime(format!(
            "argument to `mkdir` must be STRING, got {}",
            other.type_name()
        ))),
    }
}

fn open_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.is_empty() {
        return Err(wrong_arguments(args.len(), "1+"));
    }
    let path = match &args[0] {
        Value::Str(path) => path.clone(),
        other => {
            return Err(LangError::Runtime(format!(
                "argument to `file` not supported, got={}",
                other.type_name()
            )))
        }
    };
    let mode = match args.get(1) {
        Some(Value::Str(mode)) => mode.clone(),
        Some(other) => {
            return Err(LangError::Runtime(format!(
                "argument to `file` not supported, got={}",
                other.type_name()
            )))
        }
        None => "r".to_string(),
    };

    let mut file = FileValue::new(&path);
    let _ = file.open(&mode);
    Ok(Value::File(Rc::new(std::cell::RefCell::new(file))))
}

fn pragma_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() > 1 {
        return Err(wrong_arguments(args.len(), "0|1"));
    }

    if let Some(arg) = args.first() {
        match arg {
            Value::Str(name) => {
                let name = name.to_lowercase();
                match name.strip_prefix("no-") {
                    Some(real) => interpreter::pragma_clear(real),
                    None => interpreter::pragma_set(&name),
                }
            }
            other => {
                return Err(LangError::Runtime(format!(
                    "argument to `pragma` not supported, got={}",
                    other.type_name()
                )))
            }
        }
    }

    let names: Vec<Value> = interpreter::pragmas().into_iter().map(Value::Str).collect();
    Ok(Value::Array(Rc::new(names)))
}

fn printf_fun(env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if let Value::Str(text) = sprintf_fun(env, args)? {
        print!("{}", text);
    }
    Ok(Value::Null)
}

fn sprintf_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    let Some(Value::Str(format)) = args.first() else {
        return Ok(Value::Null);
    };
    Ok(Value::Str(format_values(format, &args[1..])))
}

// The printf verbs: %%, %s, %d, %f, %t, %v.
fn format_values(format: &str, args: &[Value]) -> String {
    let mut out = String::new();
    let mut chars = format.chars();
    let mut position = 0;

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some(verb) => {
                let arg = args.get(position);
                position += 1;
                match (verb, arg) {
                    ('d', Some(Value::Integer(value))) => out.push_str(&value.to_string()),
                    ('d', Some(Value::Float(value))) => {
                        out.push_str(&(*value as i64).to_string())
                    }
                    ('f', Some(Value::Float(value))) => {
                        out.push_str(&format!("{:.6}", value))
                    }
                    ('f', Some(Value::Integer(value))) => {
                        out.push_str(&format!("{:.6}", *value as f64))
                    }
                    ('t', Some(Value::Boolean(value))) => out.push_str(&value.to_string()),
                    ('s', Some(value)) | ('v', Some(value)) => {
                        out.push_str(&value.inspect())
                    }
                    (verb, Some(value)) => {
                        out.push_str(&format!("%!{}({})", verb, value.inspect()))
                    }
                    (verb, None) => out.push_str(&format!("%!{}(MISSING)", verb)),
                }
            }
            None => out.push('%'),
        }
    }
    out
}

fn stat_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    let path = args[0].inspect();

    let Ok(info) = std::fs::metadata(&path) else {
        return Ok(hash_from_pairs(Vec::new()));
    };

    let mtime = info
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);

    #[cfg(unix)]
    let mode_bits = {
        use std::os::unix::fs::PermissionsExt;
        info.permissions().mode()
    };
    #[cfg(not(unix))]
    let mode_bits = 0u32;

    let file_type = if info.is_dir() {
        "directory"
    } else if info.is_file() {
        "file"
    } else {
        "unknown"
    };

    Ok(hash_from_pairs(vec![
        (
            Value::Str("size".to_string()),
            Value::Integer(info.len() as i64),
        ),
        (Value::Str("mtime".to_string()), Value::Integer(mtime)),
        (
            Value::Str("perm".to_string()),
            Value::Str(permission_string(mode_bits, info.is_dir())),
        ),
        (
            Value::Str("mode".to_string()),
            Value::Str(format!("{:04o}", mode_bits & 0o7777)),
        ),
        (
            Value::Str("type".to_string()),
            Value::Str(file_type.to_string()),
        ),
    ]))
}

fn permission_string(mode: u32, is_dir: bool) -> String {
    let mut out = String::with_capacity(10);
    out.push(if is_dir { 'd' } else { '-' });
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

fn set_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 3 {
        return Err(wrong_arguments(args.len(), "3"));
    }
    let pairs = match &args[0] {
        Value::Hash(pairs) => pairs,
        other => {
            return Err(LangError::Runtime(format!(
                "argument to `set` must be HASH, got={}",
                other.type_name()
            )))
        }
    };
    let key = args[1].hash_key().ok_or_else(|| {
        LangError::Runtime(format!(
            "key `set` into HASH must be Hashable, got={}",
            args[1].type_name()
        ))
    })?;

    let mut next = pairs.as_ref().clone();
    next.insert(
        key,
        HashPair {
            key: args[1].clone(),
            value: args[2].clone(),
        },
    );
    Ok(Value::Hash(Rc::new(next)))
}

fn string_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    Ok(Value::Str(args[0].inspect()))
}

fn type_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    let name = match &args[0] {
        Value::Str(_) => "string",
        Value::Regexp { .. } => "regexp",
        Value::Boolean(_) => "bool",
        Value::Builtin(_) => "builtin",
        Value::File(_) => "file",
        Value::Array(_) => "array",
        Value::Function(_) => "function",
        Value::Integer(_) => "integer",
        Value::Float(_) => "float",
        Value::Hash(_) => "hash",
        other => {
            return Err(LangError::Runtime(format!(
                "argument to `type` not supported, got={}",
                other.type_name()
            )))
        }
    };
    Ok(Value::Str(name.to_string()))
}

fn unlink_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    let path = args[0].inspect();
    Ok(Value::Boolean(std::fs::remove_file(path).is_ok()))
}

fn getenv_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    match &args[0] {
        Value::Str(name) => Ok(Value::Str(std::env::var(name).unwrap_or_default())),
        other => Err(LangError::Runtime(format!(
            "argument must be a string, got={}",
            other.type_name()
        ))),
    }
}

fn setenv_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 2 {
        return Err(wrong_arguments(args.len(), "2"));
    }
    let name = match &args[0] {
        Value::Str(name) => name,
        other => {
            return Err(LangError::Runtime(format!(
                "argument must be a string, got={}",
                other.type_name()
            )))
        }
    };
    let value = match &args[1] {
        Value::Str(value) => value,
        other => {
            return Err(LangError::Runtime(format!(
                "argument must be a string, got={}",
                other.type_name()
            )))
        }
    };
    std::env::set_var(name, value);
    Ok(Value::Null)
}

// The full process environment as a name -> value hash.
fn environment_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    let _ = args;
    let entries: Vec<(Value, Value)> = std::env::vars()
        .map(|(name, value)| (Value::Str(name), Value::Str(value)))
        .collect();
    Ok(hash_from_pairs(entries))
}

fn glob_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    let pattern = args[0].inspect();

    let Ok(paths) = glob::glob(&pattern) else {
        return Ok(Value::Null);
    };

    let entries: Vec<Value> = paths
        .filter_map(|entry| entry.ok())
        .map(|path| Value::Str(path.to_string_lossy().into_owned()))
        .collect();
    Ok(Value::Array(Rc::new(entries)))
}

fn abs_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    match &args[0] {
        Value::Integer(value) => Ok(Value::Integer(value.wrapping_abs())),
        Value::Float(value) => Ok(Value::Float(value.abs())),
        other => Err(LangError::Runtime(format!(
            "argument to `math.abs` not supported, got={}",
            other.type_name()
        ))),
    }
}

fn sqrt_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    if args.len() != 1 {
        return Err(wrong_arguments(args.len(), "1"));
    }
    match &args[0] {
        Value::Integer(value) => Ok(Value::Float((*value as f64).sqrt())),
        Value::Float(value) => Ok(Value::Float(value.sqrt())),
        other => Err(LangError::Runtime(format!(
            "argument to `math.sqrt` not supported, got={}",
            other.type_name()
        ))),
    }
}

// With no argument: a float in [0, 1). With an integer bound: an integer
// in [0, bound).
fn random_fun(_env: &Rc<Environment>, args: &[Value]) -> LangResult<Value> {
    let mut rng = rand::thread_rng();
    match args.first() {
        None => Ok(Value::Float(rng.gen::<f64>())),
        Some(Value::Integer(bound)) if *bound > 0 => {
            Ok(Value::Integer(rng.gen_range(0..*bound)))
        }
        Some(other) => Err(LangError::Runtime(format!(
            "argument to `math.random` not supported, got={}",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Rc<Environment> {
        Environment::new()
    }

    #[test]
    fn len_counts_code_points_and_elements() {
        let result = len_fun(&env(), &[Value::Str("héllo".to_string())]).unwrap();
        assert_eq!(result.inspect(), "5");

        let result = len_fun(
            &env(),
            &[Value::Array(Rc::new(vec![Value::Integer(1), Value::Null]))],
        )
        .unwrap();
        assert_eq!(result.inspect(), "2");

        let result = len_fun(&env(), &[Value::Null]).unwrap();
        assert_eq!(result.inspect(), "0");

        let err = len_fun(&env(), &[Value::Integer(3)]).unwrap_err();
        assert!(err
            .to_string()
            .contains("argument to `len` not supported, got=INTEGER"));
    }

    #[test]
    fn append_returns_a_fresh_array() {
        let original = Value::Array(Rc::new(vec![Value::Integer(1)]));
        let result = append_fun(&env(), &[original.clone(), Value::Integer(2)]).unwrap();
        assert_eq!(result.inspect(), "[1, 2]");
        assert_eq!(original.inspect(), "[1]");
    }

    #[test]
    fn int_converts_from_each_scalar() {
        assert_eq!(
            int_fun(&env(), &[Value::Str("42".to_string())])
                .unwrap()
                .inspect(),
            "42"
        );
        assert_eq!(
            int_fun(&env(), &[Value::Str("0x2a".to_string())])
                .unwrap()
                .inspect(),
            "42"
        );
        assert_eq!(
            int_fun(&env(), &[Value::Boolean(true)]).unwrap().inspect(),
            "1"
        );
        assert_eq!(
            int_fun(&env(), &[Value::Float(3.9)]).unwrap().inspect(),
            "3"
        );
        let err = int_fun(&env(), &[Value::Str("nope".to_string())]).unwrap_err();
        assert!(err.to_string().contains("Converting string 'nope' to int"));
    }

    #[test]
    fn set_and_delete_leave_the_original_hash_alone() {
        let empty = hash_from_pairs(Vec::new());
        let one = set_fun(
            &env(),
            &[empty.clone(), Value::Str("a".to_string()), Value::Integer(1)],
        )
        .unwrap();
        let two = set_fun(
            &env(),
            &[one.clone(), Value::Str("b".to_string()), Value::Integer(2)],
        )
        .unwrap();

        let keys = keys_fun(&env(), &[two.clone()]).unwrap();
        match keys {
            Value::Array(elements) => assert_eq!(elements.len(), 2),
            other => panic!("expected key array, got {:?}", other),
        }
        assert_eq!(empty.inspect(), "{}");

        let pruned = delete_fun(&env(), &[two, Value::Str("a".to_string())]).unwrap();
        let keys = keys_fun(&env(), &[pruned]).unwrap();
        match keys {
            Value::Array(elements) => assert_eq!(elements.len(), 1),
            other => panic!("expected key array, got {:?}", other),
        }
    }

    #[test]
    fn sprintf_supports_the_basic_verbs() {
        let result = sprintf_fun(
            &env(),
            &[
                Value::Str("%s=%d (%t) %f %% %v".to_string()),
                Value::Str("x".to_string()),
                Value::Integer(3),
                Value::Boolean(true),
                Value::Float(1.5),
                Value::Array(Rc::new(vec![Value::Integer(1)])),
            ],
        )
        .unwrap();
        assert_eq!(result.inspect(), "x=3 (true) 1.500000 % [1]");
    }

    #[test]
    fn sprintf_marks_missing_arguments() {
        let result = sprintf_fun(&env(), &[Value::Str("%d".to_string())]).unwrap();
        assert_eq!(result.inspect(), "%!d(MISSING)");
    }

    #[test]
    fn match_returns_captures_or_null() {
        let result = match_fun(
            &env(),
            &[
                Value::Str("(h)(e)".to_string()),
                Value::Str("hello".to_string()),
            ],
        )
        .unwrap();
        match result {
            Value::Hash(pairs) => {
                assert_eq!(pairs.len(), 2);
                let first = Value::Integer(0).hash_key().unwrap();
                assert_eq!(pairs.get(&first).unwrap().value.inspect(), "h");
            }
            other => panic!("expected hash of captures, got {:?}", other),
        }

        let result = match_fun(
            &env(),
            &[
                Value::Str("xyz".to_string()),
                Value::Str("hello".to_string()),
            ],
        )
        .unwrap();
        assert!(matches!(result, Value::Null));
    }

    #[test]
    fn type_names_are_lowercase() {
        let cases: Vec<(Value, &str)> = vec![
            (Value::Integer(1), "integer"),
            (Value::Float(1.0), "float"),
            (Value::Str(String::new()), "string"),
            (Value::Boolean(true), "bool"),
            (Value::Array(Rc::new(vec![])), "array"),
        ];
        for (value, expected) in cases {
            assert_eq!(type_fun(&env(), &[value]).unwrap().inspect(), expected);
        }
    }

    #[test]
    fn stat_on_a_missing_path_is_an_empty_hash() {
        let result = stat_fun(
            &env(),
            &[Value::Str("/no/such/path/ever".to_string())],
        )
        .unwrap();
        assert_eq!(result.inspect(), "{}");
    }

    #[test]
    fn unlink_reports_failure_as_false() {
        let result = unlink_fun(
            &env(),
            &[Value::Str("/no/such/path/ever".to_string())],
        )
        .unwrap();
        assert!(matches!(result, Value::Boolean(false)));
    }

    #[test]
    fn permission_strings_render_like_ls() {
        assert_eq!(permission_string(0o644, false), "-rw-r--r--");
        assert_eq!(permission_string(0o755, true), "drwxr-xr-x");
    }

    #[test]
    fn getenv_returns_the_empty_string_for_unset_names() {
        let result = getenv_fun(
            &env(),
            &[Value::Str("HOWL_UNSET_VARIABLE_FOR_TESTS".to_string())],
        )
        .unwrap();
        assert_eq!(result.inspect(), "");
    }
}
