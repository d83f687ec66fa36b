mod ast;
mod builtins;
mod error;
mod interpreter;
mod lexer;
mod object;
mod parser;

use std::io::Read;
use std::rc::Rc;
use std::{env, fs, process};

use error::LangResult;
use interpreter::Interpreter;
use lexer::Lexer;
use object::{Environment, Value};
use parser::Parser;

const PRELUDE: &str = include_str!("prelude.howl");

fn version_fun(_env: &Rc<Environment>, _args: &[Value]) -> LangResult<Value> {
    Ok(Value::Str(env!("CARGO_PKG_VERSION").to_string()))
}

fn args_fun(_env: &Rc<Environment>, _args: &[Value]) -> LangResult<Value> {
    let arguments: Vec<Value> = env::args().skip(1).map(Value::Str).collect();
    Ok(Value::Array(Rc::new(arguments)))
}

fn main() {
    let mut eval_code: Option<String> = None;
    let mut show_version = false;
    let mut source_file: Option<String> = None;

    let mut arguments = env::args().skip(1);
    while let Some(argument) = arguments.next() {
        if argument == "--eval" || argument == "-eval" {
            match arguments.next() {
                Some(code) => eval_code = Some(code),
                None => {
                    eprintln!("option --eval requires an argument");
                    process::exit(1);
                }
            }
        } else if let Some(code) = argument.strip_prefix("--eval=") {
            eval_code = Some(code.to_string());
        } else if argument == "--version" || argument == "-version" {
            show_version = true;
        } else if source_file.is_none() {
            source_file = Some(argument);
        }
    }

    if show_version {
        println!("howl {}", env!("CARGO_PKG_VERSION"));
        process::exit(1);
    }

    if let Some(code) = eval_code {
        execute(&code);
        process::exit(1);
    }

    let source = match source_file {
        Some(path) => match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("Error reading {}: {}", path, err);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(err) = std::io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", err);
                process::exit(1);
            }
            buffer
        }
    };

    execute(&source);
}

fn execute(input: &str) {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        for message in parser.errors() {
            eprintln!("\t{}", message);
        }
        process::exit(1);
    }

    interpreter::register_builtin("version", version_fun);
    interpreter::register_builtin("args", args_fun);

    let interpreter = Interpreter::new();

    // The embedded prelude runs against the fresh global scope before
    // any user code.
    let mut prelude_parser = Parser::new(Lexer::new(PRELUDE));
    let prelude = prelude_parser.parse_program();
    if let Err(err) = interpreter.eval_program(&prelude) {
        eprintln!("Error in prelude: {}", err);
    }

    if let Err(err) = interpreter.eval_program(&program) {
        eprintln!("Error: {}", err);
        if interpreter::pragma_enabled("strict") {
            process::exit(1);
        }
    }
}
