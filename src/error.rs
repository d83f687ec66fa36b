use std::fmt;

#[derive(Debug)]
pub enum LangError {
    Io(std::io::Error),
    Runtime(String),
}

pub type LangResult<T> = Result<T, LangError>;

impl fmt::Display for LangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LangError::Io(err) => write!(f, "I/O error: {}", err),
            LangError::Runtime(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for LangError {}

impl From<std::io::Error> for LangError {
    fn from(value: std::io::Error) -> Self {
        LangError::Io(value)
    }
}
