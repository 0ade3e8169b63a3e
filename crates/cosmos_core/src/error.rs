use std::fmt;

/// Errors from parsing scene or composition names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnknownScene(String),
    UnknownComposition(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownScene(name) => write!(f, "unknown scene: {name}"),
            ParseError::UnknownComposition(name) => write!(f, "unknown comet composition: {name}"),
        }
    }
}

impl std::error::Error for ParseError {}
