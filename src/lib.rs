pub mod error;
pub mod matcher;
pub mod nfa;
pub mod parser;
pub mod pattern;
pub mod shell;
pub mod token;

pub use error::{Paren, ParseError};
pub use pattern::{compile, CompiledPattern};

/// Compile `pattern` and match it against the whole of `input`.
pub fn is_match(input: &str, pattern: &str) -> Result<bool, ParseError> {
    Ok(compile(pattern)?.matches(input))
}
