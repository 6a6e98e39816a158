use std::fmt;

use thiserror::Error;

use crate::token::Token;

/// Which side of a parenthesis pair was left without a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paren {
    Open,
    Close,
}

impl fmt::Display for Paren {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paren::Open => write!(f, "opening `(`"),
            Paren::Close => write!(f, "closing `)`"),
        }
    }
}

/// Errors raised while compiling a pattern.
///
/// These are only ever produced at compile time. Once a pattern compiles,
/// matching cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unmatched {0} parenthesis")]
    UnmatchedParenthesis(Paren),

    #[error("malformed expression: `{operator}` needs {expected} operand(s), found {found}")]
    MalformedExpression {
        operator: Token,
        expected: usize,
        found: usize,
    },

    #[error("malformed expression: {0} sub-expressions were never joined")]
    DisconnectedFragments(usize),
}
