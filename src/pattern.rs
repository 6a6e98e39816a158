use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::ParseError;
use crate::matcher;
use crate::nfa::{Builder, Nfa};
use crate::parser::{self, Parser};
use crate::token::Token;

/// A pattern compiled once into a Thompson NFA.
///
/// The automaton is read-only after construction, so one compiled pattern
/// can be matched from many threads at once through shared references.
///
/// ```
/// use thompson_regex::compile;
///
/// let re = compile("(a|b)*c").unwrap();
/// assert!(re.matches("abbac"));
/// assert!(!re.matches("abba"));
/// ```
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    postfix: Vec<Token>,
    nfa: Nfa,
}

impl CompiledPattern {
    pub fn new(pattern: &str) -> Result<Self, ParseError> {
        let postfix = Parser::new(pattern).parse()?;
        let nfa = Builder::new().build(&postfix)?;
        debug!(
            "compiled {pattern:?}: postfix {:?}, {} states",
            parser::postfix_string(&postfix),
            nfa.len()
        );
        Ok(Self {
            pattern: pattern.to_owned(),
            postfix,
            nfa,
        })
    }

    /// True when the whole of `input` is in the pattern's language.
    ///
    /// This is a full-string match, not a search for a matching substring.
    pub fn matches(&self, input: &str) -> bool {
        matcher::decide(&self.nfa, input)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Postfix form of the pattern, `.` standing for concatenation.
    pub fn postfix(&self) -> String {
        parser::postfix_string(&self.postfix)
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub fn state_count(&self) -> usize {
        self.nfa.len()
    }
}

/// Compile `pattern`, failing on unbalanced parentheses or dangling operators.
pub fn compile(pattern: &str) -> Result<CompiledPattern, ParseError> {
    CompiledPattern::new(pattern)
}

impl FromStr for CompiledPattern {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompiledPattern::new(s)
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
