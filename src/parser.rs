use crate::error::{Paren, ParseError};
use crate::token::Token;

/// Parser for regular expressions.
///
/// The `Parser` walks the raw pattern one character at a time and turns it
/// into a postfix token stream that the automaton builder can consume with
/// a single operand stack.
pub struct Parser<'a> {
    pub pattern: &'a str,
    pub pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given pattern.
    pub fn new(pattern: &'a str) -> Self {
        Self { pattern, pos: 0 }
    }

    /// Peek at the next character in the pattern without advancing.
    fn peek(&self) -> Option<char> {
        self.pattern[self.pos..].chars().next()
    }

    /// Advance the parser by one character and return it.
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Entry point: raw pattern to postfix tokens.
    ///
    /// Example:
    /// - Pattern: `a(b|c)*` → `abc|*.`
    pub fn parse(&mut self) -> Result<Vec<Token>, ParseError> {
        let tokens = self.tokenize();
        let expanded = insert_explicit_concatenation(&tokens);
        to_postfix(&expanded)
    }

    /// Split the remaining pattern into tokens. Every character outside
    /// `(`, `)`, `|` and `*` is a literal.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(self.pattern.len() - self.pos);
        while let Some(ch) = self.advance() {
            tokens.push(Token::from_char(ch));
        }
        tokens
    }
}

/// Parse `pattern` into postfix tokens.
pub fn parse(pattern: &str) -> Result<Vec<Token>, ParseError> {
    Parser::new(pattern).parse()
}

/// Make concatenation explicit.
///
/// A `Concat` marker is placed between two neighbours when the left one can
/// close a sub-expression and the right one can open one.
///
/// Example:
/// - `ab*(c|d)` → `a.b*.(c|d)`
pub fn insert_explicit_concatenation(tokens: &[Token]) -> Vec<Token> {
    let mut expanded = Vec::with_capacity(tokens.len() * 2);
    for (i, &token) in tokens.iter().enumerate() {
        expanded.push(token);
        if let Some(&next) = tokens.get(i + 1) {
            if token.ends_operand() && next.starts_operand() {
                expanded.push(Token::Concat);
            }
        }
    }
    expanded
}

/// Shunting-yard conversion from explicit infix to postfix.
///
/// Parentheses never reach the output. A `)` without a matching `(`, or a
/// `(` still open at the end, is reported instead of being dropped.
pub fn to_postfix(expanded: &[Token]) -> Result<Vec<Token>, ParseError> {
    let mut output = Vec::with_capacity(expanded.len());
    let mut operators: Vec<Token> = Vec::new();

    for &token in expanded {
        match token {
            Token::Literal(_) => output.push(token),
            Token::Open => operators.push(token),
            Token::Close => loop {
                match operators.pop() {
                    Some(Token::Open) => break,
                    Some(op) => output.push(op),
                    None => return Err(ParseError::UnmatchedParenthesis(Paren::Close)),
                }
            },
            _ => {
                while let Some(&top) = operators.last() {
                    if top == Token::Open {
                        break;
                    }
                    let flush = top.precedence() > token.precedence()
                        || (top.precedence() == token.precedence() && token != Token::Star);
                    if !flush {
                        break;
                    }
                    output.push(top);
                    operators.pop();
                }
                operators.push(token);
            }
        }
    }

    while let Some(op) = operators.pop() {
        if op == Token::Open {
            return Err(ParseError::UnmatchedParenthesis(Paren::Open));
        }
        output.push(op);
    }
    Ok(output)
}

/// Render a token stream as text, `.` standing for concatenation.
pub fn postfix_string(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(pattern: &str) -> String {
        let tokens: Vec<Token> = pattern.chars().map(Token::from_char).collect();
        postfix_string(&insert_explicit_concatenation(&tokens))
    }

    fn postfix(pattern: &str) -> String {
        postfix_string(&parse(pattern).unwrap())
    }

    #[test]
    fn concatenation_between_literals() {
        assert_eq!(expand("abc"), "a.b.c");
    }

    #[test]
    fn concatenation_around_groups_and_stars() {
        assert_eq!(expand("ab*(c|d)"), "a.b*.(c|d)");
        assert_eq!(expand("(a)(b)"), "(a).(b)");
        assert_eq!(expand("a**b"), "a**.b");
    }

    #[test]
    fn no_concatenation_after_open_or_alternate() {
        assert_eq!(expand("(a|b)"), "(a|b)");
        assert_eq!(expand("a|(b)"), "a|(b)");
        assert_eq!(expand("()"), "()");
    }

    #[test]
    fn postfix_respects_precedence() {
        assert_eq!(postfix("ab*"), "ab*.");
        assert_eq!(postfix("a|b"), "ab|");
        assert_eq!(postfix("a|bc"), "abc.|");
        assert_eq!(postfix("ab|c"), "ab.c|");
        assert_eq!(postfix("a|b*"), "ab*|");
    }

    #[test]
    fn postfix_groups_override_precedence() {
        assert_eq!(postfix("(a|b)*"), "ab|*");
        assert_eq!(postfix("(a|b)c"), "ab|c.");
        assert_eq!(postfix("a(b|c)*"), "abc|*.");
    }

    #[test]
    fn equal_precedence_is_left_associative() {
        assert_eq!(postfix("abc"), "ab.c.");
        assert_eq!(postfix("a|b|c"), "ab|c|");
    }

    #[test]
    fn empty_pattern_is_empty_postfix() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn unmatched_close_is_reported() {
        assert_eq!(parse(")"), Err(ParseError::UnmatchedParenthesis(Paren::Close)));
        assert_eq!(parse("a)b"), Err(ParseError::UnmatchedParenthesis(Paren::Close)));
    }

    #[test]
    fn unmatched_open_is_reported() {
        assert_eq!(parse("("), Err(ParseError::UnmatchedParenthesis(Paren::Open)));
        assert_eq!(parse("(a|b"), Err(ParseError::UnmatchedParenthesis(Paren::Open)));
    }

    #[test]
    fn multibyte_literals_are_single_tokens() {
        assert_eq!(parse("é*").unwrap(), vec![Token::Literal('é'), Token::Star]);
    }
}
