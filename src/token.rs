use std::fmt;

/// A single unit of a pattern, either a literal symbol or an operator.
///
/// Parentheses only appear in infix token streams. The shunting-yard pass
/// removes them, so a postfix stream holds literals and the three operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Literal(char),
    Concat,
    Alternate,
    Star,
    Open,
    Close,
}

impl Token {
    /// Map a raw pattern character to its token.
    pub fn from_char(c: char) -> Self {
        match c {
            '|' => Token::Alternate,
            '*' => Token::Star,
            '(' => Token::Open,
            ')' => Token::Close,
            other => Token::Literal(other),
        }
    }

    /// Binding strength used by the shunting-yard pass.
    ///
    /// - `*` → 3
    /// - concatenation → 2
    /// - `|` → 1
    /// - literals and parentheses → 0
    pub fn precedence(self) -> u8 {
        match self {
            Token::Star => 3,
            Token::Concat => 2,
            Token::Alternate => 1,
            _ => 0,
        }
    }

    pub fn is_operator(self) -> bool {
        matches!(self, Token::Concat | Token::Alternate | Token::Star)
    }

    /// True when a sub-expression may end at this token.
    pub(crate) fn ends_operand(self) -> bool {
        matches!(self, Token::Literal(_) | Token::Close | Token::Star)
    }

    /// True when a sub-expression may begin at this token.
    pub(crate) fn starts_operand(self) -> bool {
        matches!(self, Token::Literal(_) | Token::Open)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match *self {
            Token::Literal(c) => c,
            Token::Concat => '.',
            Token::Alternate => '|',
            Token::Star => '*',
            Token::Open => '(',
            Token::Close => ')',
        };
        write!(f, "{c}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_are_recognized() {
        assert_eq!(Token::from_char('|'), Token::Alternate);
        assert_eq!(Token::from_char('*'), Token::Star);
        assert_eq!(Token::from_char('('), Token::Open);
        assert_eq!(Token::from_char(')'), Token::Close);
    }

    #[test]
    fn dot_is_a_literal() {
        assert_eq!(Token::from_char('.'), Token::Literal('.'));
        assert!(!Token::from_char('.').is_operator());
    }

    #[test]
    fn precedence_orders_star_over_concat_over_alternate() {
        assert!(Token::Star.precedence() > Token::Concat.precedence());
        assert!(Token::Concat.precedence() > Token::Alternate.precedence());
        assert_eq!(Token::Open.precedence(), 0);
        assert_eq!(Token::Close.precedence(), 0);
    }
}
