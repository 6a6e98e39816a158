use std::collections::HashMap;
use std::fmt;

use crate::error::{Paren, ParseError};
use crate::token::Token;

/// A state ID in the NFA
pub type StateId = usize;

/// A Thompson NFA state.
///
/// Edges point at other states by index into the owning [`Nfa`], so a state
/// may be shared by several predecessors and cycles need no special care.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub accepting: bool,
    /// Targets reachable without consuming input.
    pub epsilon: Vec<StateId>,
    /// At most one target per symbol.
    pub symbols: HashMap<char, StateId>,
}

/// Fragment of an NFA with start and end states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

/// A Thompson NFA. Immutable once [`Builder::build`] returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    states: Vec<State>,
    start: StateId,
}

impl Nfa {
    #[cfg(test)]
    pub(crate) fn from_parts(states: Vec<State>, start: StateId) -> Self {
        Self { states, start }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// One line per state: `id [*] sym->target ... eps->target ...`, with `*`
/// marking accepting states and `>` marking the start.
impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, state) in self.states.iter().enumerate() {
            let marker = match (id == self.start, state.accepting) {
                (true, true) => ">*",
                (true, false) => "> ",
                (false, true) => " *",
                (false, false) => "  ",
            };
            write!(f, "{marker}{id:>4}:")?;
            let mut symbols: Vec<_> = state.symbols.iter().collect();
            symbols.sort();
            for (symbol, target) in symbols {
                write!(f, " {symbol:?}->{target}")?;
            }
            for target in &state.epsilon {
                write!(f, " eps->{target}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Take the top `N` fragments off the stack, oldest first, so a binary
/// operator sees `[left, right]` with `right` being the most recent push.
fn pop_operands<const N: usize>(
    stack: &mut Vec<Fragment>,
    operator: Token,
) -> Result<[Fragment; N], ParseError> {
    let found = stack.len();
    let malformed = ParseError::MalformedExpression {
        operator,
        expected: N,
        found,
    };
    let split = found.checked_sub(N).ok_or_else(|| malformed.clone())?;
    let operands = <[Fragment; N]>::try_from(&stack[split..]).map_err(|_| malformed)?;
    stack.truncate(split);
    Ok(operands)
}

/// Builds an [`Nfa`] from a postfix token stream.
///
/// The arena only grows. Composition adds edges and clears accepting flags
/// on fragment ends that get folded into a larger fragment.
#[derive(Debug, Default)]
pub struct Builder {
    states: Vec<State>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret `postfix` as a stack program and return the automaton.
    pub fn build(mut self, postfix: &[Token]) -> Result<Nfa, ParseError> {
        if postfix.is_empty() {
            let fragment = self.empty();
            return Ok(self.finish(fragment));
        }

        let mut stack: Vec<Fragment> = Vec::new();
        for &token in postfix {
            let fragment = match token {
                Token::Literal(c) => self.literal(c),
                Token::Open => return Err(ParseError::UnmatchedParenthesis(Paren::Open)),
                Token::Close => return Err(ParseError::UnmatchedParenthesis(Paren::Close)),
                Token::Star => {
                    let [inner] = pop_operands(&mut stack, token)?;
                    self.star(inner)
                }
                Token::Concat => {
                    let [left, right] = pop_operands(&mut stack, token)?;
                    self.concat(left, right)
                }
                Token::Alternate => {
                    let [left, right] = pop_operands(&mut stack, token)?;
                    self.alternate(left, right)
                }
            };
            stack.push(fragment);
        }

        match stack.as_slice() {
            [fragment] => {
                let fragment = *fragment;
                Ok(self.finish(fragment))
            }
            rest => Err(ParseError::DisconnectedFragments(rest.len())),
        }
    }

    fn finish(self, fragment: Fragment) -> Nfa {
        Nfa {
            states: self.states,
            start: fragment.start,
        }
    }

    /// Add a new state and return its ID
    fn add_state(&mut self, accepting: bool) -> StateId {
        let id = self.states.len();
        self.states.push(State {
            accepting,
            ..State::default()
        });
        id
    }

    fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.states[from].epsilon.push(to);
    }

    fn add_symbol(&mut self, from: StateId, symbol: char, to: StateId) {
        self.states[from].symbols.insert(symbol, to);
    }

    fn clear_accepting(&mut self, id: StateId) {
        self.states[id].accepting = false;
    }

    /// start --eps--> end: accepts only the empty string.
    fn empty(&mut self) -> Fragment {
        let start = self.add_state(false);
        let end = self.add_state(true);
        self.add_epsilon(start, end);
        Fragment { start, end }
    }

    fn literal(&mut self, symbol: char) -> Fragment {
        let start = self.add_state(false);
        let end = self.add_state(true);
        self.add_symbol(start, symbol, end);
        Fragment { start, end }
    }

    fn concat(&mut self, left: Fragment, right: Fragment) -> Fragment {
        self.add_epsilon(left.end, right.start);
        self.clear_accepting(left.end);
        Fragment {
            start: left.start,
            end: right.end,
        }
    }

    fn alternate(&mut self, left: Fragment, right: Fragment) -> Fragment {
        let start = self.add_state(false);
        self.add_epsilon(start, left.start);
        self.add_epsilon(start, right.start);

        let end = self.add_state(true);
        self.add_epsilon(left.end, end);
        self.add_epsilon(right.end, end);
        self.clear_accepting(left.end);
        self.clear_accepting(right.end);

        Fragment { start, end }
    }

    fn star(&mut self, inner: Fragment) -> Fragment {
        let start = self.add_state(false);
        let end = self.add_state(true);
        self.add_epsilon(start, end);
        self.add_epsilon(start, inner.start);

        self.add_epsilon(inner.end, end);
        self.add_epsilon(inner.end, inner.start);
        self.clear_accepting(inner.end);

        Fragment { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn build(pattern: &str) -> Nfa {
        Builder::new().build(&parse(pattern).unwrap()).unwrap()
    }

    fn accepting(nfa: &Nfa) -> Vec<StateId> {
        (0..nfa.len()).filter(|&id| nfa.state(id).accepting).collect()
    }

    #[test]
    fn empty_postfix_is_epsilon_pair() {
        let nfa = Builder::new().build(&[]).unwrap();
        assert_eq!(nfa.len(), 2);
        assert_eq!(nfa.state(nfa.start()).epsilon, vec![1]);
        assert_eq!(accepting(&nfa), vec![1]);
    }

    #[test]
    fn literal_is_one_symbol_edge() {
        let nfa = build("a");
        assert_eq!(nfa.len(), 2);
        let start = nfa.state(nfa.start());
        assert_eq!(start.symbols.get(&'a'), Some(&1));
        assert!(start.epsilon.is_empty());
        assert_eq!(accepting(&nfa), vec![1]);
    }

    #[test]
    fn concat_links_left_end_to_right_start() {
        let nfa = build("ab");
        assert_eq!(nfa.len(), 4);
        assert_eq!(nfa.start(), 0);
        assert_eq!(nfa.state(1).epsilon, vec![2]);
        assert_eq!(accepting(&nfa), vec![3]);
    }

    #[test]
    fn alternate_adds_split_and_join() {
        let nfa = build("a|b");
        assert_eq!(nfa.len(), 6);
        assert_eq!(nfa.start(), 4);
        assert_eq!(nfa.state(4).epsilon, vec![0, 2]);
        assert_eq!(nfa.state(1).epsilon, vec![5]);
        assert_eq!(nfa.state(3).epsilon, vec![5]);
        assert_eq!(accepting(&nfa), vec![5]);
    }

    #[test]
    fn star_adds_loop() {
        let nfa = build("a*");
        assert_eq!(nfa.len(), 4);
        assert_eq!(nfa.start(), 2);
        assert_eq!(nfa.state(2).epsilon, vec![3, 0]);
        assert_eq!(nfa.state(1).epsilon, vec![3, 0]);
        assert_eq!(accepting(&nfa), vec![3]);
    }

    #[test]
    fn exactly_one_accepting_state() {
        for pattern in ["", "a", "ab*", "(a|b)*c", "a|b*", "((ab)*|c)*d"] {
            assert_eq!(accepting(&build(pattern)).len(), 1, "pattern {pattern:?}");
        }
    }

    #[test]
    fn no_state_mixes_symbol_and_epsilon_edges() {
        let nfa = build("(a|bc)*d|e*");
        for state in nfa.states() {
            assert!(state.symbols.is_empty() || state.epsilon.is_empty());
        }
    }

    #[test]
    fn binary_operator_without_operands_is_malformed() {
        let err = Builder::new()
            .build(&[Token::Literal('a'), Token::Concat])
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedExpression {
                operator: Token::Concat,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn star_without_operand_is_malformed() {
        let err = Builder::new().build(&[Token::Star]).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedExpression {
                operator: Token::Star,
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn leftover_fragments_are_reported() {
        let err = Builder::new()
            .build(&[Token::Literal('a'), Token::Literal('b')])
            .unwrap_err();
        assert_eq!(err, ParseError::DisconnectedFragments(2));
    }

    #[test]
    fn display_lists_every_state() {
        let listing = build("a|b").to_string();
        assert_eq!(listing.lines().count(), 6);
        assert!(listing.contains("'a'->1"));
        assert!(listing.contains(">    4: eps->0 eps->2"));
    }
}
