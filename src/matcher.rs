use std::collections::HashSet;

use log::{debug, trace};

use crate::nfa::{Nfa, StateId};

/// States reachable from `state` through epsilon edges alone.
///
/// Only states with no outgoing epsilon edges are collected: those are the
/// ones that can consume a symbol or accept. A state that has epsilon edges
/// is passed through and never returned, even if it also has symbol edges.
pub fn epsilon_closure(nfa: &Nfa, state: StateId) -> HashSet<StateId> {
    let mut closure = HashSet::new();
    let mut visited = HashSet::new();
    let mut stack = vec![state];

    while let Some(id) = stack.pop() {
        let current = nfa.state(id);
        if current.epsilon.is_empty() {
            closure.insert(id);
            continue;
        }
        for &next in &current.epsilon {
            // Star loops make the graph cyclic.
            if visited.insert(next) {
                stack.push(next);
            }
        }
    }

    closure
}

/// Run `nfa` over the whole of `input`.
///
/// Every step follows the current character's symbol edge out of each
/// active state, then replaces the active set with the closures of the
/// states reached. Acceptance is checked only after the last character.
pub fn decide(nfa: &Nfa, input: &str) -> bool {
    let mut active = epsilon_closure(nfa, nfa.start());

    for (pos, c) in input.chars().enumerate() {
        let mut next = HashSet::new();
        for &id in &active {
            if let Some(&target) = nfa.state(id).symbols.get(&c) {
                next.extend(epsilon_closure(nfa, target));
            }
        }
        trace!("step {pos} {c:?}: {} -> {} active states", active.len(), next.len());
        active = next;

        if active.is_empty() {
            debug!("no live states after {c:?} at position {pos}");
            return false;
        }
    }

    let matched = active.iter().any(|&id| nfa.state(id).accepting);
    debug!("input {input:?} matched: {matched}");
    matched
}

/// A matcher that executes a Thompson NFA against input
pub struct Matcher<'a> {
    nfa: &'a Nfa,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given NFA
    pub fn new(nfa: &'a Nfa) -> Self {
        Self { nfa }
    }

    /// Check if the entire input matches
    pub fn is_match(&self, input: &str) -> bool {
        decide(self.nfa, input)
    }
}
