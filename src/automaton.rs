use std::collections::{HashMap, HashSet};

pub type State = String;
pub type Symbol = String;

/// A deterministic finite automaton as declared in a configuration file.
///
/// The transition map is partial: a missing (state, symbol) entry is a dead
/// end and rejects the input, it is not an error. States referenced by
/// transitions are not required to appear in `states`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub states: Vec<State>,
    pub alphabet: HashSet<Symbol>,
    pub start: State,
    pub accept: HashSet<State>,
    pub transition: HashMap<State, HashMap<Symbol, State>>,
}

impl Dfa {
    pub fn step(&self, state: &str, symbol: &str) -> Option<&State> {
        self.transition.get(state)?.get(symbol)
    }

    pub fn is_accept_state(&self, state: &State) -> bool {
        self.accept.contains(state)
    }

    /// Runs the automaton over `input`, one character at a time, left to
    /// right. A character outside the alphabet or a dead end rejects
    /// immediately; otherwise the verdict is whether the final state is
    /// accepting. The empty string is accepted iff `start` is accepting.
    pub fn accept(&self, input: &str) -> bool {
        let mut state = &self.start;
        for c in input.chars() {
            let symbol = c.to_string();
            if !self.alphabet.contains(&symbol) {
                return false;
            }
            match self.step(state, &symbol) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.is_accept_state(state)
    }
}

// binary strings ending in "1"
#[cfg(test)]
fn ends_in_one() -> Dfa {
    let transition = vec![
        ("q0", vec![("0", "q0"), ("1", "q1")]),
        ("q1", vec![("0", "q0"), ("1", "q1")]),
    ]
    .into_iter()
    .map(|(q, edges)| {
        (
            q.to_string(),
            edges
                .into_iter()
                .map(|(a, t)| (a.to_string(), t.to_string()))
                .collect(),
        )
    })
    .collect();
    Dfa {
        states: vec!["q0".to_string(), "q1".to_string()],
        alphabet: vec!["0".to_string(), "1".to_string()].into_iter().collect(),
        start: "q0".to_string(),
        accept: vec!["q1".to_string()].into_iter().collect(),
        transition,
    }
}

#[test]
fn test_accept_ends_in_one() {
    let dfa = ends_in_one();
    assert!(dfa.accept("101"));
    assert!(!dfa.accept("100"));
    assert!(!dfa.accept(""));
    assert!(dfa.accept("1"));
    assert!(dfa.accept("0011"));
}

#[test]
fn test_empty_string_needs_accepting_start() {
    let mut dfa = ends_in_one();
    assert!(!dfa.accept(""));
    dfa.accept.insert("q0".to_string());
    assert!(dfa.accept(""));
}

#[test]
fn test_out_of_alphabet_rejects() {
    let dfa = ends_in_one();
    assert!(!dfa.accept("2"));
    assert!(!dfa.accept("1x1"));
    assert!(!dfa.accept("101 "));
}

#[test]
fn test_dead_end_rejects_without_panicking() {
    let mut dfa = ends_in_one();
    dfa.transition.get_mut("q0").unwrap().remove("0");
    assert!(!dfa.accept("0"));
    assert!(!dfa.accept("000"));
    assert!(dfa.accept("101"));
}

#[test]
fn test_step_borrows_its_keys() {
    let dfa = ends_in_one();
    assert_eq!(dfa.step("q0", "1"), Some(&"q1".to_string()));
    assert_eq!(dfa.step("q0", "x"), None);
    assert_eq!(dfa.step("qx", "1"), None);
}

#[test]
fn test_accept_is_pure() {
    let dfa = ends_in_one();
    let before = dfa.clone();
    assert_eq!(dfa.accept("1100"), dfa.accept("1100"));
    assert!(dfa.accept("11"));
    assert!(dfa.accept("11"));
    assert_eq!(dfa, before);
}
