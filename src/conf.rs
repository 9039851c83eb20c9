use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use regex::Regex;
use thiserror::Error;

use crate::automaton::{Dfa, State, Symbol};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfError {
    #[error("incomplete configuration: fewer than 5 meaningful lines")]
    Incomplete,
    #[error("could not read the state set Q")]
    MissingStates,
    #[error("could not read the alphabet Σ")]
    MissingAlphabet,
    #[error("no initial state line found")]
    MissingInitial,
    #[error("could not read the final state set F")]
    MissingFinals,
    #[error("malformed transition: {0}")]
    MalformedTransition(String),
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => line[..i].trim(),
        None => line.trim(),
    }
}

fn split_set(inside: &str) -> Vec<String> {
    inside
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect_vec()
}

/// Parses a configuration text into a `Dfa`.
///
/// The format is line oriented: `Q = {...}` declares the states,
/// `Σ = {...}` (also accepted as `Sigma`, `Sig` or `S`) the alphabet,
/// `F = {...}` the accepting states, the first line without `=` or braces
/// the initial state, and a block opened by a line naming delta holds
/// `(state,symbol) -> state` transitions until a line starting with `}`.
/// Trailing `#` comments and blank lines are ignored throughout.
///
/// Membership of the initial state and of transition endpoints in the
/// declared sets is intentionally not validated; undeclared symbols only
/// surface as rejections during evaluation.
pub fn parse_conf(text: &str) -> Result<Dfa, ConfError> {
    let lines = text
        .lines()
        .map(strip_comment)
        .filter(|l| !l.is_empty())
        .collect_vec();

    // states, alphabet, initial, finals and the block marker at minimum
    if lines.len() < 5 {
        return Err(ConfError::Incomplete);
    }

    let states_re = Regex::new(r"Q\s*=\s*\{([^}]*)\}").unwrap();
    let sigma_re = Regex::new(r"(?:Σ|Sigma|Sig|S)\s*=\s*\{([^}]*)\}").unwrap();
    let finals_re = Regex::new(r"F\s*=\s*\{([^}]*)\}").unwrap();
    let trans_re = Regex::new(r"^\(\s*([^,]+)\s*,\s*([^)]+)\s*\)\s*->\s*(\S+)").unwrap();

    let states: Vec<State> = lines
        .iter()
        .find_map(|l| states_re.captures(l))
        .map(|c| split_set(&c[1]))
        .ok_or(ConfError::MissingStates)?;

    let alphabet: HashSet<Symbol> = lines
        .iter()
        .find_map(|l| sigma_re.captures(l))
        .map(|c| split_set(&c[1]).into_iter().collect())
        .ok_or(ConfError::MissingAlphabet)?;

    // the first line carrying neither '=' nor a brace names the initial state
    let start: State = lines
        .iter()
        .find(|l| !l.contains('=') && !l.contains('{') && !l.contains('}'))
        .map(|l| l.to_string())
        .ok_or(ConfError::MissingInitial)?;

    let accept: HashSet<State> = lines
        .iter()
        .find_map(|l| finals_re.captures(l))
        .map(|c| split_set(&c[1]).into_iter().collect())
        .ok_or(ConfError::MissingFinals)?;

    let mut transition: HashMap<State, HashMap<Symbol, State>> = HashMap::new();
    let mut inside = false;
    for l in &lines {
        // any line naming delta is consumed as a block marker
        if l.contains('δ') || l.to_lowercase().contains("delta") {
            inside = true;
            continue;
        }
        if !inside {
            continue;
        }
        if l.starts_with('}') {
            break;
        }
        if !l.contains("->") {
            continue;
        }
        let caps = trans_re
            .captures(l)
            .ok_or_else(|| ConfError::MalformedTransition(l.to_string()))?;
        let from = caps[1].trim().to_string();
        let symbol = caps[2].trim().to_string();
        let to = caps[3].trim().to_string();
        // last write wins on duplicate (state, symbol) keys
        transition.entry(from).or_default().insert(symbol, to);
    }

    let dfa = Dfa {
        states,
        alphabet,
        start,
        accept,
        transition,
    };
    log::debug!("parsed dfa: {:?}", dfa);
    Ok(dfa)
}

#[cfg(test)]
const ENDS_IN_ONE_CONF: &str = "\
Q = {q0, q1}
Σ = {0, 1}
q0
F = {q1}
δ = {
(q0,0) -> q0
(q0,1) -> q1
(q1,0) -> q0
(q1,1) -> q1
}
";

#[test]
fn test_parse_conf() {
    let dfa = parse_conf(ENDS_IN_ONE_CONF).unwrap();
    assert_eq!(dfa.states, vec!["q0".to_string(), "q1".to_string()]);
    assert_eq!(
        dfa.alphabet,
        vec!["0".to_string(), "1".to_string()].into_iter().collect()
    );
    assert_eq!(dfa.start, "q0");
    assert_eq!(dfa.accept, vec!["q1".to_string()].into_iter().collect());
    assert_eq!(
        dfa.transition.values().map(|edges| edges.len()).sum::<usize>(),
        4
    );
    assert_eq!(dfa.transition["q0"]["1"], "q1".to_string());
}

#[test]
fn test_parse_then_evaluate() {
    let dfa = parse_conf(ENDS_IN_ONE_CONF).unwrap();
    assert!(dfa.accept("101"));
    assert!(!dfa.accept("100"));
    assert!(!dfa.accept(""));
    assert!(!dfa.accept("000"));
}

#[test]
fn test_parse_is_deterministic() {
    let a = parse_conf(ENDS_IN_ONE_CONF).unwrap();
    let b = parse_conf(ENDS_IN_ONE_CONF).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_sigma_aliases() {
    let greek = parse_conf("Q = {q0}\nΣ = {a, b}\nq0\nF = {q0}\nδ = {\n}\n").unwrap();
    for alias in ["Sigma", "Sig", "S"] {
        let conf = format!("Q = {{q0}}\n{} = {{a, b}}\nq0\nF = {{q0}}\nδ = {{\n}}\n", alias);
        let dfa = parse_conf(&conf).unwrap();
        assert_eq!(dfa.alphabet, greek.alphabet, "alias {}", alias);
    }
}

#[test]
fn test_comments_and_blank_lines_ignored() {
    let conf = "\
# machine over {0,1}
Q = {q0, q1}   # states

Sigma = {0, 1}
q0   # initial
F = {q1}
delta = {
(q0,1) -> q1   # the only transition
}
";
    let dfa = parse_conf(conf).unwrap();
    assert_eq!(dfa.start, "q0");
    assert_eq!(dfa.transition["q0"].len(), 1);
    assert!(dfa.accept("1"));
}

#[test]
fn test_incomplete_conf() {
    assert_eq!(
        parse_conf("Q = {q0}\nS = {0}\nq0\nF = {q0}\n"),
        Err(ConfError::Incomplete)
    );
    assert_eq!(parse_conf(""), Err(ConfError::Incomplete));
    // comments and blanks do not count towards the minimum
    assert_eq!(
        parse_conf("# a\n# b\n# c\n# d\n# e\n# f\n"),
        Err(ConfError::Incomplete)
    );
}

#[test]
fn test_missing_blocks() {
    assert_eq!(
        parse_conf("X = {q0}\nS = {0}\nq0\nF = {q0}\nδ = {\n"),
        Err(ConfError::MissingStates)
    );
    assert_eq!(
        parse_conf("Q = {q0}\nAlf = {0}\nq0\nF = {q0}\nδ = {\n"),
        Err(ConfError::MissingAlphabet)
    );
    assert_eq!(
        parse_conf("Q = {q0}\nS = {0}\nq0\nG = {q0}\nδ = {\n"),
        Err(ConfError::MissingFinals)
    );
}

#[test]
fn test_missing_initial_state() {
    let conf = "Q = {q0}\nS = {0}\nF = {q0}\nδ = {\n}\n";
    assert_eq!(parse_conf(conf), Err(ConfError::MissingInitial));
}

#[test]
fn test_malformed_transition_names_line() {
    let conf = "\
Q = {q0, q1}
S = {0, 1}
q0
F = {q1}
δ = {
(q0,1)->
}
";
    assert_eq!(
        parse_conf(conf),
        Err(ConfError::MalformedTransition("(q0,1)->".to_string()))
    );
}

#[test]
fn test_duplicate_transition_last_wins() {
    let conf = "\
Q = {q0, q1, q2}
S = {a}
q0
F = {q2}
δ = {
(q0,a) -> q1
(q0,a) -> q2
}
";
    let dfa = parse_conf(conf).unwrap();
    assert_eq!(dfa.transition["q0"]["a"], "q2".to_string());
}

#[test]
fn test_delta_block_tolerates_decorative_lines() {
    // lines without "->" inside the block are skipped, whitespace around
    // the triple is irrelevant, and the closing brace ends the block
    let conf = "\
Q = {q0, q1}
S = {0, 1}
q0
F = {q1}
delta = {
transitions:
( q0 , 1 ) ->  q1
}
(broken,after,block
";
    let dfa = parse_conf(conf).unwrap();
    assert_eq!(dfa.transition["q0"].len(), 1);
    assert_eq!(dfa.transition["q0"]["1"], "q1".to_string());
}

#[test]
fn test_delta_named_line_inside_block_is_a_marker() {
    let conf = "\
Q = {q0, q1, q2}
S = {0, 1}
q0
F = {q2}
δ = {
(q0,0) -> q1
(delta,0) -> q9
(q1,1) -> q2
}
";
    let dfa = parse_conf(conf).unwrap();
    // a line naming delta is consumed as a marker even inside the block:
    // it is not parsed as a transition, and the block stays open for the
    // transitions after it
    assert!(!dfa.transition.contains_key("delta"));
    assert_eq!(dfa.transition["q0"]["0"], "q1".to_string());
    assert_eq!(dfa.transition["q1"]["1"], "q2".to_string());
}

#[test]
fn test_transition_endpoints_not_cross_validated() {
    let conf = "\
Q = {q0}
S = {0}
q0
F = {q9}
δ = {
(q0,0) -> q9
(qx,z) -> qy
}
";
    let dfa = parse_conf(conf).unwrap();
    // undeclared endpoints parse fine; the symbol "z" only matters at
    // evaluation time, where it is simply outside the alphabet
    assert!(dfa.accept("0"));
    assert!(!dfa.accept("z"));
}
