pub mod automaton;
pub mod conf;
