//! DFA deserialization and longest-match scanning for pattern tokens.

use regex_automata::dfa::Automaton;
use regex_automata::dfa::sparse::DFA;
use regex_automata::{Anchored, Input};

/// Result of matching one recognizer at a position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scan {
    /// Length of the longest match, if any.
    pub len: Option<usize>,
    /// How many bytes were looked at to decide. Always `>= len`.
    pub examined: usize,
}

/// Deserialize a sparse DFA from artifact bytes into an owned automaton.
///
/// The bytes must have been produced by `DFA::to_bytes_little_endian()`.
pub fn deserialize_dfa(bytes: &[u8]) -> Result<DFA<Vec<u8>>, String> {
    DFA::from_bytes(bytes)
        .map(|(dfa, _)| dfa.to_owned())
        .map_err(|e| e.to_string())
}

/// Walk `dfa` over `haystack` from an anchored start, remembering the last
/// match state seen.
///
/// Match states are delayed by one byte: entering a match state after
/// consuming byte `i` means a match ends at `i`. Because of the delay,
/// `examined` can overshoot the bytes that decided the match by one.
pub(crate) fn longest_match(dfa: &DFA<Vec<u8>>, haystack: &[u8]) -> Scan {
    let input = Input::new(haystack).anchored(Anchored::Yes);
    let Ok(mut state) = dfa.start_state_forward(&input) else {
        return Scan::default();
    };

    let mut scan = Scan::default();
    for (i, &byte) in haystack.iter().enumerate() {
        state = dfa.next_state(state, byte);
        scan.examined = i + 1;
        if dfa.is_match_state(state) {
            scan.len = Some(i);
        }
        if dfa.is_dead_state(state) || dfa.is_quit_state(state) {
            return scan;
        }
    }

    state = dfa.next_eoi_state(state);
    if dfa.is_match_state(state) {
        scan.len = Some(haystack.len());
    }
    scan
}
