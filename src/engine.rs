//! Depth-bounded breadth-first generation and the mode dispatcher.
//!
//! Two traversals share the leftmost-expansion rule: [`string_gen`] produces
//! bare terminal strings level by level, [`derivation_gen`] additionally
//! tracks how each string was derived. [`enumerate`] maps a
//! [`GenerationConfig`] onto a concrete (algorithm, queue, output, inserter)
//! combination and runs it.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::grammar::{Grammar, NonterminalScanner, START_SYMBOL};
use crate::queue::{
    AdditiveQueue, Carry, ConservativeQueue, CountingSet, DedupQueue, Item, PathQueue, PlainQueue,
    StringQueue, UniqueSet,
};
use crate::utils::{GrammarError, Result};

/// One rule application recorded on a derivation path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivationStep {
    /// The substitution text spliced in
    pub text: String,
    /// Byte offset of the replaced nonterminal, omitted in low-memory mode
    pub offset: Option<usize>,
}

impl fmt::Display for DerivationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "({}, {})", offset, self.text),
            None => write!(f, "{}", self.text),
        }
    }
}

/// The ordered sequence of expansions that produced a string from the start
/// symbol; its length is the string's derivation depth
pub type DerivationPath = Vec<DerivationStep>;

/// Policy for strings reached by more than one derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepetitionMode {
    /// Keep one occurrence, ignore the rest
    #[default]
    Disabled,
    /// Keep every occurrence
    StoreAll,
    /// Count occurrences instead of storing them
    Count,
}

/// Configuration for one generation run
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationConfig {
    /// Record the derivation path(s) of each generated string
    pub derivations: bool,
    /// How to treat repeated derivations of the same string
    pub repetition: RepetitionMode,
    /// Omit nonterminal positions from derivation steps
    pub low_memory: bool,
}

/// The result of a generation run; the shape is selected by the
/// [`GenerationConfig`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Enumeration {
    /// Unique terminal strings (`derivations = false`, repetition disabled)
    Unique(HashSet<String>),
    /// One entry per independent derivation (`repetition = StoreAll`)
    All(Vec<String>),
    /// Terminal string to occurrence count (`repetition = Count`)
    Counted(HashMap<String, usize>),
    /// Terminal string to the derivation path(s) that reached it
    Derivations(HashMap<String, Vec<DerivationPath>>),
}

/// Replace `text[start..end]` with `replacement`
fn splice(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let mut result = String::with_capacity(text.len() - (end - start) + replacement.len());
    result.push_str(&text[..start]);
    result.push_str(replacement);
    result.push_str(&text[end..]);
    result
}

/// Generate terminal strings without derivation tracking.
///
/// Runs `max_depth + 1` expansion levels delimited by depth markers, always
/// expanding the leftmost nonterminal occurrence with every alternative of
/// its rule. Terminal strings go to `insert`; after the last level the queue
/// is drained and anything still containing a nonterminal is discarded,
/// which bounds the run regardless of grammar recursion.
pub fn string_gen<Q, O, F>(
    grammar: &Grammar,
    scanner: &NonterminalScanner,
    max_depth: usize,
    out: &mut O,
    mut insert: F,
    queue: &mut Q,
) where
    Q: StringQueue,
    F: FnMut(&mut O, String),
{
    queue.put(Item::Text(START_SYMBOL.to_string()));

    for _ in 0..=max_depth {
        queue.put(Item::DepthMark);
        while let Some(item) = queue.take() {
            let text = match item {
                // All of this level's strings have been expanded
                Item::DepthMark => break,
                Item::Text(text) => text,
            };

            match scanner.find(&text) {
                None => insert(out, text),
                Some(found) => {
                    if let Some(alternatives) = grammar.alternatives(found.name) {
                        for alternative in alternatives {
                            queue.put(Item::Text(splice(
                                &text,
                                found.start,
                                found.end,
                                alternative,
                            )));
                        }
                    }
                }
            }
        }
    }

    // The last fully expanded level: keep terminals, prune the rest
    while let Some(item) = queue.take() {
        if let Item::Text(text) = item {
            if scanner.find(&text).is_none() {
                insert(out, text);
            }
        }
    }
}

/// Generate terminal strings together with their derivation paths.
///
/// Paths longer than or equal to `max_depth` cannot be extended; a string
/// that still contains a nonterminal once no extensible path remains is
/// abandoned, the same pruning rule as [`string_gen`]. The queue's merge
/// policy decides whether paths reaching the same string accumulate.
pub fn derivation_gen<Q, O, F>(
    grammar: &Grammar,
    scanner: &NonterminalScanner,
    max_depth: usize,
    low_memory: bool,
    out: &mut O,
    mut insert: F,
    queue: &mut Q,
) where
    Q: PathQueue,
    F: FnMut(&mut O, String, Vec<DerivationPath>),
{
    queue.put(START_SYMBOL.to_string(), vec![DerivationPath::new()]);

    while let Some((text, paths)) = queue.take() {
        let Some(found) = scanner.find(&text) else {
            insert(out, text, paths);
            continue;
        };

        let extensible: Vec<DerivationPath> = paths
            .into_iter()
            .filter(|path| path.len() < max_depth)
            .collect();
        if extensible.is_empty() {
            // Still contains a nonterminal with no depth budget left
            continue;
        }

        let Some(alternatives) = grammar.alternatives(found.name) else {
            continue;
        };
        for alternative in alternatives {
            let next = splice(&text, found.start, found.end, alternative);
            let step = DerivationStep {
                text: alternative.clone(),
                offset: if low_memory { None } else { Some(found.start) },
            };
            let extended = extensible
                .iter()
                .map(|path| {
                    let mut path = path.clone();
                    path.push(step.clone());
                    path
                })
                .collect();
            queue.put(next, extended);
        }
    }
}

/// Run one generation, selecting algorithm, queue, output container and
/// inserter from the configuration.
///
/// The grammar is validated first: the start symbol must be present and
/// nonterminal names must not collide under substring matching. Requesting
/// occurrence counting together with derivation tracking is rejected.
pub fn enumerate(
    grammar: &Grammar,
    max_depth: usize,
    config: &GenerationConfig,
) -> Result<Enumeration> {
    grammar.validate()?;
    let scanner = grammar.scanner();

    if config.derivations {
        let mut out: HashMap<String, Vec<DerivationPath>> = HashMap::new();
        let insert = |out: &mut HashMap<String, Vec<DerivationPath>>,
                      text: String,
                      paths: Vec<DerivationPath>| {
            out.insert(text, paths);
        };

        match config.repetition {
            RepetitionMode::Count => return Err(GrammarError::UnsupportedMode),
            RepetitionMode::StoreAll => {
                let mut queue = AdditiveQueue::new();
                derivation_gen(
                    grammar,
                    &scanner,
                    max_depth,
                    config.low_memory,
                    &mut out,
                    insert,
                    &mut queue,
                );
            }
            RepetitionMode::Disabled => {
                let mut queue = ConservativeQueue::new();
                derivation_gen(
                    grammar,
                    &scanner,
                    max_depth,
                    config.low_memory,
                    &mut out,
                    insert,
                    &mut queue,
                );
            }
        }

        Ok(Enumeration::Derivations(out))
    } else {
        match config.repetition {
            RepetitionMode::Disabled => {
                let mut out = HashSet::new();
                let mut queue = DedupQueue::new(UniqueSet::new());
                string_gen(
                    grammar,
                    &scanner,
                    max_depth,
                    &mut out,
                    |out, text| {
                        out.insert(text);
                    },
                    &mut queue,
                );
                Ok(Enumeration::Unique(out))
            }
            RepetitionMode::StoreAll => {
                let mut out = Vec::new();
                let mut queue = PlainQueue::new();
                string_gen(
                    grammar,
                    &scanner,
                    max_depth,
                    &mut out,
                    |out, text| out.push(text),
                    &mut queue,
                );
                Ok(Enumeration::All(out))
            }
            RepetitionMode::Count => {
                let carry = Carry::new();
                let mut out = CountingSet::new(carry.clone());
                let mut queue = DedupQueue::new(CountingSet::new(carry));
                string_gen(
                    grammar,
                    &scanner,
                    max_depth,
                    &mut out,
                    |out, text| out.insert(text),
                    &mut queue,
                );
                Ok(Enumeration::Counted(out.into_counts()))
            }
        }
    }
}

impl Grammar {
    /// Enumerate this grammar's strings or derivations up to `max_depth`.
    ///
    /// See [`enumerate`].
    pub fn enumerate(&self, max_depth: usize, config: &GenerationConfig) -> Result<Enumeration> {
        enumerate(self, max_depth, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `{S: [0A, 1B], A: [0AA, 1S, 1], B: [1BB, 0S, 0]}`
    fn golden() -> Grammar {
        let mut grammar = Grammar::new();
        grammar.add_rule("S", vec!["0A", "1B"]).unwrap();
        grammar.add_rule("A", vec!["0AA", "1S", "1"]).unwrap();
        grammar.add_rule("B", vec!["1BB", "0S", "0"]).unwrap();
        grammar
    }

    /// Two derivations reach the same terminal string
    fn diamond() -> Grammar {
        let mut grammar = Grammar::new();
        grammar.add_rule("S", vec!["A", "B"]).unwrap();
        grammar.add_rule("A", vec!["x"]).unwrap();
        grammar.add_rule("B", vec!["x"]).unwrap();
        grammar
    }

    fn unique(grammar: &Grammar, depth: usize) -> HashSet<String> {
        match grammar
            .enumerate(depth, &GenerationConfig::default())
            .unwrap()
        {
            Enumeration::Unique(strings) => strings,
            other => panic!("expected unique set, got {:?}", other),
        }
    }

    fn set_of(strings: &[&str]) -> HashSet<String> {
        strings.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_splice() {
        assert_eq!(splice("0A", 1, 2, "1S"), "01S");
        assert_eq!(splice("0A", 1, 2, ""), "0");
        assert_eq!(splice("S", 0, 1, "0A"), "0A");
    }

    #[test]
    fn test_golden_depth_zero_is_empty() {
        assert_eq!(unique(&golden(), 0), HashSet::new());
    }

    #[test]
    fn test_golden_depth_one() {
        assert_eq!(unique(&golden(), 1), set_of(&["01", "10"]));
    }

    #[test]
    fn test_golden_depth_two_adds_nothing() {
        assert_eq!(unique(&golden(), 2), set_of(&["01", "10"]));
    }

    #[test]
    fn test_golden_depth_three() {
        assert_eq!(
            unique(&golden(), 3),
            set_of(&["01", "10", "0011", "0101", "0110", "1100", "1001", "1010"])
        );
    }

    #[test]
    fn test_monotonic_in_depth() {
        let grammar = golden();
        let mut previous = HashSet::new();
        for depth in 0..5 {
            let current = unique(&grammar, depth);
            assert!(
                previous.is_subset(&current),
                "deepening to {} lost previously reachable strings",
                depth
            );
            previous = current;
        }
    }

    #[test]
    fn test_store_all_keeps_order_and_duplicates() {
        let config = GenerationConfig {
            repetition: RepetitionMode::StoreAll,
            ..Default::default()
        };

        match golden().enumerate(1, &config).unwrap() {
            Enumeration::All(strings) => assert_eq!(strings, vec!["01", "10"]),
            other => panic!("expected list, got {:?}", other),
        }

        match diamond().enumerate(2, &config).unwrap() {
            Enumeration::All(strings) => assert_eq!(strings, vec!["x", "x"]),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_count_mode_tallies_derivations() {
        let config = GenerationConfig {
            repetition: RepetitionMode::Count,
            ..Default::default()
        };

        match diamond().enumerate(2, &config).unwrap() {
            Enumeration::Counted(counts) => {
                assert_eq!(counts, HashMap::from([("x".to_string(), 2)]));
            }
            other => panic!("expected counts, got {:?}", other),
        }

        match golden().enumerate(1, &config).unwrap() {
            Enumeration::Counted(counts) => {
                assert_eq!(
                    counts,
                    HashMap::from([("01".to_string(), 1), ("10".to_string(), 1)])
                );
            }
            other => panic!("expected counts, got {:?}", other),
        }
    }

    #[test]
    fn test_derivation_depth_zero_is_empty() {
        let config = GenerationConfig {
            derivations: true,
            ..Default::default()
        };

        match golden().enumerate(0, &config).unwrap() {
            Enumeration::Derivations(map) => assert!(map.is_empty()),
            other => panic!("expected derivations, got {:?}", other),
        }
    }

    #[test]
    fn test_derivation_paths_with_positions() {
        let config = GenerationConfig {
            derivations: true,
            ..Default::default()
        };

        let Enumeration::Derivations(map) = golden().enumerate(2, &config).unwrap() else {
            panic!("expected derivations");
        };

        let step = |text: &str, offset: usize| DerivationStep {
            text: text.to_string(),
            offset: Some(offset),
        };

        assert_eq!(map.len(), 2);
        assert_eq!(map["01"], vec![vec![step("0A", 0), step("1", 1)]]);
        assert_eq!(map["10"], vec![vec![step("1B", 0), step("0", 1)]]);
    }

    #[test]
    fn test_low_memory_omits_positions() {
        let config = GenerationConfig {
            derivations: true,
            low_memory: true,
            ..Default::default()
        };

        let Enumeration::Derivations(map) = golden().enumerate(2, &config).unwrap() else {
            panic!("expected derivations");
        };

        let step = |text: &str| DerivationStep {
            text: text.to_string(),
            offset: None,
        };

        assert_eq!(map["01"], vec![vec![step("0A"), step("1")]]);
    }

    #[test]
    fn test_additive_collects_all_paths() {
        let config = GenerationConfig {
            derivations: true,
            repetition: RepetitionMode::StoreAll,
            low_memory: true,
            ..Default::default()
        };

        let Enumeration::Derivations(map) = diamond().enumerate(2, &config).unwrap() else {
            panic!("expected derivations");
        };

        let step = |text: &str| DerivationStep {
            text: text.to_string(),
            offset: None,
        };

        assert_eq!(
            map["x"],
            vec![
                vec![step("A"), step("x")],
                vec![step("B"), step("x")],
            ]
        );
    }

    #[test]
    fn test_conservative_keeps_one_path() {
        let config = GenerationConfig {
            derivations: true,
            repetition: RepetitionMode::Disabled,
            low_memory: true,
            ..Default::default()
        };

        let Enumeration::Derivations(map) = diamond().enumerate(2, &config).unwrap() else {
            panic!("expected derivations");
        };

        let step = |text: &str| DerivationStep {
            text: text.to_string(),
            offset: None,
        };

        assert_eq!(map["x"], vec![vec![step("A"), step("x")]]);
    }

    #[test]
    fn test_path_count_matches_occurrence_count() {
        let derivation_config = GenerationConfig {
            derivations: true,
            repetition: RepetitionMode::StoreAll,
            low_memory: true,
            ..Default::default()
        };
        let count_config = GenerationConfig {
            repetition: RepetitionMode::Count,
            ..Default::default()
        };

        let grammar = diamond();
        let Enumeration::Derivations(paths) = grammar.enumerate(2, &derivation_config).unwrap()
        else {
            panic!("expected derivations");
        };
        let Enumeration::Counted(counts) = grammar.enumerate(2, &count_config).unwrap() else {
            panic!("expected counts");
        };

        assert_eq!(paths.len(), counts.len());
        for (text, text_paths) in &paths {
            assert_eq!(text_paths.len(), counts[text]);
        }
    }

    #[test]
    fn test_no_output_contains_nonterminals() {
        let grammar = golden();
        let scanner = grammar.scanner();

        for repetition in [
            RepetitionMode::Disabled,
            RepetitionMode::StoreAll,
            RepetitionMode::Count,
        ] {
            let config = GenerationConfig {
                repetition,
                ..Default::default()
            };
            let strings: Vec<String> = match grammar.enumerate(4, &config).unwrap() {
                Enumeration::Unique(set) => set.into_iter().collect(),
                Enumeration::All(list) => list,
                Enumeration::Counted(counts) => counts.into_keys().collect(),
                Enumeration::Derivations(_) => unreachable!(),
            };
            for text in strings {
                assert!(scanner.find(&text).is_none(), "nonterminal left in {text}");
            }
        }

        let config = GenerationConfig {
            derivations: true,
            ..Default::default()
        };
        let Enumeration::Derivations(map) = grammar.enumerate(4, &config).unwrap() else {
            panic!("expected derivations");
        };
        for text in map.keys() {
            assert!(scanner.find(text).is_none(), "nonterminal left in {text}");
        }
    }

    #[test]
    fn test_deterministic_across_runs() {
        let grammar = golden();
        for repetition in [
            RepetitionMode::Disabled,
            RepetitionMode::StoreAll,
            RepetitionMode::Count,
        ] {
            let config = GenerationConfig {
                repetition,
                ..Default::default()
            };
            let first = grammar.enumerate(4, &config).unwrap();
            let second = grammar.enumerate(4, &config).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_count_with_derivations_is_rejected() {
        let config = GenerationConfig {
            derivations: true,
            repetition: RepetitionMode::Count,
            ..Default::default()
        };

        assert!(matches!(
            golden().enumerate(2, &config),
            Err(GrammarError::UnsupportedMode)
        ));
    }

    #[test]
    fn test_missing_start_symbol_is_rejected() {
        let mut grammar = Grammar::new();
        grammar.add_rule("A", vec!["a"]).unwrap();

        assert!(matches!(
            grammar.enumerate(2, &GenerationConfig::default()),
            Err(GrammarError::MissingStartSymbol)
        ));
    }

    #[test]
    fn test_epsilon_alternative() {
        let mut grammar = Grammar::new();
        grammar.add_rule("S", vec!["aS", ""]).unwrap();

        assert_eq!(unique(&grammar, 2), set_of(&["", "a", "aa"]));
    }
}
