use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::utils::{GrammarError, Result};

/// The start symbol every grammar must define
pub const START_SYMBOL: &str = "S";

/// A context-free grammar: an ordered mapping from nonterminal names to
/// lists of alternative strings.
///
/// Alternatives are raw strings that interleave terminal characters with
/// occurrences of nonterminal names (e.g. `"0AA"` where `A` is a
/// nonterminal). Nonterminal occurrences are found by a leftmost substring
/// scan against the declared names, so names must not be substrings of one
/// another; [`Grammar::validate`] rejects grammars that break this rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grammar {
    /// Nonterminal names in declaration order
    order: Vec<String>,
    /// The rules mapping nonterminals to their alternatives
    rules: HashMap<String, Vec<String>>,
}

impl Grammar {
    /// Create a new empty grammar
    pub fn new() -> Self {
        Grammar::default()
    }

    /// Add a rule to the grammar.
    ///
    /// If the nonterminal already has a rule, the alternatives are appended
    /// to it. Declaration order of nonterminals is preserved.
    pub fn add_rule(&mut self, nonterminal: &str, alternatives: Vec<&str>) -> Result<&mut Self> {
        if nonterminal.is_empty() {
            return Err(GrammarError::InvalidGrammar(
                "nonterminal name must not be empty".to_string(),
            ));
        }

        if !self.rules.contains_key(nonterminal) {
            self.order.push(nonterminal.to_string());
        }
        self.rules
            .entry(nonterminal.to_string())
            .or_default()
            .extend(alternatives.into_iter().map(|a| a.to_string()));

        Ok(self)
    }

    /// Parse a grammar from a file.
    ///
    /// See [`Grammar::parse`] for the format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(GrammarError::Io)?;
        Self::parse(&text)
    }

    /// Parse a grammar from rule text.
    ///
    /// One rule per line: `NAME ::= alternative | alternative | ...`.
    /// Blank lines and lines starting with `#` are skipped. A repeated
    /// left-hand side extends the existing rule. Alternatives are trimmed;
    /// an empty alternative stands for epsilon.
    pub fn parse(text: &str) -> Result<Self> {
        let rule_regex = Regex::new(r"^\s*(\S+)\s*::=(.*)$").unwrap();
        let mut grammar = Grammar::new();

        for (number, line) in text.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some(captures) = rule_regex.captures(trimmed) else {
                return Err(GrammarError::Parse(format!(
                    "line {}: expected 'NAME ::= alternatives', got '{}'",
                    number + 1,
                    trimmed
                )));
            };

            let name = captures.get(1).unwrap().as_str();
            let alternatives: Vec<&str> = captures
                .get(2)
                .unwrap()
                .as_str()
                .split('|')
                .map(str::trim)
                .collect();

            grammar.add_rule(name, alternatives)?;
        }

        Ok(grammar)
    }

    /// Check the invariants the generation engine relies on: the start
    /// symbol must be present and no nonterminal name may be a substring of
    /// another, since occurrences are located by raw substring scan.
    pub fn validate(&self) -> Result<()> {
        if !self.rules.contains_key(START_SYMBOL) {
            return Err(GrammarError::MissingStartSymbol);
        }

        for (i, first) in self.order.iter().enumerate() {
            for second in &self.order[i + 1..] {
                if first.contains(second.as_str()) || second.contains(first.as_str()) {
                    return Err(GrammarError::AmbiguousNonterminal {
                        first: first.clone(),
                        second: second.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Get the alternatives of a nonterminal
    pub fn alternatives(&self, nonterminal: &str) -> Option<&[String]> {
        self.rules.get(nonterminal).map(Vec::as_slice)
    }

    /// Iterate over the nonterminal names in declaration order
    pub fn nonterminals(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Check if the grammar contains a specific nonterminal
    pub fn has_nonterminal(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Number of nonterminals in the grammar
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the grammar has no rules
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Build a leftmost-occurrence scanner over this grammar's nonterminals
    pub fn scanner(&self) -> NonterminalScanner {
        NonterminalScanner::new(self.order.iter().cloned())
    }
}

/// Builder for constructing Grammar instances
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    grammar: Grammar,
}

impl GrammarBuilder {
    /// Create a new grammar builder
    pub fn new() -> Self {
        GrammarBuilder {
            grammar: Grammar::new(),
        }
    }

    /// Add a rule to the grammar
    pub fn add_rule(mut self, nonterminal: &str, alternatives: &[&str]) -> Self {
        // Ignore errors in builder pattern for simplicity
        let _ = self.grammar.add_rule(nonterminal, alternatives.to_vec());
        self
    }

    /// Build the grammar
    pub fn build(self) -> Grammar {
        self.grammar
    }
}

/// Locates the leftmost nonterminal occurrence in a string.
///
/// Scans candidate positions left to right; at a given position the names
/// are tried in declaration order. This keeps the tie-break deterministic
/// without going through a general pattern engine.
#[derive(Debug, Clone)]
pub struct NonterminalScanner {
    names: Vec<String>,
}

/// A located nonterminal occurrence, with byte offsets into the scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonterminalMatch<'a> {
    /// The nonterminal name that matched
    pub name: &'a str,
    /// Byte offset of the start of the occurrence
    pub start: usize,
    /// Byte offset one past the end of the occurrence
    pub end: usize,
}

impl NonterminalScanner {
    /// Create a scanner for the given nonterminal names, in priority order
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        NonterminalScanner {
            names: names.into_iter().filter(|n| !n.is_empty()).collect(),
        }
    }

    /// Find the leftmost nonterminal occurrence in `text`
    pub fn find<'a>(&'a self, text: &str) -> Option<NonterminalMatch<'a>> {
        for (start, _) in text.char_indices() {
            let rest = &text[start..];
            for name in &self.names {
                if rest.starts_with(name.as_str()) {
                    return Some(NonterminalMatch {
                        name,
                        start,
                        end: start + name.len(),
                    });
                }
            }
        }
        None
    }
}
