//! Cfg-Enum enumerates the sentences of a context-free grammar.
//!
//! Unbounded generation of a recursive grammar never terminates, so every
//! run is bounded by a maximum derivation depth. Within that budget the
//! engine can return the unique terminal strings, every independent
//! derivation, occurrence counts, or the full derivation path of each
//! string, depending on the configuration.
//!
//! # Example
//!
//! ```rust
//! use cfg_enum::{Enumeration, GenerationConfig, Grammar};
//!
//! // Binary strings with an equal number of 0s and 1s (up to the budget)
//! let mut grammar = Grammar::new();
//! grammar.add_rule("S", vec!["0A", "1B"]).unwrap();
//! grammar.add_rule("A", vec!["0AA", "1S", "1"]).unwrap();
//! grammar.add_rule("B", vec!["1BB", "0S", "0"]).unwrap();
//!
//! let result = grammar.enumerate(1, &GenerationConfig::default()).unwrap();
//! match result {
//!     Enumeration::Unique(strings) => {
//!         assert!(strings.contains("01"));
//!         assert!(strings.contains("10"));
//!     }
//!     _ => unreachable!(),
//! }
//! ```

pub mod engine;
pub mod grammar;
pub mod queue;
pub mod utils;

pub use engine::{
    DerivationPath, DerivationStep, Enumeration, GenerationConfig, RepetitionMode, enumerate,
};
pub use grammar::{Grammar, GrammarBuilder, NonterminalMatch, NonterminalScanner, START_SYMBOL};
pub use utils::{GrammarError, Result};
