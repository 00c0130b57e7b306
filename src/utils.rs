use std::io;
use thiserror::Error;

/// Custom error types for the grammar enumerator
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid grammar: {0}")]
    InvalidGrammar(String),

    #[error("Grammar has no start symbol 'S'")]
    MissingStartSymbol,

    #[error("Nonterminal '{first}' collides with '{second}' under substring matching")]
    AmbiguousNonterminal { first: String, second: String },

    #[error("Counting repetitions cannot be combined with derivation tracking")]
    UnsupportedMode,
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;
