use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use cfg_enum::{Enumeration, GenerationConfig, Grammar, RepetitionMode};

/// Depth-bounded enumeration of a context-free grammar's sentences
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the grammar file (`NAME ::= alt | alt | ...` per line)
    grammar_file: PathBuf,

    /// Maximum number of derivations per string. Warning: a number too
    /// high can make memory usage explode
    #[arg(short, long, default_value_t = 6)]
    depth: usize,

    /// How to treat repeated derivations of the same string
    #[arg(short, long, value_enum, default_value_t = Repetition::None)]
    repetition: Repetition,

    /// Store the derivation steps with each string
    #[arg(short = 'D', long)]
    derivations: bool,

    /// Omit nonterminal positions from derivation steps to save memory
    #[arg(long)]
    low_memory: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Repetition {
    /// Keep one occurrence per string
    None,
    /// Keep every occurrence
    All,
    /// Count occurrences per string
    Count,
}

impl From<Repetition> for RepetitionMode {
    fn from(repetition: Repetition) -> Self {
        match repetition {
            Repetition::None => RepetitionMode::Disabled,
            Repetition::All => RepetitionMode::StoreAll,
            Repetition::Count => RepetitionMode::Count,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let grammar = Grammar::from_file(&cli.grammar_file)?;
    let config = GenerationConfig {
        derivations: cli.derivations,
        repetition: cli.repetition.into(),
        low_memory: cli.low_memory,
    };

    let result = grammar.enumerate(cli.depth, &config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match result {
        Enumeration::Unique(strings) => {
            let mut strings: Vec<String> = strings.into_iter().collect();
            strings.sort();
            for text in strings {
                println!("{}", text);
            }
        }
        Enumeration::All(strings) => {
            for text in strings {
                println!("{}", text);
            }
        }
        Enumeration::Counted(counts) => {
            let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
            counts.sort();
            for (text, count) in counts {
                println!("{} -> {}", text, count);
            }
        }
        Enumeration::Derivations(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for text in keys {
                println!("{} ->", text);
                for path in &map[text] {
                    let steps: Vec<String> = path.iter().map(ToString::to_string).collect();
                    println!("{}", steps.join(", "));
                }
                println!();
            }
        }
    }

    Ok(())
}
