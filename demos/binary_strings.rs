use cfg_enum::{Enumeration, GenerationConfig, Grammar, RepetitionMode};
use std::error::Error;

/// Enumerates a small binary-string grammar in every output mode
fn main() -> Result<(), Box<dyn Error>> {
    let mut grammar = Grammar::new();
    grammar.add_rule("S", vec!["0A", "1B"])?;
    grammar.add_rule("A", vec!["0AA", "1S", "1"])?;
    grammar.add_rule("B", vec!["1BB", "0S", "0"])?;

    let depth = 6;

    println!("Strings:");
    let config = GenerationConfig {
        repetition: RepetitionMode::StoreAll,
        ..Default::default()
    };
    if let Enumeration::All(strings) = grammar.enumerate(depth, &config)? {
        for text in strings {
            println!("{}", text);
        }
    }

    println!("\nWith derivations, without nonterminal index:");
    let config = GenerationConfig {
        derivations: true,
        repetition: RepetitionMode::StoreAll,
        low_memory: true,
        ..Default::default()
    };
    if let Enumeration::Derivations(map) = grammar.enumerate(depth, &config)? {
        for (text, paths) in &map {
            println!("{} ->", text);
            for path in paths {
                let steps: Vec<String> = path.iter().map(ToString::to_string).collect();
                println!("{}", steps.join(", "));
            }
            println!();
        }
    }

    println!("\nWith one derivation per string:");
    let config = GenerationConfig {
        derivations: true,
        ..Default::default()
    };
    if let Enumeration::Derivations(map) = grammar.enumerate(depth, &config)? {
        for (text, paths) in &map {
            println!("{} ->", text);
            for path in paths {
                let steps: Vec<String> = path.iter().map(ToString::to_string).collect();
                println!("{}", steps.join(", "));
            }
            println!();
        }
    }

    println!("\nStrings with count:");
    let config = GenerationConfig {
        repetition: RepetitionMode::Count,
        ..Default::default()
    };
    if let Enumeration::Counted(counts) = grammar.enumerate(depth, &config)? {
        for (text, count) in &counts {
            println!("{} -> {}", text, count);
        }
    }

    Ok(())
}
