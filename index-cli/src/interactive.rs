//! The interactive prompt (spec.md §6 "Interactive prompt"), modeled on
//! the read-eval-print loop shape of a rustyline-based shell.

use index_core::index::Index;
use index_core::record::Record;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use crate::engine::AnyEngine;

/// Process exit code the caller should use once the loop ends.
pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_INTERRUPTED: i32 = 130;

pub fn run(engine: &mut AnyEngine) -> i32 {
    println!("index-cli interactive prompt. '+' insert, '-' remove, '?'/bare key search, 'q' quit.");

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("failed to start the prompt: {e}");
            return EXIT_CLEAN;
        }
    };

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);
                if trimmed == "q" {
                    return EXIT_CLEAN;
                }
                if let Err(message) = dispatch(engine, trimmed) {
                    println!("error: {message}");
                }
            }
            Err(ReadlineError::Interrupted) => {
                info!("interactive session interrupted");
                return EXIT_INTERRUPTED;
            }
            Err(ReadlineError::Eof) => return EXIT_CLEAN,
            Err(e) => {
                eprintln!("readline error: {e}");
                return EXIT_CLEAN;
            }
        }
    }
}

fn dispatch(engine: &mut AnyEngine, line: &str) -> Result<(), String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["+", rest @ ..] => {
            let values = parse_ints(rest)?;
            if values.is_empty() {
                return Err("insert requires at least one integer".into());
            }
            let stats_before = engine.search(values[0]).len();
            let inserted = engine.insert(Record::new(values));
            if inserted {
                println!("inserted");
            } else {
                println!("rejected (duplicate key, {stats_before} existing match)");
            }
            Ok(())
        }
        ["-", key] => {
            let key = parse_int(key)?;
            println!("{}", if engine.remove(key) { "removed" } else { "not found" });
            Ok(())
        }
        ["?", key] => {
            print_search(engine, parse_int(key)?);
            Ok(())
        }
        [bare] => print_bare(engine, bare),
        _ => Err(format!("unrecognized input: {line}")),
    }
}

fn print_bare(engine: &mut AnyEngine, token: &str) -> Result<(), String> {
    let key = parse_int(token)?;
    print_search(engine, key);
    Ok(())
}

fn print_search(engine: &AnyEngine, key: i64) {
    let found = engine.search(key);
    if found.is_empty() {
        println!("(no match)");
    } else {
        for record in found {
            println!("{:?}", record.elements());
        }
    }
}

fn parse_int(token: &str) -> Result<i64, String> {
    token.trim().parse::<i64>().map_err(|_| format!("'{token}' is not an integer"))
}

fn parse_ints(tokens: &[&str]) -> Result<Vec<i64>, String> {
    tokens.iter().map(|t| parse_int(t)).collect()
}
