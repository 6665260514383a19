//! fieldcheck CLI - Form Field Validation
//!
//! Validates JSON snapshot files against a TOML or JSON rule set.

use anyhow::{bail, Context, Result};
use fieldcheck::prelude::*;
use indexmap::IndexMap;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("fieldcheck");

    if args.len() < 2 {
        print_usage(program);
        return ExitCode::from(2);
    }

    match args[1].as_str() {
        "kinds" => {
            list_kinds();
            ExitCode::SUCCESS
        }
        "validate" => {
            let outcome = run_validate(&args[2..]);
            if let Err(e) = &outcome {
                eprintln!("❌ {:#}", e);
                if let Some(fix) = suggestion(e) {
                    eprintln!("   → Suggestion: {}", fix);
                }
            }
            ExitCode::from(exit_status(&outcome))
        }
        "help" | "--help" | "-h" => {
            print_usage(program);
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("{} {}", fieldcheck::NAME, fieldcheck::VERSION);
            ExitCode::SUCCESS
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(program);
            ExitCode::from(2)
        }
    }
}

/// 0 when every snapshot is valid, 1 when some snapshot is invalid, 2 on error.
fn exit_status(outcome: &Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

/// Fix hint for rule-set defects.
fn suggestion(error: &anyhow::Error) -> Option<String> {
    match error.downcast_ref::<FieldcheckError>()? {
        FieldcheckError::Configuration(c) => c.suggested_fix(),
        _ => None,
    }
}

fn print_usage(program: &str) {
    println!("fieldcheck v{}", fieldcheck::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  validate <rules> <snapshot>...  Validate snapshots against a rule set");
    println!("  kinds                           List available rule kinds");
    println!("  help                            Show this help message");
    println!();
    println!("Validate options:");
    println!("  --json    Print results as JSON");
    println!();
    println!("Rule sets are .toml or .json files. Snapshots are JSON objects mapping");
    println!("field ids to strings or booleans; glob patterns are expanded.");
    println!();
    println!("Exit status: 0 all valid, 1 some snapshot invalid, 2 error.");
}

fn list_kinds() {
    let registry = RuleRegistry::with_builtins();

    println!("Available rule kinds ({} total):", registry.len());
    println!();
    for name in registry.kind_names() {
        println!("  • {} - {}", name, registry.description(name).unwrap_or_default());
    }
}

/// Returns whether every snapshot is valid.
fn run_validate(args: &[String]) -> Result<bool> {
    let mut json = false;
    let mut positional = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--json" => json = true,
            flag if flag.starts_with("--") => bail!("unknown option: {}", flag),
            path => positional.push(path),
        }
    }

    let (rules_path, patterns) = match positional.split_first() {
        Some((rules, patterns)) if !patterns.is_empty() => (*rules, patterns),
        _ => bail!("usage: fieldcheck validate <rules> <snapshot>... [--json]"),
    };

    let document = RuleSetDocument::load(rules_path)
        .with_context(|| format!("failed to load rule set {}", rules_path))?;
    let engine = ValidationEngine::from_document(&document, &RuleRegistry::with_builtins())
        .map_err(FieldcheckError::from)
        .with_context(|| format!("invalid rule set {}", rules_path))?;
    log::info!(
        "rule set {} has {} field(s)",
        document.name.as_deref().unwrap_or(rules_path),
        engine.field_count()
    );

    let paths = expand_patterns(patterns)?;
    let snapshots = paths
        .iter()
        .map(|path| {
            load_snapshot(path)
                .with_context(|| format!("failed to load snapshot {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let results = engine.validate_many(&snapshots);
    let all_valid = results.iter().all(ValidationResult::is_valid);

    if json {
        let report: IndexMap<String, &ValidationResult> = paths
            .iter()
            .map(|p| p.display().to_string())
            .zip(results.iter())
            .collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (path, result) in paths.iter().zip(&results) {
            println!("{} {}", path.display(), result.summary());
            for (field_id, outcome) in result.iter() {
                match &outcome.message {
                    None => println!("   ✓ {}", field_id),
                    Some(message) => println!("   ✗ {}: {}", field_id, message),
                }
            }
        }
    }

    Ok(all_valid)
}

/// Expand glob patterns; plain paths are kept as given.
fn expand_patterns(patterns: &[&str]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let before = paths.len();
        let entries =
            glob::glob(pattern).with_context(|| format!("invalid glob pattern {}", pattern))?;
        for entry in entries {
            paths.push(entry?);
        }
        if paths.len() == before {
            bail!("no snapshots match {}", pattern);
        }
    }
    Ok(paths)
}
