//! CLI entry point for campaign-flow
//!
//! Checks, dumps and replays campaign script files.

use std::path::PathBuf;
use std::process;

use campaign_flow::cli::{self, Options};
use campaign_flow::debug::{self, DebugConfig};

fn main() {
    if let Err(err) = debug::init(&DebugConfig::default()) {
        eprintln!("Warning: logging unavailable: {err}");
    }

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = &args[1];
    if matches!(command.as_str(), "--help" | "-h") {
        print_usage();
        return;
    }

    let (options, rest) = match Options::parse(&args[2..]) {
        Ok(parsed) => parsed,
        Err(err) => fail("Invalid options", &err),
    };

    match command.as_str() {
        "check" => {
            let file = require_file(&rest);
            match cli::run_check(&file, &options) {
                Ok(reports) => {
                    if reports.iter().any(|report| report.has_errors()) {
                        process::exit(1);
                    }
                }
                Err(err) => fail("Check failed", &err),
            }
        }
        "dump" => {
            let file = require_file(&rest);
            if let Err(err) = cli::run_dump(&file, &options) {
                fail("Dump failed", &err);
            }
        }
        "state" => {
            let file = require_file(&rest);
            let Some(script) = rest.get(1) else {
                eprintln!("Error: Missing script name");
                eprintln!();
                print_usage();
                process::exit(1);
            };
            let block = rest.get(2).map(String::as_str);
            if let Err(err) = cli::run_state(&file, script, block, &options) {
                fail("State replay failed", &err);
            }
        }
        _ => {
            eprintln!("Error: Unknown command '{}'", command);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    }
}

fn require_file(rest: &[String]) -> PathBuf {
    match rest.first() {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("Error: Missing campaign file path");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    }
}

fn fail(what: &str, err: &anyhow::Error) -> ! {
    eprintln!("Error: {what}");
    eprintln!("Reason: {err:#}");
    process::exit(1);
}

fn print_usage() {
    println!("campaign-flow - Campaign script analyzer");
    println!();
    println!("USAGE:");
    println!("    campaign-flow <command> <file> [options]");
    println!();
    println!("COMMANDS:");
    println!("    check <file>                      Validate every script in the file");
    println!("    dump <file>                       Print the campaign analysis as JSON");
    println!("    state <file> <script> [block]     Print the flow state before a block");
    println!("    --help, -h                        Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    --lang <code>      Primary language of the file (default EN)");
    println!("    --config <file>    Validation config as JSON");
    println!();
    println!("ENVIRONMENT:");
    println!("    CAMPAIGN_FLOW_DEBUG=<level>    Enable debug logging on stderr");
    println!();
    println!("EXAMPLES:");
    println!("    campaign-flow check scripts_EN.txt");
    println!("    campaign-flow state scripts_EN.txt intro intro_block_4");
}
