//! Runs an intcode program from a file.
//!
//! # Usage
//! ```text
//! intcode <program_file> [OPTIONS]
//! ```
//!
//! # Arguments
//! - `program_file`: Path to a comma-separated integer program
//!
//! # Options
//! - `--input <list>`: Comma-separated values queued as input before the run
//! - `--poke <addr>=<value>`: Overwrite a memory cell before the run (repeatable)
//! - `--ascii`: Exchange stdin/stdout as text instead of one integer per line
//! - `--no-timestamp`: Omit timestamps from log lines
//!
//! Outputs are printed as they drain; when the program reads with an
//! empty input queue, one line is read from stdin and queued.

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process;
use std::sync::atomic::Ordering;

use intcode::utils::log::SHOW_TIMESTAMP;
use intcode::vm::machine::{Machine, Step};
use intcode::vm::program::Program;
use intcode::{error, info};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let path = &args[1];

    let mut seed_input: Vec<i64> = Vec::new();
    let mut pokes: Vec<(usize, i64)> = Vec::new();
    let mut ascii = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("--input requires an argument");
                    process::exit(1);
                }
                seed_input = match parse_values(&args[i]) {
                    Some(values) => values,
                    None => {
                        eprintln!("Invalid input list: {}", args[i]);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--poke" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("--poke requires an argument");
                    process::exit(1);
                }
                match parse_poke(&args[i]) {
                    Some(poke) => pokes.push(poke),
                    None => {
                        eprintln!("Invalid poke, expected <addr>=<value>: {}", args[i]);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--ascii" => {
                ascii = true;
                i += 1;
            }
            "--no-timestamp" => {
                SHOW_TIMESTAMP.store(false, Ordering::Relaxed);
                i += 1;
            }
            other => {
                eprintln!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            error!("failed to read {}: {}", path, e);
            process::exit(1);
        }
    };

    let program: Program = match source.parse() {
        Ok(program) => program,
        Err(e) => {
            error!("failed to parse {}: {}", path, e);
            process::exit(1);
        }
    };

    info!("loaded {} ({} words)", path, program.len());

    let mut machine = Machine::new(&program);
    for (address, value) in pokes {
        machine.poke(address, value);
    }
    for value in seed_input {
        machine.push_input(value);
    }

    drive(&mut machine, ascii);
}

/// Drives the machine to halt, servicing input starvation from stdin.
fn drive(machine: &mut Machine, ascii: bool) {
    let stdin = io::stdin();
    loop {
        match machine.run() {
            Ok(Step::Halted) => break,
            Ok(_) => {
                flush_output(machine, ascii);
                if !feed_from_stdin(machine, &stdin, ascii) {
                    error!("input exhausted at address {}", machine.pointer());
                    process::exit(1);
                }
            }
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        }
    }

    flush_output(machine, ascii);
    info!("halted after {} steps", machine.steps());
}

/// Prints and drains everything in the output queue.
fn flush_output(machine: &mut Machine, ascii: bool) {
    if ascii {
        let text = machine.output_to_ascii();
        if !text.is_empty() {
            print!("{}", text);
            let _ = io::stdout().flush();
        }
        while machine.pop_output().is_some() {}
    } else {
        while let Some(value) = machine.pop_output() {
            println!("{}", value);
        }
    }
}

/// Reads one line from stdin into the input queue.
///
/// Returns false once stdin is exhausted or a line fails to parse.
fn feed_from_stdin(machine: &mut Machine, stdin: &io::Stdin, ascii: bool) -> bool {
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) | Err(_) => false,
        Ok(_) if ascii => {
            machine.push_ascii(&line);
            true
        }
        Ok(_) => match line.trim().parse::<i64>() {
            Ok(value) => {
                machine.push_input(value);
                true
            }
            Err(_) => {
                eprintln!("not an integer: {}", line.trim());
                false
            }
        },
    }
}

/// Parses a comma-separated integer list.
fn parse_values(list: &str) -> Option<Vec<i64>> {
    list.split(',')
        .map(|item| item.trim().parse::<i64>().ok())
        .collect()
}

/// Parses an `<addr>=<value>` memory patch.
fn parse_poke(patch: &str) -> Option<(usize, i64)> {
    let (address, value) = patch.split_once('=')?;
    Some((address.trim().parse().ok()?, value.trim().parse().ok()?))
}

const USAGE: &str = "\
Intcode Runner

USAGE:
    {program} <program_file> [OPTIONS]

ARGS:
    <program_file>    Path to a comma-separated integer program

OPTIONS:
    --input <list>          Comma-separated values queued as input before the run
    --poke <addr>=<value>   Overwrite a memory cell before the run (repeatable)
    --ascii                 Exchange stdin/stdout as text instead of one integer per line
    --no-timestamp          Omit timestamps from log lines
    -h, --help              Print this help message

EXAMPLES:
    # Run a program with two input values
    {program} program.txt --input 1,2

    # Patch two cells before running
    {program} program.txt --poke 1=12 --poke 2=2

    # Drive a text adventure interactively
    {program} program.txt --ascii
";

/// Prints usage information to stderr.
fn print_usage(program: &str) {
    eprintln!("{}", USAGE.replace("{program}", program));
}
