use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;

use hehehe::{cli_util, sanitize, Brainfuck, DEFAULT_TAPE_SIZE};

/// Run a Brainfuck program from a source file.
///
/// Non-instruction characters in the source are treated as comments.
/// The program's output is written to stdout.
#[derive(Parser, Debug)]
#[command(name = "bf", version)]
struct Cli {
    /// Brainfuck source file
    source: PathBuf,

    /// Input string consumed by `,` (EOF reads 0 once exhausted)
    input: Option<String>,

    /// Initial tape size in cells (the tape still grows on demand)
    #[arg(long, default_value_t = DEFAULT_TAPE_SIZE)]
    tape_size: usize,

    /// Stop after this many instructions instead of running to completion
    #[arg(long)]
    max_steps: Option<usize>,
}

fn run(cli: Cli) -> i32 {
    let source = match std::fs::read_to_string(&cli.source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("bf: failed to read {}: {e}", cli.source.display());
            let _ = io::stderr().flush();
            return 2;
        }
    };

    let input = cli.input.unwrap_or_default();
    let mut bf = Brainfuck::new_with_memory(&source, &input, cli.tape_size);
    let result = match cli.max_steps {
        Some(max) => bf.run_bounded(max),
        None => bf.run(),
    };

    match result {
        Ok(out) => {
            print!("{out}");
            let _ = io::stdout().flush();
            0
        }
        Err(err) => {
            // The error's index counts sanitized instructions, so show the
            // caret against the sanitized stream.
            cli_util::print_syntax_error(Some("bf"), &sanitize(&source), &err);
            3
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.use_stderr() {
                let _ = e.print();
                exit(1);
            }
            e.exit();
        }
    };

    exit(run(cli));
}
