use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;

use hehehe::{cli_util, Brainfuck, Mapping};

/// Run a transliterated Brainfuck program.
///
/// Loads the mapping table, inverts the encoded program back into
/// Brainfuck, executes it, and writes the program's output to stdout.
#[derive(Parser, Debug)]
#[command(name = "hehehe", version)]
struct Cli {
    /// JSON mapping table (instruction character -> token)
    mapping: PathBuf,

    /// Encoded program file
    program: PathBuf,

    /// Input string consumed by `,` (EOF reads 0 once exhausted)
    input: Option<String>,
}

fn run(cli: Cli) -> i32 {
    let mapping = match Mapping::load(&cli.mapping) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("hehehe: failed to load mapping: {e}");
            let _ = io::stderr().flush();
            return 2;
        }
    };

    let encoded = match std::fs::read_to_string(&cli.program) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("hehehe: failed to read {}: {e}", cli.program.display());
            let _ = io::stderr().flush();
            return 2;
        }
    };

    let code = match mapping.decode(&encoded) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("hehehe: {e}");
            let _ = io::stderr().flush();
            return 2;
        }
    };

    let input = cli.input.unwrap_or_default();
    let mut bf = Brainfuck::with_input(&code, &input);
    match bf.run() {
        Ok(out) => {
            print!("{out}");
            let _ = io::stdout().flush();
            0
        }
        Err(err) => {
            cli_util::print_syntax_error(Some("hehehe"), &code, &err);
            2
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage problems exit 1; --help and --version exit 0.
            if e.use_stderr() {
                let _ = e.print();
                exit(1);
            }
            e.exit();
        }
    };

    exit(run(cli));
}
