use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;

use hehehe::Mapping;

/// Transliterate a Brainfuck program into the token alphabet.
///
/// Every instruction character is replaced by its token from the mapping
/// table; everything else in the source is dropped. Tokens are written
/// back to back with no separators.
#[derive(Parser, Debug)]
#[command(name = "bf2he", version)]
struct Cli {
    /// JSON mapping table (instruction character -> token)
    mapping: PathBuf,

    /// Brainfuck source file
    source: PathBuf,

    /// Write the encoded program here instead of stdout
    output: Option<PathBuf>,
}

fn run(cli: Cli) -> i32 {
    let mapping = match Mapping::load(&cli.mapping) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("bf2he: failed to load mapping: {e}");
            let _ = io::stderr().flush();
            return 2;
        }
    };

    let source = match std::fs::read_to_string(&cli.source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("bf2he: failed to read {}: {e}", cli.source.display());
            let _ = io::stderr().flush();
            return 3;
        }
    };

    let encoded = mapping.encode(&source);

    match cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &encoded) {
                eprintln!("bf2he: failed to write {}: {e}", path.display());
                let _ = io::stderr().flush();
                return 3;
            }
        }
        None => {
            print!("{encoded}");
            let _ = io::stdout().flush();
        }
    }

    0
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
