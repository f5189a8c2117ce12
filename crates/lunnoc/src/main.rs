//! The Lunno command-line driver.
//!
//! - `lunno run <file>`: lex, parse and type-check a source file
//! - `lunno version`: print the toolchain version
//! - `lunno lsp`: start the language server on stdin/stdout
//!
//! Set `LUNNO_LOG` (e.g. `LUNNO_LOG=debug`) to see pipeline logging on stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use lunno_common::Diagnostic;

#[derive(Parser)]
#[command(name = "lunno", version, about = "The Lunno language front end")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a Lunno source file and print its top-level types
    Run {
        /// Path to the `.ln` source file
        file: PathBuf,

        /// Print the parsed AST to stdout
        #[arg(long = "dump-ast")]
        dump_ast: bool,

        /// Output diagnostics as JSON (one object per line) instead of caret reports
        #[arg(long)]
        json: bool,
    },
    /// Print the version
    Version,
    /// Start the LSP server (communicates via stdin/stdout)
    Lsp,
}

/// How diagnostics are written to stderr.
struct DiagnosticOptions {
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("LUNNO_LOG", "warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            dump_ast,
            json,
        } => {
            let opts = DiagnosticOptions { json };
            match run(&file, dump_ast, &opts) {
                Ok(0) => {}
                Ok(count) => {
                    if !json {
                        let plural = if count == 1 { "" } else { "s" };
                        eprintln!("error: {} failed with {count} error{plural}", file.display());
                    }
                    process::exit(1);
                }
                Err(e) => {
                    if json {
                        eprintln!("{}", serde_json::json!({ "message": e }));
                    } else {
                        eprintln!("error: {e}");
                    }
                    process::exit(1);
                }
            }
        }
        Commands::Version => {
            println!("lunno {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Lsp => {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("error: failed to start tokio runtime: {e}");
                    process::exit(1);
                }
            };
            rt.block_on(lunno_lsp::run_server());
        }
    }
}

/// Run the pipeline on `path` and report every diagnostic.
///
/// Returns the number of errors reported. `Err` is reserved for failures
/// outside the language itself, such as an unreadable file.
fn run(path: &Path, dump_ast: bool, opts: &DiagnosticOptions) -> Result<usize, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    let file_name = path.display().to_string();
    log::debug!("Checking {}", file_name);

    let tokens = match lunno_lexer::tokenize(&source, &file_name) {
        Ok(tokens) => tokens,
        Err(err) => {
            report(&source, &[err.to_diagnostic()], opts)?;
            return Ok(1);
        }
    };

    let parse = lunno_parser::parse_program(&tokens);
    if dump_ast {
        print!("{}", lunno_parser::dump_program(&parse.program));
    }
    if !parse.ok() {
        report(&source, &parse.errors, opts)?;
        return Ok(parse.errors.len());
    }

    let typeck = lunno_typeck::check(&parse.program);
    if !typeck.ok() {
        let diagnostics: Vec<Diagnostic> =
            typeck.errors.iter().map(|e| e.to_diagnostic()).collect();
        report(&source, &diagnostics, opts)?;
        return Ok(diagnostics.len());
    }

    if !dump_ast {
        for (name, scheme) in &typeck.globals {
            println!("{name} : {scheme}");
        }
    }
    Ok(0)
}

/// Write diagnostics to stderr, as caret reports or JSON lines.
fn report(source: &str, diagnostics: &[Diagnostic], opts: &DiagnosticOptions) -> Result<(), String> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    for diag in diagnostics {
        if opts.json {
            let line = serde_json::to_string(diag)
                .map_err(|e| format!("failed to serialize diagnostic: {e}"))?;
            writeln!(out, "{line}").map_err(|e| format!("failed to write diagnostic: {e}"))?;
        } else {
            diag.report(source, &mut out);
        }
    }
    Ok(())
}
