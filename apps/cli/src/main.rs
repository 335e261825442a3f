//! Tally - command line calculator
//!
//! Reads a document from a file or stdin, evaluates every line in order and
//! prints one result per input line.

mod logging;

use anyhow::Context;
use clap::Parser;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tally_engine::{ConfigBuilder, Environment, Interpreter};

#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(about = "Evaluate a calculator document line by line", version)]
struct Args {
    /// Document to evaluate; reads stdin when omitted
    file: Option<PathBuf>,

    /// Decimal separator for input and output numbers
    #[arg(long, default_value_t = '.')]
    decimal_separator: char,

    /// Digit grouping separator for output numbers
    #[arg(long)]
    grouping_separator: Option<char>,

    /// Print each input line next to its result
    #[arg(short, long)]
    side_by_side: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(&args.log_level)?;

    let document = read_document(args.file.as_ref())?;

    let mut builder =
        ConfigBuilder::with_defaults().context("Failed to load built-in vocabulary")?;
    builder
        .decimal_separator(args.decimal_separator)
        .grouping_separator(args.grouping_separator);
    let config = builder.build().context("Invalid number format")?;
    let interpreter =
        Interpreter::new(Arc::new(config)).context("Failed to initialize interpreter")?;

    let mut environment = Environment::new();
    let results = interpreter.evaluate_document(&mut environment, &document);
    tracing::debug!(lines = results.len(), "document evaluated");

    let mut out = BufWriter::new(io::stdout().lock());
    for (line, result) in document.lines().zip(&results) {
        if args.side_by_side {
            writeln!(out, "{line} ⇒ {result}")?;
        } else {
            writeln!(out, "{result}")?;
        }
    }
    out.flush().context("Failed to write results")?;
    Ok(())
}

fn read_document(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut document = String::new();
            io::stdin()
                .read_to_string(&mut document)
                .context("Failed to read stdin")?;
            Ok(document)
        }
    }
}
