//! sqlfmt CLI
//!
//! Formats SQL `SELECT` statements.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use sqlfmt::{run, Config, Options};

/// Formats SQL SELECT statements.
#[derive(Parser)]
#[command(name = "sqlfmt")]
#[command(author, version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Input files; `-` reads standard input.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output file (standard output if not specified).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Spaces per indentation level.
    #[arg(long, env = "SQLFMT_INDENT", default_value_t = 4)]
    indent: usize,

    /// Do not end statements with `;`.
    #[arg(long)]
    no_semicolon: bool,

    /// Print keywords in lowercase.
    #[arg(long)]
    lowercase: bool,

    /// Write the syntax tree as JSON instead of formatted SQL.
    #[arg(long)]
    dump_ast: bool,

    /// Keep formatting the remaining files after an error.
    #[arg(short, long)]
    keep_going: bool,

    /// Give up lexing a file after this many milliseconds.
    #[arg(long, env = "SQLFMT_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the formatted output.
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = Options {
        files: cli.files,
        output: cli.output,
        config: Config::default()
            .with_indent_width(cli.indent)
            .with_implied_semicolon(!cli.no_semicolon)
            .with_uppercase_keywords(!cli.lowercase),
        dump_ast: cli.dump_ast,
        keep_going: cli.keep_going,
        deadline: cli.timeout_ms.map(Duration::from_millis),
    };
    debug!(files = options.files.len(), "formatting");

    let summary = run(&options).await?;
    if summary.failed > 0 {
        anyhow::bail!(
            "{} of {} files could not be formatted",
            summary.failed,
            summary.files
        );
    }
    Ok(())
}
