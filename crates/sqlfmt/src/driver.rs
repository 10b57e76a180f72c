//! Reads, parses and formats many files into one shared position space.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlfmt_core::printer::{self, Config};
use sqlfmt_core::{FileSet, ParseError, Parser};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::error::SqlfmtError;

/// Path that stands for standard input.
pub const STDIN_PATH: &str = "-";

/// What to format and how.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Input files, formatted in this order.
    pub files: Vec<PathBuf>,
    /// Output file; standard output when `None`.
    pub output: Option<PathBuf>,
    /// Printer configuration.
    pub config: Config,
    /// Write the AST as JSON instead of formatted SQL.
    pub dump_ast: bool,
    /// Skip failing files instead of stopping at the first one.
    pub keep_going: bool,
    /// Time allowed for lexing each file.
    pub deadline: Option<Duration>,
}

/// Outcome of a [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of input files.
    pub files: usize,
    /// Files formatted successfully.
    pub formatted: usize,
    /// Files skipped because of an error.
    pub failed: usize,
}

/// Per-file settings handed to the worker tasks.
#[derive(Debug, Clone)]
struct Job {
    config: Config,
    dump_ast: bool,
    deadline: Option<Duration>,
}

/// Formats every input file and writes the results in input order.
///
/// Files are read and parsed concurrently. Output is written only after
/// all files are processed.
///
/// # Errors
///
/// Without `keep_going`, returns the error of the first failing file (in
/// input order) and writes nothing. Writing the output or a panicking
/// worker is always an error.
pub async fn run(options: &Options) -> Result<Summary, SqlfmtError> {
    let fset = Arc::new(FileSet::new());
    let job = Job {
        config: options.config.clone(),
        dump_ast: options.dump_ast,
        deadline: options.deadline,
    };

    let mut tasks = JoinSet::new();
    for (index, path) in options.files.iter().cloned().enumerate() {
        let fset = Arc::clone(&fset);
        let job = job.clone();
        tasks.spawn(async move { (index, format_file(fset, path, job).await) });
    }

    let mut results: Vec<Option<Result<String, SqlfmtError>>> =
        options.files.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.map_err(|e| SqlfmtError::Join(e.to_string()))?;
        results[index] = Some(result);
    }

    let mut summary = Summary {
        files: options.files.len(),
        ..Summary::default()
    };
    let mut out = String::new();
    for result in results.into_iter().flatten() {
        match result {
            Ok(text) => {
                out.push_str(&text);
                if !text.ends_with('\n') {
                    out.push('\n');
                }
                summary.formatted += 1;
            }
            Err(err) if options.keep_going => {
                error!(error = %err, "skipping file");
                summary.failed += 1;
            }
            Err(err) => return Err(err),
        }
    }

    write_output(options.output.as_deref(), &out).await?;
    info!(
        files = summary.files,
        formatted = summary.formatted,
        failed = summary.failed,
        "done"
    );
    Ok(summary)
}

async fn format_file(fset: Arc<FileSet>, path: PathBuf, job: Job) -> Result<String, SqlfmtError> {
    let src = read_input(&path).await?;
    debug!(path = %path.display(), bytes = src.len(), "read input");
    tokio::task::spawn_blocking(move || format_source(&fset, &path, &src, &job))
        .await
        .map_err(|e| SqlfmtError::Join(e.to_string()))?
}

async fn read_input(path: &Path) -> Result<Vec<u8>, SqlfmtError> {
    if path == Path::new(STDIN_PATH) {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .map_err(|e| SqlfmtError::io(path, e))?;
        Ok(buf)
    } else {
        tokio::fs::read(path)
            .await
            .map_err(|e| SqlfmtError::io(path, e))
    }
}

/// Parses one source and renders it as formatted SQL or JSON.
fn format_source(
    fset: &FileSet,
    path: &Path,
    src: &[u8],
    job: &Job,
) -> Result<String, SqlfmtError> {
    let text = std::str::from_utf8(src).map_err(|e| {
        SqlfmtError::parse(
            fset,
            path,
            ParseError::Input(format!("source is not valid UTF-8: {e}")),
        )
    })?;

    let name = if path == Path::new(STDIN_PATH) {
        String::from("<stdin>")
    } else {
        path.display().to_string()
    };
    let file = fset.register(name, None, text.len());
    let mut parser = Parser::new(file, text);
    if let Some(deadline) = job.deadline.and_then(|d| Instant::now().checked_add(d)) {
        parser = parser.with_deadline(deadline);
    }
    let stmt = parser
        .parse_statement()
        .map_err(|source| SqlfmtError::parse(fset, path, source))?;

    if job.dump_ast {
        Ok(serde_json::to_string_pretty(&stmt)?)
    } else {
        Ok(printer::print(&stmt, &job.config))
    }
}

async fn write_output(output: Option<&Path>, text: &str) -> Result<(), SqlfmtError> {
    match output {
        Some(path) => tokio::fs::write(path, text)
            .await
            .map_err(|e| SqlfmtError::io(path, e)),
        None => {
            let path = Path::new(STDIN_PATH);
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(text.as_bytes())
                .await
                .map_err(|e| SqlfmtError::io(path, e))?;
            stdout.flush().await.map_err(|e| SqlfmtError::io(path, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job {
            config: Config::default(),
            dump_ast: false,
            deadline: None,
        }
    }

    #[test]
    fn test_format_source() {
        let fset = FileSet::new();
        let out = format_source(&fset, Path::new("a.sql"), b"select * from table1", &job()).unwrap();
        assert_eq!(out, "SELECT\n    *\nFROM\n    table1\n;");
    }

    #[test]
    fn test_format_source_error_location() {
        let fset = FileSet::new();
        let _ = fset.register("earlier.sql", None, 50);
        let err = format_source(&fset, Path::new("b.sql"), b"select\nfrom t", &job()).unwrap_err();
        match err {
            SqlfmtError::Parse { location, .. } => assert_eq!(location, "b.sql:2:1"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_format_source_invalid_utf8() {
        let fset = FileSet::new();
        let err = format_source(&fset, Path::new("bin.sql"), &[0xff, 0xfe], &job()).unwrap_err();
        assert!(matches!(
            err,
            SqlfmtError::Parse {
                source: ParseError::Input(_),
                ..
            }
        ));
        assert!(fset.is_empty());
    }

    #[test]
    fn test_run_with_no_files() {
        let summary = tokio_test::block_on(run(&Options {
            output: Some(std::env::temp_dir().join("sqlfmt-empty-run.sql")),
            ..Options::default()
        }))
        .unwrap();
        assert_eq!(summary, Summary::default());
    }
}
