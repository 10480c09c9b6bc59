//! `simc <source.simc> [token|opcode|table_after_lexing|table_after_parsing]`
//! (§6). `-v`/`--verbose` may appear anywhere in argv and is stripped
//! before positional parsing; it raises the tracing filter to `debug`
//! instead of counting as the dump-mode argument.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use simc_drv::{Config, DriverError, DumpMode};
use simc_util::diagnostic::{DiagnosticBuilder, Handler};
use simc_util::span::SourceMap;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    init_tracing(verbose);

    let positional: Vec<&String> = args.iter().filter(|a| a.as_str() != "-v" && a.as_str() != "--verbose").collect();
    let source = positional.first().map(|s| PathBuf::from(s.as_str()));

    let config = match build_config(&positional, verbose) {
        Ok(config) => config,
        Err(err) => return report(source.as_deref(), &err),
    };

    match simc_drv::run(&config) {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(err) => report(Some(&config.source), &err),
    }
}

fn build_config(positional: &[&String], verbose: bool) -> Result<Config, DriverError> {
    let source = positional.first().ok_or(DriverError::MissingSource)?;
    let dump_mode = positional.get(1).and_then(|a| DumpMode::from_arg(a));
    Config::new(PathBuf::from(source), dump_mode, verbose)
}

/// Builds the diagnostic for `err` and hands it to `Handler::report`.
/// When `err` carries a real line (not `Span::DUMMY`) and `source` can
/// still be read from disk, attaches that line's text as the diagnostic's
/// snippet — the only call site in the workspace that exercises
/// `simc_util::span::SourceMap` outside its own tests.
fn report(source: Option<&Path>, err: &DriverError) -> ExitCode {
    let span = err.span();
    let mut builder = DiagnosticBuilder::error(err.to_string()).span(span);

    if let Some(code) = err.code() {
        builder = builder.code(code);
    }

    if !span.is_dummy() {
        if let Some(snippet) = source.and_then(|path| snippet_for(path, span.line)) {
            builder = builder.snippet(snippet);
        }
    }

    Handler::new().report(&builder.build());
}

fn snippet_for(path: &Path, line: u32) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let mut map = SourceMap::new();
    let idx = map.add_file(path.display().to_string(), &content);
    map.get(idx)?.line(line).map(str::to_string)
}

/// `RUST_LOG`-driven (§1); absent that, `-v`/`--verbose` raises the
/// default filter from `warn` to `debug`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
