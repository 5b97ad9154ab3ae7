use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use modorder::core::{
    DependencyResolver, EcosystemFilter, FileKind, FileScanner, ImportExtractor, NameResolver,
    Resolution,
};
use modorder::formatters::{JsonCompactFormatter, PlainFormatter};
use modorder::parsers::python::PythonParser;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "modorder",
    version = "0.1.0",
    author = "modorder developers",
    about = "Orders modular model files so every dependency is generated first"
)]
struct Cli {
    /// Modular files to order
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Directory to search recursively for modular files
    #[arg(short, long, value_name = "DIR")]
    dir: Vec<PathBuf>,

    /// Output format: plain, waves, json
    #[arg(short, long, value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// Output file path (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Module path substring marking an internal model import (replaces the defaults)
    #[arg(short, long, value_name = "SUBSTR")]
    marker: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputFormat {
    Plain,
    Waves,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);
    run(cli)
}

fn setup_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(formatter)
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        files,
        dir,
        format,
        output,
        marker,
        ..
    } = cli;

    let start_time = Instant::now();
    let names = NameResolver::default();

    let mut inputs = files;
    if !dir.is_empty() {
        let prefix = names
            .prefix_for(&FileKind::Modular)
            .context("prefix table has no modular kind")?;
        let scanner = FileScanner::new();
        for root in &dir {
            let found = scanner
                .scan_directory(root, prefix)
                .with_context(|| format!("failed to scan {}", root.display()))?;
            info!(dir = %root.display(), files = found.len(), "discovered modular files");
            inputs.extend(found);
        }
    }

    if inputs.is_empty() {
        bail!("no modular files given; pass FILES or --dir");
    }

    let filter = if marker.is_empty() {
        EcosystemFilter::default()
    } else {
        EcosystemFilter::new(marker)
    };
    let extractor = ImportExtractor::new(PythonParser::new()?, filter);
    let resolver = DependencyResolver::new(names, extractor);

    let resolution = resolver.resolve(&inputs)?;
    info!(
        files = resolution.order.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "ordering complete"
    );

    let rendered = render(&resolution, format)?;
    match output {
        Some(path) => std::fs::write(&path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout().lock().write_all(rendered.as_bytes())?,
    }

    Ok(())
}

fn render(resolution: &Resolution, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(PlainFormatter::new().format(resolution)),
        OutputFormat::Waves => Ok(PlainFormatter::new().with_waves(true).format(resolution)),
        OutputFormat::Json => {
            let mut rendered = JsonCompactFormatter::new().with_pretty(true).format(resolution)?;
            rendered.push('\n');
            Ok(rendered)
        }
    }
}
