use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use universe_core::{Config, ErrorKind, Reporter, TracingReporter, UniverseError, config_file};
use universe_pdf_mupdf::MupdfBackend;

mod output;
mod pipeline;

use output::{ColorMode, ConsoleReporter};
use pipeline::{Destination, Outcome};

/// Extract stock ISINs and names from a brokerage PDF report into a CSV file
#[derive(Parser, Debug)]
#[command(name = "universe", version, about, long_about = None)]
struct Cli {
    /// Path to the input PDF file (e.g. 'report.pdf')
    pdf: PathBuf,

    /// Path for the output CSV file, or `-` for stdout [default: trading_universe.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extract and print the records without writing a CSV file
    #[arg(long)]
    dry_run: bool,

    /// Drop records whose name is empty
    #[arg(long)]
    skip_empty_names: bool,

    /// Config file to use instead of `.universe.toml` / the platform config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only report warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_level()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let color = ColorMode(!cli.no_color && std::io::stderr().is_terminal());

    match run(cli, color) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let err = into_universe_error(err);
            tracing::debug!(kind = ?err.kind(), error = ?err, "run failed");
            if let Some(message) = output::format_error(&err) {
                eprintln!("{}", message);
            }
            exit_code(err.kind())
        }
    }
}

/// Failures outside the conversion pipeline (config loading, printing) are `Unknown`.
fn into_universe_error(err: anyhow::Error) -> UniverseError {
    match err.downcast::<UniverseError>() {
        Ok(err) => err,
        Err(err) => UniverseError::Unknown(format!("{:#}", err)),
    }
}

/// A write failure only gets here under `on_write_failure = "fail"`.
fn exit_code(kind: ErrorKind) -> ExitCode {
    match kind {
        ErrorKind::NotFound
        | ErrorKind::UnreadableDocument
        | ErrorKind::WriteFailure
        | ErrorKind::Unknown => ExitCode::FAILURE,
    }
}

/// Resolve configuration: CLI flags > config file > defaults.
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let file = match &cli.config {
        Some(path) => config_file::read_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => config_file::load_config(),
    };

    let mut config = Config::from_file(&file);
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if cli.skip_empty_names {
        config.parse.skip_empty_names = true;
    }
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn run(cli: Cli, color: ColorMode) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let destination = Destination::resolve(&config.output, cli.dry_run);

    let reporter: Box<dyn Reporter> = if cli.quiet {
        Box::new(TracingReporter)
    } else {
        Box::new(ConsoleReporter::new(color))
    };

    let backend = MupdfBackend::new();
    let mut stdout = std::io::stdout().lock();
    let conversion = pipeline::convert(
        &cli.pdf,
        &destination,
        &config,
        &backend,
        reporter.as_ref(),
        &mut stdout,
    )?;
    drop(reporter);

    match conversion.outcome {
        Outcome::DryRun => {
            let file_name = cli
                .pdf
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| cli.pdf.display().to_string());
            let stdout_color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());
            output::print_records(&mut stdout, &file_name, &conversion.table, stdout_color)?;
        }
        Outcome::WriteFailed { reason } => {
            tracing::info!(%reason, "write failure ignored by on_write_failure = \"warn\"");
        }
        Outcome::Written { .. } | Outcome::NothingToWrite => {}
    }

    Ok(())
}
