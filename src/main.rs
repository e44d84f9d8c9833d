use std::path::PathBuf;
use std::process::ExitCode;

use catalog_bump::action::{ConsoleFormat, ConsoleReporter, GitHubReporter, Reporter, run};
use catalog_bump::catalog::{FileCatalogUpdater, UpdateRequest};
use catalog_bump::config::{
    LogLevel, OutputFormat, github_output_path, resolve_output_format,
};
use clap::Parser;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catalog-bump")]
#[command(about = "Read or update a version in a Gradle version catalog")]
struct Cli {
    /// Key in the [versions] table
    #[arg(long = "ref", env = "INPUT_REF")]
    ref_name: Option<String>,

    /// Library key, full module or group prefix
    #[arg(long, env = "INPUT_LIBRARY")]
    library: Option<String>,

    /// Plugin key or plugin id
    #[arg(long, env = "INPUT_PLUGIN")]
    plugin: Option<String>,

    /// New version; omit to only read the current one
    #[arg(long, env = "INPUT_VERSION")]
    version: Option<String>,

    /// Catalog path [default: gradle/libs.versions.toml]
    #[arg(long, env = "INPUT_CATALOG")]
    catalog: Option<PathBuf>,

    /// Whole request as a JSON object, e.g. '{"ref":"kotlin","version":"2.0.0"}'
    #[arg(long)]
    request: Option<String>,

    #[arg(long, value_enum, default_value = "auto")]
    output: OutputFormat,

    #[arg(long, value_enum, default_value = "info", env = "CATALOG_BUMP_LOG_LEVEL")]
    log_level: LogLevel,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn has_field_arguments(&self) -> bool {
        self.ref_name.is_some()
            || self.library.is_some()
            || self.plugin.is_some()
            || self.version.is_some()
            || self.catalog.is_some()
    }

    fn field_request(&self) -> UpdateRequest {
        UpdateRequest {
            ref_name: self.ref_name.clone(),
            library: self.library.clone(),
            plugin: self.plugin.clone(),
            version: self.version.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

fn initialize_tracing(
    log_level: &LogLevel,
    json: bool,
    log_file: Option<&PathBuf>,
) -> anyhow::Result<WorkerGuard> {
    // RUST_LOG takes precedence over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    let (writer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_appender::non_blocking(file)
        }
        // Logs must stay off stdout, which carries the outputs
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false);
    if json {
        builder.json().with_target(true).init();
    } else {
        builder.with_target(false).init();
    }

    Ok(guard)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = initialize_tracing(&cli.log_level, cli.log_json, cli.log_file.as_ref())?;

    let mut reporter: Box<dyn Reporter> = match resolve_output_format(cli.output) {
        OutputFormat::Github => Box::new(GitHubReporter::new(github_output_path())),
        OutputFormat::Json => Box::new(ConsoleReporter::new(ConsoleFormat::Json)),
        OutputFormat::Auto | OutputFormat::Text => {
            Box::new(ConsoleReporter::new(ConsoleFormat::Text))
        }
    };

    let request = match &cli.request {
        Some(source) => {
            if cli.has_field_arguments() {
                warn!("--request is set; ignoring --ref, --library, --plugin, --version and --catalog");
            }
            match UpdateRequest::from_json(source) {
                Ok(request) => request,
                Err(e) => {
                    reporter.set_failed(&e.to_string())?;
                    reporter.finish()?;
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        None => cli.field_request(),
    };

    let succeeded = run(&request, &FileCatalogUpdater, reporter.as_mut());
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
