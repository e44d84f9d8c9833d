use std::path::{Path, PathBuf};

use clap::ValueEnum;

/// Catalog location used when no path is given
pub const DEFAULT_CATALOG_PATH: &str = "gradle/libs.versions.toml";

/// Set to `true` by GitHub Actions runners
pub const GITHUB_ACTIONS_ENV: &str = "GITHUB_ACTIONS";

/// File that collects step outputs on GitHub Actions runners
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// How results are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `github` when running inside GitHub Actions, `text` otherwise
    Auto,
    /// Step outputs and `::error::` workflow commands
    Github,
    /// `name=value` lines
    Text,
    /// One JSON object
    Json,
}

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Returns the catalog path to operate on
pub fn catalog_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .filter(|path| !path.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH))
}

/// Turns `auto` into a concrete format based on the environment
pub fn resolve_output_format(requested: OutputFormat) -> OutputFormat {
    resolve_output_format_with_env(requested, std::env::var(GITHUB_ACTIONS_ENV).ok())
}

/// Returns the step output file of the current GitHub Actions job, if any
pub fn github_output_path() -> Option<PathBuf> {
    github_output_path_with_env(std::env::var_os(GITHUB_OUTPUT_ENV).map(PathBuf::from))
}

fn resolve_output_format_with_env(
    requested: OutputFormat,
    github_actions: Option<String>,
) -> OutputFormat {
    match requested {
        OutputFormat::Auto if github_actions.as_deref() == Some("true") => OutputFormat::Github,
        OutputFormat::Auto => OutputFormat::Text,
        other => other,
    }
}

fn github_output_path_with_env(github_output: Option<PathBuf>) -> Option<PathBuf> {
    github_output.filter(|path| !path.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn catalog_path_defaults_to_gradle_directory() {
        assert_eq!(
            catalog_path(None),
            PathBuf::from("gradle/libs.versions.toml")
        );
    }

    #[test]
    fn catalog_path_prefers_explicit_path() {
        assert_eq!(
            catalog_path(Some(Path::new("build-logic/libs.toml"))),
            PathBuf::from("build-logic/libs.toml")
        );
    }

    #[test]
    fn catalog_path_ignores_empty_path() {
        assert_eq!(
            catalog_path(Some(Path::new(""))),
            PathBuf::from(DEFAULT_CATALOG_PATH)
        );
    }

    #[rstest]
    #[case(OutputFormat::Auto, Some("true"), OutputFormat::Github)]
    #[case(OutputFormat::Auto, Some("false"), OutputFormat::Text)]
    #[case(OutputFormat::Auto, None, OutputFormat::Text)]
    #[case(OutputFormat::Json, Some("true"), OutputFormat::Json)]
    #[case(OutputFormat::Github, None, OutputFormat::Github)]
    fn resolve_output_format_with_env_returns_expected(
        #[case] requested: OutputFormat,
        #[case] github_actions: Option<&str>,
        #[case] expected: OutputFormat,
    ) {
        assert_eq!(
            resolve_output_format_with_env(requested, github_actions.map(str::to_string)),
            expected
        );
    }

    #[test]
    fn github_output_path_with_env_ignores_empty_value() {
        assert_eq!(github_output_path_with_env(Some(PathBuf::new())), None);
        assert_eq!(
            github_output_path_with_env(Some(PathBuf::from("/tmp/output"))),
            Some(PathBuf::from("/tmp/output"))
        );
    }
}
